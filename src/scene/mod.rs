// src/scene/mod.rs
//! Scene graph: objects, materials, lights and per-window context.

pub mod context;
pub mod lights;
pub mod object;
pub mod showcase;

pub use context::{Clock, SceneContext};
pub use lights::LightRig;
pub use object::SceneObject;

use crate::gfx::material::{Material, MaterialManager};

/// Everything that gets drawn: the objects, the material store and the
/// fixed light rig.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub material_manager: MaterialManager,
    pub lights: LightRig,
}

impl Scene {
    pub fn new(lights: LightRig) -> Self {
        Self {
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            lights,
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Material lookup for an object, falling back to the default material.
    pub fn material_for(&self, object: &SceneObject) -> &Material {
        self.material_manager
            .get_material_for_object(object.material_id.as_ref())
    }
}
