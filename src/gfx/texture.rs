// src/gfx/texture.rs
//! Texture loading and GPU texture resources
//!
//! Image files are decoded on background threads. Materials hold
//! [`TextureHandle`]s, never raw images: a handle starts `Pending`, flips to
//! `Ready` or `Failed` whenever its load settles, and the renderer uploads
//! whatever is ready on the next frame. A failed load simply leaves the
//! material channel absent; textures popping in after startup is the normal,
//! non-error outcome.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use image::RgbaImage;
use log::{debug, warn};

/// Lightweight view of a handle's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    Pending,
    Ready,
    Failed,
}

enum LoadState {
    Pending,
    Ready(RgbaImage),
    Failed(String),
}

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Shared handle to an asynchronously loading texture.
#[derive(Clone)]
pub struct TextureHandle {
    id: u64,
    label: String,
    state: Arc<Mutex<LoadState>>,
}

impl TextureHandle {
    fn new_pending(label: String) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            label,
            state: Arc::new(Mutex::new(LoadState::Pending)),
        }
    }

    /// Unique id, used by the renderer to track uploads per handle.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> TextureStatus {
        match *self.state.lock().unwrap() {
            LoadState::Pending => TextureStatus::Pending,
            LoadState::Ready(_) => TextureStatus::Ready,
            LoadState::Failed(_) => TextureStatus::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == TextureStatus::Ready
    }

    pub fn is_failed(&self) -> bool {
        self.status() == TextureStatus::Failed
    }

    /// Runs `f` against the decoded image if the load has succeeded.
    pub fn with_image<R>(&self, f: impl FnOnce(&RgbaImage) -> R) -> Option<R> {
        match *self.state.lock().unwrap() {
            LoadState::Ready(ref image) => Some(f(image)),
            _ => None,
        }
    }

    /// Blocks until the load settles and returns the final status.
    pub fn wait(&self) -> TextureStatus {
        loop {
            let status = self.status();
            if status != TextureStatus::Pending {
                return status;
            }
            thread::sleep(std::time::Duration::from_millis(1));
        }
    }

    fn settle(&self, result: Result<RgbaImage, String>) {
        let mut state = self.state.lock().unwrap();
        *state = match result {
            Ok(image) => LoadState::Ready(image),
            Err(reason) => LoadState::Failed(reason),
        };
    }
}

/// Issues background texture loads relative to an asset directory.
pub struct TextureLoader {
    base: PathBuf,
}

impl TextureLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Starts loading `relative` and returns immediately.
    ///
    /// The returned handle settles on an arbitrary later frame; no ordering
    /// is guaranteed between in-flight loads.
    pub fn load(&self, relative: &str) -> TextureHandle {
        let path = self.base.join(relative);
        let handle = TextureHandle::new_pending(relative.to_string());

        let thread_handle = handle.clone();
        thread::spawn(move || {
            thread_handle.settle(decode(&path));
        });

        handle
    }
}

fn decode(path: &Path) -> Result<RgbaImage, String> {
    match image::open(path) {
        Ok(image) => {
            debug!("loaded texture {:?}", path);
            Ok(image.to_rgba8())
        }
        Err(err) => {
            warn!("texture {:?} failed to load: {}", path, err);
            Err(err.to_string())
        }
    }
}

/// GPU texture resource containing texture, view, and sampler.
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a 2D texture from raw RGBA8 data.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// 1x1 texture standing in for channels that are pending or failed.
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Self {
        Self::from_rgba(device, queue, &rgba, 1, 1, label)
    }

    /// Uploads a settled handle's image, if there is one.
    pub fn from_handle(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: &TextureHandle,
    ) -> Option<Self> {
        handle.with_image(|image| {
            Self::from_rgba(
                device,
                queue,
                image.as_raw(),
                image.width(),
                image.height(),
                handle.label(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_settles_failed() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TextureLoader::new(dir.path());

        let handle = loader.load("textures/door/color.jpg");
        assert_eq!(handle.wait(), TextureStatus::Failed);
        assert!(handle.with_image(|_| ()).is_none());
    }

    #[test]
    fn test_corrupt_file_settles_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not an image").unwrap();

        let loader = TextureLoader::new(dir.path());
        let handle = loader.load("bad.png");
        assert_eq!(handle.wait(), TextureStatus::Failed);
    }

    #[test]
    fn test_valid_file_settles_ready() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        let image = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        image.save(&path).unwrap();

        let loader = TextureLoader::new(dir.path());
        let handle = loader.load("pixel.png");
        assert_eq!(handle.wait(), TextureStatus::Ready);
        assert_eq!(handle.with_image(|img| img.width()), Some(2));
    }

    #[test]
    fn test_clones_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TextureLoader::new(dir.path());

        let handle = loader.load("missing.png");
        let clone = handle.clone();
        handle.wait();
        assert!(clone.is_failed());
        assert_eq!(handle.id(), clone.id());
    }

    #[test]
    fn test_handles_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TextureLoader::new(dir.path());
        let a = loader.load("a.png");
        let b = loader.load("b.png");
        assert_ne!(a.id(), b.id());
    }
}
