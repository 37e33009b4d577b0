// src/main.rs
use anyhow::Result;

use material_showcase::ShowcaseApp;

fn main() -> Result<()> {
    env_logger::init();

    let app = ShowcaseApp::new()?;
    app.run()?;
    Ok(())
}
