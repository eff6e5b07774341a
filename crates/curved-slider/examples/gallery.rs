//! Gallery — a curved, autoplaying carousel of images from a config file.
//!
//! ```text
//! cargo run --example gallery -- path/to/gallery.json
//! ```
//!
//! Edit the config while the window is open to swap images or options.

use std::path::PathBuf;

use curved_slider::prelude::*;

fn main() -> Result<(), AppError> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/examples/gallery.json")));
    let config = SliderConfig::load(&path)?;
    log::info!("{} images from {}", config.images.len(), path.display());

    App::new()
        .config(config)
        .watch_config(path)
        .run()
}
