//! Interactive viewer for the quadview point quadtree.
//!
//! Usage: `quadview [CONFIG_PATH]`. Keys: F1 select box, F2 box around cursor,
//! F3 circle around cursor, F4 spawn points, F5 clear, F6/F7/F8 toggle quads,
//! points and selection. The mouse wheel resizes the cursor region, the right
//! button sprays points under the cursor.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod viewer;

use config::Config;
use viewer::Viewer;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("quadview v{}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path)?,
        None => Config::load_or_default(Path::new(config::DEFAULT_PATH))?,
    };
    info!(
        "Window {}x{}, capacity {}, max depth {}",
        config.window.width, config.window.height, config.tree.capacity, config.tree.max_depth
    );

    let viewer = Viewer::new(&config).context("building the initial tree")?;

    let size = [config.window.width, config.window.height];
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_min_inner_size(size)
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "quadtree",
        native_options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|err| anyhow::anyhow!("viewer exited with error: {err}"))?;
    Ok(())
}
