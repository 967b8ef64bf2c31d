// SPDX-License-Identifier: MIT OR Apache-2.0
//! Solitaire jewelry showcase viewer.
//!
//! Opens a window with a wireframe preview of the ring, the cinematic
//! timeline strip and the loading overlay. With `--headless` it ticks the
//! showcase for a fixed number of frames and logs what happened instead.

mod app;
mod headless;
mod options;
mod preview;

use app::ViewerApp;
use clap::Parser;
use options::Options;
use solitaire_cinematic::ShowcaseConfig;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "solitaire_viewer=debug,solitaire_cinematic=debug,wgpu=warn,naga=warn";

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = Options::parse();

    tracing::info!("Starting Solitaire viewer v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(options.config.as_deref());

    if let Some(path) = &options.write_config {
        if let Err(e) = write_config(&config, path) {
            tracing::error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    if let Some(frames) = options.headless {
        headless::run(&config, frames);
        return;
    }

    if let Err(e) = ViewerApp::run(config) {
        tracing::error!("Viewer crashed: {e}");
        std::process::exit(1);
    }
}

fn write_config(config: &ShowcaseConfig, path: &Path) -> app::Result<()> {
    config.save(path)?;
    Ok(())
}

/// Load the config, falling back to defaults if it is missing or broken
fn load_config(path: Option<&Path>) -> ShowcaseConfig {
    let Some(path) = path else {
        return ShowcaseConfig::default();
    };

    ShowcaseConfig::load(path).unwrap_or_else(|e| {
        tracing::warn!("Could not load {}: {e}; using defaults", path.display());
        ShowcaseConfig::default()
    })
}
