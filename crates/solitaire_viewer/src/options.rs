// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line options.

use clap::Parser;
use std::path::PathBuf;

/// Cinematic showcase of the Solitaire ring
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "solitaire")]
#[command(about = "Cinematic showcase of the Solitaire ring")]
#[command(version)]
pub struct Options {
    /// Config file to load (RON)
    pub config: Option<PathBuf>,

    /// Run this many frames without a window
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u64>,

    /// Write the config to this path and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}
