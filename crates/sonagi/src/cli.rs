//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use sonagi_core::RainConfig;

/// Digital rain for the terminal. Click to send shockwaves, press `a` to
/// toggle audio reactivity and `q` to quit.
#[derive(Parser, Debug)]
#[command(name = "sonagi", version, long_about = None)]
pub struct Args {
    /// Read the configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for the random source, for reproducible rain
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Frames per second, overriding the configuration
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Start with audio reactivity switched off
    #[arg(long)]
    pub no_audio: bool,

    /// Write the default configuration (to --config or the default location) and exit
    #[arg(long)]
    pub write_config: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, mut config: RainConfig) -> RainConfig {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.no_audio {
            config.audio.enabled = false;
        }
        config
    }
}
