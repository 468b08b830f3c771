//! File logging. The terminal belongs to the animation, so nothing is
//! logged unless a log file is requested.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter. Setting it also turns
/// logging on when no `--log` path is given.
pub const LOG_ENV: &str = "SONAGI_LOG";

/// Install the global subscriber if logging was requested.
pub fn init(path: Option<&Path>) -> color_eyre::Result<()> {
    let Some(path) = log_path(path) else {
        return Ok(());
    };

    let file = File::create(&path)
        .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("cannot install logger: {err}"))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

fn log_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if env::var_os(LOG_ENV).is_some() => Some(env::temp_dir().join("sonagi.log")),
        None => None,
    }
}
