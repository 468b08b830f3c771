//! Configuration file handling for sonagi.
//!
//! The parameter table lives in `config.toml` under the platform config
//! directory (for example `~/.config/sonagi/config.toml`). Every field is
//! optional; missing fields keep their defaults.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sonagi_core::RainConfig;

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// The file is not valid TOML or does not match the parameter table.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The defaults could not be rendered as TOML.
    Serialize(toml::ser::Error),
    /// The file parsed but holds values the animation cannot run with.
    Invalid { path: PathBuf, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot access {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            }
            ConfigError::Serialize(source) => write!(f, "cannot serialize config: {source}"),
            ConfigError::Invalid { path, reason } => {
                write!(f, "invalid config in {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(source) => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Location of the default configuration file, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sonagi").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load the configuration.
///
/// An explicit path must exist. Without one the default location is tried
/// and a missing file silently yields the defaults.
pub fn load(explicit: Option<&Path>) -> Result<RainConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    match default_path() {
        Some(path) if path.exists() => load_from(&path),
        Some(path) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(RainConfig::default())
        }
        None => Ok(RainConfig::default()),
    }
}

/// Read and validate the configuration at `path`.
pub fn load_from(path: &Path) -> Result<RainConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate().map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse a configuration from TOML text without validating it.
pub fn parse(text: &str) -> Result<RainConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Render the default configuration as TOML.
pub fn default_toml() -> Result<String, ConfigError> {
    toml::to_string_pretty(&RainConfig::default()).map_err(ConfigError::Serialize)
}

/// Write the default configuration to `path`, creating parent directories.
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    let text = default_toml()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sonagi-config-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_default_toml_parses_back() {
        let text = default_toml().unwrap();
        assert_eq!(parse(&text).unwrap(), RainConfig::default());
    }

    #[test]
    fn test_write_then_load() {
        let path = scratch_file("roundtrip/config.toml");
        write_default(&path).unwrap();
        let config = load(Some(&path)).unwrap();
        assert_eq!(config, RainConfig::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = scratch_file("does-not-exist.toml");
        assert!(matches!(load(Some(&path)), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let path = scratch_file("invalid.toml");
        fs::write(&path, "[stream]\nmin_length = 80\nmax_length = 10\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("stream length"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let path = scratch_file("nan.toml");
        fs::write(&path, "[shockwave]\nwidth = nan\nmax_radius = inf\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("finite"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let path = scratch_file("broken.toml");
        fs::write(&path, "fps = \"fast\"\n").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }
}
