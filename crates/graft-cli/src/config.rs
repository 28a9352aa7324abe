//! Configuration for the `graft` CLI.
//!
//! Settings can come from `graft.toml` (current directory, then the
//! user's config directory) or be overridden by CLI flags; flags always
//! win.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

pub const CONFIG_FILE_NAME: &str = "graft.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_ticks")]
    pub ticks: usize,

    #[serde(default = "default_max_forks")]
    pub max_forks: usize,
}

fn default_ticks() -> usize {
    100
}

fn default_max_forks() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ticks: default_ticks(),
            max_forks: default_max_forks(),
        }
    }
}

impl Config {
    /// Load from the default search path, falling back to defaults if
    /// no config file is found anywhere.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!("configuration file not found: {}", path.display())));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("graft").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.ticks, 100);
        assert_eq!(config.max_forks, 64);
    }

    #[test]
    fn load_from_nonexistent_path_is_an_error() {
        let result = Config::load_from_path(Path::new("/nonexistent/graft.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graft.toml");
        std::fs::write(&path, "ticks = 10\nmax_forks = 4\n").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.ticks, 10);
        assert_eq!(config.max_forks, 4);
    }
}
