//! Configuration file discovery and loading

use super::StylintConfig;
use crate::error::StylintError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".stylintrc.json",
    ".stylintrc.toml",
    "stylint.yaml",
    "stylint.yml",
    "stylint.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking up from `start_path`
    ///
    /// Each directory is searched for [`CONFIG_FILE_NAMES`] in order; the
    /// first hit wins. Returns `None` once the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| StylintError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<StylintConfig> {
        StylintConfig::load(path).map_err(|e| {
            StylintError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from `custom_path`, or discover one from `start_dir`
    ///
    /// Discovery that finds nothing yields the default configuration; an
    /// explicit path that does not exist is an error.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<StylintConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(StylintError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(StylintConfig::default())
            }
        }
    }
}
