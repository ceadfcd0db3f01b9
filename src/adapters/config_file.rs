//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] on top of a single JSON document on disk.
//! A missing file is not an error: the face runs on defaults until a
//! config is saved.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::FaceConfig;

#[derive(Debug, Clone)]
pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<FaceConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Config: {} not found, using defaults", self.path.display());
                return Ok(FaceConfig::default());
            }
            Err(e) => {
                warn!("Config: reading {} failed: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        let config = FaceConfig::from_json(&text)?;
        info!("Config: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &FaceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        fs::write(&self.path, json).map_err(|e| {
            warn!("Config: writing {} failed: {}", self.path.display(), e);
            ConfigError::IoError
        })
    }
}
