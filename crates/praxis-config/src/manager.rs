use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{ConfigError, TaxConfig};

const APP_DIR: &str = "praxis-tax";
const CONFIG_FILE: &str = "tax_config.json";

/// Reads and writes one [`TaxConfig`] JSON file. Every load and save validates.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Keeps the config file directly under `base`, creating the directory if needed.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    /// Uses the platform configuration directory, falling back to the home directory.
    pub fn default_location() -> Result<Self, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_base_dir(base.join(APP_DIR))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the stored config, or the defaults when no file exists yet.
    pub fn load(&self) -> Result<TaxConfig, ConfigError> {
        let config = match fs::read_to_string(&self.config_path) {
            Ok(data) => {
                serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => TaxConfig::default(),
            Err(err) => return Err(err.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Writes a sibling `.tmp` file and renames it over the config, so readers never see
    /// a half-written file. Invalid configs are refused before touching the disk.
    pub fn save(&self, config: &TaxConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json =
            serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.config_path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }
}
