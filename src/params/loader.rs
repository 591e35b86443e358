//! JSON loader for project configuration

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use super::ProjectConfig;
use crate::error::Result;
use crate::roster::validate_calendar;

/// Default data directory holding rosters and `project.json`
pub const DEFAULT_DATA_PATH: &str = "data/sample";

/// Configuration file name inside a data directory
pub const PROJECT_CONFIG_FILE: &str = "project.json";

impl ProjectConfig {
    /// Parse configuration from any reader; absent fields take defaults
    ///
    /// A calendar that cannot generate its period set is rejected here.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        validate_calendar(&config.calendar).into_result()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load `project.json` from a data directory, falling back to defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        if !path.exists() {
            info!("{} not found, using default project parameters", path.display());
            return Ok(Self::default());
        }
        Self::from_json_path(&path)
    }

    /// Write configuration as pretty-printed JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
