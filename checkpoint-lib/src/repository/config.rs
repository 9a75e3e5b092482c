use std::{fs, path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Result,
    fs::{config_dir, state_dir},
};

const FILE_NAME: &str = "core.toml";
const DATABASE_FILE_NAME: &str = "checkpoint.db";
const DEFAULT_REPORT_TOP: usize = 5;

/// Handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Location of the SQLite database. Falls back to the XDG state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    database_path: Option<PathBuf>,
    /// How many games [`Repository::backlog_report`](crate::Repository::backlog_report) lists
    /// when the caller doesn't ask for a specific amount.
    report_top: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            report_top: DEFAULT_REPORT_TOP,
        }
    }
}

impl CoreConfig {
    /// Load the configuration from the config directory, writing out the defaults if there is
    /// no configuration file yet.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(FILE_NAME);

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Ok(Self::from_toml(&contents))
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        fs::write(config_dir()?.join(FILE_NAME), contents)?;

        Ok(())
    }

    fn from_toml(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|err| {
            warn!("Ignoring malformed {FILE_NAME}: {err}");
            Self::default()
        })
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(state_dir()?.join(DATABASE_FILE_NAME)),
        }
    }

    pub fn set_database_path(&mut self, path: PathBuf) {
        self.database_path = Some(path);
    }

    pub fn report_top(&self) -> usize {
        self.report_top
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self {
            database_path: Some(PathBuf::from(":memory:")),
            report_top: 3,
        }
    }
}
