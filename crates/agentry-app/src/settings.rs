//! Settings file handling

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use agentry_agents::AgentType;
use agentry_pool::PoolSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("agentry"))
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join(SETTINGS_FILE))
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Executor pool settings per agent type
    pub pools: BTreeMap<AgentType, PoolSettings>,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(AgentType::Adk, PoolSettings::new(2));
        pools.insert(AgentType::A2a, PoolSettings::new(2));
        Self {
            pools,
            log_filter: None,
        }
    }
}

impl AppSettings {
    /// Load settings
    ///
    /// An explicit path must exist. Without one, the per-user settings file
    /// is read if present, and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = settings_file()?;
                if path.exists() {
                    Self::read(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Write settings as pretty JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file: {:?}", path))
    }
}
