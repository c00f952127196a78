use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Lockfile {
    pub version: u32,

    #[serde(default)]
    pub targets: BTreeMap<String, TargetLock>,
}

/// What was rendered for a target the last time it was generated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TargetLock {
    pub source_hash: String,
    pub settings_hash: String,
    #[serde(default)]
    pub outputs: Vec<String>,
}

pub const LOCKFILE_NAME: &str = "iconforge.lock.toml";

impl Lockfile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let lockfile: Lockfile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(lockfile)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
