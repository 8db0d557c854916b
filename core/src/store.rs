//! Birth-profile persistence port.
//!
//! The controller only triggers `load`/`save`; where the profile lives is
//! up to the adapter. [`JsonFileStore`] keeps it in a JSON object under the
//! fixed key `"birthDate"`, leaving any other keys in the file untouched.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

use crate::profile::{BirthProfile, RawProfile};

/// Key under which the profile is stored.
pub const PROFILE_KEY: &str = "birthDate";

pub trait ProfileStore: Send {
    /// Stored profile; `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<BirthProfile>>;
    fn save(&self, profile: &BirthProfile) -> Result<()>;
}

/// JSON-file adapter.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<BirthProfile>> {
        let map = self.read_map()?;
        let Some(value) = map.get(PROFILE_KEY) else {
            return Ok(None);
        };
        let raw: RawProfile = serde_json::from_value(value.clone())
            .with_context(|| format!("Malformed {PROFILE_KEY} in {}", self.path.display()))?;
        let profile = BirthProfile::try_from(raw)
            .with_context(|| format!("Invalid {PROFILE_KEY} in {}", self.path.display()))?;
        Ok(Some(profile))
    }

    fn save(&self, profile: &BirthProfile) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(PROFILE_KEY.to_string(), serde_json::to_value(profile)?);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("Cannot write {}", self.path.display()))?;
        debug!("Saved birth profile {profile} to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, handy for tests and ephemeral servers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: Mutex<Option<BirthProfile>>,
}

impl MemoryStore {
    pub fn new(profile: Option<BirthProfile>) -> Self {
        Self {
            profile: Mutex::new(profile),
        }
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<BirthProfile>> {
        let guard = self
            .profile
            .lock()
            .map_err(|_| anyhow::anyhow!("profile store poisoned"))?;
        Ok(*guard)
    }

    fn save(&self, profile: &BirthProfile) -> Result<()> {
        let mut guard = self
            .profile
            .lock()
            .map_err(|_| anyhow::anyhow!("profile store poisoned"))?;
        *guard = Some(*profile);
        Ok(())
    }
}
