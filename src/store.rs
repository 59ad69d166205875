use crate::config::{EXPORT_FILE_NAME, STORE_KEY};
use crate::error::{Result, SettingsError};
use crate::storage::Storage;
use crate::value::{SettingValue, SettingsMap};

/// File produced by [`SettingsStore::export_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub contents: String,
}

/// Read-modify-write persistence of the flat settings map, kept as one JSON
/// blob under [`STORE_KEY`] in the host storage.
pub struct SettingsStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current map. Missing, unreadable or malformed data reads as empty.
    pub fn get_all(&self) -> SettingsMap {
        let raw = match self.storage.get_item(STORE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SettingsMap::new(),
            Err(e) => {
                log::warn!("settings unavailable, using defaults: {e}");
                return SettingsMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("stored settings are malformed, ignoring them: {e}");
                SettingsMap::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.get_all().remove(key)
    }

    /// Stores one value. Failures are logged here; callers may drop the
    /// returned error.
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) -> Result<()> {
        let mut map = self.get_all();
        map.insert(key.to_string(), value.into());
        self.replace_all(&map).inspect_err(|e| {
            log::error!("error saving setting {key}: {e}");
        })
    }

    pub fn replace_all(&mut self, map: &SettingsMap) -> Result<()> {
        let raw = serde_json::to_string(map).map_err(SettingsError::Serialize)?;
        self.storage.set_item(STORE_KEY, &raw)?;
        Ok(())
    }

    /// The stored blob exactly as persisted. A missing or malformed blob
    /// exports as the empty map.
    pub fn export_all(&self) -> Result<ExportArtifact> {
        let stored = match self.storage.get_item(STORE_KEY) {
            Ok(raw) => raw.filter(|raw| serde_json::from_str::<SettingsMap>(raw).is_ok()),
            Err(e) => {
                log::warn!("settings unavailable, exporting defaults: {e}");
                None
            }
        };
        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME,
            contents: stored.unwrap_or_else(|| "{}".to_string()),
        })
    }
}

/// Parses an imported configuration file. Anything but a flat object of
/// strings, booleans and numbers is rejected.
pub fn parse_import(raw: &str) -> Result<SettingsMap> {
    serde_json::from_str(raw).map_err(SettingsError::InvalidImport)
}
