// ABOUTME: Named campaign store for the campaign editor
// ABOUTME: Wraps an append-only persisted list of exported campaign documents

use crate::errors::{CampaignError, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One saved export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCampaign {
    pub name: String,
    /// Exported JSON document text
    pub data: String,
    pub saved_at: DateTime<Utc>,
}

/// Opaque list-valued storage the campaign store sits on.
pub trait PersistedList {
    fn list(&self) -> Result<Vec<SavedCampaign>>;
    fn append(&self, entry: SavedCampaign) -> Result<()>;
}

/// Keeps entries in memory only
#[derive(Debug, Default)]
pub struct MemoryList {
    entries: Mutex<Vec<SavedCampaign>>,
}

impl MemoryList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistedList for MemoryList {
    fn list(&self) -> Result<Vec<SavedCampaign>> {
        Ok(self.entries.lock().clone())
    }

    fn append(&self, entry: SavedCampaign) -> Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

/// Stores entries as a JSON array in a single file
#[derive(Debug)]
pub struct JsonFileList {
    path: PathBuf,
}

impl JsonFileList {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl PersistedList for JsonFileList {
    fn list(&self) -> Result<Vec<SavedCampaign>> {
        if !self.path.exists() {
            debug!("Campaign store {:?} does not exist yet", self.path);
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(CampaignError::FileReadError)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            CampaignError::StoreError(format!("Corrupt campaign store {:?}: {}", self.path, e))
        })
    }

    fn append(&self, entry: SavedCampaign) -> Result<()> {
        let mut entries = self.list()?;
        entries.push(entry);

        // Ensure parent directory for the store file exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(CampaignError::FileReadError)?;
            }
        }

        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)
            .map_err(CampaignError::FileReadError)
    }
}

/// Named snapshots of exported campaigns, read once when the session starts
pub struct CampaignStore<B: PersistedList> {
    backend: B,
    entries: Vec<SavedCampaign>,
}

impl<B: PersistedList> CampaignStore<B> {
    pub fn open(backend: B) -> Result<Self> {
        let entries = backend.list()?;
        info!("Loaded {} saved campaigns", entries.len());
        Ok(Self { backend, entries })
    }

    pub fn entries(&self) -> &[SavedCampaign] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Append a snapshot; existing entries are never modified
    pub fn append(&mut self, name: &str, data: &str) -> Result<&SavedCampaign> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CampaignError::MissingField("Campaign name"));
        }
        let entry = SavedCampaign {
            name: name.to_string(),
            data: data.to_string(),
            saved_at: Utc::now(),
        };
        self.backend.append(entry.clone())?;
        info!("Saved campaign {:?}", entry.name);
        self.entries.push(entry);
        self.entries
            .last()
            .ok_or_else(|| CampaignError::StoreError("Campaign store is empty after append".to_string()))
    }
}
