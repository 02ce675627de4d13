use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::error::StoreError;
use crate::models::selection::{SelectionRecord, SelectionState};

const STORE_FILE: &str = "selections.json";

/// Caller-owned home for a guest's selection between sessions.
pub trait SelectionStore: Send + Sync {
    /// Missing sessions load as an empty selection.
    fn load(&self, session_id: &str) -> Result<SelectionState, StoreError>;
    fn save(&self, session_id: &str, state: &SelectionState) -> Result<(), StoreError>;
    fn clear(&self, session_id: &str) -> Result<(), StoreError>;
}

/// All sessions in one JSON file under `location`.
pub struct FileSelectionStore {
    location: PathBuf,
}

impl FileSelectionStore {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    fn path(&self) -> PathBuf {
        self.location.join(STORE_FILE)
    }

    fn read_all(&self) -> Result<HashMap<String, SelectionRecord>, StoreError> {
        let path = self.path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, sessions: &HashMap<String, SelectionRecord>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.location)?;
        let tmp = self.location.join(format!("{}.tmp", STORE_FILE));
        fs::write(&tmp, serde_json::to_string_pretty(sessions)?)?;
        fs::rename(&tmp, self.path())?;
        Ok(())
    }
}

impl SelectionStore for FileSelectionStore {
    fn load(&self, session_id: &str) -> Result<SelectionState, StoreError> {
        let sessions = self.read_all()?;
        match sessions.get(session_id) {
            None => Ok(SelectionState::empty()),
            Some(record) => record
                .to_state()
                .ok_or_else(|| StoreError::Invalid(session_id.to_string())),
        }
    }

    fn save(&self, session_id: &str, state: &SelectionState) -> Result<(), StoreError> {
        let mut sessions = self.read_all()?;
        sessions.insert(session_id.to_string(), SelectionRecord::from(*state));
        self.write_all(&sessions)?;
        debug!(session_id, "Saved selection");
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        let mut sessions = self.read_all()?;
        if sessions.remove(session_id).is_some() {
            self.write_all(&sessions)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySelectionStore {
    sessions: Mutex<HashMap<String, SelectionState>>,
}

impl SelectionStore for MemorySelectionStore {
    fn load(&self, session_id: &str) -> Result<SelectionState, StoreError> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        Ok(sessions.get(session_id).copied().unwrap_or_default())
    }

    fn save(&self, session_id: &str, state: &SelectionState) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session_id.to_string(), *state);
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(session_id);
        Ok(())
    }
}
