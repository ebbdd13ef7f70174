//! In-memory repository fakes for service and router tests.
//!
//! Always compiled so integration tests (in `tests/`) can use them. Each
//! fake shares its state behind an `Arc`, so a cloned handle inspects the
//! same data after the original moved into a service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use stash_core::{
    DebugEvent, DebugEventRepository, Error, Folder, FolderRepository, Result,
    SavedLinkRepository,
};

fn store_failure() -> Error {
    Error::Internal("simulated store failure".to_string())
}

// =============================================================================
// FOLDERS
// =============================================================================

/// In-memory FolderRepository.
#[derive(Clone, Default)]
pub struct MemoryFolderRepository {
    folders: Arc<Mutex<Vec<Folder>>>,
    fail_list: Arc<AtomicBool>,
    lose_writes: Arc<AtomicBool>,
}

impl MemoryFolderRepository {
    pub fn new(folders: Vec<Folder>) -> Self {
        Self {
            folders: Arc::new(Mutex::new(folders)),
            ..Self::default()
        }
    }

    /// Make `list_unclassified` fail, simulating a broken initial query.
    pub fn failing_list(self) -> Self {
        self.fail_list.store(true, Ordering::SeqCst);
        self
    }

    /// Make every conditional write report zero rows affected, simulating
    /// a concurrent writer winning every race.
    pub fn losing_writes(self) -> Self {
        self.lose_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Current stored category for a folder.
    pub fn category_of(&self, id: i64) -> Option<String> {
        self.folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| f.system_category.clone())
    }
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn list_unclassified(&self, limit: i64) -> Result<Vec<Folder>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.system_category.is_none())
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Folder>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn set_category_if_unclassified(&self, id: i64, category: &str) -> Result<bool> {
        if self.lose_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut folders = self.folders.lock().unwrap();
        match folders
            .iter_mut()
            .find(|f| f.id == id && f.system_category.is_none())
        {
            Some(folder) => {
                folder.system_category = Some(category.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// SAVED LINKS
// =============================================================================

/// In-memory SavedLinkRepository keyed by folder id.
#[derive(Clone, Default)]
pub struct MemorySavedLinkRepository {
    titles: Arc<Mutex<Vec<(i64, String)>>>,
    fail: Arc<AtomicBool>,
}

impl MemorySavedLinkRepository {
    /// Attach titles to a folder.
    pub fn with_titles(self, folder_id: i64, titles: &[&str]) -> Self {
        {
            let mut stored = self.titles.lock().unwrap();
            for title in titles {
                stored.push((folder_id, title.to_string()));
            }
        }
        self
    }

    /// Make title reads fail, simulating a broken context query.
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl SavedLinkRepository for MemorySavedLinkRepository {
    async fn titles_for_folder(&self, folder_id: i64, limit: i64) -> Result<Vec<String>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        Ok(self
            .titles
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == folder_id)
            .take(limit as usize)
            .map(|(_, title)| title.clone())
            .collect())
    }
}

// =============================================================================
// DEBUG EVENTS
// =============================================================================

/// In-memory DebugEventRepository recording appended events.
#[derive(Clone, Default)]
pub struct MemoryDebugEventRepository {
    events: Arc<Mutex<Vec<DebugEvent>>>,
    fail: Arc<AtomicBool>,
}

impl MemoryDebugEventRepository {
    /// Make appends fail, verifying the fire-and-forget contract.
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Events appended so far, in order.
    pub fn events(&self) -> Vec<DebugEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl DebugEventRepository for MemoryDebugEventRepository {
    async fn append(
        &self,
        device_id: Option<&str>,
        stage: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        self.events.lock().unwrap().push(DebugEvent {
            device_id: device_id.map(String::from),
            stage: stage.to_string(),
            payload,
        });
        Ok(())
    }
}
