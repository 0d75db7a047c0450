//! Mock in-memory note storage for testing
//!
//! `MockNoteStorage` implements [`NoteStorage`] entirely in memory and can be
//! told to report itself unavailable or to fail individual operations. It
//! counts every call it receives, which lets tests assert that a tier was (or
//! was not) attempted.
//!
//! # Usage
//!
//! ```ignore
//! use notebook::notes::mock_storage::{MockNoteStorage, MockStorageConfig};
//! use notebook::notes::{NoteDraft, NoteStorage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let remote = MockNoteStorage::new_with_config(MockStorageConfig {
//!         fail_create: true,
//!         ..Default::default()
//!     });
//!
//!     let result = remote
//!         .create_note("ada@example.com", NoteDraft::new("T", "C")?)
//!         .await;
//!     assert!(result.is_err());
//!     assert_eq!(remote.call_counts().await.create, 1);
//!
//!     Ok(())
//! }
//! ```

use crate::error::{NotebookError, Result};
use crate::notes::{now, sort_newest_first, Note, NoteChanges, NoteDraft, NoteId, NoteStorage};
use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration options for controlling mock storage behavior during tests
#[derive(Debug, Clone, Default)]
pub struct MockStorageConfig {
    /// Whether to report the tier as unavailable
    pub unavailable: bool,

    /// Whether to simulate storage failures for list operations
    pub fail_list: bool,

    /// Whether to simulate storage failures for create operations
    pub fail_create: bool,

    /// Whether to simulate storage failures for update operations
    pub fail_update: bool,

    /// Whether to simulate storage failures for delete operations
    pub fail_delete: bool,

    /// Simulate slow operations by adding delay (in milliseconds)
    pub operation_delay_ms: Option<u64>,
}

/// Number of calls received per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `list_notes` calls
    pub list: usize,
    /// `create_note` calls
    pub create: usize,
    /// `update_note` calls
    pub update: usize,
    /// `delete_note` calls
    pub delete: usize,
}

impl CallCounts {
    /// Total calls across all operations
    pub fn total(&self) -> usize {
        self.list + self.create + self.update + self.delete
    }
}

/// Mock in-memory storage implementation for testing
#[derive(Debug, Clone)]
pub struct MockNoteStorage {
    /// Notes per user, newest first
    storage: Arc<RwLock<HashMap<String, Vec<Note>>>>,

    config: Arc<RwLock<MockStorageConfig>>,

    /// Mirrors `config.unavailable` for the synchronous availability check
    unavailable: Arc<AtomicBool>,

    calls: Arc<RwLock<CallCounts>>,
}

impl MockNoteStorage {
    /// Create a new, available, empty mock storage
    pub fn new() -> Self {
        Self::new_with_config(MockStorageConfig::default())
    }

    /// Create a new mock storage instance with custom configuration
    pub fn new_with_config(config: MockStorageConfig) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(config.unavailable)),
            config: Arc::new(RwLock::new(config)),
            calls: Arc::new(RwLock::new(CallCounts::default())),
        }
    }

    /// A mock that reports itself unavailable
    pub fn unavailable() -> Self {
        Self::new_with_config(MockStorageConfig {
            unavailable: true,
            ..Default::default()
        })
    }

    /// A mock whose every operation fails
    pub fn failing() -> Self {
        Self::new_with_config(MockStorageConfig {
            fail_list: true,
            fail_create: true,
            fail_update: true,
            fail_delete: true,
            ..Default::default()
        })
    }

    /// Update the mock configuration mid-test
    pub async fn set_config(&self, config: MockStorageConfig) {
        self.unavailable.store(config.unavailable, Ordering::SeqCst);
        *self.config.write().await = config;
    }

    /// Calls received so far
    pub async fn call_counts(&self) -> CallCounts {
        *self.calls.read().await
    }

    /// Notes currently stored for `user`, newest first
    pub async fn notes_for(&self, user: &str) -> Vec<Note> {
        self.storage
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    /// Put a note directly into storage, bypassing the call counters
    pub async fn insert(&self, user: &str, note: Note) {
        let mut storage = self.storage.write().await;
        let notes = storage.entry(user.to_string()).or_default();
        notes.push(note);
        sort_newest_first(notes);
    }

    async fn begin(&self, record: impl FnOnce(&mut CallCounts)) -> MockStorageConfig {
        record(&mut *self.calls.write().await);
        let config = self.config.read().await.clone();
        if let Some(delay_ms) = config.operation_delay_ms {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
        }
        config
    }
}

impl Default for MockNoteStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn simulated(operation: &str) -> NotebookError {
    NotebookError::Storage(format!("Mock {} failure", operation))
}

#[async_trait]
impl NoteStorage for MockNoteStorage {
    fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }

    async fn list_notes(&self, user: &str) -> Result<Vec<Note>> {
        if self.begin(|c| c.list += 1).await.fail_list {
            return Err(simulated("list"));
        }
        Ok(self.notes_for(user).await)
    }

    async fn create_note(&self, user: &str, draft: NoteDraft) -> Result<Note> {
        if self.begin(|c| c.create += 1).await.fail_create {
            return Err(simulated("create"));
        }

        let note = Note::from_draft(NoteId::generate(), draft, now());
        self.storage
            .write()
            .await
            .entry(user.to_string())
            .or_default()
            .insert(0, note.clone());
        Ok(note)
    }

    async fn update_note(&self, user: &str, id: &NoteId, changes: NoteChanges) -> Result<Note> {
        if self.begin(|c| c.update += 1).await.fail_update {
            return Err(simulated("update"));
        }

        let mut storage = self.storage.write().await;
        let note = storage
            .get_mut(user)
            .and_then(|notes| notes.iter_mut().find(|n| &n.id == id))
            .ok_or_else(|| NotebookError::NoteNotFound(id.to_string()))?;

        let stamp = now().max(note.updated_at + Duration::milliseconds(1));
        note.apply(&changes, stamp);
        Ok(note.clone())
    }

    async fn delete_note(&self, user: &str, id: &NoteId) -> Result<()> {
        if self.begin(|c| c.delete += 1).await.fail_delete {
            return Err(simulated("delete"));
        }

        if let Some(notes) = self.storage.write().await.get_mut(user) {
            notes.retain(|n| &n.id != id);
        }
        Ok(())
    }
}
