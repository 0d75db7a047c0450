//! On-device note storage
//!
//! Each user's collection is a single JSON array stored under the key
//! `notes_<email>` in a [`KeyValueStore`]. Every operation reads the whole
//! array, modifies it and writes it back; the array is kept newest first by
//! prepending on create.

use crate::error::{NotebookError, Result};
use crate::kv::KeyValueStore;
use crate::notes::{now, sort_newest_first, Note, NoteChanges, NoteDraft, NoteId, NoteStorage};
use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Prefix of the per-user collection key
pub const NOTES_KEY_PREFIX: &str = "notes_";

/// Key holding `user`'s collection
pub fn notes_key(user: &str) -> String {
    format!("{}{}", NOTES_KEY_PREFIX, user)
}

/// Local note storage over a key/value store
pub struct LocalNoteStore {
    store: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl LocalNoteStore {
    /// Create a note store over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the stored collection in stored order; corrupt data reads as empty
    async fn load(&self, user: &str) -> Result<Vec<Note>> {
        let key = notes_key(user);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => Ok(notes),
            Err(e) => {
                tracing::warn!("Ignoring unreadable local notes under '{}': {}", key, e);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, user: &str, notes: &[Note]) -> Result<()> {
        let content = serde_json::to_string(notes)?;
        self.store.set(&notes_key(user), &content).await
    }
}

#[async_trait]
impl NoteStorage for LocalNoteStore {
    async fn list_notes(&self, user: &str) -> Result<Vec<Note>> {
        let mut notes = self.load(user).await?;
        // Stored order is newest first already, unless another writer put
        // records in a different order
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    async fn create_note(&self, user: &str, draft: NoteDraft) -> Result<Note> {
        let _lock = self.write_lock.lock().await;

        let mut notes = self.load(user).await?;
        let mut id = NoteId::generate();
        while notes.iter().any(|n| n.id == id) {
            id = NoteId::generate();
        }

        let note = Note::from_draft(id, draft, now());
        notes.insert(0, note.clone());
        self.save(user, &notes).await?;

        tracing::debug!("Created local note {} for {}", note.id, user);
        Ok(note)
    }

    async fn update_note(&self, user: &str, id: &NoteId, changes: NoteChanges) -> Result<Note> {
        let _lock = self.write_lock.lock().await;

        let mut notes = self.load(user).await?;
        let note = notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| NotebookError::NoteNotFound(id.to_string()))?;

        // Keep updated_at strictly increasing even within one clock tick
        let stamp = now().max(note.updated_at + Duration::milliseconds(1));
        note.apply(&changes, stamp);
        let updated = note.clone();

        self.save(user, &notes).await?;
        Ok(updated)
    }

    async fn delete_note(&self, user: &str, id: &NoteId) -> Result<()> {
        let _lock = self.write_lock.lock().await;

        let mut notes = self.load(user).await?;
        let before = notes.len();
        notes.retain(|n| &n.id != id);

        if notes.len() == before {
            tracing::debug!("Local note {} not present for {}, nothing to delete", id, user);
            return Ok(());
        }

        self.save(user, &notes).await
    }
}
