//! The storage contract shared by every note tier

use crate::error::Result;
use crate::notes::{Note, NoteChanges, NoteDraft, NoteId};
use async_trait::async_trait;

/// Trait for note storage operations, scoped per user email
#[async_trait]
pub trait NoteStorage: Send + Sync {
    /// Whether this tier can be attempted at all
    ///
    /// An unavailable tier is skipped without any I/O; it is a routing
    /// signal, not a failure.
    fn is_available(&self) -> bool {
        true
    }

    /// List the user's notes, newest first
    async fn list_notes(&self, user: &str) -> Result<Vec<Note>>;

    /// Create a note; the tier assigns the id and timestamps
    async fn create_note(&self, user: &str, draft: NoteDraft) -> Result<Note>;

    /// Merge `changes` into the note and refresh its `updated_at`
    async fn update_note(&self, user: &str, id: &NoteId, changes: NoteChanges) -> Result<Note>;

    /// Delete a note; deleting a missing note succeeds
    async fn delete_note(&self, user: &str, id: &NoteId) -> Result<()>;
}
