//! Notes repository: one persistence contract over a remote and a local tier
//!
//! Every operation follows the same policy:
//!
//! 1. If the remote tier reports itself available, try it first.
//! 2. If the remote attempt fails, log the failure and run the same
//!    operation against the local tier; the caller only sees the result.
//! 3. If the remote tier is unavailable, go straight to the local tier
//!    without any network attempt.
//! 4. If the local tier fails too, its error is returned.
//!
//! Each result is tagged with the [`Backend`] that produced it.

use crate::config::NotebookConfig;
use crate::error::Result;
use crate::kv::FileKeyValueStore;
use crate::notes::{
    sort_newest_first, Backend, LocalNoteStore, Note, NoteChanges, NoteDraft, NoteId,
    NoteStorage, RemoteNoteStore, Served,
};
use std::future::Future;
use std::sync::Arc;

/// Persistence contract used by the rest of the application
#[derive(Clone)]
pub struct NotesRepository {
    remote: Arc<dyn NoteStorage>,
    local: Arc<dyn NoteStorage>,
}

impl NotesRepository {
    /// Create a repository over explicit tiers
    pub fn new(remote: Arc<dyn NoteStorage>, local: Arc<dyn NoteStorage>) -> Self {
        Self { remote, local }
    }

    /// Create a repository from configuration
    ///
    /// The local tier stores files under the configured data directory; the
    /// remote tier is connected only when the configuration names one.
    pub fn from_config(config: &NotebookConfig) -> Self {
        let kv = Arc::new(FileKeyValueStore::new(config.data_dir.clone()));
        Self::new(
            Arc::new(RemoteNoteStore::from_config(config)),
            Arc::new(LocalNoteStore::new(kv)),
        )
    }

    /// Whether the remote tier will be attempted
    pub fn remote_available(&self) -> bool {
        self.remote.is_available()
    }

    /// List `user`'s notes, newest first
    pub async fn list(&self, user: &str) -> Result<Served<Vec<Note>>> {
        let mut served = self
            .run("list", |tier| async move { tier.list_notes(user).await })
            .await?;
        sort_newest_first(&mut served.value);
        Ok(served)
    }

    /// Create a note for `user`
    pub async fn create(&self, user: &str, draft: NoteDraft) -> Result<Served<Note>> {
        self.run("create", |tier| {
            let draft = draft.clone();
            async move { tier.create_note(user, draft).await }
        })
        .await
    }

    /// Merge `changes` into one of `user`'s notes
    pub async fn update(
        &self,
        user: &str,
        id: &NoteId,
        changes: NoteChanges,
    ) -> Result<Served<Note>> {
        self.run("update", |tier| {
            let changes = changes.clone();
            async move { tier.update_note(user, id, changes).await }
        })
        .await
    }

    /// Delete one of `user`'s notes; deleting a missing note succeeds
    pub async fn delete(&self, user: &str, id: &NoteId) -> Result<Served<()>> {
        self.run("delete", |tier| async move { tier.delete_note(user, id).await })
            .await
    }

    /// Apply the fallback policy to one logical operation
    async fn run<'a, T, F, Fut>(&'a self, operation: &str, attempt: F) -> Result<Served<T>>
    where
        F: Fn(&'a dyn NoteStorage) -> Fut,
        Fut: Future<Output = Result<T>> + 'a,
    {
        if self.remote.is_available() {
            match attempt(self.remote.as_ref()).await {
                Ok(value) => return Ok(Served::new(value, Backend::Remote)),
                Err(e) => {
                    tracing::warn!(
                        "Remote {} failed, falling back to local storage: {}",
                        operation,
                        e
                    );
                }
            }
        } else {
            tracing::debug!("Remote store unavailable, serving {} locally", operation);
        }

        let value = attempt(self.local.as_ref()).await?;
        Ok(Served::new(value, Backend::Local))
    }
}

impl std::fmt::Debug for NotesRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesRepository")
            .field("remote_available", &self.remote.is_available())
            .finish()
    }
}
