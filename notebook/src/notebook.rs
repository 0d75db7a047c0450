//! Active notebook for one signed-in user
//!
//! [`Notebook`] keeps the user's notes in memory and routes every change
//! through the [`NotesRepository`]. The in-memory list only changes after the
//! repository call succeeds, so a failed operation leaves it as it was.

use crate::error::Result;
use crate::notes::{Backend, Note, NoteChanges, NoteDraft, NoteId, NotesRepository};

/// In-memory view of one user's notes
#[derive(Debug, Clone)]
pub struct Notebook {
    repository: NotesRepository,
    user: String,
    notes: Vec<Note>,
    last_backend: Option<Backend>,
}

impl Notebook {
    /// Open the notebook for `user`; call [`Notebook::refresh`] to load notes
    pub fn open(repository: NotesRepository, user: impl Into<String>) -> Self {
        Self {
            repository,
            user: user.into(),
            notes: Vec::new(),
            last_backend: None,
        }
    }

    /// Reload the note list from storage
    pub async fn refresh(&mut self) -> Result<&[Note]> {
        let served = self.repository.list(&self.user).await?;
        self.last_backend = Some(served.backend);
        self.notes = served.value;
        Ok(&self.notes)
    }

    /// Create a note and put it at the front of the list
    pub async fn create(&mut self, title: &str, content: &str) -> Result<Note> {
        let draft = NoteDraft::new(title, content)?;
        let served = self.repository.create(&self.user, draft).await?;
        self.last_backend = Some(served.backend);
        self.notes.insert(0, served.value.clone());
        Ok(served.value)
    }

    /// Apply `changes` to the note with `id`
    pub async fn update(&mut self, id: &NoteId, changes: NoteChanges) -> Result<Note> {
        let served = self.repository.update(&self.user, id, changes).await?;
        self.last_backend = Some(served.backend);

        let note = served.value;
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note.clone(),
            None => tracing::debug!("Updated note {} was not in the loaded list", note.id),
        }
        Ok(note)
    }

    /// Delete the note with `id`
    pub async fn delete(&mut self, id: &NoteId) -> Result<()> {
        let served = self.repository.delete(&self.user, id).await?;
        self.last_backend = Some(served.backend);
        self.notes.retain(|n| &n.id != id);
        Ok(())
    }

    /// Notes whose title or content contains `term`, ignoring case
    ///
    /// A blank term matches every note. List order is preserved.
    pub fn search(&self, term: &str) -> Vec<&Note> {
        let term = term.trim();
        if term.is_empty() {
            return self.notes.iter().collect();
        }
        self.notes.iter().filter(|n| n.matches(term)).collect()
    }

    /// Loaded notes, newest first
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Email of the notebook's owner
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Tier that served the most recent successful operation
    pub fn last_backend(&self) -> Option<Backend> {
        self.last_backend
    }
}
