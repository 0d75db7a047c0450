//! # Notebook
//!
//! A personal notes library with email-only sign-in and offline-tolerant
//! storage.
//!
//! ## Features
//!
//! - **Sessions**: Email-only login persisted across restarts
//! - **Notes**: Create, update, delete and search titled notes
//! - **Remote-first storage**: Notes go to a hosted realtime database when
//!   one is configured, falling back to on-device storage whenever the
//!   remote is absent or fails
//! - **Layered configuration**: Defaults, `config.yaml` and `NOTEBOOK_*`
//!   environment variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notebook::{Notebook, NotebookConfig, NotesRepository, SessionStore};
//! use notebook::kv::FileKeyValueStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> notebook::Result<()> {
//! let config = NotebookConfig::load()?;
//! let sessions = SessionStore::new(Arc::new(FileKeyValueStore::new(&config.data_dir)));
//! let session = sessions.login("ada@example.com").await?;
//!
//! let mut notebook = Notebook::open(NotesRepository::from_config(&config), session.email);
//! notebook.refresh().await?;
//! notebook.create("Groceries", "milk, eggs").await?;
//!
//! for note in notebook.search("milk") {
//!     println!("{}: {}", note.id, note.title);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Shared utilities
pub mod common;

/// Configuration loading
pub mod config;

/// Error types and utilities
pub mod error;

/// Key/value persistence primitives
pub mod kv;

/// Active notebook state
pub mod notebook;

/// Notes model and storage tiers
pub mod notes;

/// Storage key sanitization
pub mod sanitize;

/// Signed-in user session
pub mod session;

pub use config::{NotebookConfig, RemoteConfig};
pub use error::{ErrorContext, NotebookError, Result};
pub use notebook::Notebook;
pub use notes::{
    Backend, Note, NoteChanges, NoteDraft, NoteId, NoteStorage, NotesRepository, Served,
};
pub use session::{Session, SessionStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{NotebookConfig, RemoteConfig};
    pub use crate::error::{NotebookError, Result};
    pub use crate::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
    pub use crate::notebook::Notebook;
    pub use crate::notes::{
        Backend, LocalNoteStore, Note, NoteChanges, NoteDraft, NoteId, NoteStorage,
        NotesRepository, RemoteNoteStore, Served,
    };
    pub use crate::session::{Session, SessionStore};
}
