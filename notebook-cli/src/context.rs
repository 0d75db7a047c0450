//! Shared state for one CLI invocation

use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_WARNING;
use colored::*;
use notebook::kv::FileKeyValueStore;
use notebook::{Backend, Notebook, NotebookConfig, NotesRepository, Session, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration, session store and repository for the running command
pub struct CliContext {
    pub config: NotebookConfig,
    pub sessions: SessionStore,
    pub repository: NotesRepository,
    quiet: bool,
}

impl CliContext {
    /// Load configuration and open the stores under the data directory
    pub fn load(data_dir: Option<PathBuf>, quiet: bool) -> CliResult<Self> {
        let config = NotebookConfig::load_from(data_dir)?;
        tracing::debug!("Using data directory {}", config.data_dir.display());

        let store = Arc::new(FileKeyValueStore::new(&config.data_dir));
        Ok(Self {
            sessions: SessionStore::new(store),
            repository: NotesRepository::from_config(&config),
            config,
            quiet,
        })
    }

    /// The signed-in session, or an error telling the user to log in
    pub async fn require_session(&self) -> CliResult<Session> {
        self.sessions.current().await?.ok_or_else(|| {
            CliError::new(
                "Not signed in. Run 'notebook login <email>' first.",
                EXIT_WARNING,
            )
        })
    }

    /// Open the signed-in user's notebook; notes are not loaded yet
    pub async fn open_notebook(&self) -> CliResult<Notebook> {
        let session = self.require_session().await?;
        Ok(Notebook::open(self.repository.clone(), session.email))
    }

    /// Tell the user when a configured remote was bypassed
    pub fn report_backend(&self, backend: Option<Backend>) {
        if self.quiet || self.config.remote.is_none() {
            return;
        }
        if backend == Some(Backend::Local) {
            eprintln!(
                "{}",
                "⚠️  Offline: using notes stored on this device".yellow()
            );
        }
    }
}
