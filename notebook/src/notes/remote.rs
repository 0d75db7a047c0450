//! Remote note storage on the Firebase Realtime Database REST API
//!
//! Each user's notes live under `users/<sanitized-email>/notes`, keyed by the
//! push id the database assigns. Records carry `title`, `content`,
//! `createdAt` and `updatedAt`, the timestamps as ISO 8601 strings.
//!
//! This tier never falls back on its own: every transport, status or decode
//! problem is returned as an error for the repository to handle.

use crate::config::{NotebookConfig, RemoteConfig};
use crate::error::{NotebookError, Result};
use crate::notes::{
    iso_millis, now, sort_newest_first, Note, NoteChanges, NoteDraft, NoteId, NoteStorage,
};
use crate::sanitize::sanitize_email;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Wire shape of a note record, without its key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteNoteRecord {
    /// Note title
    pub title: String,
    /// Note content
    #[serde(default)]
    pub content: String,
    /// Creation time, ISO 8601
    pub created_at: String,
    /// Last update time, ISO 8601
    pub updated_at: String,
}

impl RemoteNoteRecord {
    /// Record for a new note, both timestamps set to `stamp`
    pub fn from_draft(draft: &NoteDraft, stamp: &chrono::DateTime<chrono::Utc>) -> Self {
        let stamp = iso_millis::format(stamp);
        Self {
            title: draft.title().to_string(),
            content: draft.content().to_string(),
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }

    /// Convert a keyed record into a note, parsing its timestamps
    pub fn into_note(self, key: &str) -> Result<Note> {
        let id = NoteId::from_string(key.to_string())
            .map_err(|_| malformed(format!("record key '{}' is not a valid note id", key)))?;
        let created_at = iso_millis::parse(&self.created_at)
            .map_err(|e| malformed(format!("note {} has bad createdAt: {}", key, e)))?;
        let updated_at = iso_millis::parse(&self.updated_at)
            .map_err(|e| malformed(format!("note {} has bad updatedAt: {}", key, e)))?;

        Ok(Note {
            id,
            title: self.title,
            content: self.content,
            created_at,
            updated_at,
        })
    }
}

/// Response body of a push (`POST`)
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

fn malformed(message: impl Into<String>) -> NotebookError {
    NotebookError::remote(0, message)
}

/// Convert the collection snapshot returned by a `GET` into notes, newest
/// first. A `null` snapshot is a namespace that does not exist yet.
///
/// Records that do not decode are logged and left out of the listing.
pub fn notes_from_snapshot(snapshot: Value) -> Result<Vec<Note>> {
    let entries = match snapshot {
        Value::Null => return Ok(Vec::new()),
        Value::Object(entries) => entries,
        other => {
            return Err(malformed(format!(
                "expected an object of notes, got {}",
                other
            )))
        }
    };

    // Push keys sort chronologically; walking them in reverse makes
    // same-millisecond notes come out newest first after the stable sort
    let mut notes = Vec::with_capacity(entries.len());
    for (key, value) in entries.into_iter().rev() {
        let note = serde_json::from_value::<RemoteNoteRecord>(value)
            .map_err(|e| malformed(format!("note {} is malformed: {}", key, e)))
            .and_then(|record| record.into_note(&key));
        match note {
            Ok(note) => notes.push(note),
            Err(e) => tracing::warn!("Skipping remote note record: {}", e),
        }
    }

    sort_newest_first(&mut notes);
    Ok(notes)
}

/// Convert the single-note snapshot read back after a merge
pub fn note_from_snapshot(id: &NoteId, snapshot: Value) -> Result<Note> {
    if snapshot.is_null() {
        return Err(malformed(format!("note {} does not exist", id)));
    }
    let record: RemoteNoteRecord = serde_json::from_value(snapshot)
        .map_err(|e| malformed(format!("note {} is incomplete after merge: {}", id, e)))?;
    record.into_note(id.as_str())
}

/// Body of the `PATCH` merging `changes` and the new `updatedAt`
pub fn patch_body(changes: &NoteChanges, stamp: &chrono::DateTime<chrono::Utc>) -> Value {
    let mut body = Map::new();
    if let Some(title) = changes.new_title() {
        body.insert("title".to_string(), Value::String(title.to_string()));
    }
    if let Some(content) = changes.new_content() {
        body.insert("content".to_string(), Value::String(content.to_string()));
    }
    body.insert(
        "updatedAt".to_string(),
        Value::String(iso_millis::format(stamp)),
    );
    Value::Object(body)
}

/// A live, configured handle on the remote database
#[derive(Debug, Clone)]
pub struct RemoteConnection {
    client: Client,
    base_url: Url,
}

impl RemoteConnection {
    /// Build the HTTP client and resolve the database URL
    pub fn connect(config: &RemoteConfig, request_timeout: Duration) -> Result<Self> {
        let raw_url = config.database_url();
        let base_url = Url::parse(&raw_url).map_err(|e| {
            NotebookError::Config(format!("invalid database URL '{}': {}", raw_url, e))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(NotebookError::Config(format!(
                "database URL '{}' must be an http(s) URL",
                raw_url
            )));
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| NotebookError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!("Remote note store at {}", base_url);
        Ok(Self { client, base_url })
    }

    /// Root URL of the database
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `user`'s note collection
    pub fn collection_url(&self, user: &str) -> Url {
        let namespace = sanitize_email(user);
        self.url_for(&["users", &namespace, "notes.json"])
    }

    /// URL of a single note in `user`'s collection
    pub fn note_url(&self, user: &str, id: &NoteId) -> Url {
        let namespace = sanitize_email(user);
        let leaf = format!("{}.json", id);
        self.url_for(&["users", &namespace, "notes", &leaf])
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode the JSON body; non-2xx is an error
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotebookError::remote(status.as_u16(), body));
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Remote note storage; unavailable when no connection was configured
#[derive(Debug, Clone, Default)]
pub struct RemoteNoteStore {
    connection: Option<RemoteConnection>,
}

impl RemoteNoteStore {
    /// Create a store over a live connection
    pub fn new(connection: RemoteConnection) -> Self {
        Self {
            connection: Some(connection),
        }
    }

    /// A store that reports itself unavailable
    pub fn disabled() -> Self {
        Self { connection: None }
    }

    /// Connect when the configuration names a remote; otherwise disabled
    pub fn from_config(config: &NotebookConfig) -> Self {
        let Some(remote) = config.remote.as_ref() else {
            tracing::debug!("No remote store configured, using local storage only");
            return Self::disabled();
        };

        match RemoteConnection::connect(remote, config.request_timeout) {
            Ok(connection) => Self::new(connection),
            Err(e) => {
                tracing::warn!("Remote store disabled: {}", e);
                Self::disabled()
            }
        }
    }

    fn connection(&self) -> Result<&RemoteConnection> {
        self.connection
            .as_ref()
            .ok_or_else(|| NotebookError::Storage("remote store is not configured".to_string()))
    }
}

#[async_trait]
impl NoteStorage for RemoteNoteStore {
    fn is_available(&self) -> bool {
        self.connection.is_some()
    }

    async fn list_notes(&self, user: &str) -> Result<Vec<Note>> {
        let connection = self.connection()?;
        let url = connection.collection_url(user);
        let snapshot = connection.send(connection.client.get(url)).await?;
        notes_from_snapshot(snapshot)
    }

    async fn create_note(&self, user: &str, draft: NoteDraft) -> Result<Note> {
        let connection = self.connection()?;
        let record = RemoteNoteRecord::from_draft(&draft, &now());

        let url = connection.collection_url(user);
        let response = connection
            .send(connection.client.post(url).json(&record))
            .await?;
        let pushed: PushResponse = serde_json::from_value(response)
            .map_err(|e| malformed(format!("unexpected push response: {}", e)))?;

        record.into_note(&pushed.name)
    }

    async fn update_note(&self, user: &str, id: &NoteId, changes: NoteChanges) -> Result<Note> {
        let connection = self.connection()?;
        let url = connection.note_url(user, id);

        // A merge into a missing id would create a partial record, so the
        // note must exist before anything is written
        let existing = connection.send(connection.client.get(url.clone())).await?;
        if existing.is_null() {
            return Err(NotebookError::NoteNotFound(id.to_string()));
        }

        let body = patch_body(&changes, &now());
        connection
            .send(connection.client.patch(url.clone()).json(&body))
            .await?;

        // The merge response only echoes the patched fields
        let merged = connection.send(connection.client.get(url)).await?;
        note_from_snapshot(id, merged)
    }

    async fn delete_note(&self, user: &str, id: &NoteId) -> Result<()> {
        let connection = self.connection()?;
        let url = connection.note_url(user, id);
        connection.send(connection.client.delete(url)).await?;
        Ok(())
    }
}
