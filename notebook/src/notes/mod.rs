//! Notes data model and storage tiers
//!
//! A [`Note`] is the only persisted entity. Notes are written through the
//! [`NoteStorage`] trait, which is implemented by the remote document store
//! ([`remote::RemoteNoteStore`]), the on-device store
//! ([`local::LocalNoteStore`]) and an in-memory mock for tests. The
//! [`NotesRepository`] sits on top and decides which tier serves each call.
//!
//! ## Basic Usage
//!
//! ```rust
//! use notebook::kv::MemoryKeyValueStore;
//! use notebook::notes::{LocalNoteStore, NoteDraft, NotesRepository, RemoteNoteStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> notebook::Result<()> {
//! let local = LocalNoteStore::new(Arc::new(MemoryKeyValueStore::new()));
//! let repository = NotesRepository::new(
//!     Arc::new(RemoteNoteStore::disabled()),
//!     Arc::new(local),
//! );
//!
//! let draft = NoteDraft::new("Groceries", "milk, eggs")?;
//! let created = repository.create("ada@example.com", draft).await?;
//! let listed = repository.list("ada@example.com").await?;
//! assert_eq!(listed.value[0].id, created.value.id);
//! # Ok(())
//! # }
//! ```

/// On-device key/value backed tier
pub mod local;
/// In-memory tier with failure injection, for tests
pub mod mock_storage;
/// Hosted realtime database tier
pub mod remote;
/// Remote-first repository with local fallback
pub mod repository;
/// Storage trait shared by every tier
pub mod storage;

pub use local::LocalNoteStore;
pub use remote::{RemoteConnection, RemoteNoteStore};
pub use repository::NotesRepository;
pub use storage::NoteStorage;

use crate::error::{NotebookError, Result};
use crate::sanitize::is_path_safe;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Current time at the millisecond precision notes are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Identifier of a note within one user's collection
///
/// Ids are assigned by the storage tier: the remote store hands out push
/// keys, the local store generates lower-cased ULIDs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generate a new locally-unique id (millisecond timestamp + random suffix)
    pub fn generate() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }

    /// Parse an id supplied by a caller
    pub fn from_string(id: String) -> Result<Self> {
        if !is_path_safe(&id) {
            return Err(NotebookError::invalid_note_id(&id));
        }
        Ok(Self(id))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s.to_string())
    }
}

/// A stored note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier within the owner's collection
    pub id: NoteId,
    /// Non-empty, trimmed title
    pub title: String,
    /// Trimmed content, possibly empty
    pub content: String,
    /// When the note was created
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    /// When the note was last updated
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Build a note from a validated draft, stamped with `stamp`
    pub fn from_draft(id: NoteId, draft: NoteDraft, stamp: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// Merge `changes` into this note and refresh `updated_at`
    pub fn apply(&mut self, changes: &NoteChanges, stamp: DateTime<Utc>) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(content) = &changes.content {
            self.content = content.clone();
        }
        self.updated_at = stamp;
    }

    /// Whether the note's title or content contains `term`, ignoring case
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.content.to_lowercase().contains(&term)
    }
}

/// Sort notes newest first
///
/// The sort is stable: notes created within the same millisecond keep the
/// order the tier returned them in.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Validated fields for a new note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    title: String,
    content: String,
}

impl NoteDraft {
    /// Trim both fields and reject an empty title
    pub fn new(title: impl AsRef<str>, content: impl AsRef<str>) -> Result<Self> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(NotebookError::Validation(
                "note title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.as_ref().trim().to_string(),
        })
    }

    /// The trimmed title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The trimmed content
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Validated partial update of a note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    title: Option<String>,
    content: Option<String>,
}

impl NoteChanges {
    /// Trim the present fields; reject an empty title or an empty change set
    pub fn new(title: Option<&str>, content: Option<&str>) -> Result<Self> {
        let title = title.map(|t| t.trim().to_string());
        if title.as_deref() == Some("") {
            return Err(NotebookError::Validation(
                "note title must not be empty".to_string(),
            ));
        }
        let content = content.map(|c| c.trim().to_string());
        if title.is_none() && content.is_none() {
            return Err(NotebookError::Validation(
                "nothing to update: give a title or content".to_string(),
            ));
        }
        Ok(Self { title, content })
    }

    /// Replace only the title
    pub fn title(title: &str) -> Result<Self> {
        Self::new(Some(title), None)
    }

    /// Replace only the content
    pub fn content(content: &str) -> Result<Self> {
        Self::new(None, Some(content))
    }

    /// New title, if changed
    pub fn new_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// New content, if changed
    pub fn new_content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Storage tier that served a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The remote document store
    Remote,
    /// On-device storage
    Local,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Remote => write!(f, "remote"),
            Backend::Local => write!(f, "local"),
        }
    }
}

/// A repository result tagged with the tier that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    /// The operation's result
    pub value: T,
    /// Tier that served the operation
    pub backend: Backend,
}

impl<T> Served<T> {
    /// Tag `value` with `backend`
    pub fn new(value: T, backend: Backend) -> Self {
        Self { value, backend }
    }
}

/// Timestamps as RFC 3339 strings with millisecond precision and a `Z` suffix
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format a timestamp the way it is stored
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse a stored timestamp string
    pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
    }

    /// Serialize a timestamp
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    /// Deserialize a timestamp
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note_at(id: &str, millis: i64) -> Note {
        let stamp = Utc.timestamp_millis_opt(millis).unwrap();
        Note {
            id: NoteId(id.to_string()),
            title: id.to_string(),
            content: String::new(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_note_id_generation() {
        let id1 = NoteId::generate();
        let id2 = NoteId::generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 26);
        assert_eq!(id1.as_str(), id1.as_str().to_lowercase());
    }

    #[test]
    fn test_note_id_validation() {
        assert!("-NzAbc_123".parse::<NoteId>().is_ok());
        assert!("".parse::<NoteId>().is_err());
        assert!("../etc".parse::<NoteId>().is_err());
        assert!(matches!(
            "a.b".parse::<NoteId>(),
            Err(NotebookError::InvalidNoteId(id)) if id == "a.b"
        ));
    }

    #[test]
    fn test_draft_trims_and_validates() {
        let draft = NoteDraft::new("  Title  ", "\n body \n").unwrap();
        assert_eq!(draft.title(), "Title");
        assert_eq!(draft.content(), "body");

        assert!(NoteDraft::new("   ", "content").is_err());
        assert_eq!(NoteDraft::new("T", "").unwrap().content(), "");
    }

    #[test]
    fn test_changes_validation() {
        let changes = NoteChanges::new(Some(" New "), None).unwrap();
        assert_eq!(changes.new_title(), Some("New"));
        assert_eq!(changes.new_content(), None);

        assert!(NoteChanges::new(Some(" "), Some("x")).is_err());
        assert!(NoteChanges::new(None, None).is_err());
        assert_eq!(NoteChanges::content("").unwrap().new_content(), Some(""));
    }

    #[test]
    fn test_note_apply_keeps_identity() {
        let mut note = note_at("n1", 1_000);
        let later = Utc.timestamp_millis_opt(2_000).unwrap();
        note.apply(&NoteChanges::content("updated").unwrap(), later);

        assert_eq!(note.title, "n1");
        assert_eq!(note.content, "updated");
        assert_eq!(note.created_at, Utc.timestamp_millis_opt(1_000).unwrap());
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn test_note_matches_case_insensitive() {
        let mut note = note_at("n1", 0);
        note.title = "Rust Programming".to_string();
        note.content = "Borrow checker notes".to_string();

        assert!(note.matches("rust"));
        assert!(note.matches("CHECKER"));
        assert!(!note.matches("python"));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut notes = vec![note_at("a", 1), note_at("b", 3), note_at("c", 3), note_at("d", 2)];
        sort_newest_first(&mut notes);
        let ids: Vec<_> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "d", "a"]);
    }

    #[test]
    fn test_note_serialization_shape() {
        let note = note_at("01hx", 1_700_000_000_123);
        let json = serde_json::to_value(&note).unwrap();

        assert_eq!(json["id"], "01hx");
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20.123Z");
        assert_eq!(json["updatedAt"], "2023-11-14T22:13:20.123Z");

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_iso_millis_accepts_offsets() {
        let parsed = iso_millis::parse("2024-03-01T12:00:00.500+02:00").unwrap();
        assert_eq!(iso_millis::format(&parsed), "2024-03-01T10:00:00.500Z");
        assert!(iso_millis::parse("yesterday").is_err());
    }

    #[test]
    fn test_now_is_millisecond_precision() {
        let stamp = now();
        assert_eq!(stamp.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
