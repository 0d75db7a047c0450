use notebook::kv::MemoryKeyValueStore;
use notebook::notes::mock_storage::MockNoteStorage;
use notebook::notes::LocalNoteStore;
use notebook::sanitize::{sanitize_email, PATH_SPECIAL_CHARS};
use notebook::{Backend, NoteChanges, NoteDraft, Notebook, NotesRepository};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Update(usize, String),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-zA-Z][a-zA-Z0-9 ]{0,12}".prop_map(Op::Create),
        1 => (any::<usize>(), "[a-z ]{0,12}").prop_map(|(i, c)| Op::Update(i, c)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn local_notebook() -> Notebook {
    let local = LocalNoteStore::new(Arc::new(MemoryKeyValueStore::new()));
    let repository = NotesRepository::new(
        Arc::new(MockNoteStorage::unavailable()),
        Arc::new(local),
    );
    Notebook::open(repository, "prop@example.com")
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn test_sanitized_email_has_no_special_chars(email: String) {
        let sanitized = sanitize_email(&email);

        // Replacement is one-for-one
        assert_eq!(sanitized.chars().count(), email.chars().count());
        assert!(!sanitized.contains(&PATH_SPECIAL_CHARS[..]));
    }

    #[test]
    fn test_sanitize_is_idempotent(email: String) {
        let once = sanitize_email(&email);
        assert_eq!(sanitize_email(&once), once);
    }

    #[test]
    fn test_sanitize_keeps_safe_input(email in "[a-z0-9_+-]{1,10}@[a-z0-9_-]{1,10}") {
        assert_eq!(sanitize_email(&email), email);
    }

    #[test]
    fn test_draft_trims_and_keeps_nonblank_titles(
        title in "\\s{0,3}[a-zA-Z0-9][a-zA-Z0-9 ]{0,20}\\s{0,3}",
        content in "\\s{0,3}[a-z ]{0,20}\\s{0,3}",
    ) {
        let draft = NoteDraft::new(&title, &content).unwrap();
        assert_eq!(draft.title(), title.trim());
        assert_eq!(draft.content(), content.trim());
    }

    #[test]
    fn test_blank_titles_rejected(title in "\\s{0,5}") {
        assert!(NoteDraft::new(&title, "content").is_err());
        assert!(NoteChanges::new(Some(&title), Some("content")).is_err());
    }

    #[test]
    fn test_operation_sequences_keep_list_consistent(
        ops in prop::collection::vec(op_strategy(), 1..25)
    ) {
        runtime().block_on(async {
            let mut notebook = local_notebook();
            let mut expected_len = 0usize;

            for op in ops {
                match op {
                    Op::Create(title) => {
                        notebook.create(&title, "").await.unwrap();
                        expected_len += 1;
                    }
                    Op::Update(index, content) => {
                        if expected_len == 0 {
                            continue;
                        }
                        let note = notebook.notes()[index % expected_len].clone();
                        let updated = notebook
                            .update(&note.id, NoteChanges::content(&content).unwrap())
                            .await
                            .unwrap();
                        assert!(updated.updated_at > note.updated_at);
                        assert_eq!(updated.created_at, note.created_at);
                    }
                    Op::Delete(index) => {
                        if expected_len == 0 {
                            continue;
                        }
                        let id = notebook.notes()[index % expected_len].id.clone();
                        notebook.delete(&id).await.unwrap();
                        expected_len -= 1;
                    }
                }
            }

            // The in-memory list agrees with what storage returns
            let in_memory = notebook.notes().to_vec();
            let stored = notebook.refresh().await.unwrap().to_vec();
            assert_eq!(stored.len(), expected_len);
            assert_eq!(in_memory, stored);
            assert!(stored.windows(2).all(|w| w[0].created_at >= w[1].created_at));
            assert_eq!(notebook.last_backend(), Some(Backend::Local));
        });
    }

    #[test]
    fn test_search_results_contain_term(
        titles in prop::collection::vec("[a-zA-Z]{1,8}", 1..10),
        term in "[a-zA-Z]{0,3}",
    ) {
        runtime().block_on(async {
            let mut notebook = local_notebook();
            for title in &titles {
                notebook.create(title, "").await.unwrap();
            }

            let results = notebook.search(&term);
            if term.is_empty() {
                assert_eq!(results.len(), titles.len());
            }
            let needle = term.to_lowercase();
            for note in &results {
                assert!(note.title.to_lowercase().contains(&needle));
            }
            let expected = titles
                .iter()
                .filter(|t| t.to_lowercase().contains(&needle))
                .count();
            assert_eq!(results.len(), expected);
        });
    }
}
