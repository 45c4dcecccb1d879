//! Store Module Tests
//!
//! Exercises the file-backed collection against a real document in a temporary directory.
//!
//! ## Test Scopes
//! - **Document I/O**: Loading, ordering, replacing and initializing the document.
//! - **Identifiers**: Fresh ids never collide with live records, even after deletes.
//! - **Mutation**: Update/delete semantics, untouched document on misses, and
//!   serialized concurrent writers.

#[cfg(test)]
mod tests {
    use crate::store::error::StoreError;
    use crate::store::store::{PostStore, next_id};
    use crate::store::types::{Post, PostDraft};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn post(id: u64, heading: &str, content: &str) -> Post {
        Post {
            id,
            heading: heading.to_string(),
            content: content.to_string(),
        }
    }

    async fn empty_store() -> (TempDir, PostStore) {
        let dir = TempDir::new().unwrap();
        let store = PostStore::open(dir.path().join("database.json"))
            .await
            .unwrap();
        (dir, store)
    }

    async fn read_document(path: &std::path::Path) -> serde_json::Value {
        let raw = tokio::fs::read(path).await.unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    // ============================================================
    // DOCUMENT I/O
    // ============================================================

    #[tokio::test]
    async fn test_open_initializes_missing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("database.json");

        let store = PostStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(read_document(&path).await, serde_json::json!([]));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(&path, r#"[{"id":7,"heading":"kept","content":"body"}]"#)
            .await
            .unwrap();

        let store = PostStore::open(&path).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), vec![post(7, "kept", "body")]);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = PostStore::open(&path).await;

        assert!(matches!(result, Err(StoreError::Format { .. })));
    }

    #[tokio::test]
    async fn test_load_all_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = PostStore::new(dir.path().join("absent.json"));

        let result = store.load_all().await;

        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_all_wrong_shape_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(&path, r#"[{"id":"one","heading":"h"}]"#)
            .await
            .unwrap();
        let store = PostStore::new(&path);

        let result = store.load_all().await;

        assert!(matches!(result, Err(StoreError::Format { .. })));
    }

    #[tokio::test]
    async fn test_load_all_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(
            &path,
            r#"[{"id":1,"heading":"a","content":"a"},{"id":1,"heading":"b","content":"b"}]"#,
        )
        .await
        .unwrap();
        let store = PostStore::new(&path);

        assert!(matches!(
            store.load_all().await,
            Err(StoreError::Inconsistent { .. })
        ));
        assert!(matches!(
            PostStore::open(&path).await,
            Err(StoreError::Inconsistent { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_refuses_document_with_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        let raw = r#"[{"id":1,"heading":"a","content":"a"},{"id":1,"heading":"b","content":"b"}]"#;
        tokio::fs::write(&path, raw).await.unwrap();
        let store = PostStore::new(&path);

        let result = store.delete(1).await;

        assert!(matches!(result, Err(StoreError::Inconsistent { .. })));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_load_all_rejects_zero_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(
            &path,
            r#"[{"id":3,"heading":"c","content":"c"},{"id":0,"heading":"z","content":"z"}]"#,
        )
        .await
        .unwrap();
        let store = PostStore::new(&path);

        assert!(matches!(
            store.load_all().await,
            Err(StoreError::Inconsistent { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_all_sorts_newest_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(
            &path,
            r#"[{"id":2,"heading":"b","content":"b"},{"id":5,"heading":"e","content":"e"},{"id":1,"heading":"a","content":"a"}]"#,
        )
        .await
        .unwrap();
        let store = PostStore::new(&path);

        let ids: Vec<u64> = store
            .load_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![5, 2, 1]);
    }

    #[tokio::test]
    async fn test_replace_all_round_trip_preserves_content() {
        let (_dir, store) = empty_store().await;
        let posts = vec![post(3, "c", "third"), post(1, "a", "first")];
        store.replace_all(posts.clone()).await.unwrap();
        let before = read_document(store.path()).await;

        let loaded = store.load_all().await.unwrap();
        let returned = store.replace_all(loaded).await.unwrap();

        assert_eq!(returned, posts);
        assert_eq!(read_document(store.path()).await, before);
    }

    #[tokio::test]
    async fn test_replace_all_leaves_no_temp_file() {
        let (dir, store) = empty_store().await;

        store.replace_all(vec![post(1, "a", "b")]).await.unwrap();

        let names: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(names, vec![store.path().to_path_buf()]);
    }

    // ============================================================
    // IDENTIFIERS
    // ============================================================

    #[test]
    fn test_next_id_empty_collection_starts_at_one() {
        assert_eq!(next_id(&[]), Some(1));
    }

    #[test]
    fn test_next_id_uses_max_not_count() {
        // Two records, but the largest id is 5: a count-based scheme would yield 3.
        let posts = vec![post(5, "e", "e"), post(2, "b", "b")];
        assert_eq!(next_id(&posts), Some(6));
    }

    #[test]
    fn test_next_id_exhausted_at_max() {
        let posts = vec![post(u64::MAX, "last", "last")];
        assert_eq!(next_id(&posts), None);
    }

    #[tokio::test]
    async fn test_create_after_max_id_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");
        let raw = r#"[{"id":18446744073709551615,"heading":"last","content":"last"}]"#;
        tokio::fs::write(&path, raw).await.unwrap();
        let store = PostStore::open(&path).await.unwrap();

        let result = store.create(PostDraft::new("H", "C")).await;

        assert!(matches!(result, Err(StoreError::IdsExhausted)));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let (_dir, store) = empty_store().await;

        let first = store.create(PostDraft::new("H1", "C1")).await.unwrap();
        let second = store.create(PostDraft::new("H2", "C2")).await.unwrap();

        assert_eq!(first, post(1, "H1", "C1"));
        assert_eq!(second, post(2, "H2", "C2"));
        assert_eq!(store.get(1).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_create_after_delete_does_not_reuse_live_id() {
        let (_dir, store) = empty_store().await;
        for i in 1..=3 {
            store
                .create(PostDraft::new(format!("H{}", i), "C"))
                .await
                .unwrap();
        }

        store.delete(1).await.unwrap();
        let created = store.create(PostDraft::new("H4", "C4")).await.unwrap();

        assert_eq!(created.id, 4);
        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    // ============================================================
    // MUTATION
    // ============================================================

    #[tokio::test]
    async fn test_update_keeps_id_and_changes_fields() {
        let (_dir, store) = empty_store().await;
        store.create(PostDraft::new("old", "body")).await.unwrap();

        let updated = store
            .update(1, PostDraft::new("new", "body2"))
            .await
            .unwrap();

        assert_eq!(updated, Some(post(1, "new", "body2")));
        assert_eq!(store.get(1).await.unwrap(), Some(post(1, "new", "body2")));
    }

    #[tokio::test]
    async fn test_update_missing_leaves_document_unchanged() {
        let (_dir, store) = empty_store().await;
        store.create(PostDraft::new("h", "c")).await.unwrap();
        let before = read_document(store.path()).await;

        let updated = store.update(42, PostDraft::new("x", "y")).await.unwrap();

        assert_eq!(updated, None);
        assert_eq!(read_document(store.path()).await, before);
    }

    #[tokio::test]
    async fn test_delete_returns_remaining_and_second_delete_misses() {
        let (_dir, store) = empty_store().await;
        store.create(PostDraft::new("H1", "C1")).await.unwrap();
        store.create(PostDraft::new("H2", "C2")).await.unwrap();

        let remaining = store.delete(2).await.unwrap();
        let again = store.delete(2).await.unwrap();

        assert_eq!(remaining, Some(vec![post(1, "H1", "C1")]));
        assert_eq!(again, None);
        assert_eq!(store.list().await.unwrap(), vec![post(1, "H1", "C1")]);
    }

    #[tokio::test]
    async fn test_mutate_error_skips_write() {
        let (_dir, store) = empty_store().await;
        store.create(PostDraft::new("h", "c")).await.unwrap();
        let before = read_document(store.path()).await;

        let result: Result<(), StoreError> = store
            .mutate(|posts| {
                posts.clear();
                Err(StoreError::io(
                    "synthetic",
                    std::io::Error::other("abort mutation"),
                ))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(read_document(store.path()).await, before);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, store) = empty_store().await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(PostDraft::new(format!("H{}", i), "C"))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<u64> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    }
}
