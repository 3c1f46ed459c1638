//! Resolver behavior against the in-memory directory
//!
//! These exercise the lookup-or-create contract end to end, including the
//! concurrent-creation race the production path resolves through the
//! database unique constraint.

use std::sync::Arc;

use fieldlog_shared::directory::memory::MemoryDirectory;
use fieldlog_shared::directory::{Directory, DirectoryError};
use fieldlog_shared::resolver::resolve;

#[tokio::test]
async fn test_resolve_creates_exactly_one_row() {
    let directory = MemoryDirectory::new();

    let first = resolve(&directory, "Acme Corp", &[]).await.unwrap();
    assert!(first.created);

    // Resolving the same name again, with or without fresh results, must
    // land on the same row
    let results = directory.search("acme", 5).await.unwrap();
    let second = resolve(&directory, "Acme Corp", &results).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.client.id, first.client.id);

    let third = resolve(&directory, "ACME CORP", &[]).await.unwrap();
    assert!(!third.created);
    assert_eq!(third.client.id, first.client.id);

    assert_eq!(directory.len(), 1);
}

#[tokio::test]
async fn test_concurrent_resolution_yields_one_client() {
    let directory = Arc::new(MemoryDirectory::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let directory = Arc::clone(&directory);
        handles.push(tokio::spawn(async move {
            resolve(directory.as_ref(), "Globex", &[]).await
        }));
    }

    let mut ids = Vec::new();
    let mut created_count = 0;
    for handle in handles {
        let resolution = handle.await.unwrap().unwrap();
        if resolution.created {
            created_count += 1;
        }
        ids.push(resolution.client.id);
    }

    // Exactly one task created the client; everyone resolved to it
    assert_eq!(created_count, 1);
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(directory.len(), 1);
}

#[tokio::test]
async fn test_distinct_names_resolve_independently() {
    let directory = MemoryDirectory::new();

    let a = resolve(&directory, "Initech", &[]).await.unwrap();
    let b = resolve(&directory, "Initrode", &[]).await.unwrap();

    assert!(a.created);
    assert!(b.created);
    assert_ne!(a.client.id, b.client.id);
    assert_eq!(directory.len(), 2);
}

#[tokio::test]
async fn test_resolve_then_search_round_trip() {
    let directory = MemoryDirectory::with_names(&["Vandelay Industries"]);

    // Typed a brand new name while older results were showing
    let results = directory.search("vandelay", 5).await.unwrap();
    let resolution = resolve(&directory, "Vandelay Imports", &results)
        .await
        .unwrap();
    assert!(resolution.created);

    let results = directory.search("vandelay", 5).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|r| r.id == resolution.client.id));
}

#[tokio::test]
async fn test_deleted_during_race_reports_transient() {
    let directory = MemoryDirectory::with_names(&["Ephemeral Ltd"]);

    // Insert conflicts against the existing row, then the row disappears
    // before the fallback lookup runs. Simulate by removing between the
    // two steps using a directory wrapper.
    struct DeleteBetween {
        inner: MemoryDirectory,
    }

    #[async_trait::async_trait]
    impl Directory for DeleteBetween {
        async fn search(
            &self,
            pattern: &str,
            limit: i64,
        ) -> Result<Vec<fieldlog_shared::directory::ClientRecord>, DirectoryError> {
            self.inner.search(pattern, limit).await
        }

        async fn insert(
            &self,
            name: &str,
        ) -> Result<fieldlog_shared::directory::ClientRecord, DirectoryError> {
            let result = self.inner.insert(name).await;
            if matches!(result, Err(DirectoryError::Conflict)) {
                self.inner.remove(name);
            }
            result
        }

        async fn find_exact(
            &self,
            name: &str,
        ) -> Result<Option<fieldlog_shared::directory::ClientRecord>, DirectoryError> {
            self.inner.find_exact(name).await
        }
    }

    let wrapped = DeleteBetween { inner: directory };
    let result = resolve(&wrapped, "Ephemeral Ltd", &[]).await;

    assert!(matches!(result, Err(DirectoryError::Transient(_))));
}
