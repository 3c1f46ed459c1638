/// In-memory directory
///
/// Same contract as the Postgres implementation, with uniqueness enforced
/// under a single mutex so concurrent inserts of the same name still produce
/// exactly one winner. Used by resolver and client tests that should not
/// need a database.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ClientRecord, Directory, DirectoryError};

/// Client directory held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    records: Mutex<Vec<ClientRecord>>,
    insert_attempts: AtomicU64,
}

impl MemoryDirectory {
    /// Creates an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-populated with the given names
    pub fn with_names(names: &[&str]) -> Self {
        let records = names
            .iter()
            .map(|name| ClientRecord {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
            })
            .collect();

        Self {
            records: Mutex::new(records),
            insert_attempts: AtomicU64::new(0),
        }
    }

    /// Number of stored clients
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of insert calls made so far, successful or not
    pub fn insert_attempts(&self) -> u64 {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Removes a client by name, returning whether one was removed
    pub fn remove(&self, name: &str) -> bool {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !r.name_matches(name));
        records.len() < before
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn search(
        &self,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<ClientRecord>, DirectoryError> {
        if pattern.is_empty() || limit <= 0 {
            return Ok(Vec::new());
        }

        let needle = pattern.to_lowercase();
        let records = self.records.lock().unwrap();

        let mut matches: Vec<ClientRecord> = records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        matches.truncate(limit as usize);

        Ok(matches)
    }

    async fn insert(&self, name: &str) -> Result<ClientRecord, DirectoryError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DirectoryError::Validation(
                "Client name cannot be empty".to_string(),
            ));
        }

        // Check and insert under one lock so duplicate races behave like the
        // database unique constraint
        let mut records = self.records.lock().unwrap();

        if records.iter().any(|r| r.name_matches(trimmed)) {
            return Err(DirectoryError::Conflict);
        }

        let record = ClientRecord {
            id: Uuid::new_v4(),
            name: trimmed.to_string(),
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn find_exact(&self, name: &str) -> Result<Option<ClientRecord>, DirectoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.name_matches(name)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let directory = MemoryDirectory::new();

        let created = directory.insert("Acme Corp").await.unwrap();
        assert_eq!(created.name, "Acme Corp");

        let found = directory.find_exact("acme corp").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let directory = MemoryDirectory::with_names(&["Acme Corp"]);

        let result = directory.insert("ACME CORP").await;
        assert!(matches!(result, Err(DirectoryError::Conflict)));
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_substring_and_bounded() {
        let directory =
            MemoryDirectory::with_names(&["Acme Corp", "Acme East", "Acme West", "Globex"]);

        let results = directory.search("acme", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Acme Corp");
        assert_eq!(results[1].name, "Acme East");

        let results = directory.search("", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let directory = MemoryDirectory::new();

        let result = directory.insert("   ").await;
        assert!(matches!(result, Err(DirectoryError::Validation(_))));
    }
}
