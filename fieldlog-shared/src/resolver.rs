/// Lookup-or-create client resolution
///
/// When a user submits a report they type a client name, possibly picking
/// from live search results. The name must map to exactly one client row
/// whether or not it already exists, and whether or not another user is
/// creating it at the same moment.
///
/// The algorithm leans on the directory's uniqueness guarantee rather than
/// trying to prevent the race:
///
/// 1. If the typed name exactly matches one of the current search results
///    (case-insensitive), that client is selected with no write.
/// 2. Otherwise insert. If the insert wins, done.
/// 3. If the insert loses with `Conflict`, someone else created the client
///    between our search and our insert. Look it up by exact name and use
///    theirs.
///
/// Step 3 failing to find the client means it was deleted in the same
/// window; that is reported as `Transient` so the user can simply retry.

use crate::directory::{ClientRecord, Directory, DirectoryError};

/// Outcome of resolving a client name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The client the name resolved to
    pub client: ClientRecord,

    /// Whether this call created the client
    pub created: bool,
}

/// Resolves a typed client name to exactly one client, creating it if needed
///
/// `current_results` are the search results visible to the user at submit
/// time, used to avoid a write when they picked an existing client.
///
/// # Errors
///
/// - `Validation` if the trimmed name is empty
/// - `Transient` if the directory is unavailable, or if the client vanished
///   between a lost insert race and the fallback lookup
pub async fn resolve<D: Directory + ?Sized>(
    directory: &D,
    raw_name: &str,
    current_results: &[ClientRecord],
) -> Result<Resolution, DirectoryError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(DirectoryError::Validation(
            "Client name cannot be empty".to_string(),
        ));
    }

    if let Some(existing) = current_results.iter().find(|r| r.name_matches(name)) {
        return Ok(Resolution {
            client: existing.clone(),
            created: false,
        });
    }

    match directory.insert(name).await {
        Ok(client) => Ok(Resolution {
            client,
            created: true,
        }),
        Err(DirectoryError::Conflict) => {
            tracing::debug!(client_name = name, "lost insert race, falling back to lookup");

            match directory.find_exact(name).await? {
                Some(client) => Ok(Resolution {
                    client,
                    created: false,
                }),
                None => Err(DirectoryError::Transient(
                    "Client was created and removed concurrently, please retry".to_string(),
                )),
            }
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::memory::MemoryDirectory;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_empty_name_rejected_before_any_write() {
        let directory = MemoryDirectory::new();

        let result = resolve(&directory, "   ", &[]).await;
        assert!(matches!(result, Err(DirectoryError::Validation(_))));
        assert_eq!(directory.insert_attempts(), 0);
    }

    #[tokio::test]
    async fn test_exact_match_in_results_skips_insert() {
        let directory = MemoryDirectory::with_names(&["Acme Corp"]);
        let results = directory.search("acme", 5).await.unwrap();

        let resolution = resolve(&directory, "acme corp", &results).await.unwrap();

        assert!(!resolution.created);
        assert_eq!(resolution.client, results[0]);
        assert_eq!(directory.insert_attempts(), 0);
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_new_name_is_created() {
        let directory = MemoryDirectory::new();

        let resolution = resolve(&directory, "  Globex  ", &[]).await.unwrap();

        assert!(resolution.created);
        assert_eq!(resolution.client.name, "Globex");
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_falls_back_to_existing_row() {
        // Stale results: the client exists but is not in what the user sees
        let directory = MemoryDirectory::with_names(&["Globex"]);
        let existing = directory.find_exact("Globex").await.unwrap().unwrap();

        let resolution = resolve(&directory, "globex", &[]).await.unwrap();

        assert!(!resolution.created);
        assert_eq!(resolution.client.id, existing.id);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.insert_attempts(), 1);
    }

    #[tokio::test]
    async fn test_partial_match_does_not_select_from_results() {
        let directory = MemoryDirectory::with_names(&["Acme Corp"]);
        let results = directory.search("acme", 5).await.unwrap();

        let resolution = resolve(&directory, "Acme", &results).await.unwrap();

        assert!(resolution.created);
        assert_eq!(directory.len(), 2);
    }

    /// Directory stub for the delete-during-race window: every insert
    /// conflicts and the fallback lookup finds nothing
    struct VanishingDirectory;

    #[async_trait::async_trait]
    impl Directory for VanishingDirectory {
        async fn search(
            &self,
            _pattern: &str,
            _limit: i64,
        ) -> Result<Vec<ClientRecord>, DirectoryError> {
            Ok(Vec::new())
        }

        async fn insert(&self, _name: &str) -> Result<ClientRecord, DirectoryError> {
            Err(DirectoryError::Conflict)
        }

        async fn find_exact(&self, _name: &str) -> Result<Option<ClientRecord>, DirectoryError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_vanished_after_conflict_is_transient() {
        let result = resolve(&VanishingDirectory, "Initech", &[]).await;
        assert!(matches!(result, Err(DirectoryError::Transient(_))));
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let directory: Box<dyn Directory> = Box::new(MemoryDirectory::new());

        let resolution = resolve(directory.as_ref(), "Hooli", &[]).await.unwrap();
        assert!(resolution.created);
        assert_ne!(resolution.client.id, Uuid::nil());
    }
}
