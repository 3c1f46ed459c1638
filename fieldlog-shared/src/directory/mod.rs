/// Client-directory data-access capability
///
/// The directory is the seam between components that look clients up and
/// whatever actually stores them. Three operations are enough for search
/// and lookup-or-create:
///
/// - `search`: case-insensitive substring match, bounded result set
/// - `insert`: create a client, failing with `Conflict` on a duplicate name
/// - `find_exact`: case-insensitive exact-name lookup
///
/// The dedup invariant ("at most one row per distinct name") is owned by
/// the implementation's uniqueness primitive, not by callers. `insert` must
/// be atomic with respect to concurrent inserts of the same name: exactly
/// one wins, the rest observe `Conflict`.
///
/// # Implementations
///
/// - [`postgres::PgDirectory`]: production store backed by the `clients`
///   table and its CITEXT unique constraint
/// - [`memory::MemoryDirectory`]: in-process store with the same semantics,
///   for tests

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::client::Client;

pub mod memory;
pub mod postgres;

/// Maximum (and default) number of rows a search returns
pub const SEARCH_LIMIT: i64 = 5;

/// Error type for directory operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// A client with this name already exists (unique-violation signal)
    ///
    /// Recoverable: the resolver falls back to an exact lookup.
    #[error("A client with this name already exists")]
    Conflict,

    /// Requested client does not exist
    #[error("Client not found")]
    NotFound,

    /// Input rejected before any request was issued (e.g. empty name)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Storage or network unavailability; surfaced to the caller, never
    /// retried automatically
    #[error("Directory unavailable: {0}")]
    Transient(String),
}

/// A resolved client: the projection search and resolution work with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client ID
    pub id: Uuid,

    /// Client name
    pub name: String,
}

impl ClientRecord {
    /// Case-insensitive name comparison, matching CITEXT equality
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl From<Client> for ClientRecord {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
        }
    }
}

/// The client-directory capability
///
/// See the module docs for the contract each operation must uphold.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Case-insensitive substring search on client name
    ///
    /// Returns at most `limit` rows in a stable order. An empty pattern
    /// returns no rows.
    async fn search(&self, pattern: &str, limit: i64)
        -> Result<Vec<ClientRecord>, DirectoryError>;

    /// Creates a client with the given name
    ///
    /// # Errors
    ///
    /// `Conflict` if a client with this name (any casing) already exists.
    async fn insert(&self, name: &str) -> Result<ClientRecord, DirectoryError>;

    /// Case-insensitive exact-name lookup
    async fn find_exact(&self, name: &str) -> Result<Option<ClientRecord>, DirectoryError>;
}
