/// Postgres-backed directory
///
/// Wraps the `clients` table. Dedup comes from the CITEXT unique constraint
/// on `clients.name`: concurrent inserts of the same name race at the
/// database and exactly one wins, so this implementation only has to
/// translate the unique violation into `DirectoryError::Conflict`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::client::Client;

use super::{ClientRecord, Directory, DirectoryError};

/// Client directory backed by the `clients` table
#[derive(Debug, Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    /// Creates a directory over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a sqlx error to a directory error
///
/// Unique-constraint violations on the client name become `Conflict`;
/// everything else is a storage failure the caller may retry.
fn map_sqlx_error(err: sqlx::Error) -> DirectoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(constraint) = db_err.constraint() {
            if constraint.contains("name") {
                return DirectoryError::Conflict;
            }
        }
    }

    tracing::error!(error = %err, "client directory query failed");
    DirectoryError::Transient(err.to_string())
}

#[async_trait]
impl Directory for PgDirectory {
    async fn search(
        &self,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<ClientRecord>, DirectoryError> {
        let clients = Client::search_by_name(&self.pool, pattern, limit)
            .await
            .map_err(map_sqlx_error)?;

        Ok(clients.into_iter().map(ClientRecord::from).collect())
    }

    async fn insert(&self, name: &str) -> Result<ClientRecord, DirectoryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DirectoryError::Validation(
                "Client name cannot be empty".to_string(),
            ));
        }

        let client = Client::create(&self.pool, trimmed)
            .await
            .map_err(map_sqlx_error)?;

        Ok(client.into())
    }

    async fn find_exact(&self, name: &str) -> Result<Option<ClientRecord>, DirectoryError> {
        let client = Client::find_by_name(&self.pool, name)
            .await
            .map_err(map_sqlx_error)?;

        Ok(client.map(ClientRecord::from))
    }
}
