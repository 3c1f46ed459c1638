/// Client account model and database operations
///
/// Clients are the accounts field staff visit, call, and email. The name is
/// unique case-insensitively (CITEXT); that constraint is what makes the
/// lookup-or-create resolver race-safe, so nothing here takes a lock.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE clients (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name CITEXT NOT NULL UNIQUE,
///     last_visited_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `last_visited_at` is maintained by `Report::submit` whenever a visit-type
/// report is filed, and drives dormant-client detection on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A client account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    /// Unique client ID (UUID v4)
    pub id: Uuid,

    /// Client name, unique case-insensitively
    pub name: String,

    /// Timestamp of the most recent visit-type report (None if never visited)
    pub last_visited_at: Option<DateTime<Utc>>,

    /// When the client was first registered
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Inserts a new client with the given name
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if a client with the same
    /// name (any casing) already exists. The directory layer maps that to
    /// `DirectoryError::Conflict`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name)
            VALUES ($1)
            RETURNING id, name, last_visited_at, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(client)
    }

    /// Finds a client by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, last_visited_at, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// Finds a client by exact name (case-insensitive via CITEXT)
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, last_visited_at, created_at
            FROM clients
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// Case-insensitive substring search on name
    ///
    /// Returns up to `limit` rows ordered by name. An empty pattern returns
    /// no rows; the percent signs are added here so callers pass raw input.
    pub async fn search_by_name(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, last_visited_at, created_at
            FROM clients
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(clients)
    }

    /// Lists dormant clients: no visit recorded since `cutoff`, or never
    ///
    /// Ordered oldest-visit first, with never-visited clients at the top.
    pub async fn list_dormant(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, last_visited_at, created_at
            FROM clients
            WHERE last_visited_at < $1 OR last_visited_at IS NULL
            ORDER BY last_visited_at ASC NULLS FIRST
            "#,
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;

        Ok(clients)
    }

    /// Deletes a client by ID (cascades to its reports)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
