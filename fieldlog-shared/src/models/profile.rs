/// Profile model and role-based access control
///
/// Every authenticated user has exactly one profile row keyed by the user's
/// id. The role gates access to the leader dashboard, CSV export, and
/// moderation of other users' reports.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE profile_role AS ENUM ('member', 'leader');
///
/// CREATE TABLE profiles (
///     id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     role profile_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Roles
///
/// - **member**: files and manages their own reports
/// - **leader**: everything a member can do, plus the team dashboard,
///   CSV export, and editing/deleting any report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role of a sales-team profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    /// Regular field staff
    Member,

    /// Team leader with dashboard and moderation access
    Leader,
}

impl ProfileRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Member => "member",
            ProfileRole::Leader => "leader",
        }
    }

    /// Can view the team dashboard and export data
    pub fn can_view_dashboard(&self) -> bool {
        matches!(self, ProfileRole::Leader)
    }

    /// Can edit or delete reports filed by other users
    pub fn can_moderate_reports(&self) -> bool {
        matches!(self, ProfileRole::Leader)
    }
}

/// Profile model: display name and role for one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// User ID this profile belongs to (primary key)
    pub id: Uuid,

    /// Display name shown on reports and timelines
    pub name: String,

    /// Access role
    pub role: ProfileRole,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    /// User ID (must reference an existing user)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Access role
    pub role: ProfileRole,
}

impl Profile {
    /// Creates a profile for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the user already has a profile or the user id
    /// doesn't exist.
    pub async fn create(pool: &PgPool, data: CreateProfile) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, name, role)
            VALUES ($1, $2, $3)
            RETURNING id, name, role, created_at, updated_at
            "#,
        )
        .bind(data.id)
        .bind(data.name)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    /// Finds a profile by user ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, name, role, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Gets just the role for a user, for authorization checks
    pub async fn get_role(pool: &PgPool, id: Uuid) -> Result<Option<ProfileRole>, sqlx::Error> {
        let role: Option<(ProfileRole,)> =
            sqlx::query_as("SELECT role FROM profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(role.map(|(r,)| r))
    }

    /// Updates the display name
    pub async fn update_name(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Changes the role of a profile
    pub async fn set_role(
        pool: &PgPool,
        id: Uuid,
        role: ProfileRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(ProfileRole::Leader.can_view_dashboard());
        assert!(ProfileRole::Leader.can_moderate_reports());
        assert!(!ProfileRole::Member.can_view_dashboard());
        assert!(!ProfileRole::Member.can_moderate_reports());
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(ProfileRole::Member.as_str(), "member");
        assert_eq!(ProfileRole::Leader.as_str(), "leader");
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&ProfileRole::Leader).unwrap();
        assert_eq!(json, "\"leader\"");

        let role: ProfileRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, ProfileRole::Member);
    }
}
