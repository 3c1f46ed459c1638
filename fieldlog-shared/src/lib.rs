//! # Fieldlog Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the Fieldlog API server and client components.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migration helpers
//! - `directory`: The client-directory data-access capability
//! - `resolver`: Lookup-or-create resolution for client names

pub mod auth;
pub mod db;
pub mod directory;
pub mod models;
pub mod resolver;

/// Current version of the fieldlog shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
