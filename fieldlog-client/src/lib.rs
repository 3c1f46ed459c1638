//! Fieldlog client library
//!
//! Building blocks for fieldlog front ends: an HTTP-backed [`Directory`]
//! implementation over the API, and [`DebouncedSearch`] for driving
//! search-as-you-type against any directory.
//!
//! [`Directory`]: fieldlog_shared::directory::Directory
//! [`DebouncedSearch`]: search::DebouncedSearch

pub mod http;
pub mod search;

pub use http::HttpDirectory;
pub use search::{DebouncedSearch, SearchState};

/// Client library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
