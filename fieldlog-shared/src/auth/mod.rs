/// Authentication and authorization
///
/// - `jwt`: Token creation and validation (HS256 access/refresh pairs)
/// - `password`: Argon2id password hashing
/// - `middleware`: Axum middleware extracting an `AuthContext` from requests
/// - `authorization`: Role checks (leader gate, author-or-leader gate)

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
