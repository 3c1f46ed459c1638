/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, password)
/// - `profile`: Own-profile endpoints
/// - `clients`: Client search, lookup, and resolution
/// - `reports`: Activity report CRUD and per-client history
/// - `dashboard`: Leader dashboard and CSV export

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod profile;
pub mod reports;
