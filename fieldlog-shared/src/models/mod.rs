/// Database models
///
/// This module contains all database models and their CRUD operations:
///
/// - `user`: Authentication identities
/// - `profile`: Per-user display name and role (member/leader)
/// - `client`: Client accounts visited by the sales team
/// - `report`: Activity reports (visit, phone, email) filed against clients

pub mod client;
pub mod profile;
pub mod report;
pub mod user;
