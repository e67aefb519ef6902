//! Data models for the gallery API.
//!
//! Wire types carry explicit serde renames matching the backend's camelCase
//! JSON; validation mirrors the rules the backend enforces at registration.

pub mod auth;
pub mod image;

pub use auth::{AuthResponse, Credentials, RegisterRequest};
pub use image::{ImageRecord, Tag};
