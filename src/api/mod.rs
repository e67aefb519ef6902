//! REST API client module for the gallery backend.
//!
//! The backend issues a JWT bearer token at `POST /auth/login`; all other
//! endpoints expect it in an `Authorization: Bearer` header.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
