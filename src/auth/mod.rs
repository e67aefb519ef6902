//! Authentication: the session context and durable token storage.
//!
//! This module provides:
//! - `SessionContext`: process-wide session state with the login/logout
//!   transitions and a latest-wins guard for concurrent logins
//! - `TokenStore`: one durable bearer token in the config directory
//!
//! The session is created once at startup and shared by reference; nothing
//! else writes the token.

pub mod session;
pub mod store;

pub use session::{SessionContext, SharedSession};
pub use store::TokenStore;
