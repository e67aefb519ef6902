//! One render module per route.

pub mod gallery;
pub mod home;
pub mod login;
pub mod register;
