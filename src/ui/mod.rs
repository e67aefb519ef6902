//! Terminal user interface: rendering, input handling and styling.

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
