//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, pickers, status bar and help overlay
//! - `input`: keyboard event handling
//! - `styles`: colors and text styling
//! - `tabs`: per-tab content (overview, trends, compare, data)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
