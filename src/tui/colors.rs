//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Status bar and list accent.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Confirm dialog background.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Completed task text.
pub const DIM_GREY: Color = Color::Rgb(120, 120, 120);
