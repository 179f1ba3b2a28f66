//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Status;

/// Accent for the default "pink" theme.
pub const PINK: Color = Color::Rgb(236, 72, 153);
/// Sidebar and bar text on the accent.
pub const INK: Color = Color::Rgb(20, 20, 20);
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
pub const MUTED: Color = Color::DarkGray;

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Waiting => Color::White,
        Status::InProgress => Color::Rgb(59, 130, 246),
        Status::Paused => Color::Rgb(245, 158, 11),
        Status::Completed => MUTED,
    }
}
