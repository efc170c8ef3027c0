//! Color palette and style helpers for the GrabTUI interface

use ratatui::style::{Color, Modifier, Style};

use crate::models::{DownloadStatus, Resolution};

/// Dark palette with a cold accent scheme
pub struct Theme;

impl Theme {
    // =========================================================================
    // Core Palette
    // =========================================================================

    /// Background: deep blue-black
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x12, 0x18);

    /// Primary: ice blue
    pub const PRIMARY: Color = Color::Rgb(0x5c, 0xc8, 0xff);

    /// Secondary: violet
    pub const SECONDARY: Color = Color::Rgb(0xb4, 0x8e, 0xff);

    /// Accent: amber
    pub const ACCENT: Color = Color::Rgb(0xff, 0xc1, 0x4e);

    /// Text: soft white
    pub const TEXT: Color = Color::Rgb(0xdc, 0xde, 0xe4);

    /// Dim: muted slate
    pub const DIM: Color = Color::Rgb(0x4a, 0x4f, 0x5e);

    /// Success: green
    pub const SUCCESS: Color = Color::Rgb(0x4e, 0xd3, 0x64);

    /// Warning: orange
    pub const WARNING: Color = Color::Rgb(0xff, 0x9e, 0x3d);

    /// Error: red
    pub const ERROR: Color = Color::Rgb(0xff, 0x45, 0x5f);

    /// Slightly lighter background for panels
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1a, 0x1d, 0x26);

    /// Border color (dim blue)
    pub const BORDER: Color = Color::Rgb(0x2e, 0x54, 0x6e);

    // =========================================================================
    // Style Helpers
    // =========================================================================

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Warning style
    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent text style
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for list items (normal state)
    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Style for list items (selected/highlighted)
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Pinned recommended resource
    pub fn recommended() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Keybinding description style
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Progress bar style
    pub fn progress_bar() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .bg(Self::BACKGROUND_LIGHT)
    }

    // =========================================================================
    // Domain Styles
    // =========================================================================

    /// Resolution bucket indicator
    pub fn resolution(resolution: Resolution) -> Style {
        match resolution {
            Resolution::FourK => Style::default()
                .fg(Self::SECONDARY)
                .add_modifier(Modifier::BOLD),
            Resolution::FullHd => Style::default().fg(Self::PRIMARY),
            Resolution::TwoK => Style::default().fg(Self::SUCCESS),
            Resolution::Other => Style::default().fg(Self::DIM),
        }
    }

    /// Seeder count health (>10 healthy, >0 thin, 0 dead)
    pub fn seeders(count: i64) -> Style {
        if count > 10 {
            Style::default().fg(Self::SUCCESS)
        } else if count > 0 {
            Style::default().fg(Self::WARNING)
        } else {
            Style::default().fg(Self::ERROR)
        }
    }

    /// Download status indicator
    pub fn download_status(status: DownloadStatus) -> Style {
        match status {
            DownloadStatus::Downloading => Style::default().fg(Self::PRIMARY),
            DownloadStatus::Pending => Style::default().fg(Self::ACCENT),
            DownloadStatus::Paused => Style::default().fg(Self::WARNING),
            DownloadStatus::Completed => Style::default().fg(Self::SUCCESS),
            DownloadStatus::Failed => Style::default().fg(Self::ERROR),
        }
    }

    /// Release group tag
    pub fn release_group() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// File size indicator
    pub fn file_size() -> Style {
        Style::default().fg(Self::DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeders_thresholds() {
        assert_eq!(Theme::seeders(50), Style::default().fg(Theme::SUCCESS));
        assert_eq!(Theme::seeders(11), Style::default().fg(Theme::SUCCESS));
        assert_eq!(Theme::seeders(10), Style::default().fg(Theme::WARNING));
        assert_eq!(Theme::seeders(1), Style::default().fg(Theme::WARNING));
        assert_eq!(Theme::seeders(0), Style::default().fg(Theme::ERROR));
    }

    #[test]
    fn test_resolution_styles_distinct() {
        let four_k = Theme::resolution(Resolution::FourK);
        let other = Theme::resolution(Resolution::Other);
        assert_ne!(four_k, other);
    }

    #[test]
    fn test_download_status_styles() {
        assert_eq!(
            Theme::download_status(DownloadStatus::Completed),
            Style::default().fg(Theme::SUCCESS)
        );
        assert_eq!(
            Theme::download_status(DownloadStatus::Failed),
            Style::default().fg(Theme::ERROR)
        );
    }
}
