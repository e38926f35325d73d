//! Theme and Styling
//!
//! Defines colors and styles for the TUI interface.

use crate::dashboard::PaletteColor;
use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (cyan/teal)
    pub const ACCENT: Color = Color::Rgb(0, 212, 255);

    /// Secondary accent (green)
    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    /// Warning color (yellow/amber)
    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    /// Error color (red)
    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    // === Text Colors ===

    /// Primary text color
    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);

    /// Secondary text color (muted)
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);

    /// Dimmed text
    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    // === Border Colors ===

    /// Default border color
    pub const BORDER: Color = Color::Rgb(51, 51, 51);

    /// Focused border color
    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Chart Colors ===

    /// Bar color of the top-skills chart
    pub const CHART_BAR: Color = Color::Rgb(0xFF, 0x8C, 0x00);

    /// Map a palette slot to a terminal color.
    pub fn palette(color: PaletteColor) -> Color {
        let (r, g, b) = color.rgb();
        Color::Rgb(r, g, b)
    }

    // === Styles ===

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Secondary/muted text style
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Dimmed text style
    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Title style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Heading style
    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Default border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border style
    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Row style for a fit label cell
    pub fn fit_label(label: &str) -> Style {
        match label {
            "Fit" => Style::default().fg(Self::SUCCESS),
            "Not Fit" => Style::default().fg(Self::ERROR),
            _ => Style::default().fg(Self::TEXT_SECONDARY),
        }
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Shortcut description style
    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Complete indicator
    pub fn complete() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Pending indicator
    pub fn pending() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Input placeholder style
    pub fn placeholder() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }
}

/// Progress stage icons
pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const ACTIVE: &'static str = "●";
    pub const PENDING: &'static str = "○";
    pub const ERROR: &'static str = "✗";
    pub const ARROW: &'static str = "→";
    pub const CURSOR: &'static str = "▌";
    pub const SELECTED: &'static str = "▶";
    pub const BLOCK: &'static str = "█";
}
