//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warnings and stale data.
    pub warning: Color,
    /// Color for errors.
    pub error: Color,
    /// Color for live/healthy readouts.
    pub live: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
    /// Horizon band colors for values above the baseline, faint to strong.
    pub band_above: [Color; 4],
    /// Horizon band colors for values below the baseline, faint to strong.
    pub band_below: [Color; 4],
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            error: Color::Red,
            live: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            band_above: [
                Color::Rgb(0x9e, 0xd8, 0x9e),
                Color::Rgb(0x60, 0xb8, 0x60),
                Color::Rgb(0x2e, 0x8b, 0x2e),
                Color::Rgb(0x0e, 0x5c, 0x0e),
            ],
            band_below: [
                Color::Rgb(0x9e, 0xb8, 0xd8),
                Color::Rgb(0x60, 0x90, 0xc0),
                Color::Rgb(0x2e, 0x64, 0xa0),
                Color::Rgb(0x0e, 0x3c, 0x78),
            ],
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            error: Color::Red,
            live: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            band_above: [
                Color::Rgb(0xc8, 0xe6, 0xc8),
                Color::Rgb(0x8c, 0xc8, 0x8c),
                Color::Rgb(0x46, 0x9b, 0x46),
                Color::Rgb(0x14, 0x64, 0x14),
            ],
            band_below: [
                Color::Rgb(0xc8, 0xd8, 0xe6),
                Color::Rgb(0x8c, 0xaa, 0xc8),
                Color::Rgb(0x46, 0x78, 0x9b),
                Color::Rgb(0x14, 0x46, 0x78),
            ],
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a horizon band: index 0 is the faintest band.
    pub fn band_style(&self, band: usize, above: bool) -> Style {
        let palette = if above { &self.band_above } else { &self.band_below };
        let color = palette[band.min(palette.len() - 1)];
        Style::default().fg(color)
    }
}
