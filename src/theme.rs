//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes.

use crate::workflow::{BiasLevel, Verdict};
use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Article list --
    pub article_title: Style,
    pub article_selected: Style,
    pub article_meta: Style,
    pub article_date: Style,
    pub analyzed_marker: Style,
    pub filter_active: Style,

    // -- Detail --
    pub detail_heading: Style,
    pub detail_body: Style,
    pub detail_metadata: Style,
    pub section_title: Style,
    pub error_text: Style,

    // -- Analysis --
    pub gauge_credibility: Style,
    pub gauge_bias: Style,
    pub gauge_bias_high: Style,
    pub verdict_factual: Style,
    pub verdict_misleading: Style,
    pub verdict_false: Style,
    pub verdict_unknown: Style,
    pub bias_neutral: Style,
    pub bias_moderate: Style,
    pub bias_high: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub input_text: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_meta: Style::default().fg(Color::Cyan),
            article_date: Style::default().fg(Color::DarkGray),
            analyzed_marker: Style::default().fg(Color::Green),
            filter_active: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),

            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            detail_metadata: Style::default().fg(Color::DarkGray),
            section_title: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            error_text: Style::default().fg(Color::Red),

            gauge_credibility: Style::default().fg(Color::Green).bg(Color::Black),
            gauge_bias: Style::default().fg(Color::Yellow).bg(Color::Black),
            gauge_bias_high: Style::default().fg(Color::Red).bg(Color::Black),
            verdict_factual: Style::default().fg(Color::Black).bg(Color::Green),
            verdict_misleading: Style::default().fg(Color::Black).bg(Color::Yellow),
            verdict_false: Style::default().fg(Color::White).bg(Color::Red),
            verdict_unknown: Style::default().fg(Color::White).bg(Color::DarkGray),
            bias_neutral: Style::default().fg(Color::Green),
            bias_moderate: Style::default().fg(Color::Yellow),
            bias_high: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            input_text: Style::default().fg(Color::White),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::Blue).fg(Color::White),
            article_meta: Style::default().fg(Color::Blue),
            article_date: Style::default().fg(Color::DarkGray),
            analyzed_marker: Style::default().fg(Color::Green),
            filter_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            detail_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default().fg(Color::Black),
            detail_metadata: Style::default().fg(Color::DarkGray),
            section_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            error_text: Style::default().fg(Color::Red),

            gauge_credibility: Style::default().fg(Color::Green).bg(Color::White),
            gauge_bias: Style::default().fg(Color::Magenta).bg(Color::White),
            gauge_bias_high: Style::default().fg(Color::Red).bg(Color::White),
            verdict_factual: Style::default().fg(Color::White).bg(Color::Green),
            verdict_misleading: Style::default().fg(Color::Black).bg(Color::Yellow),
            verdict_false: Style::default().fg(Color::White).bg(Color::Red),
            verdict_unknown: Style::default().fg(Color::Black).bg(Color::Gray),
            bias_neutral: Style::default().fg(Color::Green),
            bias_moderate: Style::default().fg(Color::Magenta),
            bias_high: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            input_text: Style::default().fg(Color::Black),
        }
    }

    pub fn verdict(&self, verdict: Verdict) -> Style {
        match verdict {
            Verdict::Factual => self.verdict_factual,
            Verdict::Misleading => self.verdict_misleading,
            Verdict::False => self.verdict_false,
            Verdict::Unknown => self.verdict_unknown,
        }
    }

    pub fn bias_level(&self, level: BiasLevel) -> Style {
        match level {
            BiasLevel::Neutral => self.bias_neutral,
            BiasLevel::Moderate => self.bias_moderate,
            BiasLevel::High => self.bias_high,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
