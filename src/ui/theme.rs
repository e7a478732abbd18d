//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme; change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── header ─────────────────────────────────────────────────
    /// Header background; `scrolled` mirrors the blurred, translucent state.
    pub fn header_style(scrolled: bool) -> Style {
        if scrolled {
            Style::default().bg(Color::Rgb(40, 42, 54)).fg(Color::White)
        } else {
            Style::default().bg(Color::Reset).fg(Color::White)
        }
    }

    pub fn brand_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn link_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_link_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn focused_link_style() -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    // ── page ───────────────────────────────────────────────────
    pub fn hero_title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn lead_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn heading_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn card_style() -> Style {
        Style::default().fg(Color::White)
    }

    /// Content that has not been revealed yet.
    pub fn hidden_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn scroll_top_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
