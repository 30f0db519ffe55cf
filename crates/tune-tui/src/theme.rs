//! Color palette and style constants for the tune TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

// Text, brightest to faintest.
pub const C_TEXT: Color = Color::Rgb(226, 222, 210);
pub const C_TEXT_DIM: Color = Color::Rgb(138, 134, 124);
pub const C_TEXT_FAINT: Color = Color::Rgb(84, 82, 78);

pub const C_NOW_PLAYING: Color = Color::Rgb(96, 204, 180);
pub const C_HEART: Color = Color::Rgb(240, 98, 128);
pub const C_LOADING: Color = Color::Rgb(236, 178, 92);

pub const C_BORDER: Color = Color::Rgb(46, 48, 52);
pub const C_FOCUS: Color = Color::Rgb(96, 164, 220);
pub const C_RULE: Color = Color::Rgb(38, 40, 44);
pub const C_CURSOR_BG: Color = Color::Rgb(30, 38, 46);
pub const C_ROW_NUMBER: Color = Color::Rgb(100, 104, 112);

pub const C_QUERY_FG: Color = Color::Rgb(244, 208, 120);
pub const C_QUERY_BG: Color = Color::Rgb(22, 26, 30);
pub const C_MODAL_BG: Color = Color::Rgb(16, 20, 24);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_TEXT)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_TEXT_DIM)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_TEXT_FAINT)
}

pub fn style_playing() -> Style {
    Style::default().fg(C_NOW_PLAYING)
}

pub fn style_selected() -> Style {
    Style::default().bg(C_CURSOR_BG).fg(C_TEXT)
}

pub fn style_selected_focused() -> Style {
    Style::default()
        .bg(C_CURSOR_BG)
        .fg(C_TEXT)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_FOCUS)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_BORDER)
}

pub fn style_title() -> Style {
    Style::default().fg(C_TEXT).add_modifier(Modifier::BOLD)
}
