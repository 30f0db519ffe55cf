//! FilterInput: wraps tui-input for the search box.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_QUERY_BG, C_QUERY_FG, C_TEXT_DIM, C_TEXT_FAINT};

#[derive(Debug, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
    None,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc behaviour:
    ///   - If the input has text: clear it and emit `Changed("")`, staying open
    ///   - If the input is already empty: deactivate and emit `Cancelled`
    ///
    /// Cursor movement that leaves the text as it was emits `None`.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    FilterAction::Changed(String::new())
                } else {
                    self.deactivate();
                    FilterAction::Cancelled
                }
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() == before {
                    FilterAction::None
                } else {
                    FilterAction::Changed(self.input.value().to_string())
                }
            }
        }
    }

    /// Render the input bar into `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let prompt_style = if self.active {
            Style::default().fg(C_QUERY_FG)
        } else {
            Style::default().fg(C_TEXT_DIM)
        };
        let body = if value.is_empty() {
            Span::styled(self.placeholder.clone(), Style::default().fg(C_TEXT_FAINT))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(visible, Style::default().fg(C_QUERY_FG))
        };

        let paragraph = Paragraph::new(Line::from(vec![Span::styled("/ ", prompt_style), body]))
            .style(Style::default().bg(C_QUERY_BG));
        frame.render_widget(paragraph, area);

        if self.active && area.width > 2 {
            let cursor_x = area.x + 2 + self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}
