//! LikedPane: the Home workspace, the signed-in user's liked songs.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_focused_border, style_muted, style_unfocused_border, C_LOADING, C_TEXT_DIM},
    widgets::song_list::SongList,
};

pub const EMPTY_TEXT: &str = "No liked songs";

pub struct LikedPane {
    list: SongList,
}

impl LikedPane {
    pub fn new() -> Self {
        Self {
            list: SongList::new(),
        }
    }
}

impl Default for LikedPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LikedPane {
    fn id(&self) -> ComponentId {
        ComponentId::LikedPane
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if self.list.handle_nav(key.code, state.liked.len()) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Char('r') => vec![Action::ReloadLiked],
            KeyCode::Enter => match self.list.selected_song(&state.liked) {
                Some(song) => vec![Action::Play(ComponentId::LikedPane, song.clone())],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let border = if focused {
            style_focused_border()
        } else {
            style_unfocused_border()
        };

        let status = if state.liked_loading {
            Span::styled(" loading… ", Style::default().fg(C_LOADING))
        } else if let Some(at) = state.liked_fetched_at {
            Span::styled(
                format!(" updated {} ", at.format("%H:%M")),
                Style::default().fg(C_TEXT_DIM),
            )
        } else {
            Span::raw("")
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Liked Songs ", border))
            .title(Line::from(status).right_aligned());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.liked.is_empty() {
            let text = if state.liked_loading {
                "Loading…"
            } else {
                EMPTY_TEXT
            };
            let line = Line::from(Span::styled(text, style_muted()));
            frame.render_widget(Paragraph::new(line).centered(), inner);
            return;
        }

        self.list
            .draw(frame, inner, &state.liked, focused, state.current_song_id());
    }
}
