//! SearchPane: search box over the paginated result list.
//!
//! Typing emits `QueryChanged` on every keystroke; the controller debounces.
//! When the viewport bottom gets within half a viewport of the last result,
//! the pane asks for the next page.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_focused_border, style_muted, style_secondary, style_unfocused_border, C_LOADING},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        song_list::SongList,
    },
};

pub const PLACEHOLDER: &str = "Type a song name to search";

pub struct SearchPane {
    input: FilterInput,
    list: SongList,
    /// Query and result count at the last sync; a new query or a shorter
    /// list means the results were replaced.
    seen_query: String,
    seen_len: usize,
}

impl SearchPane {
    pub fn new() -> Self {
        Self {
            input: FilterInput::new("song name"),
            list: SongList::new(),
            seen_query: String::new(),
            seen_len: 0,
        }
    }

    /// Whether keys currently go to the search box.
    pub fn is_typing(&self) -> bool {
        self.input.is_active()
    }

    fn sync(&mut self, state: &AppState) {
        let search = &state.search;
        if search.query != self.seen_query || search.results.len() < self.seen_len {
            self.list.reset();
        }
        self.seen_query.clone_from(&search.query);
        self.seen_len = search.results.len();
    }

    fn wants_more(&self, state: &AppState) -> bool {
        let search = &state.search;
        !search.results.is_empty()
            && search.has_more
            && !search.is_loading
            && self.list.height() > 0
            && self.list.near_end(search.results.len())
    }

    fn load_more_if_near_end(&self, state: &AppState) -> Vec<Action> {
        if self.wants_more(state) {
            vec![Action::LoadMore]
        } else {
            Vec::new()
        }
    }
}

impl Default for SearchPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SearchPane {
    fn id(&self) -> ComponentId {
        ComponentId::SearchPane
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        self.sync(state);
        let len = state.search.results.len();

        if self.input.is_active() {
            // Arrows still move the list while typing.
            if matches!(key.code, KeyCode::Up | KeyCode::Down) {
                self.list.handle_nav(key.code, len);
                return self.load_more_if_near_end(state);
            }
            return match self.input.handle_key(key) {
                FilterAction::Changed(text) => {
                    self.list.reset();
                    vec![Action::QueryChanged(text)]
                }
                FilterAction::Confirmed | FilterAction::Cancelled | FilterAction::None => {
                    Vec::new()
                }
            };
        }

        if self.list.handle_nav(key.code, len) {
            return self.load_more_if_near_end(state);
        }

        match key.code {
            KeyCode::Char('/') => {
                self.input.activate();
                Vec::new()
            }
            KeyCode::Char('r') => vec![Action::Refresh],
            KeyCode::Enter => match self.list.selected_song(&state.search.results) {
                Some(song) => vec![Action::Play(ComponentId::SearchPane, song.clone())],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        self.sync(state);
        // Catches lists that never filled the viewport, so no key press
        // would have moved the bottom.
        self.load_more_if_near_end(state)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);
        let search = &state.search;

        let border = if focused {
            style_focused_border()
        } else {
            style_unfocused_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Search ", border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.input.draw(frame, rows[0]);

        if search.results.is_empty() {
            let placeholder = Paragraph::new(Line::from(Span::styled(PLACEHOLDER, style_muted())))
                .centered();
            let middle = Rect {
                y: rows[1].y + rows[1].height / 2,
                height: rows[1].height.min(1),
                ..rows[1]
            };
            frame.render_widget(placeholder, middle);
        } else {
            self.list.draw(
                frame,
                rows[1],
                &search.results,
                focused,
                state.current_song_id(),
            );
        }

        frame.render_widget(Paragraph::new(footer(state)), rows[2]);
    }
}

fn footer(state: &AppState) -> Line<'static> {
    let search = &state.search;
    if search.is_refreshing {
        return Line::from(Span::styled(" Refreshing…", Style::default().fg(C_LOADING)));
    }
    if search.is_loading {
        return Line::from(Span::styled(" Loading…", Style::default().fg(C_LOADING)));
    }
    if search.results.is_empty() {
        return Line::default();
    }
    let mut text = format!(
        " {} songs · page {}",
        search.results.len(),
        search.current_page + 1
    );
    if !search.has_more {
        text.push_str(" · end of results");
    }
    Line::from(Span::styled(text, style_secondary()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use tune_core::song::Song;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn song(id: u64) -> Song {
        Song {
            id,
            title: format!("Song {id}"),
            artist: None,
            thumbnail: None,
            duration: 200,
        }
    }

    fn state_with(n: u64, has_more: bool) -> AppState {
        let mut state = AppState::default();
        state.search.results = (1..=n).map(song).collect();
        state.search.has_more = has_more;
        state
    }

    /// Render once so the pane learns its viewport height.
    fn render(pane: &mut SearchPane, state: &AppState, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                pane.draw(f, area, true, state)
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_typing_emits_query_changes() {
        let mut pane = SearchPane::new();
        let state = AppState::default();

        assert!(pane.handle_key(key(KeyCode::Char('/')), &state).is_empty());
        assert!(pane.is_typing());

        let actions = pane.handle_key(key(KeyCode::Char('a')), &state);
        assert_eq!(actions, vec![Action::QueryChanged("a".to_string())]);

        // 'r' is text while typing, not refresh.
        let actions = pane.handle_key(key(KeyCode::Char('r')), &state);
        assert_eq!(actions, vec![Action::QueryChanged("ar".to_string())]);
    }

    #[test]
    fn test_esc_clears_query_then_leaves_box() {
        let mut pane = SearchPane::new();
        let state = AppState::default();
        pane.handle_key(key(KeyCode::Char('/')), &state);
        pane.handle_key(key(KeyCode::Char('x')), &state);

        let actions = pane.handle_key(key(KeyCode::Esc), &state);
        assert_eq!(actions, vec![Action::QueryChanged(String::new())]);
        assert!(pane.is_typing());

        assert!(pane.handle_key(key(KeyCode::Esc), &state).is_empty());
        assert!(!pane.is_typing());
    }

    #[test]
    fn test_enter_plays_selected_result() {
        let mut pane = SearchPane::new();
        let state = state_with(3, false);
        pane.handle_key(key(KeyCode::Down), &state);

        let actions = pane.handle_key(key(KeyCode::Enter), &state);
        assert_eq!(actions, vec![Action::Play(ComponentId::SearchPane, song(2))]);
    }

    #[test]
    fn test_refresh_key() {
        let mut pane = SearchPane::new();
        let actions = pane.handle_key(key(KeyCode::Char('r')), &AppState::default());
        assert_eq!(actions, vec![Action::Refresh]);
    }

    #[test]
    fn test_scrolling_near_end_loads_more() {
        let mut pane = SearchPane::new();
        let state = state_with(40, true);
        // 2 border rows, input and footer leave 10 list rows.
        render(&mut pane, &state, 14);

        assert!(pane.handle_key(key(KeyCode::Down), &state).is_empty());
        assert!(pane.tick(&state).is_empty());

        let mut actions = Vec::new();
        for _ in 0..40 {
            actions = pane.handle_key(key(KeyCode::Down), &state);
            if !actions.is_empty() {
                break;
            }
        }
        assert_eq!(actions, vec![Action::LoadMore]);
    }

    #[test]
    fn test_no_load_more_when_exhausted_or_loading() {
        let mut pane = SearchPane::new();
        let mut state = state_with(3, false);
        render(&mut pane, &state, 14);
        assert!(pane.tick(&state).is_empty());

        state.search.has_more = true;
        state.search.is_loading = true;
        assert!(pane.tick(&state).is_empty());

        state.search.is_loading = false;
        assert_eq!(pane.tick(&state), vec![Action::LoadMore]);
    }

    #[test]
    fn test_empty_list_shows_placeholder() {
        let mut pane = SearchPane::new();
        let screen = render(&mut pane, &AppState::default(), 10);
        assert!(screen.contains(PLACEHOLDER));
        // An empty list never asks for more.
        assert!(pane.tick(&AppState::default()).is_empty());
    }

    #[test]
    fn test_loading_footer() {
        let mut pane = SearchPane::new();
        let mut state = state_with(2, true);
        state.search.is_loading = true;
        let screen = render(&mut pane, &state, 10);
        assert!(screen.contains("Loading…"));
    }

    #[test]
    fn test_new_query_resets_selection() {
        let mut pane = SearchPane::new();
        let mut state = state_with(10, false);
        render(&mut pane, &state, 14);
        pane.handle_key(key(KeyCode::Char('G')), &state);
        assert_eq!(pane.list.selected, 9);

        state.search.query = "new".to_string();
        pane.tick(&state);
        assert_eq!(pane.list.selected, 0);
    }
}
