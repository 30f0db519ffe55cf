//! Now-playing bar and modal.
//!
//! The bar is always visible at the bottom of the screen. The modal opens on
//! top of everything with `p` and takes all keys until closed.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tune_core::now_playing::NowPlaying;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_muted, style_playing, style_secondary, style_title, C_FOCUS, C_HEART,
        C_MODAL_BG, C_TEXT_DIM,
    },
    widgets::progress_bar::draw_progress,
};

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 11;

pub struct NowPlayingModal;

impl NowPlayingModal {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NowPlayingModal {
    fn default() -> Self {
        Self::new()
    }
}

fn play_icon(now: &NowPlaying) -> &'static str {
    if now.is_playing {
        "▶"
    } else {
        "❚❚"
    }
}

fn heart(now: &NowPlaying) -> Span<'static> {
    if now.is_liked {
        Span::styled("♥", Style::default().fg(C_HEART))
    } else {
        Span::styled("♡", Style::default().fg(C_TEXT_DIM))
    }
}

fn elapsed_and_total(now: &NowPlaying) -> (f64, f64) {
    let total = now.song.as_ref().map(|s| s.duration as f64).unwrap_or(0.0);
    (now.elapsed.as_secs_f64(), total)
}

/// Draw the two-row bar: song line, then progress.
pub fn draw_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let now = &state.now;
    let Some(song) = &now.song else {
        let line = Line::from(Span::styled(
            " Nothing playing. Pick a song and press Enter.",
            style_muted(),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let line = Line::from(vec![
        Span::styled(format!(" {} ", play_icon(now)), style_playing()),
        Span::styled(song.title.clone(), style_title()),
        Span::styled(format!(" · {} ", song.display_artist()), style_secondary()),
        heart(now),
    ]);
    frame.render_widget(Paragraph::new(line), rows[0]);

    let (elapsed, total) = elapsed_and_total(now);
    let bar_area = Rect {
        x: rows[1].x + 1,
        width: rows[1].width.saturating_sub(2),
        ..rows[1]
    };
    draw_progress(frame, bar_area, now.progress(), elapsed, total);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Component for NowPlayingModal {
    fn id(&self) -> ComponentId {
        ComponentId::NowPlaying
    }

    /// Takes every key while open; anything unbound is swallowed.
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Char(' ') => vec![Action::TogglePlayPause],
            KeyCode::Char('l') => vec![Action::ToggleLike],
            KeyCode::Esc | KeyCode::Char('p') => vec![Action::CloseNowPlaying],
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let modal = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
        frame.render_widget(Clear, modal);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_FOCUS))
            .title(Span::styled(
                " Now Playing ",
                Style::default().fg(C_FOCUS).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(C_MODAL_BG));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let now = &state.now;
        let Some(song) = &now.song else {
            let line = Line::from(Span::styled("Nothing playing", style_muted()));
            frame.render_widget(Paragraph::new(line).centered(), inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // artist
                Constraint::Length(1),
                Constraint::Length(1), // progress
                Constraint::Length(1),
                Constraint::Length(1), // controls
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(song.title.clone(), style_title()))).centered(),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                song.display_artist().to_string(),
                style_secondary(),
            )))
            .centered(),
            rows[1],
        );

        let (elapsed, total) = elapsed_and_total(now);
        draw_progress(frame, rows[3], now.progress(), elapsed, total);

        let play_label = if now.is_playing { "playing" } else { "paused" };
        let like_label = if now.is_liked { " liked" } else { " like" };
        let controls = Line::from(vec![
            Span::styled(
                format!("[Space] {} {}", play_icon(now), play_label),
                style_playing(),
            ),
            Span::raw("    "),
            Span::styled("[l] ", style_secondary()),
            heart(now),
            Span::styled(like_label, style_secondary()),
        ]);
        frame.render_widget(Paragraph::new(controls).centered(), rows[5]);
    }
}
