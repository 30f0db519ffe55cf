//! Selectable, scrolling list of songs shared by the search and liked panes.

use ratatui::crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tune_core::song::{Song, SongId};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{
    style_default, style_playing, style_secondary, style_selected, style_selected_focused,
    C_ROW_NUMBER,
};
use crate::widgets::progress_bar::fmt_time;

#[derive(Debug, Default)]
pub struct SongList {
    pub selected: usize,
    pub scroll_offset: usize,
    /// Rows available at the last draw.
    height: usize,
}

impl SongList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
        self.ensure_visible();
    }

    pub fn select_down(&mut self, n: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + n).min(len - 1);
        self.ensure_visible();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
        self.ensure_visible();
    }

    /// Jump back to the top, e.g. after the list was replaced.
    pub fn reset(&mut self) {
        self.select_first();
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn page(&self) -> usize {
        self.height.max(1)
    }

    /// Apply a navigation key. Returns `true` if the key was one.
    pub fn handle_nav(&mut self, code: KeyCode, len: usize) -> bool {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.select_down(1, len),
            KeyCode::PageUp => self.select_up(self.page()),
            KeyCode::PageDown => self.select_down(self.page(), len),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(len),
            _ => return false,
        }
        true
    }

    pub fn selected_song<'a>(&self, songs: &'a [Song]) -> Option<&'a Song> {
        songs.get(self.selected)
    }

    /// Whether the viewport bottom is within half a viewport of the list end.
    /// A list that does not fill the viewport counts as near the end.
    pub fn near_end(&self, len: usize) -> bool {
        let bottom = self.scroll_offset + self.height;
        let remaining = len.saturating_sub(bottom);
        remaining * 2 <= self.height
    }

    fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.scroll_offset >= len {
            self.scroll_offset = len.saturating_sub(self.height.max(1));
        }
    }

    fn ensure_visible(&mut self) {
        if self.height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + self.height {
            self.scroll_offset = self.selected + 1 - self.height;
        }
    }

    /// Render `songs` into `area`, one row per song.
    pub fn draw(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        songs: &[Song],
        focused: bool,
        playing: Option<SongId>,
    ) {
        self.height = area.height as usize;
        self.clamp(songs.len());
        self.ensure_visible();

        let width = area.width as usize;
        let end = (self.scroll_offset + self.height).min(songs.len());
        let lines: Vec<Line> = songs[self.scroll_offset.min(end)..end]
            .iter()
            .enumerate()
            .map(|(row, song)| {
                let index = self.scroll_offset + row;
                let is_selected = index == self.selected;
                let is_playing = playing == Some(song.id);
                song_row(song, index, width, is_selected, focused, is_playing)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn song_row(
    song: &Song,
    index: usize,
    width: usize,
    selected: bool,
    focused: bool,
    playing: bool,
) -> Line<'static> {
    let number = format!("{:>3} ", index + 1);
    let marker = if playing { "▶ " } else { "  " };
    let duration = format!(" {:>6}", fmt_time(song.duration as f64));

    let fixed = number.width() + marker.width() + duration.width();
    let text_w = width.saturating_sub(fixed);
    let title_w = (text_w * 3 / 5).max(text_w.min(8));
    let artist_w = text_w.saturating_sub(title_w);

    let title = fit_width(&song.title, title_w);
    let artist = fit_width(song.display_artist(), artist_w);

    let (row_style, title_style) = match (selected, focused) {
        (true, true) => (style_selected_focused(), style_selected_focused()),
        (true, false) => (style_selected(), style_selected()),
        _ if playing => (Style::default(), style_playing()),
        _ => (Style::default(), style_default()),
    };

    Line::from(vec![
        Span::styled(number, Style::default().fg(C_ROW_NUMBER)),
        Span::styled(marker, style_playing()),
        Span::styled(title, title_style),
        Span::styled(artist, style_secondary()),
        Span::styled(duration, style_secondary()),
    ])
    .style(row_style)
}

/// Pad or truncate `s` to exactly `width` terminal columns, ending truncated
/// text with `…`.
pub fn fit_width(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let full = s.width();
    if full <= width {
        let mut out = s.to_string();
        out.push_str(&" ".repeat(width - full));
        return out;
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
