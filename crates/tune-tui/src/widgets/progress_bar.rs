//! Smooth Unicode progress bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_NOW_PLAYING, C_TEXT_DIM, C_TEXT_FAINT};

/// Render a smooth progress bar in `area`.
/// `progress` is 0.0..=1.0; `elapsed` and `total` are in seconds.
pub fn draw_progress(frame: &mut Frame, area: Rect, progress: f64, elapsed: f64, total: f64) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let left_label = fmt_time(elapsed);
    let right_label = fmt_time(total);
    let label_w = (left_label.len() + right_label.len() + 2) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    let spans = vec![
        Span::styled(format!("{} ", left_label), Style::default().fg(C_TEXT_DIM)),
        Span::styled(bar(progress, bar_w), Style::default().fg(C_NOW_PLAYING)),
        Span::styled(format!(" {}", right_label), Style::default().fg(C_TEXT_FAINT)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `width` cells of fill, 8 eighths per cell.
fn bar(progress: f64, width: usize) -> String {
    const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    let eighths = (progress.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

pub fn fmt_time(secs: f64) -> String {
    if secs < 0.0 {
        return "0:00".to_string();
    }
    let s = secs as u64;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let s = s % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
