//! Status bar: bottom line with the workspace tabs and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Workspace;
use crate::theme::{C_FOCUS, C_QUERY_FG, C_RULE, C_TEXT_DIM, C_TEXT_FAINT};

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_RULE),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(workspace: Workspace, typing: bool, modal: bool) -> &'static str {
    if modal {
        return " Space play/pause  l like  Esc/p close";
    }
    if typing {
        return " type to search  Enter keep  Esc clear+close";
    }
    match workspace {
        Workspace::Home => {
            " ↑↓/jk select  Enter play  Space pause  p now playing  r reload  Tab/1-2 switch  q quit"
        }
        Workspace::Search => {
            " ↑↓/jk select  Enter play  / search  r refresh  Space pause  p now playing  Tab/1-2 switch  q quit"
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, workspace: Workspace, typing: bool, modal: bool) {
    let mut spans = Vec::new();
    for ws in [Workspace::Home, Workspace::Search] {
        let style = if ws == workspace {
            Style::default()
                .fg(C_FOCUS)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_TEXT_DIM)
        };
        spans.push(Span::styled(format!(" {} {} ", ws.hotkey(), ws.label()), style));
    }
    if typing {
        spans.push(Span::styled(
            " SEARCH ",
            Style::default().fg(C_QUERY_FG).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        key_hints(workspace, typing, modal),
        Style::default().fg(C_TEXT_FAINT),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
