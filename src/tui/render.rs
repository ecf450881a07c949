//! Drawing the chat screen

use super::app::{App, Mode, NoticeLevel};
use crate::input::SUGGESTED_PROMPTS;
use crate::query::QueryService;
use crate::state_machine::Role;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE: &str = "ScholarRAG";
const THINKING: &str = "Thinking...";
const MAX_INPUT_ROWS: u16 = 6;
const KEY_HINTS: &str = "Enter send · Shift+Enter newline · Ctrl+O attach · Ctrl+L clear · Esc quit";

pub fn draw<Q: QueryService + 'static>(frame: &mut Frame, app: &App<Q>) {
    let area = frame.area();
    let conversation = app.conversation();
    let file = conversation.input().file();

    let input_text = match app.mode() {
        Mode::Compose => conversation.input().text(),
        Mode::Attach { path } => path.as_str(),
    };
    let inner_width = area.width.saturating_sub(2).max(1);
    let input_rows = u16::try_from(wrap(input_text, inner_width).len())
        .unwrap_or(MAX_INPUT_ROWS)
        .clamp(1, MAX_INPUT_ROWS);

    let [header, body, chip, input, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(u16::from(file.is_some())),
        Constraint::Length(input_rows + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header, app.endpoint(), conversation.session_id());
    draw_log(frame, body, app);

    if let Some(file) = file {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", file.file_name()),
                Style::default().bg(Color::Blue).fg(Color::White),
            ),
            Span::raw(if file.is_empty() {
                " empty  ".to_string()
            } else {
                format!(" {} bytes  ", file.len())
            }),
            Span::styled("Ctrl+X remove", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), chip);
    }

    let busy = conversation.is_busy();
    let can_submit = conversation.input().can_submit(busy);
    draw_input(frame, input, app.mode(), input_text, busy, can_submit);

    let status_line = match app.notice() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Warning => Color::Yellow,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(notice.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(status_line), status);
}

fn draw_header(frame: &mut Frame, area: Rect, endpoint: &str, session_id: Option<&str>) {
    let mut spans = vec![
        Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(endpoint.to_string(), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(session_id) = session_id {
        spans.push(Span::styled(
            format!("  session {session_id}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_log<Q: QueryService + 'static>(frame: &mut Frame, area: Rect, app: &App<Q>) {
    let conversation = app.conversation();
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    let width = inner.width.max(1);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in conversation.messages() {
        let (label, color) = match message.role {
            Role::User => ("You", Color::Cyan),
            Role::Assistant => (TITLE, Color::Magenta),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.extend(wrap(&message.content, width).into_iter().map(Line::from));
        lines.push(Line::default());
    }

    if conversation.is_busy() {
        lines.push(Line::from(THINKING.italic().fg(Color::DarkGray)));
    }

    if conversation.suggestions_visible() {
        for (i, suggestion) in SUGGESTED_PROMPTS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("F{} ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(suggestion.title, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(suggestion.label, Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    // Keep the newest lines in view
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let scroll = total.saturating_sub(inner.height);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn draw_input(
    frame: &mut Frame,
    area: Rect,
    mode: &Mode,
    text: &str,
    busy: bool,
    can_submit: bool,
) {
    let title = match mode {
        Mode::Compose if busy => "Message (waiting for reply)",
        Mode::Compose if can_submit => "Message (Enter to send)",
        Mode::Compose => "Message",
        Mode::Attach { .. } => "Attach file (path, Enter to load, Esc to cancel)",
    };
    // Dimmed while Enter would do nothing
    let border = if can_submit || matches!(mode, Mode::Attach { .. }) {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    let inner = block.inner(area);
    let rows = wrap(text, inner.width.max(1));

    // Show the tail when the text outgrows the box
    let skip = rows.len().saturating_sub(usize::from(inner.height));
    let visible: Vec<Line<'static>> = rows.iter().skip(skip).cloned().map(Line::from).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);

    if let Some(last) = rows.last() {
        let row = u16::try_from(rows.len() - skip - 1).unwrap_or(0);
        let col = u16::try_from(last.width()).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            inner.x + col.min(inner.width.saturating_sub(1)),
            inner.y + row,
        ));
    }
}

/// Hard-wrap text to `width` terminal columns, keeping explicit newlines.
/// A wide character that would straddle the edge starts the next row.
fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let mut row = String::new();
        let mut used = 0;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            row.push(c);
            used += w;
        }
        rows.push(row);
    }
    rows
}
