use quillcheck_engine::{IssueType, Segment};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus};

pub fn ui(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    if app.show_home {
        draw_home(f, outer[0]);
        draw_status_line(f, outer[1], app, "Press any key to start editing");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(outer[0]);

    draw_editor(f, chunks[0], app);
    draw_panel(f, chunks[1], app);
    draw_status_line(
        f,
        outer[1],
        app,
        "Tab: switch | Enter: apply | ^A: apply all | ^Y: copy | ^X: clear | Esc: home | ^Q: quit",
    );
}

fn draw_editor(f: &mut Frame, area: Rect, app: &mut App) {
    let markup = app.session.markup();
    let lines = segment_lines(&markup.segments());

    let title = match app.focus {
        Focus::Editor => "Editor ●",
        Focus::Panel => "Editor",
    };
    let editor = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(editor, area);

    if app.focus == Focus::Editor {
        let (row, col) = caret_screen_position(&app.session.text(), app.session.caret());
        let x = (area.x + 1 + col).min(area.x + area.width.saturating_sub(2));
        let y = (area.y + 1 + row).min(area.y + area.height.saturating_sub(2));
        f.set_cursor_position(Position::new(x, y));
    }
}

fn draw_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .session
        .panel()
        .entries()
        .iter()
        .map(|entry| {
            let header = Line::from(vec![
                Span::styled(
                    entry.issue_type.label().to_string(),
                    issue_style(Some(entry.issue_type)),
                ),
                Span::raw(" - "),
                Span::raw(entry.message.clone()),
            ]);
            let suggestion = Line::from(match &entry.suggestion {
                Some(s) => vec![Span::raw("  → "), Span::raw(s.clone())],
                None => vec![Span::raw("  (no suggestion)")],
            });
            ListItem::new(vec![header, suggestion])
        })
        .collect();

    let title = match app.focus {
        Focus::Panel => format!("Corrections ({}) ●", app.session.panel().count()),
        Focus::Editor => format!("Corrections ({})", app.session.panel().count()),
    };
    let panel = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(panel, area, &mut app.panel_state);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App, help: &str) {
    let mut text = match &app.status {
        Some(status) => status.clone(),
        None => help.to_string(),
    };
    if app.session.is_checking() {
        text.push_str("  (checking…)");
    }
    f.render_widget(Paragraph::new(Line::from(text)), area);
}

fn draw_home(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "quillcheck",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Type in the editor; after a pause the text is sent to the"),
        Line::from("grammar-check service and issues are highlighted inline."),
        Line::from(""),
        Line::from("misspelling (red) · grammar (yellow) · other (blue)"),
        Line::from(""),
        Line::from("Tab      switch between editor and corrections"),
        Line::from("Enter    apply the selected suggestion"),
        Line::from("Ctrl-A   apply all suggestions"),
        Line::from("Ctrl-Y   copy text to clipboard"),
        Line::from("Ctrl-X   clear document and corrections"),
        Line::from("Esc      back to this screen"),
        Line::from("Ctrl-Q   quit"),
    ];

    let home = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(home, area);
}

fn issue_style(issue: Option<IssueType>) -> Style {
    match issue {
        None => Style::default(),
        Some(IssueType::Misspelling) => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED),
        Some(IssueType::Grammar) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::UNDERLINED),
        Some(IssueType::Other) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
    }
}

/// Convert styled runs into terminal lines, splitting runs on newlines while
/// keeping each piece's style.
fn segment_lines(segments: &[Segment]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for segment in segments {
        let style = issue_style(segment.issue);
        let mut parts = segment.text.split('\n');
        if let Some(first) = parts.next()
            && !first.is_empty()
        {
            current.push(Span::styled(first.to_string(), style));
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
        }
    }

    lines.push(Line::from(current));
    lines
}

/// Caret (row, column) within the text, column in chars. The editor pane does
/// not wrap, so this maps straight onto screen cells inside the border.
fn caret_screen_position(text: &str, caret: usize) -> (u16, u16) {
    let before = &text[..caret.min(text.len())];
    let row = before.matches('\n').count();
    let col = match before.rfind('\n') {
        Some(i) => before[i + 1..].chars().count(),
        None => before.chars().count(),
    };
    (row.min(u16::MAX as usize) as u16, col.min(u16::MAX as usize) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> Segment {
        Segment {
            text: text.to_string(),
            issue: None,
        }
    }

    fn flagged(text: &str) -> Segment {
        Segment {
            text: text.to_string(),
            issue: Some(IssueType::Misspelling),
        }
    }

    #[test]
    fn test_segment_lines_single_line() {
        let lines = segment_lines(&[plain("The "), flagged("qick"), plain(" fox")]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content, "qick");
    }

    #[test]
    fn test_segment_lines_splits_on_newlines() {
        let lines = segment_lines(&[plain("one\ntwo"), flagged("x"), plain("\nthree")]);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans[0].content, "one");
        assert_eq!(lines[1].spans[0].content, "two");
        assert_eq!(lines[1].spans[1].content, "x");
        assert_eq!(lines[2].spans[0].content, "three");
    }

    #[test]
    fn test_segment_lines_trailing_newline_yields_empty_line() {
        let lines = segment_lines(&[plain("end\n")]);

        assert_eq!(lines.len(), 2);
        assert!(lines[1].spans.is_empty());
    }

    #[test]
    fn test_segment_lines_empty_input() {
        let lines = segment_lines(&[]);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].spans.is_empty());
    }

    #[test]
    fn test_caret_screen_position() {
        assert_eq!(caret_screen_position("", 0), (0, 0));
        assert_eq!(caret_screen_position("abc", 2), (0, 2));
        assert_eq!(caret_screen_position("ab\ncd", 3), (1, 0));
        assert_eq!(caret_screen_position("ab\ncd", 5), (1, 2));
        // Columns count chars, not bytes.
        assert_eq!(caret_screen_position("é", 2), (0, 1));
    }
}
