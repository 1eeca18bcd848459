use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quillcheck_client::{CheckClient, CheckError};
use quillcheck_config::Config;
use quillcheck_engine::session::CheckRequest;
use quillcheck_engine::{MatchRecord, Session, Ticket};
use ratatui::widgets::ListState;

use crate::clipboard;

/// Fallback poll interval when no debounce deadline is pending, so check
/// responses arriving over the channel are still drained promptly.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Panel,
}

/// Outcome of one dispatched check, reported from a worker thread.
pub struct CheckOutcome {
    pub ticket: Ticket,
    pub result: Result<Vec<MatchRecord>, CheckError>,
}

pub struct App {
    pub session: Session,
    client: Arc<CheckClient>,
    outcome_tx: Sender<CheckOutcome>,
    outcome_rx: Receiver<CheckOutcome>,
    pub panel_state: ListState,
    pub focus: Focus,
    pub show_home: bool,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, initial_text: Option<String>) -> Result<Self> {
        let client = Arc::new(CheckClient::new(&config.endpoint, &config.language)?);
        let (outcome_tx, outcome_rx) = mpsc::channel();
        let quiet = Duration::from_millis(config.debounce_ms);
        let session = match initial_text {
            Some(text) => Session::with_text(quiet, &text),
            None => Session::new(quiet),
        };

        Ok(Self {
            session,
            client,
            outcome_tx,
            outcome_rx,
            panel_state: ListState::default(),
            focus: Focus::Editor,
            show_home: true,
            status: None,
            should_quit: false,
        })
    }

    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.session
            .time_until_check(now)
            .map_or(IDLE_POLL, |remaining| remaining.min(IDLE_POLL))
    }

    /// Drain check outcomes and fire any due debounce deadline. Called once
    /// per event-loop iteration.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.session.finish_check(outcome.ticket, outcome.result);
            self.sync_panel_selection();
        }
        if let Some(request) = self.session.due_check(now) {
            self.dispatch(request);
        }
    }

    /// Run the blocking check off the interaction thread; the ticket lets the
    /// session refuse the response if it has been superseded by then.
    fn dispatch(&self, request: CheckRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let result = client.check(&request.text);
            let _ = tx.send(CheckOutcome {
                ticket: request.ticket,
                result,
            });
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        self.status = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('y') => self.copy_document(),
                KeyCode::Char('x') => self.clear_document(),
                KeyCode::Char('a') => self.apply_all(),
                _ => {}
            }
            return;
        }

        if self.show_home {
            // Any other key leaves the home screen.
            self.show_home = false;
            return;
        }

        match key.code {
            KeyCode::Esc => self.show_home = true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Editor => Focus::Panel,
                    Focus::Panel => Focus::Editor,
                };
                self.sync_panel_selection();
            }
            _ => match self.focus {
                Focus::Editor => self.handle_editor_key(key, now),
                Focus::Panel => self.handle_panel_key(key, now),
            },
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) => self.session.insert(now, &c.to_string()),
            KeyCode::Enter => self.session.insert(now, "\n"),
            KeyCode::Backspace => self.session.delete_backward(now),
            KeyCode::Delete => self.session.delete_forward(now),
            KeyCode::Left => self.session.move_left(),
            KeyCode::Right => self.session.move_right(),
            KeyCode::Up => {
                let text = self.session.text();
                self.session.set_caret(caret_up(&text, self.session.caret()));
            }
            KeyCode::Down => {
                let text = self.session.text();
                self.session
                    .set_caret(caret_down(&text, self.session.caret()));
            }
            KeyCode::Home => {
                let text = self.session.text();
                self.session
                    .set_caret(line_start(&text, self.session.caret()));
            }
            KeyCode::End => {
                let text = self.session.text();
                self.session.set_caret(line_end(&text, self.session.caret()));
            }
            _ => {}
        }
    }

    fn handle_panel_key(&mut self, key: KeyEvent, now: Instant) {
        let count = self.session.panel().count();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    let i = match self.panel_state.selected() {
                        Some(i) => (i + 1) % count,
                        None => 0,
                    };
                    self.panel_state.select(Some(i));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if count > 0 {
                    let i = match self.panel_state.selected() {
                        Some(i) => {
                            if i == 0 {
                                count - 1
                            } else {
                                i - 1
                            }
                        }
                        None => 0,
                    };
                    self.panel_state.select(Some(i));
                }
            }
            KeyCode::Enter => {
                if let Some(position) = self.panel_state.selected() {
                    if self.session.apply_suggestion(now, position) {
                        self.status = Some("Suggestion applied".to_string());
                    } else {
                        self.status = Some("No suggestion for this entry".to_string());
                    }
                    self.sync_panel_selection();
                }
            }
            _ => {}
        }
    }

    fn copy_document(&mut self) {
        match clipboard::copy(&self.session.text()) {
            Ok(()) => self.status = Some("Text copied to clipboard".to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.status = Some("Copy failed".to_string());
            }
        }
    }

    fn clear_document(&mut self) {
        self.session.clear();
        self.panel_state.select(None);
        self.status = Some("Document cleared".to_string());
    }

    fn apply_all(&mut self) {
        let request = self.session.apply_all();
        self.dispatch(request);
        self.sync_panel_selection();
        self.status = Some("Applied all suggestions".to_string());
    }

    /// Keep the panel selection within the (possibly rebuilt) entry list.
    fn sync_panel_selection(&mut self) {
        let count = self.session.panel().count();
        match self.panel_state.selected() {
            _ if count == 0 => self.panel_state.select(None),
            Some(i) if i >= count => self.panel_state.select(Some(count - 1)),
            None => self.panel_state.select(Some(0)),
            _ => {}
        }
    }
}

/// Byte offset of the start of the line containing `caret`.
pub fn line_start(text: &str, caret: usize) -> usize {
    text[..caret].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte offset of the end of the line containing `caret` (before its '\n').
pub fn line_end(text: &str, caret: usize) -> usize {
    text[caret..].find('\n').map_or(text.len(), |i| caret + i)
}

/// Caret moved one line up, keeping the column where the line allows.
pub fn caret_up(text: &str, caret: usize) -> usize {
    let start = line_start(text, caret);
    if start == 0 {
        return caret;
    }
    let col = text[start..caret].chars().count();
    let prev_start = line_start(text, start - 1);
    offset_at_column(text, prev_start, col)
}

/// Caret moved one line down, keeping the column where the line allows.
pub fn caret_down(text: &str, caret: usize) -> usize {
    let end = line_end(text, caret);
    if end == text.len() {
        return caret;
    }
    let start = line_start(text, caret);
    let col = text[start..caret].chars().count();
    offset_at_column(text, end + 1, col)
}

fn offset_at_column(text: &str, line_start: usize, col: usize) -> usize {
    let line = &text[line_start..];
    let line_len = line.find('\n').unwrap_or(line.len());
    let mut offset = line_start;
    for (taken, c) in line[..line_len].chars().enumerate() {
        if taken == col {
            break;
        }
        offset += c.len_utf8();
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "first line\nsecond\nthird line";

    #[test]
    fn test_line_bounds() {
        assert_eq!(line_start(TEXT, 0), 0);
        assert_eq!(line_end(TEXT, 0), 10);
        assert_eq!(line_start(TEXT, 13), 11);
        assert_eq!(line_end(TEXT, 13), 17);
        assert_eq!(line_end(TEXT, 20), TEXT.len());
    }

    #[test]
    fn test_caret_up_keeps_column() {
        // "second"[2] -> "first line"[2]
        assert_eq!(caret_up(TEXT, 13), 2);
        // First line: no-op.
        assert_eq!(caret_up(TEXT, 4), 4);
    }

    #[test]
    fn test_caret_up_clamps_to_short_line() {
        // Column 8 of "third line"; "second" has only 6 chars.
        assert_eq!(caret_up(TEXT, 26), 17);
    }

    #[test]
    fn test_caret_down_keeps_column() {
        assert_eq!(caret_down(TEXT, 2), 13);
        // Last line: no-op.
        assert_eq!(caret_down(TEXT, 20), 20);
    }

    #[test]
    fn test_caret_down_clamps_to_short_line() {
        // Column 8 of "first line"; "second" ends at column 6.
        assert_eq!(caret_down(TEXT, 8), 17);
    }

    #[test]
    fn test_column_counts_chars_not_bytes() {
        let text = "héllo\nwörld";
        // Byte 4 is column 3 ('é' is two bytes); column 3 of "wörld" is
        // byte 11 ('ö' is two bytes too).
        assert_eq!(caret_down(text, 4), 11);
    }
}
