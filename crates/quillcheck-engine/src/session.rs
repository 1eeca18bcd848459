//! Editor session: one state container for the caret/match/text relationship.
//!
//! Every state transition — keystrokes, check scheduling, response handling,
//! suggestion application — goes through `Session`, so the pieces that can
//! drift apart (document text, caret, match offsets, panel entries) are
//! mutated in one auditable place instead of shared handler globals.

use std::time::{Duration, Instant};

use crate::corrections;
use crate::editing::caret;
use crate::editing::document::{Cmd, Document};
use crate::highlight::{self, Markup};
use crate::panel::CorrectionPanel;
use crate::records::MatchRecord;
use crate::schedule::{CheckSlot, Debounce, Ticket};

/// Settle delay before the re-check scheduled by a single correction.
const RECHECK_DELAY: Duration = Duration::from_millis(100);

/// A check the caller should dispatch: the ticket gates the response and the
/// text is the content snapshot to send.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRequest {
    pub ticket: Ticket,
    pub text: String,
}

pub struct Session {
    doc: Document,
    /// Current match set; replaced wholesale by each admitted check response.
    matches: Vec<MatchRecord>,
    panel: CorrectionPanel,
    debounce: Debounce,
    slot: CheckSlot,
    /// Text as of the last keystroke that armed the debounce; identical
    /// input events do not re-arm.
    last_seen: String,
}

impl Session {
    pub fn new(quiet: Duration) -> Self {
        Self::with_text(quiet, "")
    }

    pub fn with_text(quiet: Duration, text: &str) -> Self {
        Self {
            doc: Document::from_text(text),
            matches: Vec::new(),
            panel: CorrectionPanel::new(),
            debounce: Debounce::new(quiet),
            slot: CheckSlot::new(),
            last_seen: text.to_string(),
        }
    }

    pub fn text(&self) -> String {
        self.doc.text()
    }

    pub fn caret(&self) -> usize {
        self.doc.caret()
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.doc.set_caret(offset);
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn panel(&self) -> &CorrectionPanel {
        &self.panel
    }

    pub fn is_checking(&self) -> bool {
        self.slot.in_flight()
    }

    /// Time until the pending check fires, for the event-loop poll timeout.
    pub fn time_until_check(&self, now: Instant) -> Option<Duration> {
        self.debounce.time_until(now)
    }

    // ── Editing ──────────────────────────────────────────────────────

    pub fn insert(&mut self, now: Instant, text: &str) {
        let at = self.doc.caret();
        self.doc.apply(Cmd::InsertText {
            at,
            text: text.to_string(),
        });
        self.note_input(now);
    }

    pub fn delete_backward(&mut self, now: Instant) {
        if let Some(prev) = self.doc.prev_char_boundary() {
            let caret = self.doc.caret();
            self.doc.apply(Cmd::DeleteRange { range: prev..caret });
            self.note_input(now);
        }
    }

    pub fn delete_forward(&mut self, now: Instant) {
        if let Some(next) = self.doc.next_char_boundary() {
            let caret = self.doc.caret();
            self.doc.apply(Cmd::DeleteRange { range: caret..next });
            self.note_input(now);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.doc.prev_char_boundary() {
            self.doc.set_caret(prev);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.doc.next_char_boundary() {
            self.doc.set_caret(next);
        }
    }

    /// Clear the document and panel in one action.
    pub fn clear(&mut self) {
        self.doc.apply(Cmd::Clear);
        self.matches.clear();
        self.panel.clear();
        self.debounce.cancel();
        // A late response would refer to text that no longer exists.
        self.slot.invalidate();
        self.last_seen.clear();
    }

    /// Register a text mutation: cancel any pending check and, when the text
    /// actually changed, restart the quiet window.
    fn note_input(&mut self, now: Instant) {
        self.debounce.cancel();
        let text = self.doc.text();
        if text != self.last_seen {
            self.last_seen = text;
            self.debounce.poke(now);
        }
    }

    // ── Check lifecycle ──────────────────────────────────────────────

    /// Fire the debounce if its deadline has passed, issuing a check for the
    /// current text. The caller dispatches it and later reports the outcome
    /// through [`Session::finish_check`].
    pub fn due_check(&mut self, now: Instant) -> Option<CheckRequest> {
        if self.debounce.fire(now) {
            Some(CheckRequest {
                ticket: self.slot.issue(),
                text: self.doc.text(),
            })
        } else {
            None
        }
    }

    /// Apply the outcome of a dispatched check.
    ///
    /// Responses that are not from the newest issued check are dropped, so a
    /// slow stale response cannot overwrite fresher match data. On success
    /// the match set is replaced wholesale and the panel rebuilt; on failure
    /// the failure is logged and the previous state persists.
    pub fn finish_check<E: std::fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<MatchRecord>, E>,
    ) {
        if !self.slot.admit(ticket) {
            tracing::debug!("dropping superseded check response");
            return;
        }
        match result {
            Ok(matches) => {
                tracing::debug!(count = matches.len(), "check completed");
                self.matches = matches;
                self.panel.populate(&self.matches);
            }
            Err(error) => {
                tracing::warn!(%error, "grammar check failed");
            }
        }
    }

    // ── Corrections ──────────────────────────────────────────────────

    /// Apply the suggestion of the panel entry at `position`: splice it into
    /// the plain text, drop the entry, and schedule a fresh check after a
    /// short settle delay. Returns false when the entry does not exist or
    /// offers no suggestion.
    ///
    /// Offsets of the remaining entries are not adjusted; applying a second
    /// entry before the re-check lands uses its original, possibly stale,
    /// offset.
    pub fn apply_suggestion(&mut self, now: Instant, position: usize) -> bool {
        let Some(entry) = self.panel.get(position) else {
            return false;
        };
        let Some(suggestion) = entry.suggestion.clone() else {
            return false;
        };
        let (offset, length) = (entry.offset, entry.length);

        let updated = corrections::splice(&self.doc.text(), offset, length, &suggestion);
        self.set_plain_text(&updated);
        self.panel.remove(position);
        self.debounce.poke_after(now, RECHECK_DELAY);
        true
    }

    /// Apply the first suggestion of every current match in one pass and
    /// issue an immediate check on the final text.
    pub fn apply_all(&mut self) -> CheckRequest {
        let updated = corrections::apply_all(&self.doc.text(), &self.matches);
        self.set_plain_text(&updated);
        CheckRequest {
            ticket: self.slot.issue(),
            text: self.doc.text(),
        }
    }

    /// Write `text` back as the document's plain-text content, discarding
    /// rendered highlights until the next admitted check rebuilds them.
    fn set_plain_text(&mut self, text: &str) {
        let len = self.doc.len();
        self.doc.apply(Cmd::ReplaceRange {
            range: 0..len,
            text: text.to_string(),
        });
        self.matches.clear();
        self.last_seen = text.to_string();
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the current text with highlight spans, carrying the caret
    /// across the re-render: its plain-text offset is captured before the
    /// markup tree is rebuilt and restored through the position codec after.
    pub fn markup(&mut self) -> Markup {
        let target = self.doc.caret();
        let markup = highlight::render(&self.doc.text(), &self.matches);
        let selection = caret::decode(&markup.nodes, target);
        let restored = caret::encode(&markup.nodes, Some(&selection));
        self.doc.set_caret(restored);
        markup
    }
}
