//! Check scheduling: keystroke debounce and the in-flight request slot.
//!
//! Both are modelled as plain state polled from the event loop; nothing here
//! spawns timers or threads. The debounce is a cancellable deadline restarted
//! on every keystroke within the quiet window. The slot hands out generation
//! tickets so that when checks overtake each other, only the response for the
//! newest request is admitted and a slow stale response can no longer
//! overwrite fresher match data.

use std::time::{Duration, Instant};

/// Delays an action until a quiet period without new triggers has elapsed.
#[derive(Debug, Clone)]
pub struct Debounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Arm or restart the deadline at `now + quiet period`.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Arm the deadline with an explicit delay instead of the quiet period.
    /// Used for the short settle delay after applying a correction.
    pub fn poke_after(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm and report true once the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time remaining until the deadline, if armed. Drives the event-loop
    /// poll timeout so the deadline fires without further keystrokes.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Opaque generation ticket for one issued check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single in-flight request slot.
///
/// Issuing a new ticket invalidates every older one, so responses are
/// admitted newest-wins regardless of arrival order.
#[derive(Debug, Clone, Default)]
pub struct CheckSlot {
    next: u64,
    newest: Option<u64>,
}

impl CheckSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.next += 1;
        self.newest = Some(self.next);
        Ticket(self.next)
    }

    /// Admit a response for `ticket`. Only the newest outstanding generation
    /// passes; admitting it clears the slot.
    pub fn admit(&mut self, ticket: Ticket) -> bool {
        if self.newest == Some(ticket.0) {
            self.newest = None;
            true
        } else {
            false
        }
    }

    /// Drop any outstanding ticket, e.g. when the document is cleared and a
    /// late response would refer to text that no longer exists.
    pub fn invalidate(&mut self) {
        self.newest = None;
    }

    pub fn in_flight(&self) -> bool {
        self.newest.is_some()
    }
}
