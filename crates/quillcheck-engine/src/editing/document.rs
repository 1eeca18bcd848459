use xi_rope::Rope;

/// Edit commands. Every mutation of the text flows through one of these so
/// caret transformation and version tracking happen in exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: std::ops::Range<usize> },
    ReplaceRange { range: std::ops::Range<usize>, text: String },
    Clear,
}

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Range of the newly inserted text in the updated buffer.
    pub changed: std::ops::Range<usize>,
    pub new_caret: usize,
    pub version: u64,
}

/// Plain-text document: single owner of the user's content.
///
/// The buffer holds the plain character sequence only; highlight markup is
/// derived from it on every render and never written back. Mutated on user
/// keystrokes and on suggestion application; never persisted.
pub struct Document {
    /// xi-rope buffer containing the document as UTF-8 text (source of truth)
    buffer: Rope,
    /// Caret position as a byte offset into the buffer
    caret: usize,
    /// Version counter incremented on each edit (enables change detection)
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            caret: len,
            version: 0,
        }
    }

    /// Current content as an owned string.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Place the caret, clamping to the buffer and snapping to a char
    /// boundary.
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = self.snap(offset);
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a command: compile it to a rope delta, apply the delta, and
    /// transform the caret through the edit.
    ///
    /// Caret rule: positions before the edited range are unchanged, positions
    /// inside it collapse to the end of the inserted text, and positions after
    /// it shift by the length delta.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let (range, text) = self.compile(cmd);

        let mut builder = xi_rope::delta::Builder::new(self.buffer.len());
        builder.replace(range.clone(), Rope::from(text.as_str()));
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);

        let inserted_end = range.start + text.len();
        self.caret = if self.caret <= range.start {
            self.caret
        } else if self.caret < range.end {
            inserted_end
        } else {
            self.caret - range.end + inserted_end
        };
        self.version += 1;

        Patch {
            changed: range.start..inserted_end,
            new_caret: self.caret,
            version: self.version,
        }
    }

    /// Resolve a command to a replaced range and replacement text, clamped to
    /// the buffer bounds and snapped to char boundaries so the rope edit
    /// cannot panic on a stale offset.
    fn compile(&self, cmd: Cmd) -> (std::ops::Range<usize>, String) {
        match cmd {
            Cmd::InsertText { at, text } => {
                let at = self.snap(at);
                (at..at, text)
            }
            Cmd::DeleteRange { range } => {
                let start = self.snap(range.start);
                let end = self.snap(range.end).max(start);
                (start..end, String::new())
            }
            Cmd::ReplaceRange { range, text } => {
                let start = self.snap(range.start);
                let end = self.snap(range.end).max(start);
                (start..end, text)
            }
            Cmd::Clear => (0..self.buffer.len(), String::new()),
        }
    }

    /// Clamp an offset to the buffer and walk it back to a char boundary.
    fn snap(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.buffer.len());
        let text = self.buffer.to_string();
        while offset > 0 && !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Byte offset of the char before the caret, if any. Used for backspace.
    pub fn prev_char_boundary(&self) -> Option<usize> {
        if self.caret == 0 {
            return None;
        }
        let text = self.buffer.to_string();
        text[..self.caret].char_indices().next_back().map(|(i, _)| i)
    }

    /// Byte offset just past the char at the caret, if any. Used for delete.
    pub fn next_char_boundary(&self) -> Option<usize> {
        let text = self.buffer.to_string();
        if self.caret >= text.len() {
            return None;
        }
        text[self.caret..]
            .chars()
            .next()
            .map(|c| self.caret + c.len_utf8())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_text_starts_with_caret_at_end() {
        let doc = Document::from_text("hello");
        assert_eq!(doc.text(), "hello");
        assert_eq!(doc.caret(), 5);
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_insert_at_caret_advances_caret() {
        let mut doc = Document::from_text("helo");
        doc.set_caret(3);
        let patch = doc.apply(Cmd::InsertText {
            at: 3,
            text: "l".to_string(),
        });

        assert_eq!(doc.text(), "hello");
        assert_eq!(doc.caret(), 4);
        assert_eq!(patch.changed, 3..4);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_insert_before_caret_shifts_caret() {
        let mut doc = Document::from_text("world");
        doc.set_caret(5);
        doc.apply(Cmd::InsertText {
            at: 0,
            text: "hello ".to_string(),
        });

        assert_eq!(doc.text(), "hello world");
        assert_eq!(doc.caret(), 11);
    }

    #[test]
    fn test_insert_after_caret_leaves_caret() {
        let mut doc = Document::from_text("hello");
        doc.set_caret(2);
        doc.apply(Cmd::InsertText {
            at: 5,
            text: "!".to_string(),
        });

        assert_eq!(doc.text(), "hello!");
        assert_eq!(doc.caret(), 2);
    }

    #[test]
    fn test_delete_range_collapses_caret_inside_range() {
        let mut doc = Document::from_text("hello world");
        doc.set_caret(8);
        doc.apply(Cmd::DeleteRange { range: 5..11 });

        assert_eq!(doc.text(), "hello");
        assert_eq!(doc.caret(), 5);
    }

    #[test]
    fn test_replace_range_shifts_trailing_caret_by_delta() {
        let mut doc = Document::from_text("The qick fox");
        doc.set_caret(12);
        doc.apply(Cmd::ReplaceRange {
            range: 4..8,
            text: "quick".to_string(),
        });

        assert_eq!(doc.text(), "The quick fox");
        assert_eq!(doc.caret(), 13);
    }

    #[test]
    fn test_clear_empties_buffer_and_caret() {
        let mut doc = Document::from_text("some text");
        doc.apply(Cmd::Clear);

        assert_eq!(doc.text(), "");
        assert_eq!(doc.caret(), 0);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_stale_offsets_are_clamped_not_panicking() {
        let mut doc = Document::from_text("abc");
        doc.apply(Cmd::ReplaceRange {
            range: 10..20,
            text: "x".to_string(),
        });

        assert_eq!(doc.text(), "abcx");
    }

    #[test]
    fn test_offsets_snap_to_char_boundaries() {
        let mut doc = Document::from_text("héllo");
        // Offset 2 is inside the two-byte 'é'; must snap back to 1.
        doc.apply(Cmd::InsertText {
            at: 2,
            text: "x".to_string(),
        });

        assert_eq!(doc.text(), "hxéllo");
    }

    #[test]
    fn test_char_boundary_helpers() {
        let mut doc = Document::from_text("aé");
        doc.set_caret(3);
        assert_eq!(doc.prev_char_boundary(), Some(1));
        assert_eq!(doc.next_char_boundary(), None);

        doc.set_caret(0);
        assert_eq!(doc.prev_char_boundary(), None);
        assert_eq!(doc.next_char_boundary(), Some(1));
    }
}
