//! Serde view of the check service's response payload. The wire format is
//! dictated by the service; only the fields quillcheck consumes are modelled,
//! everything else is ignored.

use quillcheck_engine::{IssueType, MatchRecord};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CheckResponse {
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMatch {
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub message: String,
    pub rule: Option<WireRule>,
    #[serde(default)]
    pub replacements: Vec<WireReplacement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRule {
    #[serde(rename = "issueType", default)]
    pub issue_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireReplacement {
    pub value: String,
}

impl WireMatch {
    /// Convert into the engine's record form, translating the service's
    /// character offsets into byte offsets against `text`, the exact content
    /// that was sent for checking. The service addresses the text as a
    /// sequence of characters; the engine slices byte ranges, and the two
    /// diverge as soon as the text contains a non-ASCII character.
    pub(crate) fn into_record(self, text: &str) -> MatchRecord {
        let issue_type = match self.rule.as_ref().map(|r| r.issue_type.as_str()) {
            Some("misspelling") => IssueType::Misspelling,
            Some("grammar") => IssueType::Grammar,
            // Unknown categories (style, typography, ...) and missing rules
            // all share the third visual class.
            _ => IssueType::Other,
        };
        let offset = byte_offset(text, self.offset);
        let end = byte_offset(text, self.offset.saturating_add(self.length));
        MatchRecord {
            offset,
            length: end - offset,
            message: self.message,
            issue_type,
            replacements: self.replacements.into_iter().map(|r| r.value).collect(),
        }
    }
}

/// Byte offset of the character at index `chars`; the end of the text when
/// the index is past the last character.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}
