use serde::{Deserialize, Serialize};

/// Category of a reported issue, mapped to one of three visual classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Misspelling,
    Grammar,
    Other,
}

impl IssueType {
    /// CSS-style class carried on rendered highlight spans.
    pub fn class_name(self) -> &'static str {
        match self {
            IssueType::Misspelling => "highlight-red",
            IssueType::Grammar => "highlight-yellow",
            IssueType::Other => "highlight-blue",
        }
    }

    /// Human-readable label shown in the corrections panel.
    pub fn label(self) -> &'static str {
        match self {
            IssueType::Misspelling => "misspelling",
            IssueType::Grammar => "grammar",
            IssueType::Other => "other",
        }
    }
}

/// One reported grammar/spelling issue with position, message, category, and
/// suggested replacements.
///
/// Records are produced fresh by each check call and replace the previous set
/// wholesale; there is no incremental merge. `offset + length` is within the
/// text at the time the record was produced, but goes stale as soon as the
/// user types before the response arrives, so consumers must treat the range
/// as advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Byte offset of the flagged span in the plain text.
    pub offset: usize,
    /// Byte length of the flagged span.
    pub length: usize,
    /// Service-provided description of the issue.
    pub message: String,
    pub issue_type: IssueType,
    /// Candidate replacements, best first. May be empty.
    pub replacements: Vec<String>,
}

impl MatchRecord {
    /// The suggestion offered in the panel and used by the bulk corrector.
    pub fn primary_replacement(&self) -> Option<&str> {
        self.replacements.first().map(String::as_str)
    }

    /// Whether the recorded range still addresses a valid slice of `text`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        slice_range(text, self.offset, self.length).is_some()
    }
}

/// The byte range `[offset, offset + length)` when it addresses a sliceable
/// piece of `text`; `None` for ranges that are out of bounds or off a char
/// boundary, which is what stale offsets look like after a race. The single
/// guard behind every slice of match-addressed text.
pub fn slice_range(text: &str, offset: usize, length: usize) -> Option<std::ops::Range<usize>> {
    let end = offset.checked_add(length)?;
    (end <= text.len() && text.is_char_boundary(offset) && text.is_char_boundary(end))
        .then(|| offset..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(offset: usize, length: usize) -> MatchRecord {
        MatchRecord {
            offset,
            length,
            message: "test".to_string(),
            issue_type: IssueType::Other,
            replacements: vec![],
        }
    }

    #[test]
    fn test_class_names_cover_three_visual_classes() {
        assert_eq!(IssueType::Misspelling.class_name(), "highlight-red");
        assert_eq!(IssueType::Grammar.class_name(), "highlight-yellow");
        assert_eq!(IssueType::Other.class_name(), "highlight-blue");
    }

    #[test]
    fn test_primary_replacement_is_first_candidate() {
        let mut m = record(0, 1);
        assert_eq!(m.primary_replacement(), None);

        m.replacements = vec!["quick".to_string(), "quirk".to_string()];
        assert_eq!(m.primary_replacement(), Some("quick"));
    }

    #[test]
    fn test_is_valid_for_respects_bounds() {
        let text = "The qick fox";
        assert!(record(4, 4).is_valid_for(text));
        assert!(record(0, text.len()).is_valid_for(text));
        assert!(!record(10, 5).is_valid_for(text));
        assert!(!record(usize::MAX, 2).is_valid_for(text));
    }

    #[test]
    fn test_is_valid_for_respects_char_boundaries() {
        let text = "héllo";
        // Offset 2 lands inside the two-byte 'é'.
        assert!(!record(2, 1).is_valid_for(text));
        assert!(record(1, 2).is_valid_for(text));
    }

    #[test]
    fn test_slice_range_yields_sliceable_ranges_only() {
        assert_eq!(slice_range("héllo", 1, 2), Some(1..3));
        assert_eq!(slice_range("héllo", 2, 1), None);
        assert_eq!(slice_range("abc", 1, 5), None);
        assert_eq!(slice_range("abc", 1, usize::MAX), None);
    }
}
