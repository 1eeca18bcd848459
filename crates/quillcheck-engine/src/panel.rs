//! Corrections panel model: the side list of suggestions.
//!
//! Pure state, no rendering. The terminal view draws from this the way it
//! draws from [`crate::highlight::Markup`]; the visible count is always the
//! actual number of remaining entries, never arithmetic on a stale total.

use crate::records::{IssueType, MatchRecord};

/// One visible correction: a projection of a match record plus its index in
/// the source match list, kept so the entry can be removed once applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionEntry {
    /// Index of the source record in the match list this panel was built from.
    pub match_index: usize,
    pub issue_type: IssueType,
    pub message: String,
    /// First replacement candidate, the one applied on selection.
    pub suggestion: Option<String>,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionPanel {
    entries: Vec<CorrectionEntry>,
}

impl CorrectionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and rebuild the list, one entry per match.
    pub fn populate(&mut self, matches: &[MatchRecord]) {
        self.entries = matches
            .iter()
            .enumerate()
            .map(|(match_index, m)| CorrectionEntry {
                match_index,
                issue_type: m.issue_type,
                message: m.message.clone(),
                suggestion: m.primary_replacement().map(str::to_string),
                offset: m.offset,
                length: m.length,
            })
            .collect();
    }

    pub fn entries(&self) -> &[CorrectionEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&CorrectionEntry> {
        self.entries.get(position)
    }

    /// Number of visible entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the entry at `position` in the visible list, returning it.
    /// Offsets of the remaining entries are left as they were produced; they
    /// go stale once the text is mutated and are only refreshed by the next
    /// check.
    pub fn remove(&mut self, position: usize) -> Option<CorrectionEntry> {
        if position < self.entries.len() {
            Some(self.entries.remove(position))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::IssueType;
    use pretty_assertions::assert_eq;

    fn matches() -> Vec<MatchRecord> {
        vec![
            MatchRecord {
                offset: 4,
                length: 4,
                message: "Possible spelling mistake found.".to_string(),
                issue_type: IssueType::Misspelling,
                replacements: vec!["quick".to_string()],
            },
            MatchRecord {
                offset: 9,
                length: 3,
                message: "Possible agreement error.".to_string(),
                issue_type: IssueType::Grammar,
                replacements: vec![],
            },
        ]
    }

    #[test]
    fn test_populate_builds_one_entry_per_match() {
        let mut panel = CorrectionPanel::new();
        panel.populate(&matches());

        assert_eq!(panel.count(), 2);
        assert_eq!(panel.entries()[0].suggestion.as_deref(), Some("quick"));
        assert_eq!(panel.entries()[0].match_index, 0);
        assert_eq!(panel.entries()[1].suggestion, None);
        assert_eq!(panel.entries()[1].issue_type, IssueType::Grammar);
    }

    #[test]
    fn test_populate_replaces_previous_entries() {
        let mut panel = CorrectionPanel::new();
        panel.populate(&matches());
        panel.populate(&matches()[..1]);

        assert_eq!(panel.count(), 1);
    }

    #[test]
    fn test_count_tracks_actual_remaining_entries() {
        let mut panel = CorrectionPanel::new();
        panel.populate(&matches());

        let removed = panel.remove(0).expect("entry exists");
        assert_eq!(removed.match_index, 0);
        assert_eq!(panel.count(), panel.entries().len());
        assert_eq!(panel.count(), 1);

        assert!(panel.remove(5).is_none());
        assert_eq!(panel.count(), 1);
    }

    #[test]
    fn test_clear_empties_the_list() {
        let mut panel = CorrectionPanel::new();
        panel.populate(&matches());
        panel.clear();

        assert!(panel.is_empty());
        assert_eq!(panel.count(), 0);
    }
}
