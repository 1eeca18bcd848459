//! Suggestion application: single splices and the bulk pass.

use crate::records::{MatchRecord, slice_range};

/// Replace `[offset, offset + length)` in `text` with `replacement`.
///
/// A range that no longer addresses the text (stale after a race) leaves the
/// text unchanged rather than panicking.
pub fn splice(text: &str, offset: usize, length: usize, replacement: &str) -> String {
    let Some(range) = slice_range(text, offset, length) else {
        tracing::debug!(offset, length, "skipping splice with unusable range");
        return text.to_string();
    };

    let mut out = text.to_string();
    out.replace_range(range, replacement);
    out
}

/// Apply the first replacement of every match in one pass.
///
/// Matches are taken in their existing order (ascending original offset, as
/// delivered); earlier replacements shift later offsets, so a running
/// cumulative delta adjusts each match's position before splicing. Matches
/// without a replacement candidate are passed over without affecting the
/// delta.
pub fn apply_all(text: &str, matches: &[MatchRecord]) -> String {
    let mut out = text.to_string();
    let mut delta: i64 = 0;

    for m in matches {
        let Some(replacement) = m.primary_replacement() else {
            continue;
        };

        let start = m.offset as i64 + delta;
        if start < 0 {
            continue;
        }
        let Some(range) = slice_range(&out, start as usize, m.length) else {
            tracing::debug!(
                offset = m.offset,
                length = m.length,
                "skipping unusable match in bulk pass"
            );
            continue;
        };

        out.replace_range(range, replacement);
        delta += replacement.len() as i64 - m.length as i64;
    }

    out
}
