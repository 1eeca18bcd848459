//! Highlight renderer: plain text plus match records in, markup out.
//!
//! Matches are consumed in the order the service delivered them, which is
//! ascending by offset and non-overlapping for well-formed responses. The
//! renderer does not sort or merge; a match whose range no longer addresses
//! the text (stale after a race, overlapping an earlier span, or off a char
//! boundary) is skipped, because slicing it would panic where the behavior
//! this reimplements merely produced corrupt markup.

use crate::records::{IssueType, MatchRecord, slice_range};

/// Attributes carried on one highlight span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanAttrs {
    pub issue_type: IssueType,
    pub message: String,
    /// Comma-joined replacement candidates.
    pub suggestions: String,
}

/// One node of the rendered content tree. Spans nest text nodes; the caret
/// codec walks this tree to translate offsets across re-renders.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Text(String),
    Span {
        attrs: SpanAttrs,
        children: Vec<MarkupNode>,
    },
}

/// Flat run of styled text, the form the terminal view consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub issue: Option<IssueType>,
}

/// Rendered content: highlight spans spliced into the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    pub nodes: Vec<MarkupNode>,
}

impl Markup {
    /// The plain-text projection: concatenation of every text node in
    /// document order. Equal to the input text when no match was skipped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    /// Flattened styled runs for the terminal view.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        for node in &self.nodes {
            match node {
                MarkupNode::Text(text) => out.push(Segment {
                    text: text.clone(),
                    issue: None,
                }),
                MarkupNode::Span { attrs, children } => {
                    let mut text = String::new();
                    collect_text(children, &mut text);
                    out.push(Segment {
                        text,
                        issue: Some(attrs.issue_type),
                    });
                }
            }
        }
        out
    }

    /// The tagged string form: each flagged substring wrapped in a span
    /// carrying its visual class, message, and suggestions as attributes.
    /// Attribute values are escaped; text content is emitted verbatim so the
    /// surrounding text stays byte-identical to the input.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                MarkupNode::Text(text) => out.push_str(text),
                MarkupNode::Span { attrs, children } => {
                    let mut inner = String::new();
                    collect_text(children, &mut inner);
                    out.push_str(&format!(
                        r#"<span class="{}" data-error="{}" data-suggestions="{}">{}</span>"#,
                        attrs.issue_type.class_name(),
                        html_escape::encode_double_quoted_attribute(&attrs.message),
                        html_escape::encode_double_quoted_attribute(&attrs.suggestions),
                        inner,
                    ));
                }
            }
        }
        out
    }
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Span { children, .. } => collect_text(children, out),
        }
    }
}

/// Splice highlight spans for `matches` into `text`.
///
/// Earlier spans grow the markup but not the plain text, so later matches are
/// still addressed by their original offsets; the cursor tracks how much of
/// the original text has been emitted, which is the tree-shaped equivalent of
/// the running shift a string splice would need.
pub fn render(text: &str, matches: &[MatchRecord]) -> Markup {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for m in matches {
        let range = match slice_range(text, m.offset, m.length) {
            Some(range) if range.start >= cursor => range,
            _ => {
                tracing::debug!(
                    offset = m.offset,
                    length = m.length,
                    "skipping unusable match range"
                );
                continue;
            }
        };

        if range.start > cursor {
            nodes.push(MarkupNode::Text(text[cursor..range.start].to_string()));
        }
        nodes.push(MarkupNode::Span {
            attrs: SpanAttrs {
                issue_type: m.issue_type,
                message: m.message.clone(),
                suggestions: m.replacements.join(","),
            },
            children: vec![MarkupNode::Text(text[range.clone()].to_string())],
        });
        cursor = range.end;
    }

    if cursor < text.len() {
        nodes.push(MarkupNode::Text(text[cursor..].to_string()));
    }

    Markup { nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn misspelling(offset: usize, length: usize, replacement: &str) -> MatchRecord {
        MatchRecord {
            offset,
            length,
            message: "Possible spelling mistake found.".to_string(),
            issue_type: IssueType::Misspelling,
            replacements: vec![replacement.to_string()],
        }
    }

    #[test]
    fn test_empty_match_list_leaves_text_unchanged() {
        let markup = render("The quick fox", &[]);

        assert_eq!(markup.nodes, vec![MarkupNode::Text("The quick fox".to_string())]);
        assert_eq!(markup.to_html(), "The quick fox");
        assert_eq!(markup.plain_text(), "The quick fox");
    }

    #[test]
    fn test_single_match_wraps_exact_substring() {
        let markup = render("The qick fox", &[misspelling(4, 4, "quick")]);

        assert_eq!(
            markup.to_html(),
            r#"The <span class="highlight-red" data-error="Possible spelling mistake found." data-suggestions="quick">qick</span> fox"#
        );
        assert_eq!(markup.plain_text(), "The qick fox");
    }

    #[test]
    fn test_multiple_matches_keep_original_positions() {
        let text = "a bb ccc";
        let matches = vec![misspelling(0, 1, "AA"), misspelling(2, 2, "B")];
        let markup = render(text, &matches);

        let segments = markup.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].text, "a");
        assert_eq!(segments[0].issue, Some(IssueType::Misspelling));
        assert_eq!(segments[1].text, " ");
        assert_eq!(segments[1].issue, None);
        assert_eq!(segments[2].text, "bb");
        assert_eq!(segments[3].text, " ccc");
        assert_eq!(markup.plain_text(), text);
    }

    #[test]
    fn test_issue_classes_map_to_three_styles() {
        let mut m = misspelling(0, 1, "x");
        m.issue_type = IssueType::Grammar;
        let markup = render("a", std::slice::from_ref(&m));
        assert!(markup.to_html().contains("highlight-yellow"));

        m.issue_type = IssueType::Other;
        let markup = render("a", &[m]);
        assert!(markup.to_html().contains("highlight-blue"));
    }

    #[test]
    fn test_attribute_values_are_escaped_but_text_is_verbatim() {
        let m = MatchRecord {
            offset: 0,
            length: 3,
            message: r#"say "hi" <now>"#.to_string(),
            issue_type: IssueType::Other,
            replacements: vec!["a<b".to_string()],
        };
        let html = render("x&y rest", &[m]).to_html();

        assert!(html.contains("say &quot;hi&quot; &lt;now&gt;"));
        assert!(html.contains("data-suggestions=\"a&lt;b\""));
        // Flagged text and surrounding text are untouched.
        assert!(html.contains(">x&y</span> rest"));
    }

    #[test]
    fn test_out_of_bounds_match_is_skipped() {
        let markup = render("short", &[misspelling(3, 10, "x")]);

        assert_eq!(markup.to_html(), "short");
    }

    #[test]
    fn test_overlapping_match_is_skipped() {
        let matches = vec![misspelling(0, 4, "x"), misspelling(2, 3, "y")];
        let markup = render("abcdefgh", &matches);

        // First span wins; the overlapping second one is dropped.
        let segments = markup.segments();
        assert_eq!(segments[0].text, "abcd");
        assert_eq!(segments[1].issue, None);
        assert_eq!(markup.plain_text(), "abcdefgh");
    }

    #[test]
    fn test_replacements_joined_with_commas() {
        let m = MatchRecord {
            offset: 0,
            length: 1,
            message: "m".to_string(),
            issue_type: IssueType::Grammar,
            replacements: vec!["one".to_string(), "two".to_string()],
        };
        let html = render("x", &[m]).to_html();

        assert!(html.contains(r#"data-suggestions="one,two""#));
    }
}
