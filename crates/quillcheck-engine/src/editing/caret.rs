//! Caret position codec.
//!
//! Re-rendering highlights replaces the markup tree wholesale, so the caret
//! cannot be kept as a reference into it. Instead it round-trips through a
//! plain-text offset: [`encode`] walks the tree in document order summing
//! text-node lengths up to the selection, and [`decode`] walks with an
//! explicit traversal stack until it finds the text node containing the
//! target offset. Both operate on a plain node tree, so they are testable
//! without a live rendering surface.

use crate::highlight::MarkupNode;

/// A caret position inside a markup tree: the path of child indices leading
/// to a text node, plus a byte offset within that node's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: Vec<usize>,
    pub offset: usize,
}

/// Plain-text offset of `selection` within the tree. Returns 0 when there is
/// no selection.
pub fn encode(nodes: &[MarkupNode], selection: Option<&Selection>) -> usize {
    let Some(selection) = selection else {
        return 0;
    };

    let mut consumed = 0;
    let mut path = Vec::new();
    // A stale path (tree changed underneath) consumes everything and so
    // reports the end of the content.
    walk(nodes, selection, &mut consumed, &mut path);
    consumed
}

fn walk(
    nodes: &[MarkupNode],
    selection: &Selection,
    consumed: &mut usize,
    path: &mut Vec<usize>,
) -> bool {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        match node {
            MarkupNode::Text(text) => {
                if path.as_slice() == selection.path.as_slice() {
                    *consumed += selection.offset.min(text.len());
                    path.pop();
                    return true;
                }
                *consumed += text.len();
            }
            MarkupNode::Span { children, .. } => {
                if walk(children, selection, consumed, path) {
                    path.pop();
                    return true;
                }
            }
        }
        path.pop();
    }
    false
}

/// Selection for the text node containing plain-text offset `target`.
///
/// Walks the tree with an explicit stack (children pushed in reverse so they
/// pop in document order), accumulating consumed length. An offset on the
/// boundary between two text nodes attaches to the earlier one. If `target`
/// exceeds the total text length, the selection lands at the end of the
/// content.
pub fn decode(nodes: &[MarkupNode], target: usize) -> Selection {
    let mut stack: Vec<(Vec<usize>, &MarkupNode)> = Vec::new();
    for (i, node) in nodes.iter().enumerate().rev() {
        stack.push((vec![i], node));
    }

    let mut consumed = 0;
    let mut last_text: Option<Selection> = None;

    while let Some((path, node)) = stack.pop() {
        match node {
            MarkupNode::Text(text) => {
                if consumed + text.len() >= target {
                    return Selection {
                        path,
                        offset: target - consumed,
                    };
                }
                consumed += text.len();
                last_text = Some(Selection {
                    path,
                    offset: text.len(),
                });
            }
            MarkupNode::Span { children, .. } => {
                for (i, child) in children.iter().enumerate().rev() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    stack.push((child_path, child));
                }
            }
        }
    }

    // Target beyond total text length: place at the end of the content.
    last_text.unwrap_or(Selection {
        path: Vec::new(),
        offset: 0,
    })
}
