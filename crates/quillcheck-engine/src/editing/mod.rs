/*!
 * Editing core: the plain-text buffer and the caret position codec.
 *
 * The document is a single `xi_rope::Rope` buffer edited through commands
 * (`Cmd`) that compile to rope deltas; the caret is a byte offset transformed
 * through every edit. Highlight markup never lives in the buffer — it is
 * derived per render — so the caret codec in [`caret`] translates between the
 * plain-text offset and a selection inside the rendered markup tree.
 */

pub mod caret;
pub mod document;

pub use caret::Selection;
pub use document::{Cmd, Document, Patch};
