/*!
 * # quillcheck engine
 *
 * Editing core for a prose editor that highlights issues reported by a
 * remote grammar-check service. The engine owns everything that has to stay
 * consistent while text and markup drift apart:
 *
 * - **`editing::Document`**: single source of truth for the plain text in an
 *   `xi_rope::Rope` buffer, with command-based edits and caret tracking.
 * - **`editing::caret`**: position codec between a plain-text offset and a
 *   selection inside the rendered markup tree, so the caret survives
 *   re-renders that insert highlight spans.
 * - **`records`**: `MatchRecord`, the engine's view of one reported issue.
 * - **`highlight`**: turns text plus match records into a markup tree with
 *   positional spans, compensating for offset drift as spans are inserted.
 * - **`panel`**: the corrections side-list model (entries, visible count).
 * - **`corrections`**: suggestion splicing, including the bulk pass that
 *   carries a running offset delta across replacements.
 * - **`schedule`**: keystroke debounce and the single in-flight check slot
 *   that drops stale responses.
 * - **`session`**: one state container tying the above together; all state
 *   transitions go through it so the caret/match/text relationship is
 *   auditable in isolation.
 *
 * The engine knows nothing about HTTP or terminals; the client and CLI
 * crates layer those on top.
 */

pub mod corrections;
pub mod editing;
pub mod highlight;
pub mod panel;
pub mod records;
pub mod schedule;
pub mod session;

pub use editing::caret::{self, Selection};
pub use editing::document::{Cmd, Document, Patch};
pub use highlight::{Markup, MarkupNode, Segment, render};
pub use panel::{CorrectionEntry, CorrectionPanel};
pub use records::{IssueType, MatchRecord};
pub use schedule::{CheckSlot, Debounce, Ticket};
pub use session::Session;
