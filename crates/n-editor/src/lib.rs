//! # n-editor — editing surface for n-modal
//!
//! A small, concrete implementation of the [`n_dispatch::View`] trait so the
//! modal core can be driven against real text:
//!
//! - **[`text`]** — `Text` wrapping a rope with undo checkpoints
//! - **[`cursor`]** — `Cursor` with a char position and selection anchor
//! - **[`view`]** — `EditorView`, multiple cursors over one `Text`, and a
//!   shareable `SharedView` handle

pub mod cursor;
pub mod text;
pub mod view;

pub use cursor::Cursor;
pub use text::Text;
pub use view::{EditorView, SharedView};
