//! Cursor — a position plus an optional selection anchor.
//!
//! The `Cursor` is a lightweight value type: a char index into the text and
//! the "other end" of a selection, if one is being made. It does not
//! reference the text; the owning [`EditorView`](crate::view::EditorView)
//! keeps positions valid across edits with [`Cursor::shift`].

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: usize,

    /// Selection anchor. When `Some`, the chars between `anchor` and `pos`
    /// (both inclusive) are selected.
    anchor: Option<usize>,
}

impl Cursor {
    #[must_use]
    pub const fn new(pos: usize) -> Self {
        Self { pos, anchor: None }
    }

    #[inline]
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    pub const fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Anchor a selection at the current position.
    pub const fn start_selection(&mut self) {
        self.anchor = Some(self.pos);
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// The selected char range, if selecting. The char under the cursor
    /// is always part of the selection.
    #[must_use]
    pub fn selection(&self) -> Option<Range<usize>> {
        self.anchor
            .map(|anchor| anchor.min(self.pos)..anchor.max(self.pos) + 1)
    }

    /// Adjust for an edit at `at` that added `inserted` chars after removing
    /// `removed`. Positions before `at` are unaffected.
    pub fn shift(&mut self, at: usize, removed: usize, inserted: usize) {
        let adjust = |p: usize| {
            if p < at {
                p
            } else {
                (p.saturating_sub(removed).max(at)) + inserted
            }
        };
        self.pos = adjust(self.pos);
        self.anchor = self.anchor.map(adjust);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
