//! View — the editing surface the modal core drives.
//!
//! An [`EditorView`] owns a [`Text`] and a set of cursors and implements
//! [`n_dispatch::View`], so an [`n_dispatch::Vis`] can be pointed at it.
//!
//! # Cursors
//!
//! Cursors are kept in document order and never share a position. The
//! first one is the primary cursor: it is what `cursor_get`/`cursor_to`
//! address. Edits are applied to every cursor, last one first, so an edit
//! never moves text under a cursor that has not been handled yet.
//!
//! # Line-wise selections
//!
//! The null motion marks the live selections as line-wise: they report the
//! full lines they touch until the cursor is re-seated or the selections
//! are cleared.
//!
//! # Sharing
//!
//! A window owns its view. [`SharedView`] is a cloneable handle that can be
//! handed to the window while the caller keeps a clone to read the text.

use std::cell::{Ref, RefCell, RefMut};
use std::ops::Range;
use std::rc::Rc;

use n_dispatch::View;
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::text::Text;

pub struct EditorView {
    text: Text,
    cursors: Vec<Cursor>,
    linewise: bool,

    /// Selections remembered by the last `selection_save`.
    saved: Vec<Range<usize>>,
}

impl EditorView {
    /// A view with a single cursor at the start of `text`.
    #[must_use]
    pub fn new(text: Text) -> Self {
        Self::with_cursors(text, [0])
    }

    /// A view with a cursor at each of `positions` (clamped to the text,
    /// duplicates merged). Falls back to one cursor at 0.
    #[must_use]
    pub fn with_cursors(text: Text, positions: impl IntoIterator<Item = usize>) -> Self {
        let len = text.len_chars();
        let mut positions: Vec<usize> = positions.into_iter().map(|p| p.min(len)).collect();
        positions.sort_unstable();
        positions.dedup();
        if positions.is_empty() {
            positions.push(0);
        }
        Self {
            text,
            cursors: positions.into_iter().map(Cursor::new).collect(),
            linewise: false,
            saved: Vec::new(),
        }
    }

    // -- Access -------------------------------------------------------------

    #[must_use]
    pub const fn text(&self) -> &Text {
        &self.text
    }

    #[must_use]
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    /// True while the live selections are extended to whole lines.
    #[must_use]
    pub const fn is_linewise(&self) -> bool {
        self.linewise
    }

    /// The live selections, in cursor order.
    #[must_use]
    pub fn selections(&self) -> Vec<Range<usize>> {
        self.cursors
            .iter()
            .filter_map(Cursor::selection)
            .map(|sel| {
                let sel = sel.start..sel.end.min(self.text.len_chars());
                if self.linewise {
                    self.text.line_extent(sel)
                } else {
                    sel
                }
            })
            .collect()
    }

    /// The selections stored by the last save.
    #[must_use]
    pub fn saved_selections(&self) -> &[Range<usize>] {
        &self.saved
    }

    // -- Undo ---------------------------------------------------------------

    /// Return to the previous checkpoint. Cursors past the new end of the
    /// text are pulled back onto it.
    pub fn undo(&mut self) -> bool {
        if !self.text.restore_checkpoint() {
            return false;
        }
        let len = self.text.len_chars();
        for cursor in &mut self.cursors {
            cursor.set_pos(cursor.pos().min(len));
            cursor.clear_selection();
        }
        self.cursors.dedup_by_key(|c| c.pos());
        debug!(checkpoints = self.text.checkpoint_count(), "undo");
        true
    }

    /// Apply `edit` at every cursor, last first. `edit` returns the
    /// `(removed, inserted)` char counts at the position it was given.
    fn edit_each(&mut self, mut edit: impl FnMut(&mut Text, usize) -> (usize, usize)) {
        for i in (0..self.cursors.len()).rev() {
            let at = self.cursors[i].pos();
            let (removed, inserted) = edit(&mut self.text, at);
            for cursor in &mut self.cursors {
                cursor.shift(at, removed, inserted);
            }
        }
    }
}

impl View for EditorView {
    fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    fn selection_start(&mut self, index: usize) {
        if let Some(cursor) = self.cursors.get_mut(index) {
            cursor.start_selection();
        }
    }

    fn selection_save(&mut self) {
        self.saved = self.selections();
    }

    fn selections_clear(&mut self) {
        for cursor in &mut self.cursors {
            cursor.clear_selection();
        }
        self.linewise = false;
    }

    fn cursor_get(&self) -> usize {
        self.cursors.first().map_or(0, Cursor::pos)
    }

    fn cursor_to(&mut self, pos: usize) {
        let pos = pos.min(self.text.len_chars());
        if let Some(primary) = self.cursors.first_mut() {
            primary.set_pos(pos);
        }
        self.linewise = false;
    }

    fn motion_nop(&mut self) {
        trace!("null motion");
        self.linewise = true;
    }

    fn insert(&mut self, text: &str) {
        self.edit_each(|t, at| (0, t.insert(at, text)));
    }

    fn replace(&mut self, text: &str) {
        self.edit_each(|t, at| t.overwrite(at, text));
    }

    fn checkpoint(&mut self) {
        self.text.checkpoint();
    }
}

// ---------------------------------------------------------------------------
// SharedView
// ---------------------------------------------------------------------------

/// A shared handle to an [`EditorView`].
#[derive(Clone)]
pub struct SharedView(Rc<RefCell<EditorView>>);

impl SharedView {
    #[must_use]
    pub fn new(view: EditorView) -> Self {
        Self(Rc::new(RefCell::new(view)))
    }

    /// Borrow the view. Must not be held across calls into the `Vis` that
    /// owns the other handle.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, EditorView> {
        self.0.borrow()
    }

    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, EditorView> {
        self.0.borrow_mut()
    }
}

impl View for SharedView {
    fn cursor_count(&self) -> usize {
        self.0.borrow().cursor_count()
    }

    fn selection_start(&mut self, index: usize) {
        self.0.borrow_mut().selection_start(index);
    }

    fn selection_save(&mut self) {
        self.0.borrow_mut().selection_save();
    }

    fn selections_clear(&mut self) {
        self.0.borrow_mut().selections_clear();
    }

    fn cursor_get(&self) -> usize {
        self.0.borrow().cursor_get()
    }

    fn cursor_to(&mut self, pos: usize) {
        self.0.borrow_mut().cursor_to(pos);
    }

    fn motion_nop(&mut self) {
        self.0.borrow_mut().motion_nop();
    }

    fn insert(&mut self, text: &str) {
        self.0.borrow_mut().insert(text);
    }

    fn replace(&mut self, text: &str) {
        self.0.borrow_mut().replace(text);
    }

    fn checkpoint(&mut self) {
        self.0.borrow_mut().checkpoint();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(src: &str, cursors: &[usize]) -> EditorView {
        EditorView::with_cursors(Text::from_text(src), cursors.iter().copied())
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn cursors_are_sorted_clamped_and_unique() {
        let v = view("abc", &[9, 1, 1, 0]);
        let positions: Vec<_> = v.cursors().iter().map(Cursor::pos).collect();
        assert_eq!(positions, vec![0, 1, 3]);
        let empty = EditorView::with_cursors(Text::new(), []);
        assert_eq!(empty.cursor_count(), 1);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_at_every_cursor() {
        let mut v = view("ab\ncd", &[0, 3]);
        v.insert("> ");
        assert_eq!(v.text().to_string(), "> ab\n> cd");
        let positions: Vec<_> = v.cursors().iter().map(Cursor::pos).collect();
        assert_eq!(positions, vec![2, 7]);
    }

    #[test]
    fn typing_keeps_cursors_after_text() {
        let mut v = view("", &[0]);
        for key in ["h", "é", "y"] {
            v.insert(key);
        }
        assert_eq!(v.text().to_string(), "héy");
        assert_eq!(v.cursor_get(), 3);
    }

    #[test]
    fn replace_at_every_cursor() {
        let mut v = view("abc\ndef", &[0, 4]);
        v.replace("X");
        v.replace("Y");
        assert_eq!(v.text().to_string(), "XYc\nXYf");
        let positions: Vec<_> = v.cursors().iter().map(Cursor::pos).collect();
        assert_eq!(positions, vec![2, 6]);
    }

    // -- Selections ---------------------------------------------------------

    #[test]
    fn linewise_selection_covers_lines() {
        let mut v = view("one\ntwo\nthree", &[5]);
        v.selection_start(0);
        assert_eq!(v.selections(), vec![5..6]);
        v.motion_nop();
        assert_eq!(v.selections(), vec![4..8]);
        v.cursor_to(v.cursor_get());
        assert_eq!(v.selections(), vec![5..6]);
    }

    #[test]
    fn save_then_clear() {
        let mut v = view("abc", &[1]);
        v.selection_start(0);
        v.cursor_to(2);
        v.selection_save();
        v.selections_clear();
        assert!(v.selections().is_empty());
        assert_eq!(v.saved_selections(), &[1..3]);
    }

    #[test]
    fn selection_start_out_of_range_is_ignored() {
        let mut v = view("abc", &[1]);
        v.selection_start(5);
        assert!(v.selections().is_empty());
    }

    // -- Undo ---------------------------------------------------------------

    #[test]
    fn shared_handles_see_the_same_view() {
        let shared = SharedView::new(view("", &[0]));
        let mut boxed: Box<dyn View> = Box::new(shared.clone());
        boxed.insert("hi");
        assert_eq!(shared.borrow().text().to_string(), "hi");
        shared.borrow_mut().undo();
        assert_eq!(boxed.cursor_get(), 0);
    }

    #[test]
    fn undo_returns_to_checkpoint() {
        let mut v = view("ab", &[2]);
        v.insert("c");
        v.checkpoint();
        v.insert("d");
        assert!(v.undo());
        assert_eq!(v.text().to_string(), "abc");
        assert!(v.undo());
        assert_eq!(v.text().to_string(), "ab");
        assert_eq!(v.cursor_get(), 2);
        assert!(!v.undo());
    }
}
