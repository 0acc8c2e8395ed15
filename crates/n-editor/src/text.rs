//! Text — a rope with undo checkpoints.
//!
//! A `Text` wraps a [`ropey::Rope`] with the handful of edits the modal
//! core needs (insert and overwrite at a char index) and a stack of
//! checkpoints: committed snapshots that undo can return to.
//!
//! # Design choices
//!
//! - **Positions are char indices** into the rope. Byte offsets never leak
//!   into the public API.
//!
//! - **Checkpoints are rope clones.** Ropey shares unchanged chunks between
//!   clones, so a snapshot costs roughly the size of what was edited since
//!   the previous one.
//!
//! - **Empty checkpoints are skipped.** Committing a checkpoint when nothing
//!   changed since the last one records nothing, so idle timers firing on
//!   an untouched buffer do not pile up identical undo states.

use std::fmt;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::Rope;
use tracing::trace;

/// Rope-backed text with undo checkpoints.
pub struct Text {
    rope: Rope,
    path: Option<PathBuf>,

    /// Committed snapshots, oldest first. The initial content is always the
    /// first entry.
    checkpoints: Vec<Rope>,
}

impl Text {
    // -- Construction -------------------------------------------------------

    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Text with the given initial content.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        Self {
            checkpoints: vec![rope.clone()],
            rope,
            path: None,
        }
    }

    /// Load text from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::from_text(&text)
        })
    }

    // -- Access -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The line containing char index `idx` (clamped to the end).
    #[must_use]
    pub fn line_of(&self, idx: usize) -> usize {
        self.rope.char_to_line(idx.min(self.rope.len_chars()))
    }

    /// Char range of `line`, excluding its line ending.
    #[must_use]
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        while len > 0 && matches!(slice.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        start..start + len
    }

    /// Char range covering every full line touched by `range`, including
    /// the last line's line ending.
    #[must_use]
    pub fn line_extent(&self, range: Range<usize>) -> Range<usize> {
        let first = self.line_of(range.start);
        let last = self.line_of(range.end.saturating_sub(1).max(range.start));
        let start = self.rope.line_to_char(first);
        let end = self.rope.line_to_char(last) + self.rope.line(last).len_chars();
        start..end
    }

    /// The contents of `range` as a string.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> String {
        self.rope.slice(range).to_string()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at char index `idx` (clamped to the end). Returns the
    /// number of chars inserted.
    pub fn insert(&mut self, idx: usize, text: &str) -> usize {
        let idx = idx.min(self.rope.len_chars());
        self.rope.insert(idx, text);
        text.chars().count()
    }

    /// Overwrite chars at `idx` with `text`, never past the end of the line:
    /// typing over a line ending appends instead. Returns `(removed,
    /// inserted)` char counts.
    pub fn overwrite(&mut self, idx: usize, text: &str) -> (usize, usize) {
        let idx = idx.min(self.rope.len_chars());
        let line_end = self.line_range(self.line_of(idx)).end;
        let inserted = text.chars().count();
        let removed = inserted.min(line_end.saturating_sub(idx));
        self.rope.remove(idx..idx + removed);
        self.rope.insert(idx, text);
        (removed, inserted)
    }

    // -- Checkpoints --------------------------------------------------------

    /// Commit a checkpoint of the current content. Returns `false` if
    /// nothing changed since the last one.
    pub fn checkpoint(&mut self) -> bool {
        if self.checkpoints.last() == Some(&self.rope) {
            return false;
        }
        self.checkpoints.push(self.rope.clone());
        trace!(count = self.checkpoints.len(), "checkpoint");
        true
    }

    /// Go back to the last checkpoint, discarding uncommitted edits. If
    /// there are none, go back one checkpoint further. Returns `false` when
    /// already at the initial content.
    pub fn restore_checkpoint(&mut self) -> bool {
        if self.checkpoints.last() != Some(&self.rope) {
            if let Some(last) = self.checkpoints.last() {
                self.rope = last.clone();
                return true;
            }
        }
        if self.checkpoints.len() <= 1 {
            return false;
        }
        self.checkpoints.pop();
        if let Some(prev) = self.checkpoints.last() {
            self.rope = prev.clone();
        }
        true
    }

    /// Number of committed checkpoints, counting the initial content.
    #[must_use]
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// True if the content differs from the last checkpoint.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.checkpoints.last() != Some(&self.rope)
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("len_chars", &self.rope.len_chars())
            .field("path", &self.path)
            .field("checkpoints", &self.checkpoints.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Lines --------------------------------------------------------------

    #[test]
    fn line_range_excludes_line_ending() {
        let text = Text::from_text("ab\r\ncd\nef");
        assert_eq!(text.line_range(0), 0..2);
        assert_eq!(text.line_range(1), 4..6);
        assert_eq!(text.line_range(2), 7..9);
    }

    #[test]
    fn line_extent_covers_whole_lines() {
        let text = Text::from_text("one\ntwo\nthree\n");
        assert_eq!(text.line_extent(1..2), 0..4);
        assert_eq!(text.line_extent(2..6), 0..8);
        assert_eq!(text.line_extent(9..9), 8..14);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_clamps_and_counts_chars() {
        let mut text = Text::from_text("hi");
        assert_eq!(text.insert(99, "é!"), 2);
        assert_eq!(text.to_string(), "hié!");
    }

    #[test]
    fn overwrite_stops_at_line_end() {
        let mut text = Text::from_text("abc\ndef");
        assert_eq!(text.overwrite(1, "XY"), (2, 2));
        assert_eq!(text.to_string(), "aXY\ndef");
        assert_eq!(text.overwrite(3, "Z"), (0, 1));
        assert_eq!(text.to_string(), "aXYZ\ndef");
        assert_eq!(text.overwrite(6, "QRS"), (2, 3));
        assert_eq!(text.to_string(), "aXYZ\ndQRS");
    }

    // -- Checkpoints --------------------------------------------------------

    #[test]
    fn checkpoint_only_records_changes() {
        let mut text = Text::from_text("a");
        assert!(!text.checkpoint());
        text.insert(1, "b");
        assert!(text.is_dirty());
        assert!(text.checkpoint());
        assert!(!text.checkpoint());
        assert_eq!(text.checkpoint_count(), 2);
    }

    #[test]
    fn restore_discards_uncommitted_then_steps_back() {
        let mut text = Text::from_text("a");
        text.insert(1, "b");
        text.checkpoint();
        text.insert(2, "c");

        assert!(text.restore_checkpoint());
        assert_eq!(text.to_string(), "ab");
        assert!(text.restore_checkpoint());
        assert_eq!(text.to_string(), "a");
        assert!(!text.restore_checkpoint());
        assert_eq!(text.to_string(), "a");
    }

    #[test]
    fn from_file_nonexistent() {
        assert!(Text::from_file(Path::new("/nonexistent/n-modal.txt")).is_err());
    }
}
