//! Windows — the surface modes act on, plus per-window mode overrides.
//!
//! The dispatch core never touches text or cursors directly. Everything a
//! mode hook does to the document goes through the [`View`] trait, which the
//! embedding editor implements (see the `n-editor` crate for a rope-backed
//! implementation).
//!
//! A [`Window`] also carries a private override table: bindings, hooks and
//! idle timeouts set there shadow the shared [`Modes`](crate::mode::Modes) table for this
//! window only, without mutating it.

use std::array;
use std::time::Duration;

use crate::keymap::KeyMap;
use crate::mode::{ModeHooks, ModeId};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// The editing surface the mode hooks drive.
///
/// Cursors are addressed by index `0..cursor_count()`, in document order;
/// iterating that range visits each active cursor once and can be repeated.
/// Positions are opaque offsets chosen by the implementation.
pub trait View {
    // -- Cursors and selections --------------------------------------------

    /// Number of active cursors (at least one).
    fn cursor_count(&self) -> usize;

    /// Anchor a selection at the current position of cursor `index`.
    fn selection_start(&mut self, index: usize);

    /// Remember the current selections so they can be restored later.
    fn selection_save(&mut self);

    /// Drop every live selection, keeping the cursors.
    fn selections_clear(&mut self);

    /// Position of the primary cursor.
    fn cursor_get(&self) -> usize;

    /// Move the primary cursor to `pos`.
    fn cursor_to(&mut self, pos: usize);

    /// Apply a motion that does not move the cursor. In a line-wise visual
    /// mode this extends the selections to whole lines.
    fn motion_nop(&mut self);

    // -- Text ---------------------------------------------------------------

    /// Insert `text` at every cursor.
    fn insert(&mut self, text: &str);

    /// Overwrite with `text` at every cursor.
    fn replace(&mut self, text: &str);

    /// Commit a snapshot of the text that undo can return to.
    fn checkpoint(&mut self);
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Per-window replacement for one mode's bindings, hooks and idle timeout.
#[derive(Debug, Default)]
pub struct ModeOverride {
    /// Created on first bind.
    pub bindings: Option<KeyMap>,
    /// Hooks set here win over the shared mode's, field by field.
    pub hooks: ModeHooks,
    /// Replaces the shared mode's idle timeout. `Some(Duration::ZERO)`
    /// disables idling in this window.
    pub idle_timeout: Option<Duration>,
}

/// A window: a [`View`] plus the window's private mode overrides.
pub struct Window {
    view: Box<dyn View>,
    embedded: bool,
    modes: [ModeOverride; ModeId::COUNT],
}

impl Window {
    /// A top-level window.
    #[must_use]
    pub fn new(view: Box<dyn View>) -> Self {
        Self {
            view,
            embedded: false,
            modes: array::from_fn(|_| ModeOverride::default()),
        }
    }

    /// A window embedded in another one, such as a command prompt. Insert
    /// and replace sessions there are not recorded or repeatable.
    #[must_use]
    pub fn embedded(view: Box<dyn View>) -> Self {
        Self {
            embedded: true,
            ..Self::new(view)
        }
    }

    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    #[must_use]
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        self.view.as_mut()
    }

    #[must_use]
    pub fn mode(&self, id: ModeId) -> &ModeOverride {
        &self.modes[id.index()]
    }

    pub fn mode_mut(&mut self, id: ModeId) -> &mut ModeOverride {
        &mut self.modes[id.index()]
    }
}
