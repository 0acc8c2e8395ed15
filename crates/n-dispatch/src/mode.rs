//! The mode catalogue.
//!
//! The editor is always in exactly one mode. Each [`Mode`] carries its key
//! bindings, an optional parent whose bindings and hooks it falls back to,
//! and up to four lifecycle hooks:
//!
//! | Hook    | Called when                                          |
//! |---------|------------------------------------------------------|
//! | `enter` | the mode becomes active (argument: the old mode)     |
//! | `leave` | the mode stops being active (argument: the new mode) |
//! | `input` | a key reaches the mode without matching a binding    |
//! | `idle`  | no key arrived for `idle_timeout`                    |
//!
//! | Mode              | Parent   | Visual | Idle timeout |
//! |-------------------|----------|--------|--------------|
//! | `NORMAL`          | —        | no     | —            |
//! | `OPERATOR-PENDING`| —        | no     | —            |
//! | `VISUAL`          | —        | yes    | —            |
//! | `VISUAL LINE`     | `VISUAL` | yes    | —            |
//! | `INSERT`          | —        | no     | 3s           |
//! | `REPLACE`         | `INSERT` | no     | 3s           |
//!
//! [`Modes`] is the table of all modes, built once per editor context.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use std::time::Duration;

use crate::behavior;
use crate::keymap::KeyMap;
use crate::vis::Vis;

/// How long insert-like modes wait before checkpointing.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// ModeId
// ---------------------------------------------------------------------------

/// Identifies one of the editing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModeId {
    Normal,
    OperatorPending,
    Visual,
    VisualLine,
    Insert,
    Replace,
}

impl ModeId {
    /// Number of modes.
    pub const COUNT: usize = 6;

    /// Every mode, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Normal,
        Self::OperatorPending,
        Self::Visual,
        Self::VisualLine,
        Self::Insert,
        Self::Replace,
    ];

    /// The mode with the given index, or `None` if out of range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used in rc files (`visual-line`).
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::OperatorPending => "operator-pending",
            Self::Visual => "visual",
            Self::VisualLine => "visual-line",
            Self::Insert => "insert",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

impl FromStr for ModeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|m| m.config_name() == s).ok_or(())
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Called on entering a mode with the mode that was left.
pub type EnterFn = fn(&mut Vis, ModeId);
/// Called on leaving a mode with the mode being entered.
pub type LeaveFn = fn(&mut Vis, ModeId);
/// Called with a key no binding claimed.
pub type InputFn = fn(&mut Vis, &str);
/// Called once the idle timeout elapses without input.
pub type IdleFn = fn(&mut Vis);

/// The lifecycle hooks of a mode. Absent hooks are `None`.
#[derive(Clone, Copy, Default)]
pub struct ModeHooks {
    pub enter: Option<EnterFn>,
    pub leave: Option<LeaveFn>,
    pub input: Option<InputFn>,
    pub idle: Option<IdleFn>,
}

impl ModeHooks {
    /// Field-wise fallback: each hook of `self`, or `other`'s where `self`
    /// has none.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            enter: self.enter.or(other.enter),
            leave: self.leave.or(other.leave),
            input: self.input.or(other.input),
            idle: self.idle.or(other.idle),
        }
    }
}

impl fmt::Debug for ModeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeHooks")
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .field("input", &self.input.is_some())
            .field("idle", &self.idle.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// One editing mode.
#[derive(Debug)]
pub struct Mode {
    pub id: ModeId,
    /// Human-readable name (`VISUAL LINE`).
    pub name: &'static str,
    /// Label for the status line, if the mode shows one.
    pub status: Option<&'static str>,
    /// Mode whose bindings and hooks this one falls back to.
    pub parent: Option<ModeId>,
    /// True for modes that produce a selection.
    pub visual: bool,
    /// Idle period before the idle hook fires. Zero disables it.
    pub idle_timeout: Duration,
    pub hooks: ModeHooks,
    /// Created on first bind.
    pub bindings: Option<KeyMap>,
}

impl Mode {
    const fn new(id: ModeId, name: &'static str) -> Self {
        Self {
            id,
            name,
            status: None,
            parent: None,
            visual: false,
            idle_timeout: Duration::ZERO,
            hooks: ModeHooks {
                enter: None,
                leave: None,
                input: None,
                idle: None,
            },
            bindings: None,
        }
    }

    fn operator_pending() -> Self {
        Self {
            hooks: ModeHooks {
                input: Some(behavior::operator_input),
                ..ModeHooks::default()
            },
            ..Self::new(ModeId::OperatorPending, "OPERATOR-PENDING")
        }
    }

    fn visual() -> Self {
        Self {
            status: Some("VISUAL"),
            visual: true,
            hooks: ModeHooks {
                enter: Some(behavior::visual_enter),
                leave: Some(behavior::visual_leave),
                ..ModeHooks::default()
            },
            ..Self::new(ModeId::Visual, "VISUAL")
        }
    }

    fn visual_line() -> Self {
        Self {
            status: Some("VISUAL-LINE"),
            parent: Some(ModeId::Visual),
            visual: true,
            hooks: ModeHooks {
                enter: Some(behavior::visual_line_enter),
                leave: Some(behavior::visual_line_leave),
                ..ModeHooks::default()
            },
            ..Self::new(ModeId::VisualLine, "VISUAL LINE")
        }
    }

    fn insert() -> Self {
        Self {
            status: Some("INSERT"),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            hooks: ModeHooks {
                enter: Some(behavior::insert_enter),
                leave: Some(behavior::insert_leave),
                input: Some(behavior::insert_input),
                idle: Some(behavior::insert_idle),
            },
            ..Self::new(ModeId::Insert, "INSERT")
        }
    }

    fn replace() -> Self {
        Self {
            status: Some("REPLACE"),
            parent: Some(ModeId::Insert),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            hooks: ModeHooks {
                enter: Some(behavior::replace_enter),
                leave: Some(behavior::replace_leave),
                input: Some(behavior::replace_input),
                idle: Some(behavior::insert_idle),
            },
            ..Self::new(ModeId::Replace, "REPLACE")
        }
    }

    /// The status label, falling back to nothing for modes without one.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.status.unwrap_or("")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// The table of every mode, indexed by [`ModeId`].
#[derive(Debug)]
pub struct Modes {
    table: [Mode; ModeId::COUNT],
}

impl Modes {
    /// The default catalogue with no bindings installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: [
                Mode::new(ModeId::Normal, "NORMAL"),
                Mode::operator_pending(),
                Mode::visual(),
                Mode::visual_line(),
                Mode::insert(),
                Mode::replace(),
            ],
        }
    }

    /// `id` followed by its parent, if any.
    pub fn chain(&self, id: ModeId) -> impl Iterator<Item = ModeId> {
        std::iter::once(id).chain(self[id].parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mode> {
        self.table.iter()
    }
}

impl Default for Modes {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<ModeId> for Modes {
    type Output = Mode;

    fn index(&self, id: ModeId) -> &Mode {
        &self.table[id.index()]
    }
}

impl IndexMut<ModeId> for Modes {
    fn index_mut(&mut self, id: ModeId) -> &mut Mode {
        &mut self.table[id.index()]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
