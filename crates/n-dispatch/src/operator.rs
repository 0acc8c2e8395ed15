//! Operators and the pending/repeatable action state.
//!
//! An operator (`d`, `c`, `y`, `<`, `>`) waits in operator-pending mode for
//! the motion or text object it applies to. Completing that grammar is the
//! job of the key resolution layer; this crate only tracks *whether* an
//! operator is pending and what the last repeatable action was.

use std::fmt;

use crate::mode::ModeId;

/// An operator that can be pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Delete,
    Change,
    Yank,
    ShiftLeft,
    ShiftRight,
    /// Pseudo-operator recorded when an insert or replace session is the
    /// repeatable action.
    ModeSwitch,
}

impl Operator {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Change => "change",
            Self::Yank => "yank",
            Self::ShiftLeft => "shift-left",
            Self::ShiftRight => "shift-right",
            Self::ModeSwitch => "mode-switch",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The action being assembled from keystrokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingAction {
    /// The operator waiting for its motion, if any.
    pub op: Option<Operator>,
}

impl PendingAction {
    /// Forget everything assembled so far.
    pub const fn reset(&mut self) {
        self.op = None;
    }
}

/// Description of the last repeatable action (what `.` would replay).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repeat {
    pub op: Option<Operator>,
    /// Mode the action switches into, for [`Operator::ModeSwitch`].
    pub mode: Option<ModeId>,
    /// True when the keys typed during the action live in the macro
    /// recorder's last recording.
    pub macro_linked: bool,
}

impl Repeat {
    pub const fn reset(&mut self) {
        *self = Self {
            op: None,
            mode: None,
            macro_linked: false,
        };
    }
}
