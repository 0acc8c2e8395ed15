//! Builtin actions and the default key bindings.
//!
//! Builtins are `static` values: they are never placed in the
//! [`ActionRegistry`](crate::action::ActionRegistry) and never freed. Each
//! one can also be triggered by name, e.g. `<vis-mode-insert>`.

use crate::action::{Arg, KeyAction};
use crate::binding::KeyBinding;
use crate::error::MapError;
use crate::mode::ModeId;
use crate::operator::Operator;
use crate::vis::Vis;

fn mode_switch(vis: &mut Vis, arg: &Arg) {
    if let Arg::Mode(mode) = arg {
        vis.mode_switch(*mode);
    }
}

fn operator(vis: &mut Vis, arg: &Arg) {
    if let Arg::Operator(op) = arg {
        vis.operator(*op);
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

pub static MODE_NORMAL: KeyAction =
    KeyAction::builtin("vis-mode-normal", "Enter normal mode", mode_switch, Arg::Mode(ModeId::Normal));
pub static MODE_INSERT: KeyAction =
    KeyAction::builtin("vis-mode-insert", "Enter insert mode", mode_switch, Arg::Mode(ModeId::Insert));
pub static MODE_REPLACE: KeyAction =
    KeyAction::builtin("vis-mode-replace", "Enter replace mode", mode_switch, Arg::Mode(ModeId::Replace));
pub static MODE_VISUAL: KeyAction = KeyAction::builtin(
    "vis-mode-visual",
    "Enter characterwise visual mode",
    mode_switch,
    Arg::Mode(ModeId::Visual),
);
pub static MODE_VISUAL_LINE: KeyAction = KeyAction::builtin(
    "vis-mode-visual-line",
    "Enter linewise visual mode",
    mode_switch,
    Arg::Mode(ModeId::VisualLine),
);
pub static MODE_OPERATOR_PENDING: KeyAction = KeyAction::builtin(
    "vis-mode-operator-pending",
    "Enter operator-pending mode",
    mode_switch,
    Arg::Mode(ModeId::OperatorPending),
);

pub static OPERATOR_DELETE: KeyAction =
    KeyAction::builtin("vis-operator-delete", "Delete operator", operator, Arg::Operator(Operator::Delete));
pub static OPERATOR_CHANGE: KeyAction =
    KeyAction::builtin("vis-operator-change", "Change operator", operator, Arg::Operator(Operator::Change));
pub static OPERATOR_YANK: KeyAction =
    KeyAction::builtin("vis-operator-yank", "Yank operator", operator, Arg::Operator(Operator::Yank));
pub static OPERATOR_SHIFT_LEFT: KeyAction = KeyAction::builtin(
    "vis-operator-shift-left",
    "Shift left operator",
    operator,
    Arg::Operator(Operator::ShiftLeft),
);
pub static OPERATOR_SHIFT_RIGHT: KeyAction = KeyAction::builtin(
    "vis-operator-shift-right",
    "Shift right operator",
    operator,
    Arg::Operator(Operator::ShiftRight),
);

/// Every builtin action.
pub static ACTIONS: [&KeyAction; 11] = [
    &MODE_NORMAL,
    &MODE_INSERT,
    &MODE_REPLACE,
    &MODE_VISUAL,
    &MODE_VISUAL_LINE,
    &MODE_OPERATOR_PENDING,
    &OPERATOR_DELETE,
    &OPERATOR_CHANGE,
    &OPERATOR_YANK,
    &OPERATOR_SHIFT_LEFT,
    &OPERATOR_SHIFT_RIGHT,
];

/// The builtin action called `name`.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static KeyAction> {
    ACTIONS.iter().copied().find(|action| action.name() == Some(name))
}

/// The builtin action switching to `mode`.
#[must_use]
pub fn mode_action(mode: ModeId) -> &'static KeyAction {
    match mode {
        ModeId::Normal => &MODE_NORMAL,
        ModeId::OperatorPending => &MODE_OPERATOR_PENDING,
        ModeId::Visual => &MODE_VISUAL,
        ModeId::VisualLine => &MODE_VISUAL_LINE,
        ModeId::Insert => &MODE_INSERT,
        ModeId::Replace => &MODE_REPLACE,
    }
}

// ---------------------------------------------------------------------------
// Default bindings
// ---------------------------------------------------------------------------

/// Bindings installed by [`bind_defaults`]. Replace and visual-line mode
/// reach the rest through their parents.
pub static DEFAULT_BINDINGS: &[(ModeId, &str, &KeyAction)] = &[
    (ModeId::Normal, "i", &MODE_INSERT),
    (ModeId::Normal, "R", &MODE_REPLACE),
    (ModeId::Normal, "v", &MODE_VISUAL),
    (ModeId::Normal, "V", &MODE_VISUAL_LINE),
    (ModeId::Normal, "d", &OPERATOR_DELETE),
    (ModeId::Normal, "c", &OPERATOR_CHANGE),
    (ModeId::Normal, "y", &OPERATOR_YANK),
    (ModeId::Normal, "<", &OPERATOR_SHIFT_LEFT),
    (ModeId::Normal, ">", &OPERATOR_SHIFT_RIGHT),
    (ModeId::Insert, "<Escape>", &MODE_NORMAL),
    (ModeId::Visual, "<Escape>", &MODE_NORMAL),
    (ModeId::Visual, "V", &MODE_VISUAL_LINE),
    (ModeId::VisualLine, "v", &MODE_VISUAL),
    (ModeId::VisualLine, "V", &MODE_NORMAL),
];

/// Install the default bindings into the shared mode tables.
pub fn bind_defaults(vis: &mut Vis) -> Result<(), MapError> {
    for &(mode, key, action) in DEFAULT_BINDINGS {
        vis.mode_map(mode, false, key, KeyBinding::builtin(action))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
