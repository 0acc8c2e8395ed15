//! Mode hook bodies.
//!
//! | Mode              | enter                         | leave                      | input          | idle       |
//! |-------------------|-------------------------------|----------------------------|----------------|------------|
//! | `OPERATOR-PENDING`| —                             | —                          | cancel         | —          |
//! | `VISUAL`          | start selections              | save + clear selections    | —              | —          |
//! | `VISUAL LINE`     | as visual, then null motion   | as visual, or re-seat      | —              | —          |
//! | `INSERT`          | start repeat + recording      | checkpoint + stop (normal) | insert text    | checkpoint |
//! | `REPLACE`         | as insert                     | as insert                  | overwrite text | checkpoint |
//!
//! Visual hooks only act when crossing the visual/non-visual boundary, so
//! moving between the two visual modes keeps the selections intact.

use tracing::debug;

use crate::key;
use crate::mode::ModeId;
use crate::operator::Operator;
use crate::vis::Vis;

// ---------------------------------------------------------------------------
// Operator-pending
// ---------------------------------------------------------------------------

/// A key that reaches operator-pending mode unclaimed is not a motion: the
/// operator is abandoned and the mode it started from restored.
pub fn operator_input(vis: &mut Vis, keys: &str) {
    debug!(keys, "invalid motion for pending operator");
    vis.cancel();
    vis.mode_switch(vis.mode_prev());
}

// ---------------------------------------------------------------------------
// Visual
// ---------------------------------------------------------------------------

fn is_visual(vis: &Vis, id: ModeId) -> bool {
    vis.modes()[id].visual
}

pub fn visual_enter(vis: &mut Vis, old: ModeId) {
    if is_visual(vis, old) {
        return;
    }
    let view = vis.view_mut();
    for i in 0..view.cursor_count() {
        view.selection_start(i);
    }
}

pub fn visual_leave(vis: &mut Vis, new: ModeId) {
    if is_visual(vis, new) {
        return;
    }
    let view = vis.view_mut();
    view.selection_save();
    view.selections_clear();
}

pub fn visual_line_enter(vis: &mut Vis, old: ModeId) {
    visual_enter(vis, old);
    if vis.pending().is_none() {
        vis.view_mut().motion_nop();
    }
}

pub fn visual_line_leave(vis: &mut Vis, new: ModeId) {
    if is_visual(vis, new) {
        // Back to character-wise: drop the line extension.
        let view = vis.view_mut();
        let pos = view.cursor_get();
        view.cursor_to(pos);
    } else {
        visual_leave(vis, new);
    }
}

// ---------------------------------------------------------------------------
// Insert / Replace
// ---------------------------------------------------------------------------

/// Start an editing session in `mode`. Sessions in embedded windows are
/// neither repeatable nor recorded.
fn edit_enter(vis: &mut Vis, mode: ModeId) {
    if vis.window().is_embedded() {
        return;
    }
    if vis.pending().is_none() {
        let repeat = vis.repeat_mut();
        repeat.reset();
        repeat.op = Some(Operator::ModeSwitch);
        repeat.mode = Some(mode);
    }
    if !vis.recorder().is_recording() {
        vis.recorder_mut().begin();
        vis.repeat_mut().macro_linked = true;
    }
}

fn edit_leave(vis: &mut Vis, new: ModeId) {
    if new == ModeId::Normal {
        vis.view_mut().checkpoint();
        vis.recorder_mut().end();
    }
}

pub fn insert_enter(vis: &mut Vis, _old: ModeId) {
    edit_enter(vis, ModeId::Insert);
}

pub fn insert_leave(vis: &mut Vis, new: ModeId) {
    edit_leave(vis, new);
}

pub fn insert_input(vis: &mut Vis, keys: &str) {
    if !key::is_special(keys) {
        vis.view_mut().insert(keys);
    }
}

pub fn insert_idle(vis: &mut Vis) {
    vis.view_mut().checkpoint();
}

pub fn replace_enter(vis: &mut Vis, _old: ModeId) {
    edit_enter(vis, ModeId::Replace);
}

pub fn replace_leave(vis: &mut Vis, new: ModeId) {
    edit_leave(vis, new);
}

pub fn replace_input(vis: &mut Vis, keys: &str) {
    if !key::is_special(keys) {
        vis.view_mut().replace(keys);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
