//! Drives the dispatch core through its public API only.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use n_dispatch::builtin;
use n_dispatch::{Arg, KeyBinding, MapError, ModeId, View, Vis, Window};
use pretty_assertions::assert_eq;

/// A single-line buffer with one cursor, sharing its text with the test.
struct LineView {
    text: Rc<RefCell<String>>,
    checkpoints: Rc<RefCell<usize>>,
}

impl View for LineView {
    fn cursor_count(&self) -> usize {
        1
    }
    fn selection_start(&mut self, _index: usize) {}
    fn selection_save(&mut self) {}
    fn selections_clear(&mut self) {}
    fn cursor_get(&self) -> usize {
        self.text.borrow().len()
    }
    fn cursor_to(&mut self, _pos: usize) {}
    fn motion_nop(&mut self) {}
    fn insert(&mut self, text: &str) {
        self.text.borrow_mut().push_str(text);
    }
    fn replace(&mut self, text: &str) {
        let mut buf = self.text.borrow_mut();
        buf.pop();
        buf.push_str(text);
    }
    fn checkpoint(&mut self) {
        *self.checkpoints.borrow_mut() += 1;
    }
}

struct Harness {
    vis: Vis,
    text: Rc<RefCell<String>>,
    checkpoints: Rc<RefCell<usize>>,
}

fn harness() -> Harness {
    let text = Rc::new(RefCell::new(String::from("line")));
    let checkpoints = Rc::new(RefCell::new(0));
    let view = LineView {
        text: Rc::clone(&text),
        checkpoints: Rc::clone(&checkpoints),
    };
    let mut vis = Vis::new(Window::new(Box::new(view)));
    builtin::bind_defaults(&mut vis).unwrap();
    Harness {
        vis,
        text,
        checkpoints,
    }
}

fn delete_line(vis: &mut Vis, _: &Arg) {
    vis.view_mut().insert(" [deleted]");
}

fn delete_line_v2(vis: &mut Vis, _: &Arg) {
    vis.view_mut().insert(" [deleted v2]");
}

#[test]
fn dd_binding_lifecycle() {
    let mut h = harness();

    let first = h
        .vis
        .action_new(None, Some("delete line"), delete_line, Arg::None)
        .unwrap();
    h.vis
        .mode_map(ModeId::Normal, false, "dd", KeyBinding::new(Rc::clone(&first)))
        .unwrap();

    let second = h
        .vis
        .action_new(None, Some("delete line"), delete_line_v2, Arg::None)
        .unwrap();
    let err = h
        .vis
        .mode_map(ModeId::Normal, false, "dd", KeyBinding::new(Rc::clone(&second)))
        .unwrap_err();
    assert_eq!(err, MapError::Exists("dd".into()));
    assert!(h.vis.actions().contains(&first));
    assert!(!h.vis.actions().contains(&second));

    h.vis.keys("dd");
    assert_eq!(*h.text.borrow(), "line [deleted]");

    let third = h
        .vis
        .action_new(None, Some("delete line"), delete_line_v2, Arg::None)
        .unwrap();
    h.vis
        .mode_map(ModeId::Normal, true, "dd", KeyBinding::new(Rc::clone(&third)))
        .unwrap();
    assert!(!h.vis.actions().contains(&first));
    assert_eq!(Rc::strong_count(&first), 1);
    assert!(h.vis.actions().contains(&third));

    h.vis.keys("dd");
    assert_eq!(*h.text.borrow(), "line [deleted] [deleted v2]");
    assert_eq!(h.vis.mode(), ModeId::Normal);
}

#[test]
fn single_d_still_starts_operator_after_timeout() {
    let mut h = harness();
    let action = h
        .vis
        .action_new(None, Some("delete line"), delete_line, Arg::None)
        .unwrap();
    h.vis
        .mode_map(ModeId::Normal, false, "dd", KeyBinding::new(action))
        .unwrap();

    h.vis.keys("d");
    assert_eq!(h.vis.mode(), ModeId::Normal);
    h.vis.keys_flush();
    assert_eq!(h.vis.mode(), ModeId::OperatorPending);
    h.vis.keys("w");
    assert_eq!(h.vis.mode(), ModeId::Normal);
    assert_eq!(h.vis.pending(), None);
}

#[test]
fn insert_session_with_idle_checkpoints() {
    let mut h = harness();
    let statuses = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&statuses);
    h.vis.on_status(move |mode| sink.borrow_mut().push(mode.name));

    h.vis.keys("i!!");
    let now = Instant::now();
    for secs in 0..10 {
        h.vis.tick(now + Duration::from_secs(secs));
    }
    assert_eq!(*h.checkpoints.borrow(), 1);

    h.vis.keys("?<Escape>");
    assert_eq!(*h.text.borrow(), "line!!?");
    assert_eq!(*h.checkpoints.borrow(), 2);
    assert_eq!(h.vis.recorder().last(), Some("!!?<Escape>"));
    assert_eq!(*statuses.borrow(), vec!["INSERT", "NORMAL"]);
}

#[test]
fn replace_overwrites() {
    let mut h = harness();
    h.vis.keys("RE<Escape>");
    assert_eq!(*h.text.borrow(), "linE");
}

#[test]
fn fallback_key_rebinds_without_force() {
    let mut h = harness();
    h.vis
        .mode_map(ModeId::Normal, false, "<", KeyBinding::builtin(&builtin::MODE_INSERT))
        .unwrap();
    h.vis
        .mode_map(ModeId::Normal, false, "<", KeyBinding::builtin(&builtin::MODE_REPLACE))
        .unwrap();
    h.vis.keys("<");
    assert_eq!(h.vis.mode(), ModeId::Replace);
}

#[test]
fn embedded_window_does_not_record() {
    let text = Rc::new(RefCell::new(String::new()));
    let view = LineView {
        text: Rc::clone(&text),
        checkpoints: Rc::new(RefCell::new(0)),
    };
    let mut vis = Vis::new(Window::embedded(Box::new(view)));
    builtin::bind_defaults(&mut vis).unwrap();

    vis.keys("iquery<Escape>");
    assert_eq!(*text.borrow(), "query");
    assert_eq!(vis.recorder().last(), None);
    assert_eq!(vis.repeat().op, None);
}
