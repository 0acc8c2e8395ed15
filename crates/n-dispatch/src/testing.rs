//! Test support: a [`View`] that records every call it receives.

use std::cell::RefCell;
use std::rc::Rc;

use crate::vis::Vis;
use crate::window::{View, Window};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SelectionStart(usize),
    SelectionSave,
    SelectionsClear,
    CursorTo(usize),
    MotionNop,
    Insert(String),
    Replace(String),
    Checkpoint,
}

/// Shared handle to the calls a [`RecordingView`] received.
#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Call>>>);

impl Log {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

pub struct RecordingView {
    log: Log,
    cursors: usize,
    cursor: usize,
}

impl RecordingView {
    pub fn new(cursors: usize) -> (Self, Log) {
        let log = Log::default();
        let view = Self {
            log: log.clone(),
            cursors,
            cursor: 7,
        };
        (view, log)
    }
}

impl View for RecordingView {
    fn cursor_count(&self) -> usize {
        self.cursors
    }

    fn selection_start(&mut self, index: usize) {
        self.log.push(Call::SelectionStart(index));
    }

    fn selection_save(&mut self) {
        self.log.push(Call::SelectionSave);
    }

    fn selections_clear(&mut self) {
        self.log.push(Call::SelectionsClear);
    }

    fn cursor_get(&self) -> usize {
        self.cursor
    }

    fn cursor_to(&mut self, pos: usize) {
        self.cursor = pos;
        self.log.push(Call::CursorTo(pos));
    }

    fn motion_nop(&mut self) {
        self.log.push(Call::MotionNop);
    }

    fn insert(&mut self, text: &str) {
        self.log.push(Call::Insert(text.to_string()));
    }

    fn replace(&mut self, text: &str) {
        self.log.push(Call::Replace(text.to_string()));
    }

    fn checkpoint(&mut self) {
        self.log.push(Call::Checkpoint);
    }
}

/// A context over a top-level window with two cursors.
pub fn vis() -> (Vis, Log) {
    let (view, log) = RecordingView::new(2);
    (Vis::new(Window::new(Box::new(view))), log)
}

/// A context over an embedded window with one cursor.
pub fn embedded_vis() -> (Vis, Log) {
    let (view, log) = RecordingView::new(1);
    (Vis::new(Window::embedded(Box::new(view))), log)
}
