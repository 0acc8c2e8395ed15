//! The modal core driving a real editing surface.

use std::time::{Duration, Instant};

use n_dispatch::builtin;
use n_dispatch::{ModeId, Vis, Window};
use n_editor::{EditorView, SharedView, Text};
use pretty_assertions::assert_eq;

fn setup(src: &str, cursors: &[usize]) -> (Vis, SharedView) {
    let view = SharedView::new(EditorView::with_cursors(
        Text::from_text(src),
        cursors.iter().copied(),
    ));
    let mut vis = Vis::new(Window::new(Box::new(view.clone())));
    builtin::bind_defaults(&mut vis).unwrap();
    (vis, view)
}

#[test]
fn insert_at_two_cursors() {
    let (mut vis, view) = setup("a\nb", &[0, 2]);
    vis.keys("i- <Escape>");
    assert_eq!(vis.mode(), ModeId::Normal);
    assert_eq!(view.borrow().text().to_string(), "- a\n- b");
    assert_eq!(vis.recorder().last(), Some("- <Escape>"));
}

#[test]
fn idle_checkpoints_are_undo_steps() {
    let (mut vis, view) = setup("hello", &[0]);
    vis.keys("RJ");
    assert!(vis.tick(Instant::now() + Duration::from_secs(5)));
    vis.keys("E<Escape>");
    assert_eq!(view.borrow().text().to_string(), "JEllo");

    let mut editor = view.borrow_mut();
    assert_eq!(editor.text().checkpoint_count(), 3);
    assert!(editor.undo());
    assert_eq!(editor.text().to_string(), "Jello");
    assert!(editor.undo());
    assert_eq!(editor.text().to_string(), "hello");
}

#[test]
fn visual_line_selection_saved_on_escape() {
    let (mut vis, view) = setup("one\ntwo\nthree", &[5]);
    vis.keys("V");
    assert_eq!(view.borrow().selections(), vec![4..8]);
    vis.keys("v");
    assert_eq!(view.borrow().selections(), vec![5..6]);
    vis.keys("V<Escape>");
    assert_eq!(vis.mode(), ModeId::Normal);
    assert!(view.borrow().selections().is_empty());
    assert_eq!(view.borrow().saved_selections(), &[4..8]);
}

#[test]
fn operator_cancel_keeps_text() {
    let (mut vis, view) = setup("keep", &[0]);
    vis.keys("dq");
    assert_eq!(vis.mode(), ModeId::Normal);
    assert_eq!(view.borrow().text().to_string(), "keep");
}
