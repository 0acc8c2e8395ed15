//! # n-dispatch — modal input dispatch for n-modal
//!
//! The part of the editor that decides what a keystroke means:
//!
//! - **[`mode`]** — the six editing modes, their parents and hooks
//! - **[`vis`]** — the editor context: mode transitions, mapping, key input
//! - **[`keymap`]** / **[`binding`]** — per-mode key binding store
//! - **[`action`]** — actions and the registry of runtime-created ones
//! - **[`behavior`]** — what each mode does on enter, leave, input and idle
//! - **[`builtin`]** — builtin actions and the default bindings
//! - **[`config`]** — rc-file directives
//!
//! Text, cursors and undo live behind the [`window::View`] trait; the
//! `n-editor` crate provides a rope-backed implementation.
//!
//! ```text
//!   keys ──▶ Vis::keys ──▶ KeyMap lookup (window, mode, parent)
//!                           │            │
//!                      alias│            │action / unbound key
//!                           ▼            ▼
//!                     re-queued     KeyAction / mode input hook
//!                                         │
//!                                         ▼
//!                                 Vis::mode_switch ──▶ leave / enter hooks ──▶ View
//! ```

pub mod action;
pub mod behavior;
pub mod binding;
pub mod builtin;
pub mod config;
pub mod error;
pub mod idle;
pub mod key;
pub mod keymap;
pub mod mode;
pub mod operator;
pub mod recorder;
pub mod vis;
pub mod window;

#[cfg(test)]
mod testing;

pub use action::{ActionFn, ActionRegistry, Arg, KeyAction};
pub use binding::{ActionRef, KeyBinding};
pub use config::Config;
pub use error::{ActionError, ConfigError, MapError, ParseError};
pub use keymap::KeyMap;
pub use mode::{Mode, ModeHooks, ModeId, Modes};
pub use operator::Operator;
pub use vis::Vis;
pub use window::{View, Window};
