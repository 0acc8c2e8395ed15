//! Actions — named or anonymous units of behavior bound to keys.
//!
//! A [`KeyAction`] pairs a plain function with a tagged [`Arg`]. Builtin
//! actions are `static` values (see [`crate::builtin`]) and never touch the
//! registry. Actions created at runtime — from a config file or a scripting
//! layer — live in the [`ActionRegistry`] until destroyed.
//!
//! # Ownership
//!
//! Runtime actions are reference counted. The registry always holds one
//! reference; a binding holds another (see [`crate::binding::ActionRef`]).
//! Destroying an action removes the registry's reference, so once the last
//! binding pointing at it goes away the action is freed.

use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::ActionError;
use crate::mode::ModeId;
use crate::operator::Operator;
use crate::vis::Vis;

/// Signature of an action body.
pub type ActionFn = fn(&mut Vis, &Arg);

// ---------------------------------------------------------------------------
// Arg
// ---------------------------------------------------------------------------

/// Argument passed to an action body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Arg {
    #[default]
    None,
    Int(i64),
    Mode(ModeId),
    Operator(Operator),
    Str(Cow<'static, str>),
}

// ---------------------------------------------------------------------------
// KeyAction
// ---------------------------------------------------------------------------

/// A callable unit of behavior.
///
/// The name is what makes an action addressable from elsewhere: a named
/// action can be triggered as `<name>` and reused by several bindings. An
/// anonymous action is only reachable through the one binding that owns it.
pub struct KeyAction {
    name: Option<Cow<'static, str>>,
    help: Option<Cow<'static, str>>,
    func: ActionFn,
    arg: Arg,
}

impl KeyAction {
    /// A builtin action, suitable for a `static`.
    #[must_use]
    pub const fn builtin(name: &'static str, help: &'static str, func: ActionFn, arg: Arg) -> Self {
        Self {
            name: Some(Cow::Borrowed(name)),
            help: Some(Cow::Borrowed(help)),
            func,
            arg,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    #[must_use]
    pub const fn arg(&self) -> &Arg {
        &self.arg
    }

    /// True for actions without a name.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// The function and a copy of its argument, detached from `self` so the
    /// action can run while the context that stores it is mutably borrowed.
    #[must_use]
    pub fn callable(&self) -> (ActionFn, Arg) {
        (self.func, self.arg.clone())
    }
}

impl fmt::Debug for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAction")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("arg", &self.arg)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ActionRegistry
// ---------------------------------------------------------------------------

/// Insertion-ordered collection of runtime-created actions.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Rc<KeyAction>>,
}

impl ActionRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Create an action and append it to the registry.
    ///
    /// `name` and `help` are copied. If any allocation fails the registry is
    /// left exactly as it was and [`ActionError::Alloc`] is returned.
    pub fn create(
        &mut self,
        name: Option<&str>,
        help: Option<&str>,
        func: ActionFn,
        arg: Arg,
    ) -> Result<Rc<KeyAction>, ActionError> {
        let name = name.map(dup).transpose()?;
        let help = help.map(dup).transpose()?;
        self.actions.try_reserve(1)?;

        let action = Rc::new(KeyAction {
            name: name.map(Cow::Owned),
            help: help.map(Cow::Owned),
            func,
            arg,
        });
        self.actions.push(Rc::clone(&action));
        debug!(name = action.name(), total = self.actions.len(), "action created");
        Ok(action)
    }

    /// Remove `action` from the registry.
    ///
    /// Returns `false` (and does nothing) if the action is not registered,
    /// so destroying twice is harmless.
    pub fn destroy(&mut self, action: &Rc<KeyAction>) -> bool {
        let Some(index) = self.actions.iter().position(|a| Rc::ptr_eq(a, action)) else {
            return false;
        };
        let removed = self.actions.remove(index);
        debug!(name = removed.name(), total = self.actions.len(), "action destroyed");
        true
    }

    /// True if `action` is registered.
    #[must_use]
    pub fn contains(&self, action: &Rc<KeyAction>) -> bool {
        self.actions.iter().any(|a| Rc::ptr_eq(a, action))
    }

    /// The first registered action called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Rc<KeyAction>> {
        self.actions.iter().find(|a| a.name() == Some(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<KeyAction>> {
        self.actions.iter()
    }
}

/// Copy a string, reporting allocation failure instead of aborting.
fn dup(s: &str) -> Result<String, TryReserveError> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
