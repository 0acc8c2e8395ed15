//! Key bindings — what a key sequence does in one mode.

use std::fmt;
use std::rc::Rc;

use crate::action::KeyAction;

/// How a binding refers to its action.
///
/// The variant records ownership, so freeing a binding knows exactly what
/// to release:
///
/// - `Builtin` — a `static` action; nothing to release.
/// - `Shared` — a named runtime action; it belongs to the registry and
///   outlives the binding.
/// - `Owned` — an anonymous runtime action that exists only for this
///   binding; freeing the binding destroys it.
pub enum ActionRef {
    Builtin(&'static KeyAction),
    Shared(Rc<KeyAction>),
    Owned(Rc<KeyAction>),
}

impl ActionRef {
    #[must_use]
    pub fn action(&self) -> &KeyAction {
        match self {
            Self::Builtin(action) => action,
            Self::Shared(action) | Self::Owned(action) => action,
        }
    }

    /// True if the binding is responsible for destroying the action.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Builtin(_) => "Builtin",
            Self::Shared(_) => "Shared",
            Self::Owned(_) => "Owned",
        };
        f.debug_tuple(kind).field(self.action()).finish()
    }
}

/// A binding stored under a key sequence.
///
/// Either expands to an alias (another key sequence, resolved again from
/// the start) or runs an action. When both are set the alias wins.
#[derive(Debug, Default)]
pub struct KeyBinding {
    pub alias: Option<String>,
    pub action: Option<ActionRef>,
}

impl KeyBinding {
    /// Bind a runtime action. Anonymous actions become owned by the binding,
    /// named ones are shared with the registry.
    #[must_use]
    pub fn new(action: Rc<KeyAction>) -> Self {
        let action = if action.is_anonymous() {
            ActionRef::Owned(action)
        } else {
            ActionRef::Shared(action)
        };
        Self {
            alias: None,
            action: Some(action),
        }
    }

    /// Bind a builtin action.
    #[must_use]
    pub const fn builtin(action: &'static KeyAction) -> Self {
        Self {
            alias: None,
            action: Some(ActionRef::Builtin(action)),
        }
    }

    /// Bind an alias: typing the key behaves as if `keys` were typed.
    #[must_use]
    pub fn alias(keys: impl Into<String>) -> Self {
        Self {
            alias: Some(keys.into()),
            action: None,
        }
    }

    /// The action this binding runs, if it is not an alias.
    #[must_use]
    pub fn key_action(&self) -> Option<&KeyAction> {
        self.action.as_ref().map(ActionRef::action)
    }

    /// One-line description for binding listings.
    #[must_use]
    pub fn describe(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        match self.key_action() {
            Some(action) => match (action.name(), action.help()) {
                (Some(name), Some(help)) => format!("<{name}> {help}"),
                (Some(name), None) => format!("<{name}>"),
                (None, Some(help)) => help.to_string(),
                (None, None) => String::from("(anonymous)"),
            },
            None => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
