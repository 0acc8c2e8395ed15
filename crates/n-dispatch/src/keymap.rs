//! Per-mode key binding store.
//!
//! A [`KeyMap`] maps key sequences to [`KeyBinding`]s. It is ordered, so
//! every sequence sharing a prefix sits in one contiguous range: purging a
//! prefix and asking "is anything longer bound?" are both range scans.
//!
//! # Binding rules
//!
//! 1. The empty sequence is never bound.
//! 2. An alias may not start with the key it is bound to (unless the key is
//!    a named key like `<Tab>`), otherwise resolving it would loop.
//! 3. With `force`, every sequence that starts with the new key (including
//!    the key itself) is removed first. Without it, longer sequences such as
//!    `jj` would keep the new `j` waiting forever.
//! 4. An existing key is not replaced unless `force` was given, except for
//!    the fallback key `<`, which is always overwritten.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::binding::KeyBinding;
use crate::error::MapError;
use crate::key::SPECIAL_START;

/// The key that may always be rebound.
pub const FALLBACK_KEY: &str = "<";

/// A binding refused by [`KeyMap::bind`], handed back to the caller.
#[derive(Debug)]
pub struct Rejected {
    pub error: MapError,
    pub binding: KeyBinding,
}

/// Mapping from key sequence to binding for one mode.
#[derive(Debug, Default)]
pub struct KeyMap {
    bindings: BTreeMap<String, KeyBinding>,
}

impl KeyMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Install `binding` under `key`.
    ///
    /// On success returns the bindings that were removed to make room (by a
    /// forced prefix purge or by overwriting `<`); the caller decides what to
    /// release. On rejection the map is untouched and the binding is returned
    /// inside [`Rejected`].
    pub fn bind(&mut self, key: &str, binding: KeyBinding, force: bool) -> Result<Vec<KeyBinding>, Rejected> {
        if let Err(error) = Self::check(key, &binding) {
            return Err(Rejected { error, binding });
        }
        if !force && key != FALLBACK_KEY && self.bindings.contains_key(key) {
            return Err(Rejected {
                error: MapError::Exists(key.to_string()),
                binding,
            });
        }

        let mut evicted = if force { self.purge_prefix(key) } else { Vec::new() };
        if let Some(old) = self.bindings.insert(key.to_string(), binding) {
            evicted.push(old);
        }
        Ok(evicted)
    }

    /// Rules 1 and 2: checks that depend only on the key and the binding.
    fn check(key: &str, binding: &KeyBinding) -> Result<(), MapError> {
        if key.is_empty() {
            return Err(MapError::EmptyKey);
        }
        if let Some(alias) = &binding.alias {
            if !key.starts_with(SPECIAL_START) && alias.starts_with(key) {
                return Err(MapError::AliasLoop {
                    key: key.to_string(),
                    alias: alias.clone(),
                });
            }
        }
        Ok(())
    }

    /// Remove the binding for exactly `key`.
    pub fn unbind(&mut self, key: &str) -> Option<KeyBinding> {
        self.bindings.remove(key)
    }

    /// Remove every binding whose key starts with `prefix`.
    pub fn purge_prefix(&mut self, prefix: &str) -> Vec<KeyBinding> {
        let doomed: Vec<String> = self
            .bindings
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        doomed
            .iter()
            .filter_map(|k| self.bindings.remove(k))
            .collect()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&KeyBinding> {
        self.bindings.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// True if some binding is strictly longer than `prefix` and starts
    /// with it, meaning more keys could still complete a match.
    #[must_use]
    pub fn has_longer(&self, prefix: &str) -> bool {
        self.bindings
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyBinding)> {
        self.bindings.iter().map(|(k, b)| (k.as_str(), b))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
