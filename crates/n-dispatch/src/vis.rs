//! The editor context — mode transitions, bindings, actions and key input.
//!
//! [`Vis`] is the single authority over the active mode. Every transition
//! goes through [`Vis::mode_switch`], which runs the hooks in a fixed order:
//!
//! ```text
//! old.leave(new) → record previous mode → activate new → new.enter(old) → status
//! ```
//!
//! The previous mode is not updated when leaving operator-pending mode, so
//! cancelling an operator returns to whatever mode the operator started in.
//!
//! # Lookup order
//!
//! Bindings and hooks are looked up along the mode's chain (the mode, then
//! its parent). At each step the window's override table is consulted
//! before the shared table.
//!
//! # Key input
//!
//! [`Vis::keys`] queues keys and resolves them against the bindings of the
//! active mode: the longest bound sequence wins, a prefix of a longer
//! binding waits for more keys, and a key nothing claims goes to
//! [`Vis::input`].

use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::action::{ActionFn, ActionRegistry, Arg, KeyAction};
use crate::binding::{ActionRef, KeyBinding};
use crate::builtin;
use crate::error::{ActionError, MapError};
use crate::idle::IdleTimer;
use crate::key;
use crate::keymap::{KeyMap, Rejected};
use crate::mode::{Mode, ModeHooks, ModeId, Modes};
use crate::operator::{Operator, PendingAction, Repeat};
use crate::recorder::MacroRecorder;
use crate::window::{View, Window};

/// Upper bound on chained alias expansions: keys produced by one alias
/// expanding again without ever reaching an action or input hook.
/// Mutually recursive aliases (`a → b`, `b → a`) pass the registration
/// guard and are cut off here.
const MAX_ALIAS_DEPTH: usize = 64;

/// Upper bound on transitions requested from inside transition hooks
/// before control returns to the caller of [`Vis::mode_switch`].
const MAX_DEFERRED_SWITCHES: usize = 16;

/// Callback fired after every committed mode transition.
pub type StatusFn = Box<dyn FnMut(&Mode)>;

/// What a matched binding asks for, detached from the binding itself.
enum Resolved {
    Alias(String),
    Action(ActionFn, Arg),
}

impl Resolved {
    fn of(binding: &KeyBinding) -> Option<Self> {
        if let Some(alias) = &binding.alias {
            return Some(Self::Alias(alias.clone()));
        }
        binding.key_action().map(|action| {
            let (func, arg) = action.callable();
            Self::Action(func, arg)
        })
    }
}

// ---------------------------------------------------------------------------
// Vis
// ---------------------------------------------------------------------------

/// The modal dispatch state of one editor.
pub struct Vis {
    modes: Modes,
    mode: ModeId,
    mode_prev: ModeId,
    win: Window,
    actions: ActionRegistry,
    recorder: MacroRecorder,

    /// The action being assembled (pending operator).
    action: PendingAction,

    /// The last repeatable action.
    action_prev: Repeat,

    idle: IdleTimer,

    /// Keys received but not yet resolved, waiting for a longer binding to
    /// complete or be ruled out.
    input_queue: String,

    on_status: Option<StatusFn>,

    /// Set while leave/enter hooks of a transition run.
    switching: bool,

    /// Mode requested by a leave/enter hook, entered once the running
    /// transition has completed.
    deferred: Option<ModeId>,
}

impl Vis {
    /// A context in normal mode.
    #[must_use]
    pub fn new(win: Window) -> Self {
        Self::with_mode(win, ModeId::Normal)
    }

    /// A context starting in `mode`. No hooks run for the initial mode.
    #[must_use]
    pub fn with_mode(win: Window, mode: ModeId) -> Self {
        Self {
            modes: Modes::new(),
            mode,
            mode_prev: mode,
            win,
            actions: ActionRegistry::new(),
            recorder: MacroRecorder::new(),
            action: PendingAction::default(),
            action_prev: Repeat::default(),
            idle: IdleTimer::new(Instant::now()),
            input_queue: String::new(),
            on_status: None,
            switching: false,
            deferred: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// The active mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> ModeId {
        self.mode
    }

    /// The mode active before the current one (operator-pending excluded).
    #[inline]
    #[must_use]
    pub const fn mode_prev(&self) -> ModeId {
        self.mode_prev
    }

    /// The active mode's full description.
    #[must_use]
    pub fn current(&self) -> &Mode {
        &self.modes[self.mode]
    }

    #[must_use]
    pub const fn modes(&self) -> &Modes {
        &self.modes
    }

    pub const fn modes_mut(&mut self) -> &mut Modes {
        &mut self.modes
    }

    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.win
    }

    pub const fn window_mut(&mut self) -> &mut Window {
        &mut self.win
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        self.win.view_mut()
    }

    #[must_use]
    pub const fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    #[must_use]
    pub const fn recorder(&self) -> &MacroRecorder {
        &self.recorder
    }

    pub const fn recorder_mut(&mut self) -> &mut MacroRecorder {
        &mut self.recorder
    }

    /// The operator waiting for a motion, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<Operator> {
        self.action.op
    }

    #[must_use]
    pub const fn repeat(&self) -> &Repeat {
        &self.action_prev
    }

    pub const fn repeat_mut(&mut self) -> &mut Repeat {
        &mut self.action_prev
    }

    /// Keys received but not yet resolved.
    #[must_use]
    pub fn pending_keys(&self) -> &str {
        &self.input_queue
    }

    /// Register the callback fired after every committed transition.
    pub fn on_status(&mut self, f: impl FnMut(&Mode) + 'static) {
        self.on_status = Some(Box::new(f));
    }

    // -- Mode transitions ---------------------------------------------------

    /// Make `new` the active mode.
    ///
    /// Does nothing if `new` is already active. A switch requested from
    /// inside the leave or enter hook of a running transition is not nested
    /// into it: it is carried out once that transition (status callback
    /// included) has completed. The last such request wins.
    pub fn mode_switch(&mut self, new: ModeId) {
        if self.mode == new {
            return;
        }
        if self.switching {
            debug!(from = %self.mode, to = %new, "mode switch deferred until transition completes");
            self.deferred = Some(new);
            return;
        }

        self.transition(new);
        for _ in 0..MAX_DEFERRED_SWITCHES {
            match self.deferred.take() {
                Some(next) if next != self.mode => self.transition(next),
                Some(_) => {}
                None => return,
            }
        }
        if let Some(next) = self.deferred.take() {
            warn!(mode = %self.mode, dropped = %next, "too many mode switches requested by transition hooks");
        }
    }

    fn transition(&mut self, new: ModeId) {
        let old = self.mode;
        self.switching = true;
        if let Some(leave) = self.hooks(old).leave {
            leave(self, new);
        }
        if old != ModeId::OperatorPending {
            self.mode_prev = old;
        }
        self.mode = new;
        if let Some(enter) = self.hooks(new).enter {
            enter(self, old);
        }
        self.switching = false;

        self.idle.touch(Instant::now());
        debug!(from = %old, to = %new, prev = %self.mode_prev, "mode switched");
        if let Some(status) = self.on_status.as_mut() {
            status(&self.modes[new]);
        }
    }

    /// Switch by numeric mode index. Returns `false` for unknown indices.
    pub fn mode_switch_index(&mut self, index: usize) -> bool {
        match ModeId::from_index(index) {
            Some(id) => {
                self.mode_switch(id);
                true
            }
            None => {
                debug!(index, "mode switch to unknown mode index");
                false
            }
        }
    }

    /// The effective hooks of `id` for the current window.
    #[must_use]
    pub fn hooks(&self, id: ModeId) -> ModeHooks {
        self.modes.chain(id).fold(ModeHooks::default(), |hooks, m| {
            hooks.or(self.win.mode(m).hooks).or(self.modes[m].hooks)
        })
    }

    // -- Operators ----------------------------------------------------------

    /// Start `op` and wait for its motion in operator-pending mode.
    pub fn operator(&mut self, op: Operator) {
        self.action.op = Some(op);
        self.mode_switch(ModeId::OperatorPending);
    }

    /// Abort the action being assembled.
    pub fn cancel(&mut self) {
        if let Some(op) = self.action.op {
            debug!(%op, "pending operator cancelled");
        }
        self.action.reset();
    }

    // -- Actions ------------------------------------------------------------

    /// Create a runtime action and register it.
    pub fn action_new(
        &mut self,
        name: Option<&str>,
        help: Option<&str>,
        func: ActionFn,
        arg: Arg,
    ) -> Result<Rc<KeyAction>, ActionError> {
        self.actions.create(name, help, func, arg)
    }

    /// Unregister a runtime action. Unknown actions are ignored.
    pub fn action_free(&mut self, action: &Rc<KeyAction>) -> bool {
        self.actions.destroy(action)
    }

    /// The named action `name`: runtime actions first, then builtins.
    fn named_action(&self, name: &str) -> Option<(ActionFn, Arg)> {
        if let Some(action) = self.actions.lookup(name) {
            return Some(action.callable());
        }
        builtin::lookup(name).map(KeyAction::callable)
    }

    // -- Bindings -----------------------------------------------------------

    /// Release a binding, destroying its action if the binding owns it.
    pub fn binding_free(&mut self, binding: KeyBinding) {
        if let Some(ActionRef::Owned(action)) = binding.action {
            self.actions.destroy(&action);
        }
    }

    /// Bind `key` in the shared table of mode `id`.
    pub fn mode_map(&mut self, id: ModeId, force: bool, key: &str, binding: KeyBinding) -> Result<(), MapError> {
        let result = self.modes[id]
            .bindings
            .get_or_insert_with(KeyMap::new)
            .bind(key, binding, force);
        self.settle_map(id, key, result)
    }

    /// Bind `key` for mode `id` in this window only.
    pub fn window_mode_map(
        &mut self,
        id: ModeId,
        force: bool,
        key: &str,
        binding: KeyBinding,
    ) -> Result<(), MapError> {
        let result = self
            .win
            .mode_mut(id)
            .bindings
            .get_or_insert_with(KeyMap::new)
            .bind(key, binding, force);
        self.settle_map(id, key, result)
    }

    fn settle_map(
        &mut self,
        id: ModeId,
        key: &str,
        result: Result<Vec<KeyBinding>, Rejected>,
    ) -> Result<(), MapError> {
        match result {
            Ok(evicted) => {
                debug!(mode = %id, key, evicted = evicted.len(), "key mapped");
                for binding in evicted {
                    self.binding_free(binding);
                }
                Ok(())
            }
            Err(Rejected { error, binding }) => {
                debug!(mode = %id, key, %error, "key mapping rejected");
                self.binding_free(binding);
                Err(error)
            }
        }
    }

    /// Remove the binding for exactly `key` from mode `id`. Returns `false`
    /// if there was none.
    pub fn mode_unmap(&mut self, id: ModeId, key: &str) -> bool {
        let removed = self.modes[id].bindings.as_mut().and_then(|map| map.unbind(key));
        self.settle_unmap(removed)
    }

    /// Remove this window's binding for exactly `key` from mode `id`.
    pub fn window_mode_unmap(&mut self, id: ModeId, key: &str) -> bool {
        let removed = self.win.mode_mut(id).bindings.as_mut().and_then(|map| map.unbind(key));
        self.settle_unmap(removed)
    }

    fn settle_unmap(&mut self, removed: Option<KeyBinding>) -> bool {
        match removed {
            Some(binding) => {
                self.binding_free(binding);
                true
            }
            None => false,
        }
    }

    /// The binding `key` resolves to in mode `id`, following the lookup
    /// order described in the module docs.
    #[must_use]
    pub fn mode_binding(&self, id: ModeId, key: &str) -> Option<&KeyBinding> {
        self.modes.chain(id).find_map(|m| {
            let local = self.win.mode(m).bindings.as_ref().and_then(|map| map.get(key));
            local.or_else(|| self.modes[m].bindings.as_ref().and_then(|map| map.get(key)))
        })
    }

    /// The binding `key` resolves to in the active mode.
    #[must_use]
    pub fn binding(&self, key: &str) -> Option<&KeyBinding> {
        self.mode_binding(self.mode, key)
    }

    /// True if a longer sequence starting with `prefix` is bound anywhere
    /// along the active mode's chain.
    fn has_longer(&self, prefix: &str) -> bool {
        self.modes.chain(self.mode).any(|m| {
            let longer = |map: &Option<KeyMap>| map.as_ref().is_some_and(|map| map.has_longer(prefix));
            longer(&self.win.mode(m).bindings) || longer(&self.modes[m].bindings)
        })
    }

    /// The shared bindings of mode `id`, in key order.
    pub fn bindings(&self, id: ModeId) -> impl Iterator<Item = (&str, &KeyBinding)> {
        self.modes[id].bindings.iter().flat_map(|map| map.iter())
    }

    /// This window's bindings for mode `id`, in key order.
    pub fn window_bindings(&self, id: ModeId) -> impl Iterator<Item = (&str, &KeyBinding)> {
        self.win.mode(id).bindings.iter().flat_map(|map| map.iter())
    }

    // -- Key input ----------------------------------------------------------

    /// Feed keys typed by the user.
    pub fn keys(&mut self, keys: &str) {
        self.idle.touch(Instant::now());
        self.input_queue.push_str(keys);
        self.keys_process(false);
    }

    /// Resolve keys left waiting for a longer binding, as if no more input
    /// will follow (an input timeout).
    pub fn keys_flush(&mut self) {
        self.keys_process(true);
    }

    fn keys_process(&mut self, flush: bool) {
        // Bytes at the front of the queue produced by alias expansion, and
        // how many expansions produced them. Once those keys are used up
        // the chain is over and the depth starts again from zero.
        let mut expanded: usize = 0;
        let mut depth = 0;
        while !self.input_queue.is_empty() {
            let Some((len, resolved)) = self.keys_match(flush) else {
                trace!(pending = self.input_queue.as_str(), "waiting for more keys");
                return;
            };
            let keys: String = self.input_queue.drain(..len).collect();
            expanded = expanded.saturating_sub(len);
            match resolved {
                Some(Resolved::Alias(alias)) => {
                    depth += 1;
                    if depth > MAX_ALIAS_DEPTH {
                        warn!(keys, alias, "alias expansion too deep, input dropped");
                        self.input_queue.clear();
                        return;
                    }
                    trace!(keys, alias, depth, "alias expanded");
                    self.input_queue.insert_str(0, &alias);
                    expanded += alias.len();
                }
                Some(Resolved::Action(func, arg)) => {
                    trace!(keys, "binding matched");
                    self.recorder.record(&keys);
                    func(self, &arg);
                }
                None => self.input(&keys),
            }
            if expanded == 0 {
                depth = 0;
            }
        }
    }

    /// Length of the keys to consume next and what they resolve to, or
    /// `None` if the queue is a strict prefix of a longer binding and more
    /// keys may follow.
    fn keys_match(&self, flush: bool) -> Option<(usize, Option<Resolved>)> {
        let queue = self.input_queue.as_str();
        let first = key::next(queue).map_or(queue.len(), str::len);
        let mut longest: Option<(usize, Resolved)> = None;
        let mut end = 0;

        for k in key::iter(queue) {
            end += k.len();
            let prefix = &queue[..end];
            if let Some(resolved) = self.binding(prefix).and_then(Resolved::of) {
                longest = Some((end, resolved));
            }
            if !self.has_longer(prefix) {
                return Some(Self::settle_match(longest, first));
            }
        }

        flush.then(|| Self::settle_match(longest, first))
    }

    fn settle_match(longest: Option<(usize, Resolved)>, first: usize) -> (usize, Option<Resolved>) {
        match longest {
            Some((len, resolved)) => (len, Some(resolved)),
            None => (first, None),
        }
    }

    /// Handle one key no binding claimed.
    ///
    /// A named key matching an action name (`<vis-mode-insert>`) runs that
    /// action. Anything else goes to the active mode's input hook; modes
    /// without one ignore it.
    pub fn input(&mut self, keys: &str) {
        if let Some((func, arg)) = key::special_name(keys).and_then(|name| self.named_action(name)) {
            self.recorder.record(keys);
            func(self, &arg);
            return;
        }
        self.recorder.record(keys);
        match self.hooks(self.mode).input {
            Some(input) => input(self, keys),
            None => trace!(mode = %self.mode, keys, "unhandled key"),
        }
    }

    // -- Idle ---------------------------------------------------------------

    /// The idle timeout of mode `id` in this window. Zero means the mode
    /// never idles.
    #[must_use]
    pub fn idle_timeout(&self, id: ModeId) -> Duration {
        self.win.mode(id).idle_timeout.unwrap_or(self.modes[id].idle_timeout)
    }

    /// How long an event loop may sleep before [`Vis::tick`] has an idle
    /// hook to run. `None` if the active mode does not idle or already has
    /// for the current period.
    #[must_use]
    pub fn idle_remaining(&self, now: Instant) -> Option<Duration> {
        self.idle.remaining(now, self.idle_timeout(self.mode))
    }

    /// Poll the idle timer. Runs the active mode's idle hook once per idle
    /// period and returns whether it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let timeout = self.idle_timeout(self.mode);
        if !self.idle.poll(now, timeout) {
            return false;
        }
        trace!(mode = %self.mode, "idle");
        if let Some(idle) = self.hooks(self.mode).idle {
            idle(self);
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
