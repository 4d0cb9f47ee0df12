// Swapkeys Engine
// Owns the process-wide configuration and per-buffer state, drives
// rebuilds and registry sync, and implements the per-keystroke translator.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::buffer::{BufferId, BufferState};
use crate::context::{is_text_input, TextInputPolicy};
use crate::host::{EditorHost, KeyTranslationRegistry, RegistryError, TranslateFn};
use crate::mapping::{default_builtin_pairs, ActiveMappingSet, CharacterPair, Mapping};
use crate::Key;

/// Verdict for a single keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// Key passes through unchanged
    Passthrough(Key),
    /// Key was substituted
    Swapped(Key),
}

impl Translation {
    /// The key the host should dispatch
    pub fn key(self) -> Key {
        match self {
            Translation::Passthrough(key) | Translation::Swapped(key) => key,
        }
    }

    /// Whether a substitution happened
    pub fn was_swapped(self) -> bool {
        matches!(self, Translation::Swapped(_))
    }
}

/// The swapping engine.
///
/// Holds the built-in pair table, the process-wide extra mappings
/// (append-only, shared by every buffer), the classifier policy, and the
/// per-buffer states. All mutation happens on the host's main loop in
/// response to explicit configuration calls; [`SwapEngine::translate`] is
/// read-only and sits on the keystroke critical path.
pub struct SwapEngine {
    builtin_pairs: Vec<CharacterPair>,
    builtin_default_enabled: bool,
    extra: Vec<Mapping>,
    policy: TextInputPolicy,
    buffers: HashMap<BufferId, BufferState>,
    registered: HashSet<Key>,
    callback: TranslateFn,
}

impl SwapEngine {
    /// Create an engine with the default US number-row table and default
    /// classifier policy.
    ///
    /// The translation callback registered with the host defaults to
    /// identity; host integrations install the real one (see
    /// [`SharedSwapEngine`]) before enabling any buffer.
    pub fn new() -> Self {
        Self {
            builtin_pairs: default_builtin_pairs(),
            builtin_default_enabled: true,
            extra: Vec::new(),
            policy: TextInputPolicy::default(),
            buffers: HashMap::new(),
            registered: HashSet::new(),
            callback: Arc::new(|key| key),
        }
    }

    /// Replace the classifier policy
    pub fn set_policy(&mut self, policy: TextInputPolicy) {
        self.policy = policy;
    }

    /// The classifier policy in effect
    pub fn policy(&self) -> &TextInputPolicy {
        &self.policy
    }

    /// Install the callback registered for every mapped key
    pub fn set_translation_callback(&mut self, callback: TranslateFn) {
        self.callback = callback;
    }

    /// Replace the built-in pair table (non-US layouts) and rebuild every
    /// active buffer.
    pub fn set_builtin_pairs(
        &mut self,
        pairs: Vec<CharacterPair>,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.builtin_pairs = pairs;
        self.rebuild_all(registry)
    }

    /// Set the default for whether new buffers include the built-in table
    pub fn set_builtin_default_enabled(&mut self, enabled: bool) {
        self.builtin_default_enabled = enabled;
    }

    /// Enable the feature for a buffer, building its active set
    pub fn enable_buffer(
        &mut self,
        buffer: BufferId,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        let default_enabled = self.builtin_default_enabled;
        self.buffers
            .entry(buffer)
            .or_insert_with(|| BufferState::new(default_enabled));
        let set = self.build_set_for(buffer);
        self.install(buffer, set, registry)?;
        log::debug!("enabled swapping for {buffer}");
        Ok(())
    }

    /// Disable the feature for a buffer.
    ///
    /// Empties the buffer's active set; registrations with the host stay
    /// in place because other buffers may still use them.
    pub fn disable_buffer(&mut self, buffer: BufferId) {
        if let Some(state) = self.buffers.get_mut(&buffer) {
            state.deactivate();
            log::debug!("disabled swapping for {buffer}");
        }
    }

    /// Whether the feature is active in a buffer
    pub fn is_active(&self, buffer: BufferId) -> bool {
        self.buffers
            .get(&buffer)
            .map(BufferState::is_active)
            .unwrap_or(false)
    }

    /// Snapshot of a buffer's active set, if the buffer is known
    pub fn active_set(&self, buffer: BufferId) -> Option<&ActiveMappingSet> {
        self.buffers.get(&buffer).map(BufferState::mappings)
    }

    /// Keys currently registered with the host registry
    pub fn registered_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.registered.iter().copied()
    }

    /// Toggle the built-in table for one buffer and rebuild it
    pub fn set_builtin_enabled(
        &mut self,
        buffer: BufferId,
        enabled: bool,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        let default_enabled = self.builtin_default_enabled;
        let state = self
            .buffers
            .entry(buffer)
            .or_insert_with(|| BufferState::new(default_enabled));
        state.set_builtin_enabled(enabled);
        let active = state.is_active();
        if active {
            let set = self.build_set_for(buffer);
            self.install(buffer, set, registry)?;
        }
        Ok(())
    }

    /// Add a one-way mapping and rebuild every active buffer.
    ///
    /// Adding an exact duplicate is a no-op. On a registration failure the
    /// mapping is not retained and no buffer's active set changes.
    pub fn add_mapping(
        &mut self,
        from: impl Into<Key>,
        to: impl Into<Key>,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        let mapping = Mapping::new(from, to);
        if self.extra.contains(&mapping) {
            return Ok(());
        }
        self.extra.push(mapping);
        if let Err(err) = self.rebuild_all(registry) {
            self.extra.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Add a two-way pair: `a -> b` and `b -> a`
    pub fn add_pair(
        &mut self,
        a: impl Into<Key>,
        b: impl Into<Key>,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        let (a, b) = (a.into(), b.into());
        self.add_mapping(a, b, registry)?;
        self.add_mapping(b, a, registry)
    }

    /// Swap underscore and dash
    pub fn swap_underscore_dash(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair('_', '-', registry)
    }

    /// Swap colon and semicolon
    pub fn swap_colon_semicolon(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair(':', ';', registry)
    }

    /// Swap tilde and backtick
    pub fn swap_tilde_backtick(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair('~', '`', registry)
    }

    /// Swap double and single quotes
    pub fn swap_double_single_quotes(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair('"', '\'', registry)
    }

    /// Swap square and curly brackets (both sides)
    pub fn swap_square_curly_brackets(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair('[', '{', registry)?;
        self.add_pair(']', '}', registry)
    }

    /// Swap pipe and backslash
    pub fn swap_pipe_backslash(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair('|', '\\', registry)
    }

    /// Swap question mark and slash
    pub fn swap_question_mark_slash(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        self.add_pair('?', '/', registry)
    }

    /// Decide the final key for one raw keystroke.
    ///
    /// Consults the buffer's active set only when the feature is active
    /// there and the classifier reports text input. Side-effect-free and
    /// total: an unknown buffer means no mapping.
    pub fn translate(&self, buffer: BufferId, host: &dyn EditorHost, key: Key) -> Translation {
        let Some(state) = self.buffers.get(&buffer) else {
            return Translation::Passthrough(key);
        };
        if !state.is_active() || !is_text_input(host, &self.policy) {
            return Translation::Passthrough(key);
        }
        match state.mappings().get(key) {
            Some(to) => {
                log::trace!("{buffer}: swapping '{key}' -> '{to}'");
                Translation::Swapped(to)
            }
            None => Translation::Passthrough(key),
        }
    }

    /// Build the active set a buffer would get from the current
    /// configuration
    fn build_set_for(&self, buffer: BufferId) -> ActiveMappingSet {
        let builtin_enabled = self
            .buffers
            .get(&buffer)
            .map(BufferState::builtin_enabled)
            .unwrap_or(self.builtin_default_enabled);
        ActiveMappingSet::rebuild(builtin_enabled, &self.builtin_pairs, &self.extra)
    }

    /// Register any keys the new set needs, then swap it in.
    ///
    /// Registration happens before the swap so a rejecting host leaves the
    /// buffer's previous set untouched.
    fn install(
        &mut self,
        buffer: BufferId,
        set: ActiveMappingSet,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        let new_keys: Vec<Key> = set
            .keys()
            .filter(|key| !self.registered.contains(key))
            .collect();
        for key in &new_keys {
            if let Err(err) = registry.register(*key, self.callback.clone()) {
                log::warn!("host rejected registration for '{key}': {err}");
                return Err(err);
            }
            self.registered.insert(*key);
        }
        log::debug!("{buffer}: active set rebuilt with {} entries", set.len());
        if let Some(state) = self.buffers.get_mut(&buffer) {
            state.activate(set);
        }
        Ok(())
    }

    /// Rebuild every buffer the feature is active in
    fn rebuild_all(
        &mut self,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), RegistryError> {
        let active: Vec<BufferId> = self
            .buffers
            .iter()
            .filter(|(_, state)| state.is_active())
            .map(|(id, _)| *id)
            .collect();
        for buffer in active {
            let set = self.build_set_for(buffer);
            self.install(buffer, set, registry)?;
        }
        Ok(())
    }
}

impl Default for SwapEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a [`SwapEngine`], for wiring into a live host.
///
/// Construction installs a translation callback that resolves the focused
/// buffer through the host and translates against the engine under a read
/// lock; clones of the handle are what configuration code holds. The lock
/// is uncontended in practice since both sides run on the host's main
/// interaction loop.
#[derive(Clone)]
pub struct SharedSwapEngine {
    inner: Arc<RwLock<SwapEngine>>,
}

impl SharedSwapEngine {
    /// Create a shared engine bound to a host
    pub fn new(host: Arc<dyn EditorHost + Send + Sync>) -> Self {
        let inner = Arc::new(RwLock::new(SwapEngine::new()));
        let weak: Weak<RwLock<SwapEngine>> = Arc::downgrade(&inner);
        let callback: TranslateFn = Arc::new(move |key| match weak.upgrade() {
            Some(engine) => {
                let engine = engine.read();
                let buffer = host.current_buffer();
                engine.translate(buffer, host.as_ref(), key).key()
            }
            None => key,
        });
        inner.write().set_translation_callback(callback);
        Self { inner }
    }

    /// Run read-only code against the engine
    pub fn read<R>(&self, f: impl FnOnce(&SwapEngine) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run configuration code against the engine
    pub fn write<R>(&self, f: impl FnOnce(&mut SwapEngine) -> R) -> R {
        f(&mut self.inner.write())
    }
}
