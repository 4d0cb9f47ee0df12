// Swapkeys Buffer State
// Per-buffer feature flag and active-mapping cache

use std::fmt;

use crate::mapping::ActiveMappingSet;

/// Opaque identifier for a host editor buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(u64);

impl BufferId {
    /// Create a buffer id from the host's numeric handle
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying handle
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Per-buffer state: whether the feature is active here, whether the
/// built-in table participates, and the cached active set.
///
/// The active set is recomputed on enable and whenever the configuration
/// feeding it changes; disable empties it without touching the host's
/// registrations, which are shared across buffers.
#[derive(Debug, Clone)]
pub struct BufferState {
    builtin_enabled: bool,
    active: bool,
    mappings: ActiveMappingSet,
}

impl BufferState {
    /// Create state for a buffer the feature has not been enabled in yet
    pub fn new(builtin_enabled: bool) -> Self {
        Self {
            builtin_enabled,
            active: false,
            mappings: ActiveMappingSet::new(),
        }
    }

    /// Whether the minor mode is active in this buffer
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the built-in digit/symbol table participates here
    pub fn builtin_enabled(&self) -> bool {
        self.builtin_enabled
    }

    /// Toggle participation of the built-in table (takes effect on the
    /// next rebuild)
    pub fn set_builtin_enabled(&mut self, enabled: bool) {
        self.builtin_enabled = enabled;
    }

    /// The cached active set
    pub fn mappings(&self) -> &ActiveMappingSet {
        &self.mappings
    }

    /// Swap in a freshly built active set and mark the feature active
    pub fn activate(&mut self, mappings: ActiveMappingSet) {
        self.mappings = mappings;
        self.active = true;
    }

    /// Deactivate and empty the active set
    pub fn deactivate(&mut self) {
        self.mappings = ActiveMappingSet::new();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{default_builtin_pairs, ActiveMappingSet};
    use crate::Key;

    #[test]
    fn test_buffer_id_display() {
        assert_eq!(BufferId::new(7).to_string(), "buffer#7");
        assert_eq!(BufferId::new(7).raw(), 7);
    }

    #[test]
    fn test_new_state_is_inert() {
        let state = BufferState::new(true);
        assert!(!state.is_active());
        assert!(state.builtin_enabled());
        assert!(state.mappings().is_empty());
    }

    #[test]
    fn test_activate_deactivate() {
        let mut state = BufferState::new(true);
        let set = ActiveMappingSet::rebuild(true, &default_builtin_pairs(), &[]);
        state.activate(set);
        assert!(state.is_active());
        assert_eq!(state.mappings().get(Key::new('1')), Some(Key::new('!')));

        state.deactivate();
        assert!(!state.is_active());
        assert!(state.mappings().is_empty());
    }
}
