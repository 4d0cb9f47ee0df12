// Swapkeys Mapping Structures
// CharacterPair, Mapping, ActiveMappingSet and the rebuild logic

use indexmap::IndexMap;

use crate::Key;

/// An unordered pair of keys that swap with each other.
///
/// A pair expands to two directed [`Mapping`] entries when the active set
/// is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterPair {
    a: Key,
    b: Key,
}

impl CharacterPair {
    /// Create a new pair
    pub fn new(a: impl Into<Key>, b: impl Into<Key>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// First key of the pair
    pub fn a(self) -> Key {
        self.a
    }

    /// Second key of the pair
    pub fn b(self) -> Key {
        self.b
    }
}

/// A directed substitution entry (`from` types as `to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub from: Key,
    pub to: Key,
}

impl Mapping {
    /// Create a new directed mapping
    pub fn new(from: impl Into<Key>, to: impl Into<Key>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The built-in number-row pairs for a US layout: each digit swaps with its
/// shifted symbol. Overridable for other layouts via
/// [`crate::SwapEngine::set_builtin_pairs`] or the settings file.
pub fn default_builtin_pairs() -> Vec<CharacterPair> {
    [
        ('1', '!'),
        ('2', '@'),
        ('3', '#'),
        ('4', '$'),
        ('5', '%'),
        ('6', '^'),
        ('7', '&'),
        ('8', '*'),
        ('9', '('),
        ('0', ')'),
    ]
    .into_iter()
    .map(|(a, b)| CharacterPair::new(a, b))
    .collect()
}

/// The per-buffer set of active substitutions, keyed by the incoming key.
///
/// Entries iterate in insertion order, which keeps registry sync and debug
/// output deterministic. At most one target per incoming key; rebuilds are
/// last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMappingSet {
    entries: IndexMap<Key, Key>,
}

impl ActiveMappingSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the active set from configuration.
    ///
    /// Built-in pairs are inserted first (both directions) when
    /// `builtin_enabled` is set, then the extra mappings in insertion
    /// order. A later entry with a duplicate `from` key overwrites the
    /// earlier target.
    pub fn rebuild(
        builtin_enabled: bool,
        builtin_pairs: &[CharacterPair],
        extra_mappings: &[Mapping],
    ) -> Self {
        let mut entries = IndexMap::new();
        if builtin_enabled {
            for pair in builtin_pairs {
                entries.insert(pair.a(), pair.b());
                entries.insert(pair.b(), pair.a());
            }
        }
        for mapping in extra_mappings {
            entries.insert(mapping.from, mapping.to);
        }
        Self { entries }
    }

    /// Get the substitution for a key, if any
    pub fn get(&self, key: Key) -> Option<Key> {
        self.entries.get(&key).copied()
    }

    /// Check if a key has a substitution
    pub fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of entries in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the incoming keys, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.keys().copied()
    }

    /// Iterate over all entries, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Key, Key)> + '_ {
        self.entries.iter().map(|(from, to)| (*from, *to))
    }
}
