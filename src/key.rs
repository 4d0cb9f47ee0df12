// Swapkeys Key Type
// Represents a single raw character keystroke delivered by the host editor

use std::fmt;
use std::str::FromStr;

/// A single-character key, as seen by the host editor before dispatch.
///
/// Only printable single characters participate in swapping; the host never
/// routes function keys, chords, or multi-character sequences through the
/// translation registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(char);

impl Key {
    /// Create a Key from a character
    pub fn new(ch: char) -> Self {
        Self(ch)
    }

    /// Get the underlying character
    pub fn ch(self) -> char {
        self.0
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        Self(ch)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing a key from a string descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("empty key descriptor")]
    Empty,

    #[error("key descriptor '{0}' is not a single character")]
    NotSingleChar(String),
}

impl FromStr for Key {
    type Err = KeyError;

    /// Parse a key from a one-character string, as used in configuration
    /// files and the pair-definition API.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(KeyError::Empty),
            (Some(ch), None) => Ok(Key(ch)),
            (Some(_), Some(_)) => Err(KeyError::NotSingleChar(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from('1').ch(), '1');
        assert_eq!(Key::new('!').ch(), '!');
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("_".parse::<Key>(), Ok(Key::new('_')));
        assert_eq!("".parse::<Key>(), Err(KeyError::Empty));
        assert_eq!(
            "ab".parse::<Key>(),
            Err(KeyError::NotSingleChar("ab".to_string()))
        );
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::new('@').to_string(), "@");
    }

    #[test]
    fn test_key_hash() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Key::new('1'), "value");
        assert_eq!(map.get(&Key::new('1')), Some(&"value"));
    }
}
