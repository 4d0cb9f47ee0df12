// Swapkeys Settings Module
// TOML-backed configuration mirroring the in-memory configuration surface

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::context::{CommandSymbol, ModeSymbol, TextInputPolicy};
use crate::engine::SwapEngine;
use crate::host::{KeyTranslationRegistry, RegistryError};
use crate::mapping::CharacterPair;
use crate::Key;

/// Parsed settings file.
///
/// Everything here is optional; an empty file yields the built-in
/// defaults. Layout example:
///
/// ```toml
/// [builtin]
/// enabled = true
/// pairs = [["1", "!"], ["2", "@"]]
///
/// [context]
/// text_input_modes = ["insert", "replace", "passthrough"]
/// literal_commands = ["find-char", "replace-char"]
///
/// [pairs]
/// two_way = [["_", "-"]]
/// one_way = [[",", "<"]]
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    builtin_enabled: bool,
    builtin_pairs: Option<Vec<CharacterPair>>,
    text_modes: Option<Vec<ModeSymbol>>,
    literal_commands: Option<Vec<CommandSymbol>>,
    two_way: Vec<(Key, Key)>,
    one_way: Vec<(Key, Key)>,
    source_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            builtin_enabled: true,
            builtin_pairs: None,
            text_modes: None,
            literal_commands: None,
            two_way: Vec::new(),
            one_way: Vec::new(),
            source_path: None,
        }
    }
}

/// Errors that can occur when loading or applying settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("invalid key in settings: {0}")]
    InvalidKey(String),

    #[error("no source file to reload from")]
    NoSourcePath,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    builtin: Option<BuiltinToml>,

    #[serde(default)]
    context: Option<ContextToml>,

    #[serde(default)]
    pairs: Option<PairsToml>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct BuiltinToml {
    #[serde(default)]
    enabled: Option<bool>,

    #[serde(default)]
    pairs: Option<Vec<(String, String)>>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct ContextToml {
    #[serde(default)]
    text_input_modes: Option<Vec<String>>,

    #[serde(default)]
    literal_commands: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct PairsToml {
    #[serde(default)]
    two_way: Option<Vec<(String, String)>>,

    #[serde(default)]
    one_way: Option<Vec<(String, String)>>,
}

impl Settings {
    /// Create settings with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let raw: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(builtin) = raw.builtin {
            if let Some(enabled) = builtin.enabled {
                settings.builtin_enabled = enabled;
            }
            if let Some(pairs) = builtin.pairs {
                let mut parsed = Vec::with_capacity(pairs.len());
                for (a, b) in &pairs {
                    parsed.push(CharacterPair::new(parse_key(a)?, parse_key(b)?));
                }
                settings.builtin_pairs = Some(parsed);
            }
        }

        if let Some(context) = raw.context {
            settings.text_modes = context
                .text_input_modes
                .map(|modes| modes.iter().map(|s| parse_mode(s)).collect());
            settings.literal_commands = context
                .literal_commands
                .map(|commands| commands.iter().map(|s| parse_command(s)).collect());
        }

        if let Some(pairs) = raw.pairs {
            for (a, b) in pairs.two_way.unwrap_or_default() {
                settings.two_way.push((parse_key(&a)?, parse_key(&b)?));
            }
            for (from, to) in pairs.one_way.unwrap_or_default() {
                settings.one_way.push((parse_key(&from)?, parse_key(&to)?));
            }
        }

        Ok(settings)
    }

    /// Default settings path (`~/.config/swapkeys/settings.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("swapkeys").join("settings.toml"))
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    /// Whether the built-in table is enabled by default for new buffers
    pub fn builtin_enabled(&self) -> bool {
        self.builtin_enabled
    }

    /// Layout override for the built-in table, if any
    pub fn builtin_pairs(&self) -> Option<&[CharacterPair]> {
        self.builtin_pairs.as_deref()
    }

    /// Two-way pairs declared in the file
    pub fn two_way(&self) -> &[(Key, Key)] {
        &self.two_way
    }

    /// One-way mappings declared in the file
    pub fn one_way(&self) -> &[(Key, Key)] {
        &self.one_way
    }

    /// Reload from the file these settings came from
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        match &self.source_path {
            Some(path) => {
                *self = Self::from_file(path)?;
                Ok(())
            }
            None => Err(SettingsError::NoSourcePath),
        }
    }

    /// The classifier policy the file describes: a provided list replaces
    /// the corresponding default allow-list, an absent one keeps it.
    pub fn policy(&self) -> TextInputPolicy {
        let modes = self
            .text_modes
            .clone()
            .unwrap_or_else(TextInputPolicy::default_text_modes);
        let commands = self
            .literal_commands
            .clone()
            .unwrap_or_else(TextInputPolicy::default_literal_commands);
        TextInputPolicy::new(modes, commands)
    }

    /// Push these settings into a live engine
    pub fn apply(
        &self,
        engine: &mut SwapEngine,
        registry: &mut dyn KeyTranslationRegistry,
    ) -> Result<(), SettingsError> {
        engine.set_builtin_default_enabled(self.builtin_enabled);
        engine.set_policy(self.policy());
        if let Some(pairs) = &self.builtin_pairs {
            engine.set_builtin_pairs(pairs.clone(), registry)?;
        }
        for (a, b) in &self.two_way {
            engine.add_pair(*a, *b, registry)?;
        }
        for (from, to) in &self.one_way {
            engine.add_mapping(*from, *to, registry)?;
        }
        Ok(())
    }
}

fn parse_key(s: &str) -> Result<Key, SettingsError> {
    Key::from_str(s).map_err(|e| SettingsError::InvalidKey(e.to_string()))
}

fn parse_mode(s: &str) -> ModeSymbol {
    s.parse()
        .unwrap_or_else(|_| ModeSymbol::Other(s.to_string()))
}

fn parse_command(s: &str) -> CommandSymbol {
    s.parse()
        .unwrap_or_else(|_| CommandSymbol::Other(s.to_string()))
}

/// Starter settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Swapkeys Settings
# Place this file at: ~/.config/swapkeys/settings.toml

[builtin]
# Swap digits with their shifted symbols in text-input contexts
enabled = true
# Override the number row for non-US layouts, e.g.:
# pairs = [["&", "1"], ["é", "2"]]

[context]
# Modes where every keystroke is text
# text_input_modes = ["insert", "replace", "passthrough"]
# Commands that read a literal character as their argument
# literal_commands = ["find-char", "find-char-to", "replace-char"]

[pairs]
# Extra swaps, applied in order after the built-in table
# two_way = [["_", "-"]]
# one_way = [[",", "<"]]
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferId;
    use crate::context::{CommandSymbol, ModeSymbol};
    use crate::engine::Translation;
    use crate::host::testing::{FakeHost, RecordingRegistry};

    #[test]
    fn test_settings_default() {
        let settings = Settings::new();
        assert!(settings.builtin_enabled());
        assert!(settings.builtin_pairs().is_none());
        assert!(settings.two_way().is_empty());
    }

    #[test]
    fn test_settings_from_toml() {
        let toml = r#"
[builtin]
enabled = false

[pairs]
two_way = [["_", "-"]]
one_way = [[",", "<"], [".", ">"]]
"#;
        let settings = Settings::from_toml(toml).unwrap();
        assert!(!settings.builtin_enabled());
        assert_eq!(settings.two_way(), &[(Key::new('_'), Key::new('-'))]);
        assert_eq!(settings.one_way().len(), 2);
    }

    #[test]
    fn test_settings_layout_override() {
        let toml = r#"
[builtin]
pairs = [["&", "1"], ["~", "2"]]
"#;
        let settings = Settings::from_toml(toml).unwrap();
        let pairs = settings.builtin_pairs().unwrap();
        assert_eq!(pairs[0], CharacterPair::new('&', '1'));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_settings_rejects_multichar_key() {
        let toml = r#"
[pairs]
two_way = [["ab", "-"]]
"#;
        let err = Settings::from_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidKey(_)));
    }

    #[test]
    fn test_settings_context_lists() {
        let toml = r#"
[context]
text_input_modes = ["insert", "my-custom-mode"]
literal_commands = ["find-char"]
"#;
        let settings = Settings::from_toml(toml).unwrap();
        let policy = settings.policy();
        assert!(policy.is_text_mode(&ModeSymbol::Insert));
        assert!(policy.is_text_mode(&ModeSymbol::Other("my-custom-mode".to_string())));
        // The provided list replaces the default one
        assert!(!policy.is_text_mode(&ModeSymbol::Replace));
        assert!(policy.is_literal_command(&CommandSymbol::FindChar));
        assert!(!policy.is_literal_command(&CommandSymbol::ReplaceChar));
    }

    #[test]
    fn test_settings_apply_to_engine() {
        let toml = r#"
[pairs]
two_way = [["_", "-"]]
"#;
        let settings = Settings::from_toml(toml).unwrap();
        let mut engine = SwapEngine::new();
        let mut registry = RecordingRegistry::new();
        settings.apply(&mut engine, &mut registry).unwrap();
        // No [context] section: the default policy stays in effect
        assert_eq!(engine.policy(), &TextInputPolicy::default());

        let buffer = BufferId::new(1);
        engine.enable_buffer(buffer, &mut registry).unwrap();
        let host = FakeHost::new().with_mode(ModeSymbol::Insert);
        assert_eq!(
            engine.translate(buffer, &host, Key::new('_')),
            Translation::Swapped(Key::new('-'))
        );
        assert_eq!(
            engine.translate(buffer, &host, Key::new('1')),
            Translation::Swapped(Key::new('!'))
        );
    }

    #[test]
    fn test_reload_without_source_fails() {
        let mut settings = Settings::new();
        assert!(matches!(
            settings.reload(),
            Err(SettingsError::NoSourcePath)
        ));
    }

    #[test]
    fn test_default_settings_content_parses() {
        let settings = Settings::from_toml(default_settings_content()).unwrap();
        assert!(settings.builtin_enabled());
    }
}
