// Swapkeys Context Classifier
// Decides whether the current keystroke is text input or a command argument

use std::collections::HashSet;

use strum_macros::{Display, EnumString};

use crate::host::EditorHost;

/// Editing mode reported by the host editor.
///
/// Closed enumeration with a catch-all for third-party modes, so mode
/// names from configuration files always parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ModeSymbol {
    Normal,
    Insert,
    Replace,
    Visual,
    OperatorPending,
    /// Raw pass-through mode: every keystroke self-inserts
    Passthrough,
    #[strum(default)]
    Other(String),
}

/// Command reported by the host editor as currently reading input.
///
/// Covers the character-find family in all direction/inclusivity variants,
/// character-replace, and character-search motions; anything else lands in
/// the catch-all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum CommandSymbol {
    FindChar,
    FindCharTo,
    FindCharBackward,
    FindCharToBackward,
    ReplaceChar,
    SearchCharForward,
    SearchCharBackward,
    #[strum(default)]
    Other(String),
}

/// Allow-lists consulted by the classifier.
///
/// The motion-target signal needs no configuration; these sets cover the
/// modes and commands where that signal does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputPolicy {
    text_modes: HashSet<ModeSymbol>,
    literal_commands: HashSet<CommandSymbol>,
}

impl Default for TextInputPolicy {
    fn default() -> Self {
        Self::new(
            TextInputPolicy::default_text_modes(),
            TextInputPolicy::default_literal_commands(),
        )
    }
}

impl TextInputPolicy {
    /// The default text-entry modes
    pub fn default_text_modes() -> Vec<ModeSymbol> {
        vec![
            ModeSymbol::Insert,
            ModeSymbol::Replace,
            ModeSymbol::Passthrough,
        ]
    }

    /// The default commands that read a literal character
    pub fn default_literal_commands() -> Vec<CommandSymbol> {
        vec![
            CommandSymbol::FindChar,
            CommandSymbol::FindCharTo,
            CommandSymbol::FindCharBackward,
            CommandSymbol::FindCharToBackward,
            CommandSymbol::ReplaceChar,
            CommandSymbol::SearchCharForward,
            CommandSymbol::SearchCharBackward,
        ]
    }

    /// Create a policy with empty allow-lists
    pub fn empty() -> Self {
        Self {
            text_modes: HashSet::new(),
            literal_commands: HashSet::new(),
        }
    }

    /// Create a policy from explicit allow-lists
    pub fn new(
        text_modes: impl IntoIterator<Item = ModeSymbol>,
        literal_commands: impl IntoIterator<Item = CommandSymbol>,
    ) -> Self {
        Self {
            text_modes: text_modes.into_iter().collect(),
            literal_commands: literal_commands.into_iter().collect(),
        }
    }

    /// Add a mode treated as text entry
    pub fn add_text_mode(&mut self, mode: ModeSymbol) {
        self.text_modes.insert(mode);
    }

    /// Add a command treated as reading a literal character
    pub fn add_literal_command(&mut self, command: CommandSymbol) {
        self.literal_commands.insert(command);
    }

    /// Check if a mode is in the text-entry set
    pub fn is_text_mode(&self, mode: &ModeSymbol) -> bool {
        self.text_modes.contains(mode)
    }

    /// Check if a command is in the literal-command set
    pub fn is_literal_command(&self, command: &CommandSymbol) -> bool {
        self.literal_commands.contains(command)
    }
}

/// Classify the keystroke about to be processed.
///
/// Returns true if any of three signals holds: the host is reading a
/// motion's target character, the current mode is a text-entry mode, or
/// the current command reads a literal character as its argument.
///
/// The motion-target signal is what separates a digit used as a count
/// prefix from the same digit as the object of a find-char motion; the two
/// allow-lists cover contexts where no such signal exists. A mode outside
/// the text-entry set with no motion-target signal classifies as non-text
/// even if it reads literal characters; extending the command allow-list
/// is the supported way to teach the classifier about such commands.
pub fn is_text_input(host: &dyn EditorHost, policy: &TextInputPolicy) -> bool {
    host.reading_motion_target()
        || policy.is_text_mode(&host.current_mode())
        || policy.is_literal_command(&host.current_command())
}
