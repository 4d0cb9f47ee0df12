// Swapkeys Core Library
// Conditional single-character key swapping for modal editors
//
// The host editor registers a translation callback for every mapped key;
// per keystroke the engine decides, from the buffer's active mapping set
// and the text-input context classifier, whether to substitute the key.

pub mod buffer;
pub mod context;
pub mod engine;
pub mod host;
pub mod key;
pub mod mapping;
pub mod settings;

pub use buffer::{BufferId, BufferState};
pub use context::{is_text_input, CommandSymbol, ModeSymbol, TextInputPolicy};
pub use engine::{SharedSwapEngine, SwapEngine, Translation};
pub use host::{EditorHost, KeyTranslationRegistry, RegistryError, TranslateFn};
pub use key::{Key, KeyError};
pub use mapping::{default_builtin_pairs, ActiveMappingSet, CharacterPair, Mapping};
pub use settings::{default_settings_content, Settings, SettingsError};
