// Swapkeys Host Interface
// Capability traits for the hosting editor: read-only context queries and
// the global key-translation registry.
//
// The core never assumes singleton access to the host; one instance of
// each capability is provided at integration time.

use std::sync::Arc;

use crate::buffer::BufferId;
use crate::context::{CommandSymbol, ModeSymbol};
use crate::Key;

/// A translation callback registered against a single key.
///
/// The host consults it before normal dispatch and treats the returned key
/// as final for that cycle, so the callback can never recurse.
pub type TranslateFn = Arc<dyn Fn(Key) -> Key + Send + Sync>;

/// Read-only queries into the hosting editor, evaluated at the moment a
/// keystroke is about to be processed.
pub trait EditorHost {
    /// The buffer that will receive the keystroke
    fn current_buffer(&self) -> BufferId;

    /// The current editing mode
    fn current_mode(&self) -> ModeSymbol;

    /// The command currently reading input
    fn current_command(&self) -> CommandSymbol;

    /// True while the next keystroke is the object of a motion rather than
    /// a count prefix
    fn reading_motion_target(&self) -> bool;
}

/// Error returned by the host when a registration is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("malformed key descriptor: {0:?}")]
    MalformedKey(Key),

    #[error("registration rejected: {0}")]
    Rejected(String),
}

/// The process-wide dispatch table mapping raw keys to translation
/// callbacks, consulted by the host before normal key processing.
///
/// Re-registration for the same key overwrites the previous callback and
/// is always safe. The core only registers; `unregister` exists for the
/// hosting environment's own teardown (registrations are shared across
/// buffers, so the core never removes them).
pub trait KeyTranslationRegistry {
    /// Register a translation callback for a key
    fn register(&mut self, key: Key, callback: TranslateFn) -> Result<(), RegistryError>;

    /// Remove the registration for a key
    fn unregister(&mut self, key: Key) -> Result<(), RegistryError>;
}
