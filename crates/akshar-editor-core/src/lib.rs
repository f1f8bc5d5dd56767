//! akshar-editor-core: Headless rich-text editing logic.
//!
//! This crate provides:
//! - `EditingSurface`, `Prompter`, `ImageSource` traits for the platform seams
//! - `Editor<S>` - the surface controller with shortcut and Hindi-typing handling
//! - `HistoryManager` - debounced, bounded undo/redo over content snapshots
//! - `FormatTracker` - toolbar format state derived from the surface
//! - `Command` - the closed set of mutations, plus validated composite inserts
//! - `Transliterator` - romanized Hindi to Devanagari (dictionary + ITRANS)
//! - `MemorySurface` - in-memory surface for headless use and tests
//!
//! Nothing here spawns timers. Operations take the current `Instant`, and the
//! owner calls [`Editor::poll`] once [`Editor::next_deadline`] has passed.

pub mod commands;
pub mod composite;
pub mod config;
pub mod controller;
pub mod error;
pub mod execute;
pub mod format;
pub mod history;
pub mod keys;
pub mod markup;
pub mod memory;
pub mod platform;
pub mod translit;
pub mod types;

pub use commands::{
    Alignment, BlockType, Command, CommandOutcome, InlineFormat, ListKind, ListStyle, VideoRef,
};
pub use config::EditorConfig;
pub use controller::{Editor, FollowUp};
pub use error::{CommandInputError, ConfigError, TransliterationError};
pub use format::FormatTracker;
pub use history::{HistoryManager, HistoryStack};
pub use keys::{Key, KeyCombo, KeybindingConfig, KeydownResult, Modifiers, Shortcut};
pub use memory::{MemorySurface, QueuedImages, ScriptedPrompter};
pub use platform::{
    ChangeSink, EditingSurface, ImageRequest, ImageSource, PlatformError, Prompter,
};
pub use smol_str::SmolStr;
pub use translit::{PhoneticDictionary, Transliterator};
pub use types::{
    ActiveFormatSet, CaretText, ContentSnapshot, FormatName, Origin, TransliterationMode,
};
pub use web_time::{Duration, Instant};
