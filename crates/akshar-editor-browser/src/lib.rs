//! Browser DOM layer for the akshar rich-text editor.
//!
//! This crate binds the headless `akshar-editor-core` to a contenteditable
//! element. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `surface`: `EditingSurface` over `execCommand` and the Selection API
//! - `prompt`: native dialogs as the `Prompter`, external image uploads
//! - `events`: keydown extraction
//! - `mount`: DOM listeners and the deadline timer
//! - `platform`: Browser/OS detection for platform-specific shortcuts
//! - `bindings`: `JsEditor` for JavaScript hosts
//! - `logging`: console tracing subscriber
//!
//! # Re-exports
//!
//! This crate re-exports `akshar-editor-core` for convenience, so consumers
//! only need to depend on `akshar-editor-browser`.

// Re-export core crate
pub use akshar_editor_core;
pub use akshar_editor_core::*;

pub mod bindings;
pub mod events;
pub mod logging;
pub mod mount;
pub mod platform;
pub mod prompt;
pub mod surface;

pub use bindings::{JsEditor, config_from_js};
pub use mount::{MountedEditor, SharedEditor};
pub use platform::{Platform, platform};
pub use prompt::{BrowserPrompter, ExternalUpload};
pub use surface::BrowserSurface;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
