//! Browser event extraction for the editor.

use akshar_editor_core::{Key, KeyCombo, Modifiers};
use web_sys::KeyboardEvent;

/// Build a key combination from a DOM keydown event.
pub fn key_combo(event: &KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_dom(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}

/// Whether the keydown belongs to an IME composition.
///
/// Composition keystrokes must reach the browser untouched, including the
/// space that commits a candidate.
pub fn is_composing(event: &KeyboardEvent) -> bool {
    event.is_composing() || event.key_code() == 229
}
