//! Keyboard input and shortcut bindings.
//!
//! Platform code converts native key events into [`KeyCombo`]s; the
//! controller resolves them through a [`KeybindingConfig`].

use std::collections::HashMap;

use smol_str::SmolStr;

/// Key values for keyboard input.
///
/// Only the keys the editor reacts to are distinguished; everything else
/// arrives as `Character` or `Unidentified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key, case as typed.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    Space,
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            " " | "Spacebar" => Self::Space,
            "Enter" => Self::Enter,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Alt" => Self::Alt,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            s if s.chars().count() == 1 => Self::character(s),
            _ => Self::Unidentified,
        }
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }

    /// Lowercased form used for binding lookup, so `Shift+z` and `Shift+Z`
    /// resolve alike.
    fn normalized(&self) -> Self {
        match self {
            Self::Character(s) => Self::Character(SmolStr::new(s.to_lowercase())),
            other => other.clone(),
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    /// Get the primary modifier + Shift for the platform.
    pub fn primary_shift(is_mac: bool) -> Self {
        Self {
            shift: true,
            ..Self::primary(is_mac)
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary_shift(is_mac),
        }
    }

    /// An unmodified space bar press.
    pub fn is_plain_space(&self) -> bool {
        self.key == Key::Space && self.modifiers.is_empty()
    }
}

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Bold,
    Italic,
    Underline,
    Undo,
    Redo,
    ToggleTransliteration,
}

/// Maps key combinations to shortcuts.
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, Shortcut>,
}

impl KeybindingConfig {
    /// Standard bindings: primary+B/I/U, primary+Z undo, primary+Y and
    /// primary+Shift+Z redo, primary+Shift+H transliteration toggle.
    pub fn default_for_platform(is_mac: bool) -> Self {
        let mut config = Self {
            bindings: HashMap::new(),
        };
        let primary = |c: &str| KeyCombo::primary(Key::character(c), is_mac);
        let primary_shift = |c: &str| KeyCombo::primary_shift(Key::character(c), is_mac);

        config.bind(primary("b"), Shortcut::Bold);
        config.bind(primary("i"), Shortcut::Italic);
        config.bind(primary("u"), Shortcut::Underline);
        config.bind(primary("z"), Shortcut::Undo);
        config.bind(primary("y"), Shortcut::Redo);
        config.bind(primary_shift("z"), Shortcut::Redo);
        config.bind(primary_shift("h"), Shortcut::ToggleTransliteration);
        config
    }

    pub fn bind(&mut self, combo: KeyCombo, shortcut: Shortcut) {
        let combo = KeyCombo::with_modifiers(combo.key.normalized(), combo.modifiers);
        self.bindings.insert(combo, shortcut);
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<Shortcut> {
        let normalized = KeyCombo::with_modifiers(combo.key.normalized(), combo.modifiers);
        self.bindings.get(&normalized).copied()
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::default_for_platform(false)
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}
