//! Core editor types: content snapshots, format flags and interception mode.
//!
//! These types are platform-agnostic and shared by every component of the
//! editing core.

use std::fmt;

use smol_str::SmolStr;

/// Serialized markup of the whole editable surface at one instant.
///
/// Snapshots are immutable and compared structurally. Cloning is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ContentSnapshot(SmolStr);

impl ContentSnapshot {
    /// Create a snapshot from serialized markup.
    pub fn new(markup: impl AsRef<str>) -> Self {
        Self(SmolStr::new(markup))
    }

    /// The serialized markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ContentSnapshot {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContentSnapshot {
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}

impl AsRef<str> for ContentSnapshot {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ContentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of formats whose state is tracked for toolbar highlighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatName {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    AlignLeft,
    AlignCenter,
    AlignRight,
    AlignJustify,
    OrderedList,
    UnorderedList,
    Superscript,
    Subscript,
}

impl FormatName {
    /// Every tracked format, in display order.
    pub const ALL: [FormatName; 12] = [
        FormatName::Bold,
        FormatName::Italic,
        FormatName::Underline,
        FormatName::Strikethrough,
        FormatName::AlignLeft,
        FormatName::AlignCenter,
        FormatName::AlignRight,
        FormatName::AlignJustify,
        FormatName::OrderedList,
        FormatName::UnorderedList,
        FormatName::Superscript,
        FormatName::Subscript,
    ];

    /// Name understood by the platform's format-state query.
    pub fn query_name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikeThrough",
            Self::AlignLeft => "justifyLeft",
            Self::AlignCenter => "justifyCenter",
            Self::AlignRight => "justifyRight",
            Self::AlignJustify => "justifyFull",
            Self::OrderedList => "insertOrderedList",
            Self::UnorderedList => "insertUnorderedList",
            Self::Superscript => "superscript",
            Self::Subscript => "subscript",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of which tracked formats apply at the caret/selection.
///
/// Always replaced as a whole on recompute, never patched flag by flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ActiveFormatSet {
    flags: [bool; FormatName::ALL.len()],
}

impl ActiveFormatSet {
    /// Build a set from `(format, active)` pairs. Formats not listed are inactive.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (FormatName, bool)>) -> Self {
        let mut set = Self::default();
        for (name, active) in pairs {
            set.flags[name.index()] = active;
        }
        set
    }

    pub fn is_active(&self, name: FormatName) -> bool {
        self.flags[name.index()]
    }

    /// Iterate over every format with its flag.
    pub fn iter(&self) -> impl Iterator<Item = (FormatName, bool)> + '_ {
        FormatName::ALL.iter().map(|name| (*name, self.is_active(*name)))
    }

    /// Only the formats currently active.
    pub fn active(&self) -> impl Iterator<Item = FormatName> + '_ {
        self.iter().filter(|(_, on)| *on).map(|(name, _)| name)
    }
}

/// Hindi-typing interception state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransliterationMode {
    /// Spaces are inserted untouched.
    #[default]
    Idle,
    /// The word before the caret is transliterated on every space.
    Intercepting,
}

impl TransliterationMode {
    pub fn is_intercepting(self) -> bool {
        matches!(self, Self::Intercepting)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Idle => Self::Intercepting,
            Self::Intercepting => Self::Idle,
        }
    }
}

/// Where a content mutation came from.
///
/// Replay writes come from undo/redo and must never be recorded as new
/// history entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Replay,
}

/// Text node that currently holds the caret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaretText {
    /// Full text content of the node.
    pub text: String,
    /// Caret position within `text`, in characters.
    pub offset: usize,
}

impl CaretText {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }

    /// Caret at the end of the node.
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let offset = text.chars().count();
        Self { text, offset }
    }

    /// Split the node text at the caret into `(before, after)`.
    pub fn split(&self) -> (&str, &str) {
        let byte = self
            .text
            .char_indices()
            .nth(self.offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        self.text.split_at(byte)
    }

    /// The run of non-whitespace characters immediately before the caret.
    pub fn word_before_caret(&self) -> &str {
        let (before, _) = self.split();
        let start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| !c.is_whitespace())
            .last()
            .map(|(i, _)| i)
            .unwrap_or(before.len());
        &before[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_equality_is_structural() {
        let a = ContentSnapshot::from("<p>hi</p>");
        let b = ContentSnapshot::from(String::from("<p>hi</p>"));
        assert_eq!(a, b);
        assert_ne!(a, ContentSnapshot::from("<p>hi </p>"));
    }

    #[test]
    fn test_active_format_set() {
        let set = ActiveFormatSet::from_pairs([
            (FormatName::Bold, true),
            (FormatName::AlignCenter, true),
        ]);
        assert!(set.is_active(FormatName::Bold));
        assert!(!set.is_active(FormatName::Italic));
        let active: Vec<_> = set.active().collect();
        assert_eq!(active, vec![FormatName::Bold, FormatName::AlignCenter]);
        assert_eq!(set.iter().count(), 12);
    }

    #[test]
    fn test_word_before_caret() {
        let caret = CaretText::at_end("hello namaste");
        assert_eq!(caret.word_before_caret(), "namaste");

        let caret = CaretText::new("ab cd ef", 5);
        assert_eq!(caret.split(), ("ab cd", " ef"));
        assert_eq!(caret.word_before_caret(), "cd");

        let caret = CaretText::at_end("trailing ");
        assert_eq!(caret.word_before_caret(), "");

        let caret = CaretText::at_end("");
        assert_eq!(caret.word_before_caret(), "");
    }

    #[test]
    fn test_word_before_caret_multibyte() {
        let caret = CaretText::at_end("मैं ghar");
        assert_eq!(caret.word_before_caret(), "ghar");
        let caret = CaretText::new("नमस्ते dost", 6);
        assert_eq!(caret.word_before_caret(), "नमस्ते");
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(
            TransliterationMode::Idle.toggled(),
            TransliterationMode::Intercepting
        );
        assert!(!TransliterationMode::default().is_intercepting());
    }
}
