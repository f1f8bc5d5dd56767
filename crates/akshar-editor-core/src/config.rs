//! Editor configuration.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::ConfigError;

/// Maximum number of snapshots kept in history.
pub const MAX_HISTORY: usize = 50;
/// Quiet period before a typing burst is committed to history.
pub const DEBOUNCE_MS: u64 = 500;
/// Delay before derived state is recomputed after a mutating command.
pub const SETTLE_MS: u64 = 10;
/// How long after an undo/redo write recording stays suppressed.
pub const REPLAY_GRACE_MS: u64 = 100;

/// Tunables for an [`Editor`](crate::Editor).
///
/// Every field has a default, so partial JSON objects are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub max_history: usize,
    pub debounce_ms: u64,
    pub settle_ms: u64,
    pub replay_grace_ms: u64,
    /// Font that mixes Latin and Devanagari; selecting it enables Hindi typing.
    pub mixed_font: String,
    /// Case-insensitive substrings marking a font as Hindi-script.
    pub hindi_font_markers: Vec<String>,
    /// Start with Hindi typing already on.
    pub start_in_hindi_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
            debounce_ms: DEBOUNCE_MS,
            settle_ms: SETTLE_MS,
            replay_grace_ms: REPLAY_GRACE_MS,
            mixed_font: "Mixed (Hindi + English)".to_string(),
            hindi_font_markers: ["hindi", "devanagari", "mangal", "kruti"]
                .into_iter()
                .map(String::from)
                .collect(),
            start_in_hindi_mode: false,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid("maxHistory must be at least 1".into()));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn replay_grace(&self) -> Duration {
        Duration::from_millis(self.replay_grace_ms)
    }

    /// Whether choosing `font` should turn Hindi typing on.
    ///
    /// Fonts naming a Hindi-script designation, fonts whose name is itself in
    /// Devanagari, and the designated mixed font enable it. Everything else
    /// disables it.
    pub fn font_enables_hindi(&self, font: &str) -> bool {
        if font.trim().eq_ignore_ascii_case(self.mixed_font.trim()) {
            return true;
        }
        let lower = font.to_lowercase();
        self.hindi_font_markers
            .iter()
            .any(|marker| lower.contains(&marker.to_lowercase()))
            || font.chars().any(is_devanagari)
    }
}

pub(crate) fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_history, 50);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert!(!config.start_in_hindi_mode);
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"debounceMs": 250, "startInHindiMode": true}"#)
            .unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert!(config.start_in_hindi_mode);
        assert_eq!(config.max_history, MAX_HISTORY);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"maxHistory": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_font_mapping() {
        let config = EditorConfig::default();
        assert!(config.font_enables_hindi("Noto Sans Devanagari"));
        assert!(config.font_enables_hindi("Hindi (Mangal)"));
        assert!(config.font_enables_hindi("Kruti Dev 010"));
        assert!(config.font_enables_hindi("हिन्दी"));
        assert!(config.font_enables_hindi("Mixed (Hindi + English)"));
        assert!(!config.font_enables_hindi("Arial"));
        assert!(!config.font_enables_hindi("Times New Roman"));
    }

    #[test]
    fn test_custom_mixed_font() {
        let config = EditorConfig {
            mixed_font: "Bilingual Sans".into(),
            ..Default::default()
        };
        assert!(config.font_enables_hindi("bilingual sans"));
        // Still Hindi through the marker list.
        assert!(config.font_enables_hindi("Mixed (Hindi + English)"));
        assert!(!config.font_enables_hindi("Plain Serif"));
    }
}
