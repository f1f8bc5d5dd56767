//! Error types for the editing core.

use thiserror::Error;

/// User-supplied command input that failed validation.
///
/// These never escape to the embedding application; the controller reports
/// them through [`Prompter::alert`](crate::Prompter::alert).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandInputError {
    /// Link target is not an absolute http(s)/mailto URL.
    #[error("not a valid link URL: {0}")]
    InvalidUrl(String),

    /// Table dimensions are malformed or out of range.
    #[error("table dimensions must be between 1 and {max}, got {input:?}")]
    InvalidTableSize { input: String, max: usize },

    /// Not a YouTube or Vimeo reference.
    #[error("not a valid video reference: {0}")]
    InvalidVideo(String),

    /// Nothing to quote.
    #[error("quote text is empty")]
    EmptyQuote,
}

/// Failure inside the generative transliteration tier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransliterationError {
    #[error("nothing to transliterate")]
    Empty,

    /// The word contains characters outside the romanization alphabet.
    #[error("unsupported character {0:?} in romanized input")]
    Unsupported(char),
}

/// Configuration could not be loaded.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid editor config: {0}")]
    Invalid(String),
}
