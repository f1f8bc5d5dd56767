//! Platform abstraction traits for the editing core.
//!
//! These traits define the interface between the editor logic and the
//! platform that actually owns the editable region (browser DOM via
//! `execCommand`, an in-memory surface for headless use, etc.). The core
//! never reimplements rich-text mutation itself; it sequences calls into
//! these collaborators.

use thiserror::Error;

use crate::types::CaretText;

/// Error type for platform operations.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// The editable region and its rich-text command capability.
///
/// Mutations follow standard rich-text editing semantics (the browser's
/// `document.execCommand` family). Unsupported commands are expected to be
/// no-ops; the dispatcher does not inspect their outcome.
pub trait EditingSurface {
    /// Run a rich-text command against the focused region.
    fn exec_command(&mut self, name: &str, value: Option<&str>);

    /// Whether the named format applies at the caret/selection.
    ///
    /// Fails when there is no selection or the capability is unavailable.
    fn query_command_state(&self, name: &str) -> Result<bool, PlatformError>;

    /// Serialized markup of the whole region.
    fn html(&self) -> String;

    /// Replace the whole region's markup.
    fn set_html(&mut self, html: &str);

    fn focus(&mut self);

    fn has_focus(&self) -> bool;

    /// Whether a non-collapsed selection exists inside the region.
    fn has_selection(&self) -> bool;

    /// The text node holding the caret, if the caret is inside one.
    ///
    /// Returns `None` when the caret sits at a node boundary or inside an
    /// embedded element.
    fn caret_text(&self) -> Option<CaretText>;

    /// Replace the caret's text node content and move the caret to its end.
    fn replace_caret_text(&mut self, text: &str);

    /// Set `attribute=value` on the nearest `element` enclosing the caret.
    ///
    /// Returns false when no such element exists.
    fn tag_enclosing(&mut self, element: &str, attribute: &str, value: &str) -> bool;
}

/// Modal prompts owned by the embedding application.
pub trait Prompter {
    /// Ask for a single line of text. `None` means the user cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Report a validation failure.
    fn alert(&mut self, message: &str);
}

/// Result of asking the image collaborator for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRequest {
    /// The URL is available now.
    Ready(String),
    /// An upload is in flight; the URL arrives later via
    /// [`Editor::complete_image`](crate::Editor::complete_image).
    Pending,
    /// The user gave up.
    Cancelled,
}

/// Produces a reachable URL for an image chosen by the user.
///
/// Upload and resize mechanics live entirely in the implementation.
pub trait ImageSource {
    fn request_image(&mut self) -> ImageRequest;
}

/// Callback receiving the new serialized content after every change.
pub type ChangeSink = Box<dyn FnMut(&str)>;
