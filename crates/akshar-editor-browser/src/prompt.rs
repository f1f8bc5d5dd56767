//! Native window dialogs as the editor's `Prompter` and image source.

use akshar_editor_core::{ImageRequest, ImageSource, Prompter};
use web_sys::Window;

/// `window.prompt` / `confirm` / `alert`.
pub struct BrowserPrompter {
    window: Option<Window>,
}

impl BrowserPrompter {
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }
}

impl Default for BrowserPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for BrowserPrompter {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        let window = self.window.as_ref()?;
        match window.prompt_with_message_and_default(message, default) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = ?e, "prompt failed");
                None
            }
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.window
            .as_ref()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        if let Some(window) = &self.window
            && let Err(e) = window.alert_with_message(message)
        {
            tracing::warn!(error = ?e, "alert failed");
        }
    }
}

/// Image source for uploads handled by the embedding page.
///
/// Always reports an upload in flight; the page later hands the URL back
/// through `complete_image`.
#[derive(Debug, Default)]
pub struct ExternalUpload;

impl ImageSource for ExternalUpload {
    fn request_image(&mut self) -> ImageRequest {
        ImageRequest::Pending
    }
}
