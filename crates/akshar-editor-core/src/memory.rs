//! In-memory implementations of the platform traits.
//!
//! `MemorySurface` models an editable region as committed markup plus the
//! text node holding the caret. It understands the command names the
//! dispatcher emits well enough to drive the controller headlessly; it is
//! not an HTML engine.

use std::collections::{BTreeSet, VecDeque};

use crate::markup::{escape_attr, escape_text};
use crate::platform::{EditingSurface, ImageRequest, ImageSource, PlatformError, Prompter};
use crate::types::CaretText;

const INLINE_TAGS: &[(&str, &str)] = &[
    ("bold", "b"),
    ("italic", "i"),
    ("underline", "u"),
    ("strikeThrough", "s"),
    ("superscript", "sup"),
    ("subscript", "sub"),
];

const ALIGNMENTS: &[(&str, &str)] = &[
    ("justifyLeft", "left"),
    ("justifyCenter", "center"),
    ("justifyRight", "right"),
    ("justifyFull", "justify"),
];

const LISTS: &[(&str, &str)] = &[("insertOrderedList", "ol"), ("insertUnorderedList", "ul")];

/// Headless editable region.
///
/// The caret always sits at the end of the markup. Typing (via
/// [`type_text`](Self::type_text) or `insertText`) grows the caret's text
/// node; every other mutation closes it and leaves the caret at a node
/// boundary.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    committed: String,
    node: Option<String>,
    states: BTreeSet<&'static str>,
    focused: bool,
    selection_available: bool,
    has_selection: bool,
    commands: Vec<(String, Option<String>)>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            committed: String::new(),
            node: None,
            states: BTreeSet::new(),
            focused: false,
            selection_available: true,
            has_selection: false,
            commands: Vec::new(),
        }
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(html: &str) -> Self {
        let mut surface = Self::new();
        surface.set_html(html);
        surface
    }

    /// Simulate the user typing at the caret without going through a command.
    pub fn type_text(&mut self, text: &str) {
        self.node.get_or_insert_with(String::new).push_str(text);
    }

    /// Move the caret out of its text node, e.g. next to an embedded image.
    pub fn move_caret_to_boundary(&mut self) {
        self.close_node();
    }

    /// Make every format-state query fail, as when nothing is selected.
    pub fn set_selection_available(&mut self, available: bool) {
        self.selection_available = available;
    }

    /// Pretend the user has (or has not) selected a range of text.
    pub fn set_has_selection(&mut self, selected: bool) {
        self.has_selection = selected;
    }

    /// Simulate focus moving in or out without an explicit `focus()` call.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Every command run so far, in order.
    pub fn commands(&self) -> &[(String, Option<String>)] {
        &self.commands
    }

    /// Command names only, in order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn close_node(&mut self) {
        if let Some(text) = self.node.take() {
            self.committed.push_str(&escape_text(&text));
        }
    }

    fn push_markup(&mut self, markup: &str) {
        self.close_node();
        self.committed.push_str(markup);
    }

    fn toggle(&mut self, state: &'static str) -> bool {
        if self.states.remove(state) {
            false
        } else {
            self.states.insert(state);
            true
        }
    }
}

impl EditingSurface for MemorySurface {
    fn exec_command(&mut self, name: &str, value: Option<&str>) {
        self.commands.push((name.to_string(), value.map(str::to_string)));
        let value = value.unwrap_or_default();

        if let Some(&(state, tag)) = INLINE_TAGS.iter().find(|(n, _)| *n == name) {
            let markup = if self.toggle(state) {
                format!("<{tag}>")
            } else {
                format!("</{tag}>")
            };
            self.push_markup(&markup);
            return;
        }
        if let Some(&(state, align)) = ALIGNMENTS.iter().find(|(n, _)| *n == name) {
            for (other, _) in ALIGNMENTS {
                self.states.remove(other);
            }
            self.states.insert(state);
            self.push_markup(&format!(r#"<div style="text-align: {align}">"#));
            return;
        }
        if let Some(&(state, tag)) = LISTS.iter().find(|(n, _)| *n == name) {
            for (other, _) in LISTS {
                if *other != state {
                    self.states.remove(other);
                }
            }
            let markup = if self.toggle(state) {
                format!("<{tag}><li>")
            } else {
                format!("</li></{tag}>")
            };
            self.push_markup(&markup);
            return;
        }

        match name {
            "insertText" => self.type_text(value),
            "insertHTML" => self.push_markup(value),
            "formatBlock" => {
                let tag = value.trim_matches(|c| c == '<' || c == '>');
                self.push_markup(&format!("<{tag}>"));
            }
            "createLink" => self.push_markup(&format!(r#"<a href="{}">"#, escape_attr(value))),
            "unlink" => self.push_markup("</a>"),
            "removeFormat" => {
                for (state, _) in INLINE_TAGS {
                    self.states.remove(state);
                }
            }
            "insertHorizontalRule" => self.push_markup("<hr>"),
            "indent" | "outdent" | "fontName" | "fontSize" | "foreColor" | "hiliteColor" => {
                self.push_markup(&format!(
                    r#"<span data-command="{name}" data-value="{}"></span>"#,
                    escape_attr(value)
                ));
            }
            _ => tracing::trace!(name, "unsupported command ignored"),
        }
    }

    fn query_command_state(&self, name: &str) -> Result<bool, PlatformError> {
        if !self.selection_available {
            return Err(PlatformError::from("no selection"));
        }
        Ok(self.states.contains(name))
    }

    fn html(&self) -> String {
        match &self.node {
            Some(text) => format!("{}{}", self.committed, escape_text(text)),
            None => self.committed.clone(),
        }
    }

    fn set_html(&mut self, html: &str) {
        self.committed = html.to_string();
        self.node = None;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn has_selection(&self) -> bool {
        self.has_selection
    }

    fn caret_text(&self) -> Option<CaretText> {
        self.node.as_deref().map(CaretText::at_end)
    }

    fn replace_caret_text(&mut self, text: &str) {
        self.node = Some(text.to_string());
    }

    fn tag_enclosing(&mut self, element: &str, attribute: &str, value: &str) -> bool {
        let open = format!("<{element}");
        let Some(start) = self.committed.rfind(&open) else {
            return false;
        };
        let insert_at = start + open.len();
        self.committed.insert_str(
            insert_at,
            &format!(r#" {attribute}="{}""#, escape_attr(value)),
        );
        true
    }
}

/// Prompter that replays queued answers and records everything it was asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    confirms: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub alerts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next prompt answer. `None` simulates cancel.
    pub fn answer(mut self, answer: Option<&str>) -> Self {
        self.answers.push_back(answer.map(str::to_string));
        self
    }

    pub fn confirm_with(mut self, yes: bool) -> Self {
        self.confirms.push_back(yes);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Image source that hands out queued results, then cancels.
#[derive(Debug, Clone, Default)]
pub struct QueuedImages {
    queue: VecDeque<ImageRequest>,
}

impl QueuedImages {
    pub fn new(requests: impl IntoIterator<Item = ImageRequest>) -> Self {
        Self {
            queue: requests.into_iter().collect(),
        }
    }
}

impl ImageSource for QueuedImages {
    fn request_image(&mut self) -> ImageRequest {
        self.queue.pop_front().unwrap_or(ImageRequest::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_toggles() {
        let mut surface = MemorySurface::new();
        surface.exec_command("bold", None);
        surface.type_text("x");
        surface.exec_command("italic", None);
        assert_eq!(surface.html(), "<b>x<i>");
        assert!(surface.query_command_state("bold").unwrap());
        assert!(surface.query_command_state("italic").unwrap());
        assert!(!surface.query_command_state("underline").unwrap());
    }

    #[test]
    fn test_caret_node() {
        let mut surface = MemorySurface::with_html("<p>start</p>");
        assert_eq!(surface.caret_text(), None);

        surface.type_text("a < b");
        assert_eq!(surface.caret_text(), Some(CaretText::at_end("a < b")));
        assert_eq!(surface.html(), "<p>start</p>a &lt; b");

        surface.replace_caret_text("done");
        assert_eq!(surface.html(), "<p>start</p>done");

        surface.move_caret_to_boundary();
        assert_eq!(surface.caret_text(), None);
        assert_eq!(surface.html(), "<p>start</p>done");
    }

    #[test]
    fn test_alignment_is_exclusive() {
        let mut surface = MemorySurface::new();
        surface.exec_command("justifyCenter", None);
        surface.exec_command("justifyRight", None);
        assert!(!surface.query_command_state("justifyCenter").unwrap());
        assert!(surface.query_command_state("justifyRight").unwrap());
    }

    #[test]
    fn test_tag_enclosing() {
        let mut surface = MemorySurface::new();
        assert!(!surface.tag_enclosing("ul", "data-list-style", "plain"));
        surface.exec_command("insertUnorderedList", None);
        assert!(surface.tag_enclosing("ul", "data-list-style", "plain"));
        assert_eq!(surface.html(), r#"<ul data-list-style="plain"><li>"#);
    }

    #[test]
    fn test_unknown_command_is_logged_but_ignored() {
        let mut surface = MemorySurface::with_html("<p>x</p>");
        surface.exec_command("doSomethingNew", Some("1"));
        assert_eq!(surface.html(), "<p>x</p>");
        assert_eq!(surface.command_names(), vec!["doSomethingNew"]);
    }

    #[test]
    fn test_scripted_prompter() {
        let mut prompter = ScriptedPrompter::new().answer(Some("one")).answer(None);
        assert_eq!(prompter.prompt("first?", ""), Some("one".to_string()));
        assert_eq!(prompter.prompt("second?", ""), None);
        assert_eq!(prompter.prompt("third?", ""), None);
        assert_eq!(prompter.prompts.len(), 3);
    }

    #[test]
    fn test_scripted_confirm_answers_then_declines() {
        let mut prompter = ScriptedPrompter::new().confirm_with(true);
        assert!(prompter.confirm("replace selection?"));
        assert!(!prompter.confirm("again?"));
        assert_eq!(prompter.prompts, ["replace selection?", "again?"]);
    }
}
