//! `EditingSurface` over a contenteditable element.
//!
//! Mutations go through `document.execCommand`; caret inspection uses the
//! Selection API. Selection offsets are UTF-16 code units, the core works in
//! chars, so every offset crossing the boundary is converted here.

use akshar_editor_core::{CaretText, EditingSurface, PlatformError};
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement, Node, Selection};

/// Browser-backed editing surface.
pub struct BrowserSurface {
    element: HtmlElement,
    document: HtmlDocument,
}

impl BrowserSurface {
    /// Wrap a contenteditable element.
    pub fn new(element: HtmlElement) -> Result<Self, PlatformError> {
        let document = element
            .owner_document()
            .ok_or("element has no owner document")?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| PlatformError::from("owner document is not an HTML document"))?;
        element.set_content_editable("true");
        Ok(Self { element, document })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub fn set_editable(&self, editable: bool) {
        self.element
            .set_content_editable(if editable { "true" } else { "false" });
    }

    /// The current selection, if it is anchored inside the editor element.
    fn selection(&self) -> Option<Selection> {
        let selection = self.document.get_selection().ok()??;
        let anchor = selection.anchor_node()?;
        self.element.contains(Some(&anchor)).then_some(selection)
    }

    /// Anchor node and char offset when the caret sits inside a text node.
    fn caret_node(&self) -> Option<(Node, String, usize)> {
        let selection = self.selection()?;
        let node = selection.anchor_node()?;
        if node.node_type() != Node::TEXT_NODE {
            return None;
        }
        let text = node.text_content().unwrap_or_default();
        let offset = utf16_to_char_offset(&text, selection.anchor_offset() as usize);
        Some((node, text, offset))
    }
}

impl EditingSurface for BrowserSurface {
    fn exec_command(&mut self, name: &str, value: Option<&str>) {
        let result = self.document.exec_command_with_show_ui_and_value(
            name,
            false,
            value.unwrap_or_default(),
        );
        match result {
            Ok(true) => {}
            Ok(false) => tracing::debug!(name, "execCommand not applied"),
            Err(e) => tracing::warn!(name, error = ?e, "execCommand threw"),
        }
    }

    fn query_command_state(&self, name: &str) -> Result<bool, PlatformError> {
        if self.selection().is_none() {
            return Err("no selection inside editor".into());
        }
        self.document
            .query_command_state(name)
            .map_err(|e| PlatformError(format!("queryCommandState({name}) failed: {e:?}")))
    }

    fn html(&self) -> String {
        self.element.inner_html()
    }

    fn set_html(&mut self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn focus(&mut self) {
        if let Err(e) = self.element.focus() {
            tracing::warn!(error = ?e, "focus failed");
        }
    }

    fn has_focus(&self) -> bool {
        self.document
            .active_element()
            .is_some_and(|active| self.element.is_same_node(Some(active.as_ref())))
    }

    fn has_selection(&self) -> bool {
        self.selection().is_some_and(|s| !s.is_collapsed())
    }

    fn caret_text(&self) -> Option<CaretText> {
        let (_, text, offset) = self.caret_node()?;
        Some(CaretText::new(text, offset))
    }

    fn replace_caret_text(&mut self, text: &str) {
        let Some((node, _, _)) = self.caret_node() else {
            tracing::debug!("caret not in a text node, nothing replaced");
            return;
        };
        node.set_text_content(Some(text));

        let end = text.encode_utf16().count() as u32;
        let placed = (|| {
            let selection = self.document.get_selection().ok()??;
            let range = self.document.create_range().ok()?;
            range.set_start(&node, end).ok()?;
            range.collapse_with_to_start(true);
            selection.remove_all_ranges().ok()?;
            selection.add_range(&range).ok()
        })();
        if placed.is_none() {
            tracing::warn!("could not move caret after replacement");
        }
    }

    fn tag_enclosing(&mut self, element: &str, attribute: &str, value: &str) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        let mut current = selection.anchor_node();
        while let Some(node) = current {
            if self.element.is_same_node(Some(&node)) {
                break;
            }
            if let Some(el) = node.dyn_ref::<web_sys::Element>()
                && el.tag_name().eq_ignore_ascii_case(element)
            {
                return match el.set_attribute(attribute, value) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(error = ?e, attribute, "set_attribute failed");
                        false
                    }
                };
            }
            current = node.parent_node();
        }
        false
    }
}

/// Convert a UTF-16 offset within `text` to a char offset.
///
/// Offsets landing inside a surrogate pair round up to the following char.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (chars, c) in text.chars().enumerate() {
        if units >= utf16_offset {
            return chars;
        }
        units += c.len_utf16();
    }
    text.chars().count()
}
