//! JsEditor - the editor wrapper for JavaScript.

use akshar_editor_core::{
    Alignment, BlockType, Command, CommandOutcome, Editor, EditorConfig, InlineFormat, ListStyle,
    Origin,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use web_time::Instant;

use crate::mount::MountedEditor;
use crate::prompt::{BrowserPrompter, ExternalUpload};
use crate::surface::BrowserSurface;

/// The editor instance exposed to JavaScript.
#[wasm_bindgen]
pub struct JsEditor {
    mounted: Option<MountedEditor>,
}

/// Toolbar state handed to JS.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsToolbarState {
    active: Vec<&'static str>,
    hindi_typing: bool,
    font: Option<String>,
    can_undo: bool,
    can_redo: bool,
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn outcome_name(outcome: CommandOutcome) -> String {
    format!("{outcome:?}").to_lowercase()
}

impl JsEditor {
    fn with<R>(
        &self,
        f: impl FnOnce(&mut Editor<BrowserSurface>) -> R,
    ) -> Result<R, JsError> {
        self.mounted
            .as_ref()
            .ok_or_else(|| JsError::new("editor destroyed"))?
            .with_editor(f)
            .map_err(js_err)
    }

    fn exec(&self, command: Command) -> Result<bool, JsError> {
        self.with(|e| e.execute(&command, Origin::User, Instant::now()))
    }
}

#[wasm_bindgen]
impl JsEditor {
    /// Mount on a contenteditable element.
    ///
    /// `config` is a partial `EditorConfig` object; `onChange` receives the
    /// serialized content after every change.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: HtmlElement,
        initial: &str,
        config: JsValue,
        on_change: Option<js_sys::Function>,
    ) -> Result<JsEditor, JsError> {
        let config = config_from_js(config)?;
        let sink = move |html: &str| {
            if let Some(callback) = &on_change
                && let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(html))
            {
                tracing::error!(error = ?e, "onChange callback threw");
            }
        };
        let mounted = MountedEditor::mount(element, initial, config, sink).map_err(js_err)?;
        Ok(Self {
            mounted: Some(mounted),
        })
    }

    /// Current serialized content.
    pub fn content(&self) -> Result<String, JsError> {
        self.with(|e| e.content())
    }

    /// Push content held by the application. Returns whether it was written.
    #[wasm_bindgen(js_name = syncContent)]
    pub fn sync_content(&self, content: &str) -> Result<bool, JsError> {
        self.with(|e| e.sync_external(content))
    }

    /// Toggle an inline format by name: bold, italic, underline,
    /// strikethrough, superscript or subscript.
    #[wasm_bindgen(js_name = toggleFormat)]
    pub fn toggle_format(&self, name: &str) -> Result<bool, JsError> {
        let format = match name {
            "bold" => InlineFormat::Bold,
            "italic" => InlineFormat::Italic,
            "underline" => InlineFormat::Underline,
            "strikethrough" => InlineFormat::Strikethrough,
            "superscript" => InlineFormat::Superscript,
            "subscript" => InlineFormat::Subscript,
            other => return Err(JsError::new(&format!("unknown format: {other}"))),
        };
        self.exec(Command::Toggle(format))
    }

    pub fn align(&self, alignment: &str) -> Result<bool, JsError> {
        let alignment = match alignment {
            "left" => Alignment::Left,
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            "justify" => Alignment::Justify,
            other => return Err(JsError::new(&format!("unknown alignment: {other}"))),
        };
        self.exec(Command::Align(alignment))
    }

    /// Set the block type: paragraph, quote, pre, or h1 through h6.
    #[wasm_bindgen(js_name = setBlock)]
    pub fn set_block(&self, block: &str) -> Result<bool, JsError> {
        let block = match block {
            "paragraph" | "p" => BlockType::Paragraph,
            "quote" | "blockquote" => BlockType::Quote,
            "pre" => BlockType::Preformatted,
            heading => match heading.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
                Some(level) => BlockType::Heading(level),
                None => return Err(JsError::new(&format!("unknown block type: {heading}"))),
            },
        };
        self.exec(Command::SetBlock(block))
    }

    pub fn indent(&self) -> Result<bool, JsError> {
        self.exec(Command::Indent)
    }

    pub fn outdent(&self) -> Result<bool, JsError> {
        self.exec(Command::Outdent)
    }

    #[wasm_bindgen(js_name = removeFormat)]
    pub fn remove_format(&self) -> Result<bool, JsError> {
        self.exec(Command::RemoveFormat)
    }

    pub fn unlink(&self) -> Result<bool, JsError> {
        self.exec(Command::Unlink)
    }

    #[wasm_bindgen(js_name = fontSize)]
    pub fn font_size(&self, size: u8) -> Result<bool, JsError> {
        self.exec(Command::FontSize(size))
    }

    #[wasm_bindgen(js_name = foreColor)]
    pub fn fore_color(&self, color: &str) -> Result<bool, JsError> {
        self.exec(Command::ForeColor(color.to_string()))
    }

    #[wasm_bindgen(js_name = backColor)]
    pub fn back_color(&self, color: &str) -> Result<bool, JsError> {
        self.exec(Command::BackColor(color.to_string()))
    }

    /// Apply a font. Returns whether Hindi typing is now on.
    #[wasm_bindgen(js_name = selectFont)]
    pub fn select_font(&self, font: &str) -> Result<bool, JsError> {
        self.with(|e| e.select_font(font, Instant::now()).is_intercepting())
    }

    #[wasm_bindgen(js_name = toggleTransliteration)]
    pub fn toggle_transliteration(&self) -> Result<bool, JsError> {
        self.with(|e| e.toggle_transliteration().is_intercepting())
    }

    /// Add a word to the phonetic dictionary overlay.
    #[wasm_bindgen(js_name = addMapping)]
    pub fn add_mapping(&self, source: &str, rendered: &str) -> Result<(), JsError> {
        self.with(|e| e.transliterator_mut().add_mapping(source, rendered))
    }

    pub fn transliterate(&self, word: &str) -> Result<String, JsError> {
        self.with(|e| e.transliterator().transliterate(word))
    }

    pub fn undo(&self) -> Result<bool, JsError> {
        self.with(|e| e.undo(Instant::now()))
    }

    pub fn redo(&self) -> Result<bool, JsError> {
        self.with(|e| e.redo(Instant::now()))
    }

    #[wasm_bindgen(js_name = insertHeading)]
    pub fn insert_heading(&self, level: u8) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_heading(level, Instant::now())))
    }

    /// Insert a list: plain, bulleted or numbered.
    #[wasm_bindgen(js_name = insertList)]
    pub fn insert_list(&self, style: &str) -> Result<String, JsError> {
        let style = match style {
            "plain" => ListStyle::Plain,
            "bulleted" => ListStyle::Bulleted,
            "numbered" => ListStyle::Numbered,
            other => return Err(JsError::new(&format!("unknown list style: {other}"))),
        };
        self.with(|e| outcome_name(e.insert_list(style, Instant::now())))
    }

    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&self) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_link(&mut BrowserPrompter::new(), Instant::now())))
    }

    #[wasm_bindgen(js_name = insertTable)]
    pub fn insert_table(&self) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_table(&mut BrowserPrompter::new(), Instant::now())))
    }

    #[wasm_bindgen(js_name = insertVideo)]
    pub fn insert_video(&self) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_video(&mut BrowserPrompter::new(), Instant::now())))
    }

    #[wasm_bindgen(js_name = insertQuote)]
    pub fn insert_quote(&self) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_quote(&mut BrowserPrompter::new(), Instant::now())))
    }

    #[wasm_bindgen(js_name = insertHorizontalRule)]
    pub fn insert_horizontal_rule(&self) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_horizontal_rule(Instant::now())))
    }

    /// Insert an image whose URL is already known.
    #[wasm_bindgen(js_name = insertImage)]
    pub fn insert_image(&self, url: &str) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.insert_image(url, Instant::now())))
    }

    /// Mark an upload as started; finish it with `completeImage`.
    #[wasm_bindgen(js_name = beginImageUpload)]
    pub fn begin_image_upload(&self) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.begin_image_insert(&mut ExternalUpload, Instant::now())))
    }

    #[wasm_bindgen(js_name = completeImage)]
    pub fn complete_image(&self, url: &str) -> Result<String, JsError> {
        self.with(|e| outcome_name(e.complete_image(url, Instant::now())))
    }

    #[wasm_bindgen(js_name = setDisabled)]
    pub fn set_disabled(&self, disabled: bool) -> Result<(), JsError> {
        self.with(|e| {
            e.set_disabled(disabled);
            e.surface().set_editable(!disabled);
        })
    }

    /// Toolbar state: active formats, Hindi typing, font and undo/redo availability.
    #[wasm_bindgen(js_name = toolbarState)]
    pub fn toolbar_state(&self) -> Result<JsValue, JsError> {
        let state = self.with(|e| JsToolbarState {
            active: e.active_formats().active().map(|f| f.query_name()).collect(),
            hindi_typing: e.mode().is_intercepting(),
            font: e.font().map(str::to_string),
            can_undo: e.history().can_undo(),
            can_redo: e.history().can_redo(),
        })?;
        serde_wasm_bindgen::to_value(&state).map_err(js_err)
    }

    /// Detach from the DOM. Further calls fail.
    pub fn destroy(&mut self) {
        self.mounted.take();
    }
}

/// Read a partial `EditorConfig` from a JS object. `undefined` and `null`
/// give the defaults.
pub fn config_from_js(value: JsValue) -> Result<EditorConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(EditorConfig::default());
    }
    let config: EditorConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("invalid editor config: {e}")))?;
    config.validate().map_err(js_err)?;
    Ok(config)
}
