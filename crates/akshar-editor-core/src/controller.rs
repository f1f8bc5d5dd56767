//! The editing surface controller.
//!
//! [`Editor`] owns the editable region and everything derived from it: the
//! history, the toolbar format state, the Hindi-typing mode and the queue of
//! deferred follow-up work. Platform code forwards events to it and arms a
//! single timer for [`Editor::next_deadline`].

use web_time::Instant;

use crate::commands::{Command, PLAIN_LIST_MARKER};
use crate::config::EditorConfig;
use crate::error::ConfigError;
use crate::format::FormatTracker;
use crate::history::HistoryManager;
use crate::keys::{KeyCombo, KeybindingConfig, KeydownResult, Shortcut};
use crate::platform::{ChangeSink, EditingSurface};
use crate::translit::Transliterator;
use crate::types::{ActiveFormatSet, ContentSnapshot, Origin, TransliterationMode};

/// Work deferred until the surface has settled after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Re-derive the toolbar format flags.
    RecomputeFormats,
    /// Mark the list at the caret as a plain (unbulleted) list.
    TagPlainList,
}

/// Rich-text editor bound to one editable surface.
pub struct Editor<S: EditingSurface> {
    pub(crate) surface: S,
    pub(crate) config: EditorConfig,
    keybindings: KeybindingConfig,
    pub(crate) history: HistoryManager,
    formats: FormatTracker,
    transliterator: Transliterator,
    follow_ups: Vec<(Instant, FollowUp)>,
    on_change: Option<ChangeSink>,
    mode: TransliterationMode,
    font: Option<String>,
    disabled: bool,
    mounted: bool,
    pub(crate) awaiting_image: bool,
}

impl<S: EditingSurface> Editor<S> {
    pub fn new(surface: S) -> Self {
        Self::build(surface, EditorConfig::default())
    }

    /// Create an editor with custom tunables.
    pub fn with_config(surface: S, config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(surface, config))
    }

    fn build(surface: S, config: EditorConfig) -> Self {
        let history = HistoryManager::new(
            config.max_history,
            config.debounce(),
            config.replay_grace(),
        );
        let mode = if config.start_in_hindi_mode {
            TransliterationMode::Intercepting
        } else {
            TransliterationMode::Idle
        };
        Self {
            surface,
            keybindings: KeybindingConfig::default(),
            history,
            formats: FormatTracker::new(),
            transliterator: Transliterator::new(),
            follow_ups: Vec::new(),
            on_change: None,
            mode,
            font: None,
            disabled: false,
            mounted: false,
            awaiting_image: false,
            config,
        }
    }

    pub fn with_keybindings(mut self, keybindings: KeybindingConfig) -> Self {
        self.keybindings = keybindings;
        self
    }

    /// Register the content-changed notification sink.
    pub fn on_change(&mut self, sink: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(sink));
    }

    // === Lifecycle ===

    /// Attach to the surface with the application's initial content, which
    /// becomes the first history entry even when empty.
    pub fn mount(&mut self, initial: &str, now: Instant) {
        if self.mounted {
            tracing::warn!("editor already mounted");
            return;
        }
        self.mounted = true;
        if self.surface.html() != initial {
            self.surface.set_html(initial);
        }
        self.history.seed(ContentSnapshot::new(initial));
        self.schedule(FollowUp::RecomputeFormats, now);
        tracing::debug!(len = initial.len(), mode = ?self.mode, "editor mounted");
    }

    /// Detach from the surface. Pending timers and follow-ups are dropped so
    /// nothing writes to the surface afterwards.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.history.cancel_pending();
        self.follow_ups.clear();
        self.awaiting_image = false;
        self.mounted = false;
        tracing::debug!("editor torn down");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            tracing::debug!(disabled, "editor disabled state changed");
        }
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Mounted and not disabled.
    pub(crate) fn is_active(&self) -> bool {
        self.mounted && !self.disabled
    }

    // === External content ===

    /// Write application-supplied content, but only if it differs from what
    /// the surface already holds. Returns whether the surface was written.
    ///
    /// Until the first edit, the content replaces the initial history entry.
    pub fn sync_external(&mut self, content: &str) -> bool {
        let written = if self.surface.html() != content {
            self.surface.set_html(content);
            tracing::debug!(len = content.len(), "external content synced");
            true
        } else {
            false
        };
        self.history.seed(ContentSnapshot::new(content));
        written
    }

    // === Events ===

    /// Resolve a keydown. Shortcuts only apply while the surface has focus.
    pub fn handle_keydown(&mut self, combo: &KeyCombo, now: Instant) -> KeydownResult {
        if !self.is_active() || !self.surface.has_focus() {
            return KeydownResult::NotHandled;
        }

        if let Some(shortcut) = self.keybindings.lookup(combo) {
            tracing::trace!(?shortcut, "shortcut");
            match shortcut {
                Shortcut::Bold => {
                    self.execute(&Command::bold(), Origin::User, now);
                }
                Shortcut::Italic => {
                    self.execute(&Command::italic(), Origin::User, now);
                }
                Shortcut::Underline => {
                    self.execute(&Command::underline(), Origin::User, now);
                }
                Shortcut::Undo => {
                    self.undo(now);
                }
                Shortcut::Redo => {
                    self.redo(now);
                }
                Shortcut::ToggleTransliteration => {
                    self.toggle_transliteration();
                }
            }
            return KeydownResult::Handled;
        }

        if combo.is_plain_space() && self.mode.is_intercepting() {
            self.intercept_space(now);
            return KeydownResult::Handled;
        }

        if combo.key.is_navigation() || combo.key.is_modifier() {
            return KeydownResult::PassThrough;
        }
        KeydownResult::NotHandled
    }

    /// Transliterate the word before the caret, then type the space.
    fn intercept_space(&mut self, now: Instant) {
        match self.surface.caret_text() {
            Some(caret) => {
                let word = caret.word_before_caret();
                if !word.is_empty() {
                    let rendered = self.transliterator.transliterate(word);
                    if rendered != word {
                        let (before, after) = caret.split();
                        let prefix = &before[..before.len() - word.len()];
                        let text = format!("{prefix}{rendered}{after}");
                        tracing::debug!(word, rendered = %rendered, "transliterated word");
                        self.surface.replace_caret_text(&text);
                    }
                }
            }
            None => tracing::trace!("caret not in a text node, plain space"),
        }
        self.type_text(" ", now);
    }

    /// The user typed directly into the surface.
    pub fn on_input(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }
        let html = self.surface.html();
        self.notify(&html);
        self.history.record(ContentSnapshot::new(html), now);
    }

    /// Focus gained: refresh toolbar state.
    pub fn on_focus(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.formats.recompute(&self.surface)
    }

    /// Focus lost: commit whatever is on the surface now.
    ///
    /// Identical content is deduplicated, so repeated blur/focus cycles
    /// without edits do not grow the history.
    pub fn on_blur(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }
        self.history
            .record_immediate(ContentSnapshot::new(self.surface.html()), now);
    }

    /// Selection moved. Returns whether the toolbar flags changed.
    pub fn on_selection_change(&mut self) -> bool {
        if !self.mounted || !self.surface.has_focus() {
            return false;
        }
        self.formats.recompute(&self.surface)
    }

    // === Transliteration ===

    /// Apply a font and derive the Hindi-typing mode from its name.
    pub fn select_font(&mut self, font: &str, now: Instant) -> TransliterationMode {
        if !self.is_active() {
            return self.mode;
        }
        self.execute(&Command::FontName(font.to_string()), Origin::User, now);
        self.font = Some(font.to_string());
        let mode = if self.config.font_enables_hindi(font) {
            TransliterationMode::Intercepting
        } else {
            TransliterationMode::Idle
        };
        self.set_mode(mode);
        mode
    }

    pub fn toggle_transliteration(&mut self) -> TransliterationMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransliterationMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "transliteration mode changed");
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> TransliterationMode {
        self.mode
    }

    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    pub fn transliterator(&self) -> &Transliterator {
        &self.transliterator
    }

    pub fn transliterator_mut(&mut self) -> &mut Transliterator {
        &mut self.transliterator
    }

    // === History ===

    /// Step back one history entry. Returns whether the surface changed.
    pub fn undo(&mut self, now: Instant) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.history.undo(now) {
            Some(snapshot) => {
                self.replace_content(snapshot.as_str(), Origin::Replay, now);
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry. Returns whether the surface changed.
    pub fn redo(&mut self, now: Instant) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.history.redo(now) {
            Some(snapshot) => {
                self.replace_content(snapshot.as_str(), Origin::Replay, now);
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    // === Deferred work ===

    pub(crate) fn schedule(&mut self, follow_up: FollowUp, now: Instant) {
        let due = now + self.config.settle();
        match self.follow_ups.iter_mut().find(|(_, f)| *f == follow_up) {
            Some((deadline, _)) => *deadline = (*deadline).max(due),
            None => self.follow_ups.push((due, follow_up)),
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let follow_up = self.follow_ups.iter().map(|(due, _)| *due).min();
        match (follow_up, self.history.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run everything due at `now`. Returns whether anything ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        let mut ran = self.history.poll(now);

        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.follow_ups)
            .into_iter()
            .partition(|(deadline, _)| *deadline <= now);
        self.follow_ups = later;

        for (_, follow_up) in due {
            ran = true;
            match follow_up {
                FollowUp::RecomputeFormats => {
                    self.formats.recompute(&self.surface);
                }
                FollowUp::TagPlainList => self.tag_plain_list(now),
            }
        }
        ran
    }

    fn tag_plain_list(&mut self, now: Instant) {
        let (attribute, value) = PLAIN_LIST_MARKER;
        if !self.surface.tag_enclosing("ul", attribute, value) {
            tracing::debug!("no list at caret to tag as plain");
            return;
        }
        let html = self.surface.html();
        self.notify(&html);
        self.history.amend_current(ContentSnapshot::new(html), now);
    }

    // === Accessors ===

    /// Current serialized content of the surface.
    pub fn content(&self) -> String {
        self.surface.html()
    }

    pub fn active_formats(&self) -> ActiveFormatSet {
        self.formats.current()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub(crate) fn notify(&mut self, html: &str) {
        if let Some(sink) = self.on_change.as_mut() {
            sink(html);
        }
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::keys::Key;
    use crate::memory::MemorySurface;

    fn mounted(initial: &str) -> (Editor<MemorySurface>, Instant) {
        let now = Instant::now();
        let mut editor = Editor::new(MemorySurface::new());
        editor.mount(initial, now);
        editor.surface_mut().focus();
        (editor, now)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mount_seeds_history() {
        let (editor, _) = mounted("<p>hello</p>");
        assert_eq!(editor.content(), "<p>hello</p>");
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_empty_mount_is_undoable_start() {
        let (mut editor, now) = mounted("");
        assert_eq!(editor.history().current().map(|s| s.as_str()), Some(""));

        editor.execute(&Command::bold(), Origin::User, now);
        assert!(editor.history().can_undo());
        assert!(editor.undo(now + ms(5)));
        assert_eq!(editor.content(), "");
    }

    #[test]
    fn test_sync_external_only_writes_on_difference() {
        let (mut editor, now) = mounted("");
        assert_eq!(editor.history().len(), 1);

        assert!(editor.sync_external("<p>late</p>"));
        assert!(!editor.sync_external("<p>late</p>"));
        assert_eq!(editor.history().len(), 1);
        assert_eq!(
            editor.history().current().map(|s| s.as_str()),
            Some("<p>late</p>")
        );

        // After the first edit the external content no longer rewrites history.
        editor.execute(&Command::bold(), Origin::User, now);
        assert!(editor.sync_external("<p>changed</p>"));
        assert_eq!(editor.history().len(), 2);
        assert_eq!(
            editor.history().current().map(|s| s.as_str()),
            Some("<p>late</p><b>")
        );
    }

    #[test]
    fn test_echoed_content_during_burst_is_not_seeded() {
        let (mut editor, now) = mounted("");
        editor.surface_mut().type_text("abc");
        editor.on_input(now);

        // The application echoes the content it was just notified about.
        assert!(!editor.sync_external("abc"));
        editor.poll(now + ms(600));

        let entries: Vec<_> = editor
            .history()
            .stack()
            .entries()
            .map(|s| s.as_str().to_string())
            .collect();
        assert_eq!(entries, ["", "abc"]);
        assert!(editor.undo(now + ms(700)));
        assert_eq!(editor.content(), "");
    }

    #[test]
    fn test_shortcuts_need_focus() {
        let (mut editor, now) = mounted("");
        editor.surface_mut().set_focused(false);
        let combo = KeyCombo::primary(Key::character("b"), false);
        assert_eq!(editor.handle_keydown(&combo, now), KeydownResult::NotHandled);
        assert!(editor.surface().commands().is_empty());

        editor.surface_mut().set_focused(true);
        assert_eq!(editor.handle_keydown(&combo, now), KeydownResult::Handled);
        assert_eq!(editor.surface().command_names(), vec!["bold"]);
    }

    #[test]
    fn test_toggle_shortcut() {
        let (mut editor, now) = mounted("");
        let combo = KeyCombo::primary_shift(Key::character("H"), false);
        editor.handle_keydown(&combo, now);
        assert_eq!(editor.mode(), TransliterationMode::Intercepting);
        editor.handle_keydown(&combo, now);
        assert_eq!(editor.mode(), TransliterationMode::Idle);
    }

    #[test]
    fn test_space_passes_through_when_idle() {
        let (mut editor, now) = mounted("");
        editor.surface_mut().type_text("namaste");
        assert_eq!(
            editor.handle_keydown(&KeyCombo::new(Key::Space), now),
            KeydownResult::NotHandled
        );
        assert_eq!(editor.content(), "namaste");
    }

    #[test]
    fn test_space_outside_text_node_inserts_plain_space() {
        let (mut editor, now) = mounted("");
        editor.set_mode(TransliterationMode::Intercepting);
        editor.surface_mut().set_html("<img src=\"x.png\">");
        editor.handle_keydown(&KeyCombo::new(Key::Space), now);
        assert_eq!(editor.content(), "<img src=\"x.png\"> ");
    }

    #[test]
    fn test_space_keeps_text_before_word() {
        let (mut editor, now) = mounted("");
        editor.set_mode(TransliterationMode::Intercepting);
        editor.surface_mut().type_text("मैं ghar");
        editor.handle_keydown(&KeyCombo::new(Key::Space), now);
        assert_eq!(editor.content(), "मैं घर ");
    }

    #[test]
    fn test_font_selection_drives_mode() {
        let (mut editor, now) = mounted("");
        assert_eq!(
            editor.select_font("Noto Sans Devanagari", now),
            TransliterationMode::Intercepting
        );
        assert_eq!(
            editor.select_font("Mixed (Hindi + English)", now),
            TransliterationMode::Intercepting
        );
        assert_eq!(editor.select_font("Georgia", now), TransliterationMode::Idle);
        assert_eq!(editor.font(), Some("Georgia"));
    }

    #[test]
    fn test_selection_change_recomputes_only_while_focused() {
        let (mut editor, _) = mounted("");
        editor.surface_mut().exec_command("bold", None);

        editor.surface_mut().set_focused(false);
        assert!(!editor.on_selection_change());
        assert!(!editor.active_formats().is_active(crate::types::FormatName::Bold));

        editor.surface_mut().set_focused(true);
        assert!(editor.on_selection_change());
        assert!(editor.active_formats().is_active(crate::types::FormatName::Bold));
        // Nothing moved since, so nothing changes.
        assert!(!editor.on_selection_change());
    }

    #[test]
    fn test_format_recompute_after_settle() {
        let (mut editor, now) = mounted("");
        editor.poll(now + ms(10));
        editor.execute(&Command::bold(), Origin::User, now + ms(20));
        assert!(editor.active_formats().active().next().is_none());
        assert_eq!(editor.next_deadline(), Some(now + ms(30)));

        assert!(editor.poll(now + ms(30)));
        let active: Vec<_> = editor.active_formats().active().collect();
        assert_eq!(active, vec![crate::types::FormatName::Bold]);
    }

    #[test]
    fn test_teardown_cancels_pending_work() {
        let (mut editor, now) = mounted("");
        editor.surface_mut().type_text("x");
        editor.on_input(now);
        assert!(editor.next_deadline().is_some());

        editor.teardown();
        assert!(editor.next_deadline().is_none());
        assert!(!editor.poll(now + ms(1000)));
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.history().has_pending());
    }

    #[test]
    fn test_change_sink_receives_content() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let (mut editor, now) = mounted("");
        let sink = seen.clone();
        editor.on_change(move |html| sink.borrow_mut().push(html.to_string()));

        editor.surface_mut().type_text("a");
        editor.on_input(now);
        editor.execute(&Command::bold(), Origin::User, now);
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "a<b>".to_string()]);
    }
}
