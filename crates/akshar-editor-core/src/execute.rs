//! Command execution for the editor.
//!
//! Every content mutation goes through here so that the surface, the history
//! and the toolbar state move together. The sequence per command is fixed:
//! mutate, refocus, schedule a format recompute, read the content, notify the
//! application, record history.

use web_time::Instant;

use crate::commands::Command;
use crate::controller::{Editor, FollowUp};
use crate::platform::EditingSurface;
use crate::types::{ContentSnapshot, Origin};

/// How the resulting content reaches the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recording {
    /// Discrete command: its own entry, right away.
    Immediate,
    /// Typing: coalesced by the debounce timer.
    Debounced,
}

impl<S: EditingSurface> Editor<S> {
    /// Execute a command on the surface.
    ///
    /// This is the central dispatch point for all editor mutations. Returns
    /// false without touching anything when the editor is disabled or not
    /// mounted. `Origin::Replay` skips history recording.
    pub fn execute(&mut self, command: &Command, origin: Origin, now: Instant) -> bool {
        self.dispatch(command, origin, Recording::Immediate, now)
    }

    /// Insert text at the caret as if typed, so it joins the typing burst.
    pub fn type_text(&mut self, text: &str, now: Instant) -> bool {
        self.dispatch(
            &Command::InsertText(text.to_string()),
            Origin::User,
            Recording::Debounced,
            now,
        )
    }

    fn dispatch(
        &mut self,
        command: &Command,
        origin: Origin,
        recording: Recording,
        now: Instant,
    ) -> bool {
        if !self.is_active() {
            tracing::debug!(?command, "editor inactive, command ignored");
            return false;
        }

        let (name, value) = command.platform_command();
        tracing::trace!(name, ?value, ?origin, "exec");
        self.surface.exec_command(name, value.as_deref());
        self.surface.focus();
        self.schedule(FollowUp::RecomputeFormats, now);

        let html = self.surface.html();
        self.notify(&html);
        self.record(html, origin, recording, now);
        true
    }

    /// Replace the whole surface content.
    ///
    /// Used by undo/redo with `Origin::Replay`; the history guard stays armed
    /// for the grace period so echoes of the write are not recorded.
    pub(crate) fn replace_content(&mut self, html: &str, origin: Origin, now: Instant) {
        self.surface.set_html(html);
        self.surface.focus();
        self.schedule(FollowUp::RecomputeFormats, now);
        self.notify(html);
        self.record(html.to_string(), origin, Recording::Immediate, now);
    }

    fn record(&mut self, html: String, origin: Origin, recording: Recording, now: Instant) {
        if origin == Origin::Replay {
            tracing::trace!("replay write, not recorded");
            return;
        }
        let snapshot = ContentSnapshot::new(html);
        match recording {
            Recording::Immediate => {
                self.history.record_immediate(snapshot, now);
            }
            Recording::Debounced => self.history.record(snapshot, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::commands::{Alignment, BlockType};
    use crate::memory::MemorySurface;

    fn editor() -> (Editor<MemorySurface>, Instant) {
        let now = Instant::now();
        let mut editor = Editor::new(MemorySurface::new());
        editor.mount("<p>start</p>", now);
        (editor, now)
    }

    #[test]
    fn test_execute_records_immediately_and_refocuses() {
        let (mut editor, now) = editor();
        assert!(!editor.surface().has_focus());
        assert!(editor.execute(&Command::Align(Alignment::Center), Origin::User, now));
        assert!(editor.surface().has_focus());
        assert_eq!(editor.history().len(), 2);
        assert!(!editor.history().has_pending());
    }

    #[test]
    fn test_replay_origin_is_not_recorded() {
        let (mut editor, now) = editor();
        assert!(editor.execute(
            &Command::SetBlock(BlockType::Heading(2)),
            Origin::Replay,
            now
        ));
        assert_eq!(editor.content(), "<p>start</p><h2>");
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_disabled_editor_ignores_commands() {
        let (mut editor, now) = editor();
        editor.set_disabled(true);
        assert!(!editor.execute(&Command::bold(), Origin::User, now));
        assert!(!editor.type_text("x", now));
        assert!(editor.surface().commands().is_empty());
        assert_eq!(editor.history().len(), 1);

        editor.set_disabled(false);
        assert!(editor.execute(&Command::bold(), Origin::User, now));
    }

    #[test]
    fn test_typed_text_is_debounced() {
        let (mut editor, now) = editor();
        editor.type_text("a", now);
        editor.type_text("b", now + Duration::from_millis(100));
        assert_eq!(editor.history().len(), 1);
        assert!(editor.history().has_pending());

        editor.poll(now + Duration::from_millis(600));
        assert_eq!(editor.history().len(), 2);
        assert_eq!(
            editor.history().current().map(|s| s.as_str()),
            Some("<p>start</p>ab")
        );
    }
}
