//! End-to-end editing scenarios against the in-memory surface.

use akshar_editor_core::{
    Command, Duration, Editor, EditingSurface, Instant, Key, KeyCombo, KeydownResult,
    MemorySurface, Origin, TransliterationMode,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn focused_editor(initial: &str) -> (Editor<MemorySurface>, Instant) {
    let now = Instant::now();
    let mut editor = Editor::new(MemorySurface::new());
    editor.mount(initial, now);
    editor.surface_mut().focus();
    (editor, now)
}

fn history_entries(editor: &Editor<MemorySurface>) -> Vec<String> {
    editor
        .history()
        .stack()
        .entries()
        .map(|s| s.as_str().to_string())
        .collect()
}

/// Type `text` one keystroke at a time, `gap` apart, routing spaces through
/// keydown like a browser would.
fn type_keys(
    editor: &mut Editor<MemorySurface>,
    text: &str,
    start: Instant,
    gap: Duration,
) -> Instant {
    let mut now = start;
    for c in text.chars() {
        let combo = if c == ' ' {
            KeyCombo::new(Key::Space)
        } else {
            KeyCombo::new(Key::character(c.to_string()))
        };
        if editor.handle_keydown(&combo, now) == KeydownResult::NotHandled {
            editor.surface_mut().type_text(&c.to_string());
            editor.on_input(now);
        }
        now += gap;
    }
    now
}

#[test]
fn hindi_font_then_namaste() {
    let (mut editor, t0) = focused_editor("");

    let mode = editor.select_font("Mangal", t0);
    assert_eq!(mode, TransliterationMode::Intercepting);
    let after_font = editor.history().len();

    let end = type_keys(&mut editor, "namaste ", t0 + ms(50), ms(80));
    assert_eq!(editor.content().rsplit('>').next(), Some("नमस्ते "));

    // Nothing committed until the burst has been quiet for the debounce window.
    assert_eq!(editor.history().len(), after_font);
    assert!(editor.history().has_pending());
    editor.poll(end + ms(300));
    assert_eq!(editor.history().len(), after_font);

    editor.poll(end + ms(500));
    assert_eq!(editor.history().len(), after_font + 1);
    assert!(
        editor
            .history()
            .current()
            .is_some_and(|s| s.as_str().ends_with("नमस्ते "))
    );
}

#[test]
fn bold_type_italic_ordering() {
    let (mut editor, t0) = focused_editor("");

    let bold = KeyCombo::primary(Key::character("b"), false);
    assert_eq!(editor.handle_keydown(&bold, t0), KeydownResult::Handled);

    let now = type_keys(&mut editor, "x", t0 + ms(20), ms(20));

    editor.execute(&Command::italic(), Origin::User, now);
    editor.poll(now + ms(1000));

    assert_eq!(history_entries(&editor), ["", "<b>", "<b>x", "<b>x<i>"]);

    // Every state back to the empty start is reachable.
    let mut later = now + ms(1000);
    for expected in ["<b>x", "<b>", ""] {
        later += ms(10);
        assert!(editor.undo(later));
        assert_eq!(editor.content(), expected);
    }
    assert!(!editor.undo(later));
}

#[test]
fn history_is_bounded() {
    let (mut editor, t0) = focused_editor("<p>0</p>");
    let mut now = t0;
    for i in 1..=80 {
        now += ms(1);
        editor.execute(&Command::InsertText(format!("{i} ")), Origin::User, now);
    }
    assert_eq!(editor.history().len(), 50);
    assert_eq!(editor.history().cursor(), 49);
}

#[test]
fn undo_redo_round_trip() {
    let (mut editor, t0) = focused_editor("<p>a</p>");
    let mut now = t0;
    let mut states = vec![editor.content()];
    for format in [Command::bold(), Command::italic(), Command::underline()] {
        now += ms(5);
        editor.execute(&format, Origin::User, now);
        states.push(editor.content());
    }

    for expected in states.iter().rev().skip(1) {
        now += ms(5);
        assert!(editor.undo(now));
        assert_eq!(&editor.content(), expected);
    }
    assert!(!editor.undo(now));

    for expected in states.iter().skip(1) {
        now += ms(5);
        assert!(editor.redo(now));
        assert_eq!(&editor.content(), expected);
    }
    assert!(!editor.redo(now));
}

#[test]
fn undo_write_is_not_recorded() {
    let (mut editor, t0) = focused_editor("<p>a</p>");
    editor.execute(&Command::bold(), Origin::User, t0);
    assert!(editor.undo(t0 + ms(10)));

    // The platform echoes the replay write as an input event.
    editor.on_input(t0 + ms(20));
    editor.poll(t0 + ms(1000));
    assert_eq!(editor.history().len(), 2);
    assert!(editor.history().can_redo());
}

#[test]
fn new_edit_invalidates_redo() {
    let (mut editor, t0) = focused_editor("<p>a</p>");
    editor.execute(&Command::bold(), Origin::User, t0);
    editor.execute(&Command::italic(), Origin::User, t0 + ms(5));
    editor.undo(t0 + ms(10));
    assert!(editor.history().can_redo());

    let later = t0 + ms(500);
    editor.poll(later);
    editor.execute(&Command::underline(), Origin::User, later);
    assert!(!editor.history().can_redo());
    assert!(!editor.redo(later));
}

#[test]
fn focus_cycles_without_edits_do_not_grow_history() {
    let (mut editor, t0) = focused_editor("<p>same</p>");
    let before = editor.history().len();
    for i in 0..5 {
        editor.on_blur(t0 + ms(i * 10));
        editor.surface_mut().set_focused(false);
        editor.surface_mut().focus();
        editor.on_focus();
    }
    assert_eq!(editor.history().len(), before);
}

#[test]
fn undo_shortcut_restores_previous_content() {
    let (mut editor, t0) = focused_editor("<p>a</p>");
    editor.execute(&Command::bold(), Origin::User, t0);
    let undo = KeyCombo::primary(Key::character("z"), false);
    assert_eq!(editor.handle_keydown(&undo, t0 + ms(10)), KeydownResult::Handled);
    assert_eq!(editor.content(), "<p>a</p>");

    let redo = KeyCombo::primary(Key::character("y"), false);
    editor.handle_keydown(&redo, t0 + ms(20));
    assert_eq!(editor.content(), "<p>a</p><b>");
}

#[test]
fn disabled_editor_is_inert() {
    let (mut editor, t0) = focused_editor("<p>a</p>");
    editor.set_disabled(true);
    let bold = KeyCombo::primary(Key::character("b"), false);
    assert_eq!(editor.handle_keydown(&bold, t0), KeydownResult::NotHandled);
    assert!(!editor.undo(t0));
    editor.on_input(t0);
    assert!(editor.surface().commands().is_empty());
    assert!(!editor.history().has_pending());
}

#[test]
fn dictionary_overlay_reaches_typing() {
    let (mut editor, t0) = focused_editor("");
    editor.set_mode(TransliterationMode::Intercepting);
    editor.transliterator_mut().add_mapping("akshar", "अक्षर");
    type_keys(&mut editor, "akshar ", t0, ms(30));
    assert_eq!(editor.content(), "अक्षर ");
}
