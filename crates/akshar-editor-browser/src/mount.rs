//! Wiring an `Editor` to a live contenteditable element.
//!
//! DOM listeners forward events into the editor and a single timeout is kept
//! armed for the editor's next deadline. Everything is released on drop.
//!
//! `execCommand` fires `input` and `focus` synchronously, so a listener can
//! run while the editor is already borrowed by the code that issued the
//! command. Those re-entrant events are skipped; the issuing operation has
//! already accounted for them.

use std::cell::RefCell;
use std::rc::Rc;

use akshar_editor_core::{Editor, EditorConfig, KeybindingConfig, KeydownResult};
use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, KeyboardEvent};
use web_time::Instant;

use crate::events::{is_composing, key_combo};
use crate::platform::platform;
use crate::surface::BrowserSurface;

pub type SharedEditor = Rc<RefCell<Editor<BrowserSurface>>>;
type TimerSlot = Rc<RefCell<TimerState>>;

/// The armed timeout, plus the last one that fired.
///
/// A fired handle cannot be dropped from inside its own callback, so it is
/// parked and released when the following timeout fires.
#[derive(Default)]
struct TimerState {
    armed: Option<Timeout>,
    spent: Option<Timeout>,
}

/// An editor attached to the DOM. Dropping it detaches everything.
pub struct MountedEditor {
    editor: SharedEditor,
    timer: TimerSlot,
    _listeners: Vec<EventListener>,
}

impl MountedEditor {
    /// Mount on `element` with `initial` content.
    pub fn mount(
        element: HtmlElement,
        initial: &str,
        config: EditorConfig,
        on_change: impl FnMut(&str) + 'static,
    ) -> Result<Self, String> {
        let surface = BrowserSurface::new(element.clone()).map_err(|e| e.to_string())?;
        let keybindings = KeybindingConfig::default_for_platform(platform().mac);
        let mut editor = Editor::with_config(surface, config)
            .map_err(|e| e.to_string())?
            .with_keybindings(keybindings);
        editor.on_change(on_change);
        editor.mount(initial, Instant::now());

        let editor = Rc::new(RefCell::new(editor));
        let timer: TimerSlot = Rc::new(RefCell::new(TimerState::default()));
        let listeners = attach_listeners(&element, &editor, &timer)?;
        arm_timer(&editor, &timer);

        tracing::info!("editor attached");
        Ok(Self {
            editor,
            timer,
            _listeners: listeners,
        })
    }

    pub fn editor(&self) -> &SharedEditor {
        &self.editor
    }

    /// Run `f` against the editor, then re-arm the timer for whatever it
    /// scheduled. Fails if the editor is already borrowed.
    pub fn with_editor<R>(
        &self,
        f: impl FnOnce(&mut Editor<BrowserSurface>) -> R,
    ) -> Result<R, String> {
        let result = {
            let mut editor = self
                .editor
                .try_borrow_mut()
                .map_err(|_| "editor is busy".to_string())?;
            f(&mut editor)
        };
        arm_timer(&self.editor, &self.timer);
        Ok(result)
    }
}

impl Drop for MountedEditor {
    fn drop(&mut self) {
        // The armed timeout's callback holds the slot; clearing it breaks the cycle.
        let stale = std::mem::take(&mut *self.timer.borrow_mut());
        drop(stale);
        if let Ok(mut editor) = self.editor.try_borrow_mut() {
            editor.teardown();
        }
        tracing::info!("editor detached");
    }
}

/// Forward an event to the editor unless it is already borrowed.
fn forward(editor: &SharedEditor, timer: &TimerSlot, f: impl FnOnce(&mut Editor<BrowserSurface>)) {
    match editor.try_borrow_mut() {
        Ok(mut guard) => f(&mut guard),
        Err(_) => {
            tracing::trace!("re-entrant event skipped");
            return;
        }
    }
    arm_timer(editor, timer);
}

fn attach_listeners(
    element: &HtmlElement,
    editor: &SharedEditor,
    timer: &TimerSlot,
) -> Result<Vec<EventListener>, String> {
    let document = element.owner_document().ok_or("element has no document")?;
    let mut listeners = Vec::with_capacity(5);

    let (ed, tm) = (editor.clone(), timer.clone());
    listeners.push(EventListener::new_with_options(
        element,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if is_composing(event) {
                return;
            }
            let combo = key_combo(event);
            forward(&ed, &tm, |editor| {
                if editor.handle_keydown(&combo, Instant::now()) == KeydownResult::Handled {
                    event.prevent_default();
                }
            });
        },
    ));

    let (ed, tm) = (editor.clone(), timer.clone());
    listeners.push(EventListener::new(element, "input", move |_| {
        forward(&ed, &tm, |editor| editor.on_input(Instant::now()));
    }));

    let (ed, tm) = (editor.clone(), timer.clone());
    listeners.push(EventListener::new(element, "focus", move |_| {
        forward(&ed, &tm, |editor| {
            editor.on_focus();
        });
    }));

    let (ed, tm) = (editor.clone(), timer.clone());
    listeners.push(EventListener::new(element, "blur", move |_| {
        forward(&ed, &tm, |editor| editor.on_blur(Instant::now()));
    }));

    let (ed, tm) = (editor.clone(), timer.clone());
    listeners.push(EventListener::new(&document, "selectionchange", move |_| {
        forward(&ed, &tm, |editor| {
            editor.on_selection_change();
        });
    }));

    Ok(listeners)
}

/// Keep exactly one timeout armed for the editor's next deadline.
fn arm_timer(editor: &SharedEditor, timer: &TimerSlot) {
    let Ok(deadline) = editor.try_borrow().map(|e| e.next_deadline()) else {
        return;
    };
    let Some(deadline) = deadline else {
        let cancelled = timer.borrow_mut().armed.take();
        drop(cancelled);
        return;
    };

    let delay = deadline.saturating_duration_since(Instant::now());
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);

    let (ed, tm) = (editor.clone(), timer.clone());
    let timeout = Timeout::new(millis, move || {
        // Park this handle; the previously parked one has finished running.
        let previous = {
            let mut state = tm.borrow_mut();
            let fired = state.armed.take();
            std::mem::replace(&mut state.spent, fired)
        };
        drop(previous);
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.poll(Instant::now());
        }
        arm_timer(&ed, &tm);
    });
    // Replacing an older timeout cancels it.
    let replaced = timer.borrow_mut().armed.replace(timeout);
    drop(replaced);
}
