//! Snapshot-based undo/redo with debounced coalescing.
//!
//! Provides:
//! - `HistoryStack` - bounded linear stack of content snapshots with a cursor
//! - `HistoryManager` - debounce timer, immediate recording and the replay guard
//!
//! Time is passed in explicitly. The manager never spawns timers; the owner
//! asks for [`HistoryManager::next_deadline`] and calls
//! [`HistoryManager::poll`] once it has passed.

use std::collections::VecDeque;

use web_time::{Duration, Instant};

use crate::config::{DEBOUNCE_MS, MAX_HISTORY, REPLAY_GRACE_MS};
use crate::types::ContentSnapshot;

/// Bounded linear history.
///
/// Invariants: `cursor < entries.len()` whenever the stack is non-empty, and
/// `entries.len() <= max_len`.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<ContentSnapshot>,
    cursor: usize,
    max_len: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl HistoryStack {
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_len.min(64)),
            cursor: 0,
            max_len: max_len.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry at the cursor.
    pub fn current(&self) -> Option<&ContentSnapshot> {
        self.entries.get(self.cursor)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ContentSnapshot> {
        self.entries.iter()
    }

    /// Push a snapshot after the cursor.
    ///
    /// Discards the redo branch, evicts the oldest entry when full and
    /// ignores a snapshot equal to the current one. Returns whether the stack
    /// changed.
    pub fn push(&mut self, snapshot: ContentSnapshot) -> bool {
        if self.current() == Some(&snapshot) {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(snapshot);

        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Replace the entry at the cursor in place.
    ///
    /// Used when deferred post-processing refines the result of the last
    /// command. Returns false on an empty stack.
    pub fn amend(&mut self, snapshot: ContentSnapshot) -> bool {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => {
                *entry = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Move the cursor back one entry and return it.
    pub fn step_back(&mut self) -> Option<&ContentSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Move the cursor forward one entry and return it.
    pub fn step_forward(&mut self) -> Option<&ContentSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

/// A debounced snapshot waiting for its quiet period to end.
#[derive(Debug, Clone)]
struct PendingEdit {
    snapshot: ContentSnapshot,
    deadline: Instant,
}

/// Owns the history stack, the single-slot debounce timer and the replay guard.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    stack: HistoryStack,
    pending: Option<PendingEdit>,
    debounce: Duration,
    replay_grace: Duration,
    /// Recording is suppressed until this instant after an undo/redo write.
    replaying_until: Option<Instant>,
    /// Something beyond the seed has reached the stack.
    edited: bool,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(
            MAX_HISTORY,
            Duration::from_millis(DEBOUNCE_MS),
            Duration::from_millis(REPLAY_GRACE_MS),
        )
    }
}

impl HistoryManager {
    pub fn new(max_len: usize, debounce: Duration, replay_grace: Duration) -> Self {
        Self {
            stack: HistoryStack::new(max_len),
            pending: None,
            debounce,
            replay_grace,
            replaying_until: None,
            edited: false,
        }
    }

    pub fn stack(&self) -> &HistoryStack {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.stack.cursor()
    }

    pub fn current(&self) -> Option<&ContentSnapshot> {
        self.stack.current()
    }

    pub fn can_undo(&self) -> bool {
        self.stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.stack.can_redo()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Seed the stack with the initial content.
    ///
    /// Fills an empty stack, or replaces a lone seed entry as long as no
    /// edit has been recorded or is pending. Returns whether the stack
    /// changed.
    pub fn seed(&mut self, snapshot: ContentSnapshot) -> bool {
        if self.edited || self.pending.is_some() {
            return false;
        }
        let changed = match self.stack.len() {
            0 => self.stack.push(snapshot),
            1 if self.stack.current() != Some(&snapshot) => self.stack.amend(snapshot),
            _ => false,
        };
        if changed {
            let len = self.stack.current().map_or(0, |s| s.as_str().len());
            tracing::debug!(len, "history: seeded");
        }
        changed
    }

    /// Whether undo/redo replay suppression is active at `now`.
    pub fn is_replaying(&self, now: Instant) -> bool {
        self.replaying_until.is_some_and(|until| now < until)
    }

    /// Schedule `snapshot` to be committed after the quiet period.
    ///
    /// A later call before the deadline replaces it and restarts the timer.
    pub fn record(&mut self, snapshot: ContentSnapshot, now: Instant) {
        if self.is_replaying(now) {
            tracing::trace!("history: debounced record suppressed during replay");
            return;
        }
        if self.pending.is_some() {
            tracing::trace!("history: rescheduling pending snapshot");
        }
        self.pending = Some(PendingEdit {
            snapshot,
            deadline: now + self.debounce,
        });
    }

    /// Commit `snapshot` right away.
    ///
    /// A pending debounced snapshot is committed first so the typing burst
    /// stays ahead of the discrete command. Returns whether a new entry was
    /// pushed for `snapshot`.
    pub fn record_immediate(&mut self, snapshot: ContentSnapshot, now: Instant) -> bool {
        if self.is_replaying(now) {
            tracing::trace!("history: immediate record suppressed during replay");
            return false;
        }
        self.flush_pending();
        let pushed = self.stack.push(snapshot);
        if pushed {
            self.edited = true;
            tracing::debug!(
                len = self.stack.len(),
                cursor = self.stack.cursor(),
                "history: committed"
            );
        }
        pushed
    }

    /// Fold `snapshot` into the current entry instead of pushing a new one.
    ///
    /// Falls back to an immediate record when a typing burst is pending,
    /// since the current entry then no longer reflects the last command.
    pub fn amend_current(&mut self, snapshot: ContentSnapshot, now: Instant) -> bool {
        if self.is_replaying(now) {
            return false;
        }
        if self.pending.is_some() || self.stack.is_empty() {
            return self.record_immediate(snapshot, now);
        }
        tracing::trace!(cursor = self.stack.cursor(), "history: amended current entry");
        self.edited = true;
        self.stack.amend(snapshot)
    }

    /// Commit the pending snapshot if its quiet period is over and expire the
    /// replay guard. Returns whether a snapshot was committed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.replaying_until.is_some_and(|until| now >= until) {
            self.replaying_until = None;
        }
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                let committed = self.flush_pending();
                if committed {
                    tracing::debug!(
                        len = self.stack.len(),
                        cursor = self.stack.cursor(),
                        "history: debounced snapshot committed"
                    );
                }
                committed
            }
            _ => false,
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.as_ref().map(|p| p.deadline);
        match (pending, self.replaying_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drop the pending snapshot without committing it.
    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("history: pending snapshot cancelled");
        }
    }

    /// Step back one entry and arm the replay guard.
    ///
    /// The caller must write the returned snapshot to the surface.
    pub fn undo(&mut self, now: Instant) -> Option<ContentSnapshot> {
        self.flush_pending();
        let snapshot = self.stack.step_back()?.clone();
        self.arm_replay_guard(now);
        tracing::debug!(cursor = self.stack.cursor(), "history: undo");
        Some(snapshot)
    }

    /// Step forward one entry and arm the replay guard.
    pub fn redo(&mut self, now: Instant) -> Option<ContentSnapshot> {
        self.flush_pending();
        let snapshot = self.stack.step_forward()?.clone();
        self.arm_replay_guard(now);
        tracing::debug!(cursor = self.stack.cursor(), "history: redo");
        Some(snapshot)
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.pending = None;
        self.replaying_until = None;
        self.edited = false;
    }

    fn arm_replay_guard(&mut self, now: Instant) {
        self.replaying_until = Some(now + self.replay_grace);
    }

    fn flush_pending(&mut self) -> bool {
        let pushed = self
            .pending
            .take()
            .is_some_and(|pending| self.stack.push(pending.snapshot));
        self.edited |= pushed;
        pushed
    }
}
