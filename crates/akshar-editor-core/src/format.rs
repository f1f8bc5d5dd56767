//! Active-format inference from the surface's selection state.

use crate::platform::{EditingSurface, PlatformError};
use crate::types::{ActiveFormatSet, FormatName};

/// Tracks which formats apply at the caret for toolbar highlighting.
#[derive(Debug, Clone, Default)]
pub struct FormatTracker {
    current: ActiveFormatSet,
}

impl FormatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ActiveFormatSet {
        self.current
    }

    pub fn is_active(&self, name: FormatName) -> bool {
        self.current.is_active(name)
    }

    /// Re-derive every flag in one pass.
    ///
    /// If any query fails the previous set is kept. Returns whether the set
    /// changed.
    pub fn recompute<S: EditingSurface + ?Sized>(&mut self, surface: &S) -> bool {
        match query_all(surface) {
            Ok(next) => {
                let changed = next != self.current;
                self.current = next;
                changed
            }
            Err(err) => {
                tracing::debug!(error = %err, "format state unavailable, keeping previous flags");
                false
            }
        }
    }
}

fn query_all<S: EditingSurface + ?Sized>(surface: &S) -> Result<ActiveFormatSet, PlatformError> {
    let mut pairs = Vec::with_capacity(FormatName::ALL.len());
    for name in FormatName::ALL {
        pairs.push((name, surface.query_command_state(name.query_name())?));
    }
    Ok(ActiveFormatSet::from_pairs(pairs))
}
