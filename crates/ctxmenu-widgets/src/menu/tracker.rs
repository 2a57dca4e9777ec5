//! Logical "active item" tracking for keyboard navigation.
//!
//! The tracker knows nothing about items themselves, only which positions of a
//! fixed-length list may become active. Moving skips positions that are not
//! activatable and wraps around the ends of the list.

use serde::{Deserialize, Serialize};

/// Tracks which entry of a list is logically active, independent of focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveItemTracker {
    activatable: Vec<bool>,
    active: Option<usize>,
}

impl ActiveItemTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker over `activatable` flags. Nothing is active.
    #[must_use]
    pub fn with_items(activatable: impl IntoIterator<Item = bool>) -> Self {
        let mut tracker = Self::new();
        tracker.initialize(activatable);
        tracker
    }

    /// Reset the candidate set. Nothing is active afterwards.
    pub fn initialize(&mut self, activatable: impl IntoIterator<Item = bool>) {
        self.activatable = activatable.into_iter().collect();
        self.active = None;
    }

    /// Replace the activatable flags, keeping the active entry if it still qualifies.
    pub fn refresh(&mut self, activatable: impl IntoIterator<Item = bool>) {
        self.activatable = activatable.into_iter().collect();
        if let Some(i) = self.active {
            if !self.is_activatable(i) {
                self.active = None;
            }
        }
    }

    /// Active index, if any.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.active
    }

    /// Number of entries tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.activatable.len()
    }

    /// Whether no entries are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activatable.is_empty()
    }

    /// Whether `index` may become active.
    #[must_use]
    pub fn is_activatable(&self, index: usize) -> bool {
        self.activatable.get(index).copied().unwrap_or(false)
    }

    /// Whether any entry may become active.
    #[must_use]
    pub fn has_activatable(&self) -> bool {
        self.activatable.iter().any(|a| *a)
    }

    /// Advance to the next activatable entry.
    pub fn move_next(&mut self) -> Option<usize> {
        self.step(true)
    }

    /// Retreat to the previous activatable entry.
    pub fn move_previous(&mut self) -> Option<usize> {
        self.step(false)
    }

    /// Jump to the first activatable entry.
    pub fn move_first(&mut self) -> Option<usize> {
        if let Some(i) = self.activatable.iter().position(|a| *a) {
            self.active = Some(i);
        }
        self.active
    }

    /// Jump to the last activatable entry.
    pub fn move_last(&mut self) -> Option<usize> {
        if let Some(i) = self.activatable.iter().rposition(|a| *a) {
            self.active = Some(i);
        }
        self.active
    }

    /// Make `index` active directly. Ignored unless it is activatable.
    pub fn activate(&mut self, index: usize) -> bool {
        if self.is_activatable(index) {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Clear the active entry.
    pub fn clear(&mut self) {
        self.active = None;
    }

    fn step(&mut self, forward: bool) -> Option<usize> {
        let len = self.activatable.len();
        let Some(from) = self.active else {
            return if forward {
                self.move_first()
            } else {
                self.move_last()
            };
        };

        let mut idx = from;
        for _ in 1..len {
            idx = if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            if self.activatable[idx] {
                self.active = Some(idx);
                break;
            }
        }

        self.active
    }
}
