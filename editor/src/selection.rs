//! Selection set with change notification.
//!
//! Primitives and connections share one id namespace, so a single set holds
//! both. Every mutation that changes (or may change) the set queues one
//! `SelectionChanged` carrying the full current selection.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::events::{Action, Notifier};
use crate::ids::EntityId;

#[derive(Debug, Default)]
pub struct Selection {
    ids: HashSet<EntityId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with exactly `id`.
    pub fn select(&mut self, id: EntityId, notifier: &mut Notifier) {
        self.ids.clear();
        self.ids.insert(id);
        self.notify(notifier);
    }

    /// Add `ids` to the selection.
    pub fn add(&mut self, ids: impl IntoIterator<Item = EntityId>, notifier: &mut Notifier) {
        self.ids.extend(ids);
        self.notify(notifier);
    }

    /// Replace the selection with `ids`.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = EntityId>, notifier: &mut Notifier) {
        self.ids.clear();
        self.ids.extend(ids);
        self.notify(notifier);
    }

    /// Flip membership of `id`.
    pub fn toggle(&mut self, id: EntityId, notifier: &mut Notifier) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
        self.notify(notifier);
    }

    /// Empty the selection. Only notifies when something was selected.
    pub fn clear(&mut self, notifier: &mut Notifier) {
        if self.ids.is_empty() {
            return;
        }
        self.ids.clear();
        self.notify(notifier);
    }

    /// Drop `id` silently. Used by deletions, which report once on their own.
    pub fn forget(&mut self, id: &EntityId) -> bool {
        self.ids.remove(id)
    }

    /// Drop every id at once without notifying.
    pub fn forget_all(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Snapshot of the selected ids, in no particular order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<EntityId> {
        self.ids.iter().cloned().collect()
    }

    /// Queue a `SelectionChanged` with the current contents.
    pub fn notify(&self, notifier: &mut Notifier) {
        notifier.push(Action::SelectionChanged { selected: self.selected_ids() });
    }
}
