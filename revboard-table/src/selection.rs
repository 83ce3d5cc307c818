//! Selection state keyed by row identity.
//!
//! Selection uses string keys for stability across sorting, filtering and
//! paging. A key stays selected while its row is out of view.

use std::collections::HashSet;

/// Keys added and removed by one selection transition, plus the full
/// selection afterwards (sorted for deterministic ordering).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub selected: Vec<String>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Id-based selection state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Currently selected keys
    selected: HashSet<String>,
    /// Anchor for range selection (last toggled key)
    anchor: Option<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected keys (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Clear all selection.
    /// Returns the keys that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        let mut removed: Vec<_> = self.selected.drain().collect();
        removed.sort();
        self.anchor = None;
        removed
    }

    /// Toggle one key.
    /// Returns (added, removed) keys.
    pub fn toggle(&mut self, id: &str) -> (Vec<String>, Vec<String>) {
        self.anchor = Some(id.to_string());
        if self.selected.remove(id) {
            (vec![], vec![id.to_string()])
        } else {
            self.selected.insert(id.to_string());
            (vec![id.to_string()], vec![])
        }
    }

    /// Select every key in `ids`.
    /// Returns the keys that were newly selected.
    pub fn select_many(&mut self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| self.selected.insert((*id).clone()))
            .cloned()
            .collect()
    }

    /// Deselect every key in `ids`.
    /// Returns the keys that were removed.
    pub fn deselect_many(&mut self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| self.selected.remove(id.as_str()))
            .cloned()
            .collect()
    }

    /// Range select from the anchor to `target_id` (Shift+click behavior).
    ///
    /// `ordered` is the key order currently on screen. When the anchor is
    /// not part of it, only the target is added. The anchor is left in
    /// place so consecutive range clicks pivot around it.
    /// Returns the keys that were newly selected.
    pub fn range_select(&mut self, target_id: &str, ordered: &[String]) -> Vec<String> {
        let anchor_id = self.anchor.clone().unwrap_or_else(|| target_id.to_string());

        let anchor_pos = ordered.iter().position(|id| id == &anchor_id);
        let target_pos = ordered.iter().position(|id| id == target_id);

        let (start, end) = match (anchor_pos, target_pos) {
            (Some(a), Some(t)) => (a.min(t), a.max(t)),
            (None, Some(t)) => (t, t),
            (_, None) => return vec![],
        };

        if self.anchor.is_none() {
            self.anchor = Some(target_id.to_string());
        }
        self.select_many(&ordered[start..=end])
    }

    /// Keep only keys accepted by `keep`.
    /// Returns the keys that were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut removed: Vec<_> = self
            .selected
            .iter()
            .filter(|id| !keep(id))
            .cloned()
            .collect();
        removed.sort();
        for id in &removed {
            self.selected.remove(id);
        }
        removed
    }
}
