//! User interactions: sorting, column visibility, selection, row clicks.

use crate::event::EventResult;
use crate::selection::SelectionChange;
use crate::sort::SortSpec;

use super::engine::TableEngine;

impl<T> TableEngine<T> {
    /// Look up a sortable column, logging why a sort request is dropped.
    fn sortable_column(&self, column: &str) -> bool {
        match self.column(column) {
            None => {
                log::warn!("Ignoring sort on unknown column '{}'", column);
                false
            }
            Some(descriptor) => descriptor.is_sortable(),
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Header click: cycle `column` through ascending, descending and
    /// unsorted, replacing any other sort key.
    ///
    /// Ignored while loading and for columns that are not sortable.
    pub fn toggle_sort(&mut self, column: &str) -> EventResult {
        if self.loading || !self.sortable_column(column) {
            return EventResult::Ignored;
        }
        let direction = self.state.sort.cycle_single(column);
        log::debug!("Sort '{}': {:?}", column, direction);
        self.derive();
        EventResult::Consumed
    }

    /// Modifier header click: cycle `column` while keeping the other sort keys.
    pub fn toggle_sort_multi(&mut self, column: &str) -> EventResult {
        if self.loading || !self.sortable_column(column) {
            return EventResult::Ignored;
        }
        let direction = self.state.sort.cycle_multi(column);
        log::debug!("Sort '{}' (multi): {:?} -> {:?}", column, direction, self.state.sort);
        self.derive();
        EventResult::Consumed
    }

    /// Replace the sort. Keys on unknown or unsortable columns are dropped.
    pub fn set_sort(&mut self, sort: SortSpec) -> EventResult {
        let sort: SortSpec = sort
            .keys()
            .iter()
            .filter(|key| self.sortable_column(&key.column))
            .cloned()
            .collect();
        if sort == self.state.sort {
            return EventResult::Ignored;
        }
        self.state.sort = sort;
        self.derive();
        EventResult::Consumed
    }

    pub fn clear_sort(&mut self) -> EventResult {
        if self.state.sort.is_empty() {
            return EventResult::Ignored;
        }
        self.state.sort = SortSpec::new();
        self.derive();
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Column visibility
    // -------------------------------------------------------------------------

    /// Flip one column between shown and hidden.
    ///
    /// Fixed columns and unknown ids are ignored.
    pub fn toggle_column_visibility(&mut self, column: &str) -> EventResult {
        let visible = !self.state.is_hidden(column);
        self.set_column_visible(column, !visible)
    }

    pub fn set_column_visible(&mut self, column: &str, visible: bool) -> EventResult {
        let Some(descriptor) = self.column(column) else {
            log::warn!("Ignoring visibility change for unknown column '{}'", column);
            return EventResult::Ignored;
        };
        if !descriptor.is_hideable() {
            return EventResult::Ignored;
        }

        let changed = if visible {
            self.state.hidden_columns.remove(column)
        } else {
            self.state.hidden_columns.insert(column.to_string())
        };
        if changed {
            log::debug!("Column '{}' visible: {}", column, visible);
            self.derive();
        }
        EventResult::from_changed(changed)
    }

    pub fn show_all_columns(&mut self) -> EventResult {
        if self.state.hidden_columns.is_empty() {
            return EventResult::Ignored;
        }
        self.state.hidden_columns.clear();
        self.derive();
        EventResult::Consumed
    }

    /// Hide every hideable column. Fixed columns stay visible.
    pub fn hide_all_columns(&mut self) -> EventResult {
        let hideable: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.is_hideable() && !self.state.is_hidden(c.id()))
            .map(|c| c.id().to_string())
            .collect();
        if hideable.is_empty() {
            return EventResult::Ignored;
        }
        self.state.hidden_columns.extend(hideable);
        self.derive();
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Selected keys, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        self.state.selection.selected()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.state.selection.is_selected(id)
    }

    /// Rows in the current snapshot whose key is selected, in snapshot order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.state.selection.is_selected(self.grid.key(index)))
            .map(|(_, row)| row)
            .collect()
    }

    /// Toggle one row by key.
    ///
    /// Only keys present in the current snapshot can be added; any selected
    /// key can be removed.
    pub fn toggle_row_selected(&mut self, id: &str) -> EventResult {
        if !self.selection_enabled() {
            return EventResult::Ignored;
        }
        if !self.state.selection.is_selected(id) && self.grid.position_of(id).is_none() {
            log::warn!("Ignoring selection of unknown row '{}'", id);
            return EventResult::Ignored;
        }
        let (added, removed) = self.state.selection.toggle(id);
        self.notify_selection(added, removed);
        EventResult::Consumed
    }

    /// Select or deselect every row on the current page. Rows on other pages
    /// keep their selection.
    pub fn toggle_all_on_page_selected(&mut self, selected: bool) -> EventResult {
        if !self.selection_enabled() {
            return EventResult::Ignored;
        }
        let keys: Vec<String> = self.page_keys().into_iter().map(str::to_string).collect();
        let (added, removed) = if selected {
            (self.state.selection.select_many(&keys), Vec::new())
        } else {
            (Vec::new(), self.state.selection.deselect_many(&keys))
        };
        let changed = !added.is_empty() || !removed.is_empty();
        self.notify_selection(added, removed);
        EventResult::from_changed(changed)
    }

    /// Extend the selection from the last toggled row to `id`, following the
    /// current filtered and sorted order.
    pub fn select_range(&mut self, id: &str) -> EventResult {
        if !self.selection_enabled() {
            return EventResult::Ignored;
        }
        let ordered: Vec<String> = self
            .derived
            .rows
            .iter()
            .map(|&index| self.grid.key(index).to_string())
            .collect();
        let added = self.state.selection.range_select(id, &ordered);
        let changed = !added.is_empty();
        self.notify_selection(added, Vec::new());
        EventResult::from_changed(changed)
    }

    pub fn clear_selection(&mut self) -> EventResult {
        let removed = self.state.selection.clear();
        let changed = !removed.is_empty();
        self.notify_selection(Vec::new(), removed);
        EventResult::from_changed(changed)
    }

    /// Drop selected keys that are no longer in the current snapshot.
    pub fn prune_selection(&mut self) -> EventResult {
        let grid = &self.grid;
        let removed = self
            .state
            .selection
            .retain(|id| grid.position_of(id).is_some());
        let changed = !removed.is_empty();
        self.notify_selection(Vec::new(), removed);
        EventResult::from_changed(changed)
    }

    fn selection_enabled(&self) -> bool {
        if !self.settings.enable_row_selection {
            log::debug!("Row selection disabled; ignoring");
        }
        self.settings.enable_row_selection
    }

    pub(super) fn notify_selection(&mut self, added: Vec<String>, removed: Vec<String>) {
        if added.is_empty() && removed.is_empty() {
            return;
        }
        let change = SelectionChange {
            added,
            removed,
            selected: self.state.selection.selected(),
        };
        log::debug!(
            "Selection: +{} -{} ({} selected)",
            change.added.len(),
            change.removed.len(),
            change.selected.len()
        );
        if let Some(callback) = self.callbacks.on_row_selection_change.as_mut() {
            callback(&change);
        }
    }

    // -------------------------------------------------------------------------
    // Row activation
    // -------------------------------------------------------------------------

    /// Activate the row with key `id` on the current page.
    pub fn click_row(&mut self, id: &str) -> EventResult {
        if self.loading {
            return EventResult::Ignored;
        }
        let Some(index) = self
            .derived
            .page_rows()
            .iter()
            .copied()
            .find(|&index| self.grid.key(index) == id)
        else {
            return EventResult::Ignored;
        };
        log::debug!("Row clicked: '{}'", id);
        if let Some(callback) = self.callbacks.on_row_click.as_mut() {
            callback(&self.rows[index], id);
        }
        EventResult::Consumed
    }
}
