//! Sort specification and the header-click sort cycle.

use serde::{Deserialize, Serialize};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortDirection {
    /// Step through the header-click cycle: unsorted, ascending, descending, unsorted.
    pub fn cycle(current: Option<SortDirection>) -> Option<SortDirection> {
        match current {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        }
    }
}

/// One entry of a sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Ordered list of sort keys; earlier keys take priority.
///
/// # Example
///
/// ```
/// use revboard_table::{SortDirection, SortSpec};
///
/// let spec = SortSpec::desc("revenue").then_asc("channel");
/// assert_eq!(spec.direction_of("revenue"), Some(SortDirection::Desc));
/// assert_eq!(spec.priority_of("channel"), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// An empty spec: rows keep their input order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            keys: vec![SortKey::new(column, SortDirection::Asc)],
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            keys: vec![SortKey::new(column, SortDirection::Desc)],
        }
    }

    /// Adds a lower-priority ascending key.
    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.push(SortKey::new(column, SortDirection::Asc));
        self
    }

    /// Adds a lower-priority descending key.
    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.push(SortKey::new(column, SortDirection::Desc));
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Zero-based priority of a column within the spec.
    pub fn priority_of(&self, column: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.column == column)
    }

    /// Single-column header click: the clicked column becomes the only key,
    /// cycling through ascending, descending and unsorted.
    pub fn cycle_single(&mut self, column: &str) -> Option<SortDirection> {
        let next = SortDirection::cycle(self.direction_of(column));
        self.keys.clear();
        if let Some(direction) = next {
            self.keys.push(SortKey::new(column, direction));
        }
        next
    }

    /// Multi-column header click: only the clicked column's entry changes.
    /// A new column joins at the lowest priority; an entry cycling back to
    /// unsorted is removed.
    pub fn cycle_multi(&mut self, column: &str) -> Option<SortDirection> {
        let next = SortDirection::cycle(self.direction_of(column));
        match (self.priority_of(column), next) {
            (Some(pos), Some(direction)) => self.keys[pos].direction = direction,
            (Some(pos), None) => {
                self.keys.remove(pos);
            }
            (None, Some(direction)) => self.keys.push(SortKey::new(column, direction)),
            (None, None) => {}
        }
        next
    }

    /// Drop keys whose column no longer exists.
    pub fn retain_columns(&mut self, mut exists: impl FnMut(&str) -> bool) {
        self.keys.retain(|k| exists(&k.column));
    }

    /// Replaces any existing entry for the same column so each column appears once.
    fn push(&mut self, key: SortKey) {
        self.keys.retain(|k| k.column != key.column);
        self.keys.push(key);
    }
}

impl FromIterator<SortKey> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        let mut spec = SortSpec::new();
        for key in iter {
            spec.push(key);
        }
        spec
    }
}
