//! The derivation pipeline: visibility, filtering, sorting.
//!
//! Every function here is pure. The engine runs them in order after each
//! transition; pagination lives in [`crate::pagination`].

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use crate::column::ColumnDescriptor;
use crate::error::{CellError, extract_panic_message};
use crate::filter::{ColumnFilter, TextMatcher};
use crate::sort::SortDirection;
use crate::value::CellValue;

/// One precomputed cell: the accessor result and its display text.
#[derive(Debug, Clone)]
pub struct GridCell {
    pub value: Result<CellValue, CellError>,
    pub text: String,
}

/// Accessor output for a whole row snapshot, computed once per
/// (rows, columns) pair so filter keystrokes never re-run accessors.
#[derive(Debug, Clone, Default)]
pub struct ValueGrid {
    cells: Vec<Vec<GridCell>>,
    keys: Vec<String>,
    faults: usize,
}

impl ValueGrid {
    /// Read every cell of every row and compute each row's identity key.
    ///
    /// Accessor faults are logged once here and kept in the grid.
    pub fn build<T>(
        rows: &[T],
        columns: &[ColumnDescriptor<T>],
        identity: &dyn Fn(&T, usize) -> String,
    ) -> Self {
        let mut faults = 0;
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        let mut keys = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let key = match panic::catch_unwind(AssertUnwindSafe(|| identity(row, index))) {
                Ok(key) => key,
                Err(payload) => {
                    log::warn!(
                        "Row identity panicked for row {}: {}; using positional key",
                        index,
                        extract_panic_message(payload.as_ref())
                    );
                    index.to_string()
                }
            };
            if let Some(first) = seen.insert(key.clone(), index) {
                log::warn!(
                    "Duplicate row key '{}' at rows {} and {}; selection will treat them as one",
                    key,
                    first,
                    index
                );
            }
            keys.push(key);

            let row_cells = columns
                .iter()
                .map(|column| {
                    let value = column.read(row);
                    let text = match &value {
                        Ok(v) => v.display(),
                        Err(err) => {
                            faults += 1;
                            log::warn!("Row {}: {}", index, err);
                            String::new()
                        }
                    };
                    GridCell { value, text }
                })
                .collect();
            cells.push(row_cells);
        }

        log::trace!(
            "Built value grid: {} rows x {} columns, {} faults",
            rows.len(),
            columns.len(),
            faults
        );
        Self {
            cells,
            keys,
            faults,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &GridCell {
        &self.cells[row][column]
    }

    pub fn key(&self, row: usize) -> &str {
        &self.keys[row]
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Position of the row carrying `key`, if any.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Number of cells whose accessor failed.
    pub fn fault_count(&self) -> usize {
        self.faults
    }
}

/// Indices of the columns that are not hidden, in declaration order.
pub fn visible_columns<T>(columns: &[ColumnDescriptor<T>], hidden: &HashSet<String>) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, column)| !hidden.contains(column.id()))
        .map(|(index, _)| index)
        .collect()
}

/// Keep the candidate rows that pass every column filter and, when
/// `filter_text` is non-empty, contain it in at least one visible column.
///
/// Candidates keep their relative order. Faulted cells never match.
pub fn filter_rows(
    grid: &ValueGrid,
    candidates: &[usize],
    visible: &[usize],
    filter_text: &str,
    column_filters: &[(usize, &ColumnFilter)],
) -> Vec<usize> {
    let mut matcher = TextMatcher::new(filter_text);

    candidates
        .iter()
        .copied()
        .filter(|&row| {
            column_filters.iter().all(|(column, filter)| {
                grid.cell(row, *column)
                    .value
                    .as_ref()
                    .is_ok_and(|value| filter.matches(value))
            })
        })
        .filter(|&row| {
            matcher.is_empty()
                || visible.iter().any(|&column| {
                    let cell = grid.cell(row, column);
                    cell.value.is_ok() && matcher.matches(&cell.text)
                })
        })
        .collect()
}

/// Stable multi-key sort of `rows`.
///
/// Ties on every key fall back to the original row position. Missing and
/// faulted values sort last in both directions.
pub fn sort_rows(grid: &ValueGrid, rows: &[usize], keys: &[(usize, SortDirection)]) -> Vec<usize> {
    let mut sorted = rows.to_vec();
    if keys.is_empty() {
        return sorted;
    }
    sorted.sort_by(|&a, &b| {
        keys.iter()
            .map(|&(column, direction)| {
                compare_cells(&grid.cell(a, column).value, &grid.cell(b, column).value, direction)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    sorted
}

fn compare_cells(
    a: &Result<CellValue, CellError>,
    b: &Result<CellValue, CellError>,
    direction: SortDirection,
) -> Ordering {
    let a = a.as_ref().ok().filter(|v| !v.is_null());
    let b = b.as_ref().ok().filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.compare(b),
            SortDirection::Desc => a.compare(b).reverse(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(values: &[Option<i64>]) -> ValueGrid {
        let columns = vec![
            ColumnDescriptor::new("v", "V", |v: &Option<i64>| CellValue::from(*v))
                .kind(crate::ValueKind::Number)
                .sortable(),
        ];
        ValueGrid::build(values, &columns, &|_, index| index.to_string())
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let g = grid(&[None, Some(2), Some(1)]);
        let all = [0, 1, 2];
        assert_eq!(sort_rows(&g, &all, &[(0, SortDirection::Asc)]), vec![2, 1, 0]);
        assert_eq!(sort_rows(&g, &all, &[(0, SortDirection::Desc)]), vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_sort_keeps_input_order() {
        let g = grid(&[Some(3), Some(1)]);
        assert_eq!(sort_rows(&g, &[1, 0], &[]), vec![1, 0]);
    }
}
