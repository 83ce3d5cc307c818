//! Tests for client and server pagination.

use std::cell::RefCell;
use std::rc::Rc;

use revboard_table::{
    CellValue, ColumnDescriptor, EventResult, PageChangeCallback, PaginationKind, PaginationMode,
    TableEngine, TableError, TableOptions, ValueKind,
};

#[derive(Debug, Clone)]
struct Row {
    n: usize,
    label: String,
}

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|n| Row {
            n,
            label: if n % 5 == 0 { format!("match-{n}") } else { format!("row-{n}") },
        })
        .collect()
}

fn columns() -> Vec<ColumnDescriptor<Row>> {
    vec![
        ColumnDescriptor::new("n", "N", |r: &Row| CellValue::from(r.n as i64))
            .kind(ValueKind::Number)
            .sortable(),
        ColumnDescriptor::new("label", "Label", |r: &Row| r.label.as_str().into()),
    ]
}

fn client_table(count: usize, page_size: usize) -> TableEngine<Row> {
    TableEngine::new(
        TableOptions::new(columns(), rows(count))
            .with_row_identity(|r: &Row, _| r.n.to_string())
            .with_page_size(page_size),
    )
    .unwrap()
}

#[test]
fn test_client_page_count_and_clamp_after_filter() {
    let mut table = client_table(25, 10);
    assert_eq!(table.page_count(), 3);

    table.set_page_index(2);
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.page_rows().len(), 5);

    table.set_global_filter_text("match");
    assert_eq!(table.filtered_row_count(), 5);
    assert_eq!(table.page_count(), 1);
    assert_eq!(table.page_index(), 0);
}

#[test]
fn test_page_index_is_clamped() {
    let mut table = client_table(25, 10);
    assert_eq!(table.set_page_index(99), EventResult::Consumed);
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.set_page_index(99), EventResult::Ignored);
    assert_eq!(table.page_keys(), vec!["20", "21", "22", "23", "24"]);
}

#[test]
fn test_page_navigation() {
    let mut table = client_table(25, 10);
    assert_eq!(table.previous_page(), EventResult::Ignored);
    assert_eq!(table.next_page(), EventResult::Consumed);
    assert_eq!(table.page_index(), 1);
    assert_eq!(table.last_page(), EventResult::Consumed);
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.next_page(), EventResult::Ignored);

    let footer = table.render().footer;
    assert!(footer.has_previous);
    assert!(!footer.has_next);
    assert_eq!(footer.total_rows, Some(25));

    assert_eq!(table.first_page(), EventResult::Consumed);
    assert_eq!(table.page_index(), 0);
}

#[test]
fn test_page_size_change_clamps_index() {
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let seen = sizes.clone();
    let mut table = TableEngine::new(
        TableOptions::new(columns(), rows(25))
            .with_page_size(5)
            .on_page_size_change(move |size| seen.borrow_mut().push(size)),
    )
    .unwrap();

    table.set_page_index(4);
    assert_eq!(table.set_page_size(20), EventResult::Consumed);
    assert_eq!(table.page_count(), 2);
    assert_eq!(table.page_index(), 1);
    assert_eq!(table.set_page_size(0), EventResult::Ignored);
    assert_eq!(table.page_size(), 20);
    assert_eq!(*sizes.borrow(), vec![20]);
}

#[test]
fn test_page_invariant_holds_across_transitions() {
    let mut table = client_table(37, 10);
    let filters = ["", "match", "row-1", "zzz", "3", ""];
    let sizes = [10, 3, 50, 7, 1, 20];

    for step in 0..filters.len() {
        table.set_page_index(step * 3);
        table.set_global_filter_text(filters[step]);
        assert!(table.page_index() < table.page_count());
        table.set_page_index(usize::MAX);
        table.set_page_size(sizes[step]);
        assert!(table.page_index() < table.page_count());
        table.toggle_sort("n");
        assert!(table.page_index() < table.page_count());
        table.set_rows(rows(37 - step * 6));
        assert!(table.page_index() < table.page_count());
    }
}

#[test]
fn test_empty_rows_have_one_page() {
    let table = client_table(0, 10);
    assert_eq!(table.page_count(), 1);
    assert_eq!(table.page_index(), 0);
    assert!(table.page_rows().is_empty());
}

fn server_table(
    requests: Rc<RefCell<Vec<usize>>>,
    sizes: Rc<RefCell<Vec<usize>>>,
) -> TableEngine<Row> {
    TableEngine::new(
        TableOptions::new(columns(), rows(10))
            .with_row_identity(|r: &Row, _| r.n.to_string())
            .with_pagination(PaginationMode::server(2, 5, move |page| {
                requests.borrow_mut().push(page)
            }))
            .on_page_size_change(move |size| sizes.borrow_mut().push(size)),
    )
    .unwrap()
}

#[test]
fn test_server_page_size_is_forwarded_only() {
    let requests = Rc::new(RefCell::new(Vec::new()));
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let mut table = server_table(requests.clone(), sizes.clone());
    let before: Vec<String> = table.page_keys().iter().map(|k| k.to_string()).collect();

    assert_eq!(table.pagination_kind(), PaginationKind::Server);
    assert_eq!(table.set_page_size(3), EventResult::Consumed);
    assert_eq!(*sizes.borrow(), vec![3]);
    assert_eq!(table.page_size(), 10);
    assert_eq!(table.page_keys(), before);
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.page_count(), 5);
    assert!(requests.borrow().is_empty());

    table.apply_page_size(3);
    assert_eq!(table.page_size(), 3);
    assert_eq!(table.page_keys().len(), 10);
}

#[test]
fn test_server_page_requests_are_forwarded_and_clamped() {
    let requests = Rc::new(RefCell::new(Vec::new()));
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let mut table = server_table(requests.clone(), sizes);

    assert_eq!(table.set_page_index(3), EventResult::Consumed);
    assert_eq!(table.set_page_index(40), EventResult::Consumed);
    assert_eq!(table.set_page_index(2), EventResult::Ignored);
    assert_eq!(*requests.borrow(), vec![3, 4]);
    assert_eq!(table.page_index(), 2);

    assert_eq!(table.set_server_page(3, 6), EventResult::Consumed);
    assert_eq!(table.page_index(), 3);
    assert_eq!(table.page_count(), 6);

    let footer = table.render().footer;
    assert_eq!(footer.mode, PaginationKind::Server);
    assert_eq!(footer.total_rows, None);
}

#[test]
fn test_server_filter_keeps_page() {
    let mut table = server_table(Rc::default(), Rc::default());
    table.set_global_filter_text("match");
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.page_keys(), vec!["0", "5"]);
}

#[test]
fn test_set_server_page_ignored_in_client_mode() {
    let mut table = client_table(5, 10);
    assert_eq!(table.set_server_page(1, 3), EventResult::Ignored);
}

#[test]
fn test_partial_server_signals_are_rejected() {
    let callback: PageChangeCallback = Box::new(|_: usize| {});
    let err = PaginationMode::from_signals(None, Some(4), Some(callback)).unwrap_err();
    assert!(matches!(err, TableError::IncompletePagination { ref missing } if missing == "page"));

    let err = PaginationMode::from_signals(Some(1), Some(4), None).unwrap_err();
    assert!(err.to_string().contains("on_page_change"));

    let mode = PaginationMode::from_signals(None, None, None).unwrap();
    assert_eq!(mode.kind(), PaginationKind::Client);
}
