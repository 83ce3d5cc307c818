//! Tests for sort cycling, stability and multi-key sorts.

use chrono::NaiveDate;
use revboard_table::{
    CellValue, ColumnDescriptor, EventResult, SortDirection, SortSpec, TableEngine, TableOptions,
    TableSettings, ValueKind,
};

#[derive(Debug, Clone)]
struct Item {
    id: &'static str,
    v: i64,
}

fn item_table(items: Vec<Item>) -> TableEngine<Item> {
    let columns = vec![
        ColumnDescriptor::new("id", "Id", |i: &Item| i.id.into()),
        ColumnDescriptor::new("v", "V", |i: &Item| CellValue::from(i.v))
            .kind(ValueKind::Number)
            .sortable(),
    ];
    TableEngine::new(TableOptions::new(columns, items).with_row_identity(|i: &Item, _| i.id.to_string()))
        .unwrap()
}

#[test]
fn test_sort_cycle_scenario() {
    let mut table = item_table(vec![
        Item { id: "a", v: 3 },
        Item { id: "b", v: 1 },
        Item { id: "c", v: 2 },
    ]);

    table.toggle_sort("v");
    assert_eq!(table.sort().direction_of("v"), Some(SortDirection::Asc));
    assert_eq!(table.page_keys(), vec!["b", "c", "a"]);

    table.toggle_sort("v");
    assert_eq!(table.sort().direction_of("v"), Some(SortDirection::Desc));
    assert_eq!(table.page_keys(), vec!["a", "c", "b"]);

    table.toggle_sort("v");
    assert!(table.sort().is_empty());
    assert_eq!(table.page_keys(), vec!["a", "b", "c"]);
}

#[derive(Debug, Clone)]
struct Reading {
    id: &'static str,
    value: CellValue,
}

#[test]
fn test_mixed_int_float_column_sorts_exactly_near_f64_precision() {
    let readings = vec![
        Reading { id: "a", value: CellValue::Int(9_007_199_254_740_993) },
        Reading { id: "b", value: CellValue::Float(9_007_199_254_740_992.0) },
        Reading { id: "c", value: CellValue::Int(9_007_199_254_740_992) },
        Reading { id: "d", value: CellValue::Float(0.5) },
        Reading { id: "e", value: CellValue::Int(0) },
        Reading { id: "f", value: CellValue::Float(9_007_199_254_740_994.0) },
    ];
    let columns = vec![
        ColumnDescriptor::new("id", "Id", |r: &Reading| r.id.into()),
        ColumnDescriptor::new("value", "Value", |r: &Reading| r.value.clone())
            .kind(ValueKind::Number)
            .sortable(),
    ];
    let mut table = TableEngine::new(
        TableOptions::new(columns, readings)
            .with_row_identity(|r: &Reading, _| r.id.to_string()),
    )
    .unwrap();

    table.toggle_sort("value");
    assert_eq!(table.page_keys(), vec!["e", "d", "b", "c", "a", "f"]);

    table.toggle_sort("value");
    assert_eq!(table.page_keys(), vec!["f", "a", "b", "c", "d", "e"]);
}

#[test]
fn test_sort_is_stable() {
    let mut table = item_table(vec![
        Item { id: "a", v: 2 },
        Item { id: "b", v: 1 },
        Item { id: "c", v: 2 },
        Item { id: "d", v: 1 },
        Item { id: "e", v: 2 },
    ]);

    table.toggle_sort("v");
    assert_eq!(table.page_keys(), vec!["b", "d", "a", "c", "e"]);

    table.toggle_sort("v");
    assert_eq!(table.page_keys(), vec!["a", "c", "e", "b", "d"]);
}

#[test]
fn test_unsortable_column_is_ignored() {
    let mut table = item_table(vec![Item { id: "b", v: 1 }, Item { id: "a", v: 2 }]);
    assert_eq!(table.toggle_sort("id"), EventResult::Ignored);
    assert_eq!(table.toggle_sort("nope"), EventResult::Ignored);
    assert_eq!(table.page_keys(), vec!["b", "a"]);
}

#[test]
fn test_sort_ignored_while_loading() {
    let mut table = item_table(vec![Item { id: "a", v: 2 }, Item { id: "b", v: 1 }]);
    table.set_loading(true);
    assert_eq!(table.toggle_sort("v"), EventResult::Ignored);
    assert!(table.render().header.iter().all(|h| !h.interactive));

    table.set_loading(false);
    assert_eq!(table.toggle_sort("v"), EventResult::Consumed);
    assert!(table.render().header[1].interactive);
}

#[derive(Debug, Clone)]
struct Entry {
    id: u32,
    period: NaiveDate,
    channel: &'static str,
    revenue: Option<f64>,
}

fn entry_table() -> TableEngine<Entry> {
    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let rows = vec![
        Entry { id: 1, period: day(3), channel: "online", revenue: Some(10.0) },
        Entry { id: 2, period: day(1), channel: "Retail", revenue: None },
        Entry { id: 3, period: day(2), channel: "online", revenue: Some(30.5) },
        Entry { id: 4, period: day(1), channel: "Online", revenue: Some(7.25) },
        Entry { id: 5, period: day(2), channel: "retail", revenue: Some(30.5) },
    ];
    let columns = vec![
        ColumnDescriptor::new("period", "Period", |e: &Entry| e.period.into())
            .kind(ValueKind::Date)
            .sortable(),
        ColumnDescriptor::new("channel", "Channel", |e: &Entry| e.channel.into())
            .kind(ValueKind::Text)
            .sortable(),
        ColumnDescriptor::new("revenue", "Revenue", |e: &Entry| e.revenue.into())
            .kind(ValueKind::Number)
            .sortable(),
    ];
    TableEngine::new(TableOptions::new(columns, rows).with_row_identity(|e: &Entry, _| e.id.to_string()))
        .unwrap()
}

#[test]
fn test_dates_sort_chronologically() {
    let mut table = entry_table();
    table.toggle_sort("period");
    assert_eq!(table.page_keys(), vec!["2", "4", "3", "5", "1"]);
}

#[test]
fn test_missing_values_sort_last_in_both_directions() {
    let mut table = entry_table();
    table.toggle_sort("revenue");
    assert_eq!(table.page_keys(), vec!["4", "1", "3", "5", "2"]);
    table.toggle_sort("revenue");
    assert_eq!(table.page_keys(), vec!["3", "5", "1", "4", "2"]);
}

#[test]
fn test_text_sort_ignores_case() {
    let mut table = entry_table();
    table.toggle_sort("channel");
    let channels: Vec<&str> = table.page_rows().iter().map(|e| e.channel).collect();
    assert_eq!(channels, vec!["Online", "online", "online", "Retail", "retail"]);
}

#[test]
fn test_multi_key_sort_falls_through() {
    let mut table = entry_table();
    table.toggle_sort_multi("period");
    table.toggle_sort_multi("revenue");
    table.toggle_sort_multi("revenue");
    assert_eq!(
        table.sort(),
        &SortSpec::asc("period").then_desc("revenue")
    );
    assert_eq!(table.page_keys(), vec!["4", "2", "3", "5", "1"]);

    let header = table.render().header;
    assert_eq!(header[0].sort_priority, Some(0));
    assert_eq!(header[2].sort_priority, Some(1));
    assert_eq!(header[2].sort, Some(SortDirection::Desc));
}

#[test]
fn test_single_toggle_replaces_multi_sort() {
    let mut table = entry_table();
    table.set_sort(SortSpec::asc("period").then_asc("channel"));
    table.toggle_sort("revenue");
    assert_eq!(table.sort(), &SortSpec::asc("revenue"));
}

#[test]
fn test_initial_sort_from_settings() {
    let columns = vec![
        ColumnDescriptor::new("v", "V", |i: &Item| CellValue::from(i.v))
            .kind(ValueKind::Number)
            .sortable(),
    ];
    let rows = vec![Item { id: "a", v: 1 }, Item { id: "b", v: 5 }];
    let table = TableEngine::new(
        TableOptions::new(columns, rows)
            .with_row_identity(|i: &Item, _| i.id.to_string())
            .with_settings(TableSettings::new().with_sort(SortSpec::desc("v"))),
    )
    .unwrap();
    assert_eq!(table.page_keys(), vec!["b", "a"]);
}

#[test]
fn test_set_sort_drops_unsortable_keys() {
    let mut table = item_table(vec![Item { id: "a", v: 1 }]);
    table.set_sort(SortSpec::asc("id").then_desc("v"));
    assert_eq!(table.sort(), &SortSpec::desc("v"));
    assert_eq!(table.clear_sort(), EventResult::Consumed);
    assert_eq!(table.clear_sort(), EventResult::Ignored);
}
