//! Tests for table settings and option validation.

use revboard_table::{
    CellValue, ColumnDescriptor, SortDirection, SortSpec, TableEngine, TableError, TableOptions,
    TableSettings, ValueKind,
};

fn columns() -> Vec<ColumnDescriptor<(String, i64)>> {
    vec![
        ColumnDescriptor::new("name", "Name", |r: &(String, i64)| r.0.as_str().into()).fixed(),
        ColumnDescriptor::new("score", "Score", |r: &(String, i64)| CellValue::from(r.1))
            .kind(ValueKind::Number)
            .sortable(),
    ]
}

#[test]
fn test_defaults() {
    let settings = TableSettings::default();
    assert_eq!(settings.initial_page_size, 10);
    assert_eq!(settings.page_size_options, vec![10, 20, 50, 100]);
    assert!(!settings.enable_row_selection);
    assert!(settings.enable_global_filter);
    assert!(settings.hidden_columns.is_empty());
    assert!(settings.initial_sort.is_empty());
}

#[test]
fn test_parse_json_with_sort() {
    let settings = TableSettings::from_json_str(
        r#"{
            "initial_page_size": 50,
            "page_size_options": [25, 50],
            "enable_global_filter": false,
            "initial_sort": [{"column": "score", "direction": "desc"}]
        }"#,
    )
    .unwrap();
    assert_eq!(settings.initial_page_size, 50);
    assert_eq!(settings.page_size_options, vec![25, 50]);
    assert!(!settings.enable_global_filter);
    assert_eq!(settings.initial_sort.direction_of("score"), Some(SortDirection::Desc));
}

#[test]
fn test_settings_round_trip_through_json() {
    let settings = TableSettings::new()
        .with_page_size(20)
        .with_row_selection()
        .with_sort(SortSpec::asc("score"));
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(TableSettings::from_json_str(&json).unwrap(), settings);
}

#[test]
fn test_malformed_json_is_a_settings_error() {
    let err = TableSettings::from_json_str("{\"initial_page_size\": -1}").unwrap_err();
    assert!(matches!(err, TableError::Settings(_)));
}

#[test]
fn test_zero_page_size_is_rejected() {
    let err = TableEngine::new(TableOptions::new(columns(), Vec::new()).with_page_size(0))
        .err()
        .unwrap();
    assert!(matches!(err, TableError::InvalidPageSize { size: 0 }));
}

#[test]
fn test_page_size_options_must_be_positive() {
    let err = TableSettings::new().with_page_size_options(vec![10, 0]).validate().unwrap_err();
    assert!(matches!(err, TableError::InvalidPageSizeOptions { .. }));

    let err = TableSettings::new().with_page_size_options(Vec::new()).validate().unwrap_err();
    assert!(err.to_string().contains("[]"));
}

#[test]
fn test_fixed_columns_cannot_start_hidden() {
    let settings = TableSettings::new().with_hidden_column("name");
    let err = TableEngine::new(TableOptions::new(columns(), Vec::new()).with_settings(settings))
        .err()
        .unwrap();
    assert!(matches!(err, TableError::NotHideable { ref id } if id == "name"));
}

#[test]
fn test_settings_apply_to_engine() {
    let rows = vec![("b".to_string(), 1), ("a".to_string(), 9), ("c".to_string(), 5)];
    let settings = TableSettings::from_json_str(
        r#"{"initial_page_size": 2, "hidden_columns": ["score"], "initial_sort": [{"column": "score", "direction": "asc"}]}"#,
    )
    .unwrap();
    let table = TableEngine::new(TableOptions::new(columns(), rows).with_settings(settings)).unwrap();

    assert_eq!(table.page_size(), 2);
    assert_eq!(table.page_count(), 2);
    assert_eq!(table.visible_column_ids(), vec!["name"]);
    let names: Vec<&str> = table.page_rows().iter().map(|r| r.0.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);
    assert_eq!(table.render().footer.page_size_options, vec![10, 20, 50, 100]);
}
