//! Library-level properties of normalize + pivot

use pretty_assertions::assert_eq;
use sizepivot::config::PivotConfig;
use sizepivot::core::{normalize, pivot, PivotEngine, SizeOrder};
use sizepivot::{CellValue, SizePivotError, Table};
use std::collections::{HashMap, HashSet};

const KEYS: [&str; 4] = ["Season", "Color", "Style Number", "Name"];

fn headers() -> Vec<String> {
    ["Season", "Color", "Style Number", "Name", "Wholesale (EUR)", "Size", "Qty"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Deterministic mixed order sheet: repeated keys, dirty labels, zeros
fn generated_orders() -> Table {
    let colors = ["Red", "Blue", "Black"];
    let styles = ["A-1-", "A-1", "B-22--"];
    let sizes = [
        "S Sizes",
        " M Sizes ",
        "XL",
        "40 Sizes",
        "One size",
        "S/M",
        "L Sizes Sizes",
    ];
    let mut rows = Vec::new();
    for i in 0..90usize {
        rows.push(vec![
            CellValue::text(if i % 7 == 0 { "FW24" } else { "SS24" }),
            CellValue::text(colors[i % colors.len()]),
            CellValue::text(styles[(i / 3) % styles.len()]),
            CellValue::text("Tee"),
            CellValue::Number(19.5),
            CellValue::text(sizes[(i * 5) % sizes.len()]),
            CellValue::Number((i % 4) as f64),
        ]);
    }
    Table::from_rows(headers(), rows)
}

fn key_of(table: &Table, row: usize) -> Vec<String> {
    KEYS.iter()
        .map(|k| table.cell(row, k).map(|c| c.to_display_string()).unwrap_or_default())
        .collect()
}

#[test]
fn test_normalize_is_idempotent() {
    let once = normalize(&generated_orders());
    let twice = normalize(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_normalize_repeated_label_is_idempotent() {
    let table = Table::from_rows(
        vec!["Size".to_string()],
        vec![vec!["M Sizes Sizes".into()], vec!["Sizes Sizes".into()]],
    );
    let once = normalize(&table);
    assert_eq!(once.cell(0, "Size"), Some(&CellValue::text("M")));
    assert_eq!(once.cell(1, "Size"), Some(&CellValue::text("")));
    assert_eq!(normalize(&once), once);
}

#[test]
fn test_normalize_keeps_row_count_and_order() {
    let input = generated_orders();
    let cleaned = normalize(&input);
    assert_eq!(cleaned.row_count(), input.row_count());
    assert_eq!(cleaned.cell(0, "Size"), Some(&CellValue::text("S")));
    assert_eq!(cleaned.cell(3, "Size"), Some(&CellValue::text("M")));
    assert_eq!(cleaned.cell(4, "Size"), Some(&CellValue::text("L")));
    assert_eq!(cleaned.cell(0, "Style Number"), Some(&CellValue::text("A-1")));
    assert_eq!(cleaned.cell(0, "Color"), input.cell(0, "Color"));
}

#[test]
fn test_row_count_matches_distinct_keys() {
    let cleaned = normalize(&generated_orders());
    let distinct: HashSet<Vec<String>> =
        (0..cleaned.row_count()).map(|r| key_of(&cleaned, r)).collect();

    let output = pivot(&cleaned, &KEYS, "Size", "Qty").unwrap();
    assert_eq!(output.row_count(), distinct.len());
}

#[test]
fn test_quantity_conservation_per_key_and_size() {
    let cleaned = normalize(&generated_orders());
    let mut expected: HashMap<(Vec<String>, String), f64> = HashMap::new();
    for row in 0..cleaned.row_count() {
        let size = cleaned.cell(row, "Size").unwrap().to_display_string();
        let qty = cleaned.cell(row, "Qty").unwrap().as_number().unwrap();
        *expected.entry((key_of(&cleaned, row), size)).or_default() += qty;
    }

    let config = PivotConfig {
        zero_as_empty: false,
        drop_empty_sizes: false,
        ..PivotConfig::default()
    };
    let output = PivotEngine::new(config).pivot(&cleaned).unwrap();
    for row in 0..output.table.row_count() {
        let key = key_of(&output.table, row);
        for size in &output.size_columns {
            let got = output.table.cell(row, size).unwrap().as_number().unwrap();
            let want = expected
                .get(&(key.clone(), size.clone()))
                .copied()
                .unwrap_or(0.0);
            assert_eq!(got, want, "key {:?} size {}", key, size);
        }
    }
}

#[test]
fn test_size_order_concrete_case() {
    let order = SizeOrder::default();
    let sorted = order.sorted(
        ["40", "M", "S/M", "4", "XS", "One size"]
            .iter()
            .map(|s| s.to_string()),
    );
    assert_eq!(sorted, vec!["One size", "XS", "S/M", "M", "4", "40"]);
}

#[test]
fn test_missing_qty_is_schema_error_without_mutation() {
    let table = Table::from_rows(
        ["Season", "Color", "Style Number", "Name", "Size"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![vec![
            "SS24".into(),
            "Red".into(),
            "A-1".into(),
            "Tee".into(),
            "S".into(),
        ]],
    );
    let before = table.clone();

    match pivot(&table, &KEYS, "Size", "Qty") {
        Err(SizePivotError::Schema { missing }) => assert_eq!(missing, vec!["Qty"]),
        other => panic!("expected schema error, got {:?}", other.map(|t| t.row_count())),
    }
    assert_eq!(table, before);
}

#[test]
fn test_descriptive_columns_carried_once_per_group() {
    let output = pivot(&normalize(&generated_orders()), &KEYS, "Size", "Qty").unwrap();
    let names = output.column_names();
    assert_eq!(
        names.iter().filter(|n| **n == "Wholesale (EUR)").count(),
        1
    );
    assert!(!names.contains(&"Size"));
    assert!(!names.contains(&"Qty"));
    for row in 0..output.row_count() {
        assert_eq!(
            output.cell(row, "Wholesale (EUR)"),
            Some(&CellValue::Number(19.5))
        );
    }
}
