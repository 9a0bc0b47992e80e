//! End-to-end: workbook bytes in, workbook bytes out

use pretty_assertions::assert_eq;
use sizepivot::config::PivotConfig;
use sizepivot::excel::{ExcelExporter, ExcelImporter};
use sizepivot::pipeline::Pipeline;
use sizepivot::{CellValue, Table};

fn scenario_bytes() -> Vec<u8> {
    let table = Table::from_rows(
        ["Season", "Color", "Style Number", "Name", "Size", "Qty"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![
            vec![
                "SS24".into(),
                "Red".into(),
                "A-1-".into(),
                "Tee".into(),
                "S Sizes".into(),
                3.0.into(),
            ],
            vec![
                "SS24".into(),
                "Red".into(),
                "A-1-".into(),
                "Tee".into(),
                "M Sizes".into(),
                0.0.into(),
            ],
            vec![
                "SS24".into(),
                "Blue".into(),
                "A-1-".into(),
                "Tee".into(),
                "S Sizes".into(),
                5.0.into(),
            ],
        ],
    );
    ExcelExporter::default().encode(&table).unwrap()
}

fn run(config: PivotConfig) -> Table {
    let output = Pipeline::new(config).run(&scenario_bytes()).unwrap();
    ExcelImporter::new().decode(&output.bytes).unwrap()
}

#[test]
fn e2e_default_policy_drops_unordered_size() {
    let table = run(PivotConfig::default());

    assert_eq!(
        table.column_names(),
        vec!["Season", "Style Number", "Name", "Color", "S"]
    );
    assert_eq!(table.row_count(), 2);

    assert_eq!(table.cell(0, "Color"), Some(&CellValue::text("Red")));
    assert_eq!(table.cell(0, "Style Number"), Some(&CellValue::text("A-1")));
    assert_eq!(table.cell(0, "S"), Some(&CellValue::Number(3.0)));

    assert_eq!(table.cell(1, "Color"), Some(&CellValue::text("Blue")));
    assert_eq!(table.cell(1, "S"), Some(&CellValue::Number(5.0)));
}

#[test]
fn e2e_keeping_empty_sizes_leaves_null_cells() {
    let config = PivotConfig::from_yaml_str("drop_empty_sizes: false\n").unwrap();
    let table = run(config);

    assert_eq!(
        table.column_names(),
        vec!["Season", "Style Number", "Name", "Color", "S", "M"]
    );
    assert_eq!(table.cell(0, "M"), Some(&CellValue::Empty));
    assert_eq!(table.cell(1, "M"), Some(&CellValue::Empty));
}

#[test]
fn e2e_custom_sheet_name_and_keys() {
    let config = PivotConfig::from_yaml_str(
        "key_columns: [Season, Style Number]\nsheet_name: Pivot\n",
    )
    .unwrap();
    let output = Pipeline::new(config).run(&scenario_bytes()).unwrap();

    let table = ExcelImporter::with_sheet("Pivot")
        .decode(&output.bytes)
        .unwrap();
    // Red and Blue fold into one row; Color comes from the first line item
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.cell(0, "Color"), Some(&CellValue::text("Red")));
    assert_eq!(table.cell(0, "S"), Some(&CellValue::Number(8.0)));
}
