use crate::config::PivotConfig;
use crate::core::{DataIssue, Normalizer, PivotEngine};
use crate::error::{SizePivotError, SizePivotResult};
use crate::excel::ExcelImporter;
use crate::pipeline::Pipeline;
use crate::types::Table;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Widest cell shown in a preview before truncation
const PREVIEW_CELL_WIDTH: usize = 24;

/// Issues listed individually before collapsing into a count
const MAX_LISTED_ISSUES: usize = 20;

/// Command-line overrides for the pivot command
#[derive(Debug, Clone, Default)]
pub struct PivotOptions {
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub keys: Vec<String>,
    pub size_column: Option<String>,
    pub qty_column: Option<String>,
    pub color_code: bool,
    pub keep_zeros: bool,
    pub keep_empty_sizes: bool,
    pub sort_groups: bool,
    pub check_consistency: bool,
    pub preview: Option<usize>,
    pub dry_run: bool,
    pub verbose: bool,
}

impl PivotOptions {
    /// Load the config file (or defaults) and layer the flags on top
    pub fn resolve_config(&self) -> SizePivotResult<PivotConfig> {
        let mut config = PivotConfig::load_or_default(self.config.as_deref())?;
        if !self.keys.is_empty() {
            config.key_columns = self.keys.clone();
        }
        if let Some(ref size) = self.size_column {
            config.size_column = size.clone();
        }
        if let Some(ref qty) = self.qty_column {
            config.qty_column = qty.clone();
        }
        config.include_color_code |= self.color_code;
        config.zero_as_empty &= !self.keep_zeros;
        config.drop_empty_sizes &= !self.keep_empty_sizes;
        config.sort_groups |= self.sort_groups;
        config.check_consistency |= self.check_consistency;
        config.validate()?;
        Ok(config)
    }
}

/// `orders.xlsx` → `orders_<suffix>.xlsx` next to the input
pub fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_{}.xlsx", stem, suffix))
}

/// Render the first `rows` rows as aligned plain text
pub fn format_preview(table: &Table, rows: usize) -> String {
    let shown = rows.min(table.row_count());
    let cells: Vec<Vec<String>> = table
        .columns
        .iter()
        .map(|column| {
            std::iter::once(column.name.clone())
                .chain(
                    column.values[..shown]
                        .iter()
                        .map(|cell| cell.to_display_string()),
                )
                .map(|text| truncate(&text, PREVIEW_CELL_WIDTH))
                .collect()
        })
        .collect();
    let widths: Vec<usize> = cells
        .iter()
        .map(|col| col.iter().map(|c| c.chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for line in 0..=shown {
        let rendered: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(col, &width)| format!("{:<width$}", col[line], width = width))
            .collect();
        out.push_str(rendered.join("  ").trim_end());
        out.push('\n');
    }
    if table.row_count() > shown {
        out.push_str(&format!("... {} more rows\n", table.row_count() - shown));
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

fn print_issues(issues: &[DataIssue]) {
    if issues.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("⚠️  {} cell(s) could not be used as-is:", issues.len()).yellow()
    );
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        println!("   {}", issue);
    }
    if issues.len() > MAX_LISTED_ISSUES {
        println!("   ... and {} more", issues.len() - MAX_LISTED_ISSUES);
    }
    println!();
}

/// Execute the pivot command
pub fn pivot(input: PathBuf, options: PivotOptions) -> SizePivotResult<()> {
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output(&input, "pivot"));

    println!("{}", "📐 sizepivot - Pivoting sizes".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if options.dry_run {
        println!("{}", "📋 DRY RUN MODE - No file will be written\n".yellow());
    }

    let config = options.resolve_config()?;
    if options.verbose {
        println!("{}", "⚙️  Configuration:".cyan());
        println!("   Keys: {}", config.key_columns.join(", "));
        println!("   Size column: {}", config.size_column);
        println!("   Qty column:  {}\n", config.qty_column);
        println!("{}", "📖 Reading spreadsheet...".cyan());
    }

    let bytes = fs::read(&input)?;
    let pipeline = Pipeline::new(config);
    let result = pipeline.run(&bytes)?;

    if let Some(ref stats) = result.stats {
        if options.verbose {
            println!("   {} line items", stats.input_rows);
            if !stats.dropped_sizes.is_empty() {
                println!(
                    "   Dropped sizes nobody ordered: {}",
                    stats.dropped_sizes.join(", ")
                );
            }
            println!();
        }
        println!("{}", "✅ Pivot Results:".bold().green());
        println!("   Rows:  {}", stats.groups.to_string().bold());
        println!("   Sizes: {}", stats.size_columns.to_string().bold());
        println!(
            "   Total quantity: {}\n",
            crate::types::format_number(stats.total_quantity).bold()
        );
    }

    print_issues(&result.issues);

    if let Some(rows) = options.preview {
        println!("{}", "🔎 Preview:".cyan());
        print!("{}", format_preview(&result.table, rows));
        println!();
    }

    if options.dry_run {
        println!("{}", "📋 Dry run complete - no file written".yellow());
        return Ok(());
    }

    fs::write(&output, &result.bytes)?;
    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", output.display());

    Ok(())
}

/// Execute the clean command (size labels and style numbers only, no pivot)
pub fn clean(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    size_column: Option<String>,
    verbose: bool,
) -> SizePivotResult<()> {
    let output = output.unwrap_or_else(|| default_output(&input, "clean"));

    println!("{}", "🧹 sizepivot - Cleaning size labels".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let mut config = PivotConfig::load_or_default(config.as_deref())?;
    if let Some(size) = size_column {
        config.size_column = size;
    }
    config.validate()?;

    let bytes = fs::read(&input)?;
    let result = Pipeline::new(config).clean(&bytes)?;

    if verbose {
        println!("{}", "🔎 Preview:".cyan());
        print!("{}", format_preview(&result.table, 5));
        println!();
    }

    fs::write(&output, &result.bytes)?;
    println!("{}", "✅ Clean Complete!".bold().green());
    println!(
        "   {} rows written to {}",
        result.table.row_count(),
        output.display()
    );

    Ok(())
}

/// Execute the sizes command: list distinct sizes in column order
pub fn sizes(input: PathBuf, config: Option<PathBuf>) -> SizePivotResult<()> {
    let config = PivotConfig::load_or_default(config.as_deref())?;
    let table = read_non_empty(&input)?;
    let normalized = Normalizer::new(&config).normalize(&table);
    let engine = PivotEngine::new(config);
    let sizes = engine.distinct_sizes(&normalized)?;

    println!("{}", "📏 sizepivot - Size order".bold().green());
    println!("   File: {}\n", input.display());
    for (idx, size) in sizes.iter().enumerate() {
        println!("   {:>3}. {}", idx + 1, size.bright_blue());
    }
    println!("\n   {} distinct sizes", sizes.len());

    Ok(())
}

/// Execute the preview command: show the decoded input as-is
pub fn preview(input: PathBuf, rows: usize) -> SizePivotResult<()> {
    let table = read_non_empty(&input)?;

    println!("{}", "🔎 sizepivot - Preview".bold().green());
    println!(
        "   File: {} ({} rows, {} columns)\n",
        input.display(),
        table.row_count(),
        table.column_count()
    );
    print!("{}", format_preview(&table, rows));

    Ok(())
}

/// Execute the init command: write the default configuration
pub fn init(output: PathBuf, force: bool) -> SizePivotResult<()> {
    if output.exists() && !force {
        return Err(SizePivotError::Config(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )));
    }
    let yaml = PivotConfig::default().to_yaml_string()?;
    fs::write(&output, yaml)?;

    println!("{}", "✅ Wrote default configuration".bold().green());
    println!("   {}", output.display());

    Ok(())
}

fn read_non_empty(input: &Path) -> SizePivotResult<Table> {
    let table = ExcelImporter::new().import(input)?;
    if table.column_count() == 0 || table.is_empty() {
        return Err(SizePivotError::EmptyTable);
    }
    Ok(table)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
