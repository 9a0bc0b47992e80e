//! Size pivot engine
//!
//! Collapses line items (one row per style variant × size) into one row per
//! style variant with a quantity column per size. Two passes: the first
//! collects the global, ordered set of size labels; the second accumulates
//! fixed-width quantity vectors per group. Descriptive columns are taken from
//! the first row of each group.

mod issues;

pub use issues::{DataIssue, IssueKind};

use crate::config::PivotConfig;
use crate::core::dates::coerce_date;
use crate::core::size_order::SizeOrder;
use crate::error::{SizePivotError, SizePivotResult};
use crate::types::{CellValue, Column, GroupKey, Table};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Counters describing one pivot run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotStats {
    pub input_rows: usize,
    pub groups: usize,
    pub size_columns: usize,
    pub total_quantity: f64,
    /// Sizes removed because no group ordered them
    pub dropped_sizes: Vec<String>,
}

/// Result of a successful pivot
#[derive(Debug, Clone)]
pub struct PivotOutput {
    pub table: Table,
    /// Output names of the size columns, in column order
    pub size_columns: Vec<String>,
    pub issues: Vec<DataIssue>,
    pub stats: PivotStats,
}

struct Group {
    key: GroupKey,
    first_row: usize,
    totals: Vec<f64>,
}

pub struct PivotEngine {
    config: PivotConfig,
    order: SizeOrder,
}

impl Default for PivotEngine {
    fn default() -> Self {
        Self::new(PivotConfig::default())
    }
}

impl PivotEngine {
    pub fn new(config: PivotConfig) -> Self {
        let order = SizeOrder::new(config.canonical_sizes.iter().cloned());
        Self { config, order }
    }

    pub fn config(&self) -> &PivotConfig {
        &self.config
    }

    /// Distinct size labels of `table`, in output column order
    pub fn distinct_sizes(&self, table: &Table) -> SizePivotResult<Vec<String>> {
        let column = table
            .column(&self.config.size_column)
            .ok_or_else(|| SizePivotError::Schema {
                missing: vec![self.config.size_column.clone()],
            })?;
        let mut seen = HashSet::new();
        let mut sizes: Vec<String> = column
            .values
            .iter()
            .filter_map(size_label)
            .filter(|label| seen.insert(label.clone()))
            .collect();
        self.order.sort(&mut sizes);
        Ok(sizes)
    }

    /// Fails with `Schema` listing every missing required column
    fn check_schema(&self, table: &Table, keys: &[String]) -> SizePivotResult<()> {
        let mut missing: Vec<String> = Vec::new();
        for name in keys
            .iter()
            .chain([&self.config.size_column, &self.config.qty_column])
        {
            if !table.has_column(name) && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SizePivotError::Schema { missing })
        }
    }

    pub fn pivot(&self, table: &Table) -> SizePivotResult<PivotOutput> {
        let keys = self.config.effective_key_columns(&table.column_names());
        self.check_schema(table, &keys)?;
        if let Err(msg) = table.validate() {
            return Err(SizePivotError::InvalidTable(msg));
        }

        let size_idx = self.index_of(table, &self.config.size_column)?;
        let qty_idx = self.index_of(table, &self.config.qty_column)?;
        let key_idx: Vec<usize> = keys
            .iter()
            .map(|k| self.index_of(table, k))
            .collect::<SizePivotResult<_>>()?;
        let row_count = table.row_count();
        let mut issues: Vec<DataIssue> = Vec::new();

        // Pass 1: global size set
        let labels: Vec<Option<String>> =
            table.columns[size_idx].values.iter().map(size_label).collect();
        let mut sizes: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for label in labels.iter().flatten() {
            if seen.insert(label.as_str()) {
                sizes.push(label.clone());
            }
        }
        self.order.sort(&mut sizes);
        let slots: HashMap<&str, usize> = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        // Non-size columns keep input order; keys are among them
        let carried: Vec<usize> = (0..table.column_count())
            .filter(|&c| c != size_idx && c != qty_idx)
            .collect();
        let descriptive: Vec<usize> = carried
            .iter()
            .copied()
            .filter(|c| !key_idx.contains(c))
            .collect();

        // Pass 2: accumulate per group
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        let mut conflicts: HashSet<(usize, usize)> = HashSet::new();
        let mut total_quantity = 0.0;

        for row in 0..row_count {
            let key = GroupKey(
                key_idx
                    .iter()
                    .map(|&c| table.columns[c].values[row].clone())
                    .collect(),
            );
            let g = match index.entry(key) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let key = e.key().clone();
                    e.insert(groups.len());
                    groups.push(Group {
                        key,
                        first_row: row,
                        totals: vec![0.0; sizes.len()],
                    });
                    groups.len() - 1
                }
            };

            let qty = self.coerce_quantity(row, &table.columns[qty_idx].values[row], &mut issues);
            match &labels[row] {
                Some(label) => {
                    if let Some(&slot) = slots.get(label.as_str()) {
                        groups[g].totals[slot] += qty;
                        total_quantity += qty;
                    }
                }
                None if qty != 0.0 => issues.push(DataIssue::new(
                    row,
                    &self.config.size_column,
                    IssueKind::MissingSize,
                    &table.columns[size_idx].values[row],
                )),
                None => {}
            }

            if self.config.check_consistency && groups[g].first_row != row {
                let first = groups[g].first_row;
                for &c in &descriptive {
                    let values = &table.columns[c].values;
                    if values[row] != values[first] && conflicts.insert((g, c)) {
                        issues.push(DataIssue::new(
                            row,
                            &table.columns[c].name,
                            IssueKind::DescriptiveConflict,
                            &values[row],
                        ));
                    }
                }
            }
        }

        if self.config.sort_groups {
            groups.sort_by(|a, b| a.key.cmp(&b.key));
        }

        // Carried columns: first row of each group wins
        let mut carried_columns: Vec<Option<Column>> = carried
            .iter()
            .map(|&c| {
                let source = &table.columns[c];
                let is_date = self.config.date_columns.contains(&source.name);
                let values = groups
                    .iter()
                    .map(|group| {
                        let cell = &source.values[group.first_row];
                        if !is_date {
                            return cell.clone();
                        }
                        coerce_date(cell).unwrap_or_else(|| {
                            issues.push(DataIssue::new(
                                group.first_row,
                                &source.name,
                                IssueKind::DateCoercion,
                                cell,
                            ));
                            CellValue::Empty
                        })
                    })
                    .collect();
                Some(Column::new(source.name.clone(), values))
            })
            .collect();

        // Size columns, already in three-tier order
        let carried_names: HashSet<String> = carried
            .iter()
            .map(|&c| table.columns[c].name.clone())
            .collect();
        let mut size_columns: Vec<Column> = Vec::with_capacity(sizes.len());
        let mut dropped_sizes: Vec<String> = Vec::new();
        for (slot, size) in sizes.iter().enumerate() {
            let values: Vec<CellValue> = groups
                .iter()
                .map(|group| {
                    let total = group.totals[slot];
                    if self.config.zero_as_empty && total == 0.0 {
                        CellValue::Empty
                    } else {
                        CellValue::Number(total)
                    }
                })
                .collect();
            let name = if carried_names.contains(size) {
                format!("{} ({})", size, self.config.size_column)
            } else {
                size.clone()
            };
            let column = Column::new(name, values);
            if self.config.drop_empty_sizes && column.is_all_empty() {
                dropped_sizes.push(size.clone());
                continue;
            }
            size_columns.push(column);
        }

        // Preferred prefix, then the rest in input order, then sizes
        let mut out = Table::new();
        for preferred in &self.config.preferred_columns {
            if let Some(column) = carried_columns
                .iter_mut()
                .find(|c| c.as_ref().is_some_and(|c| &c.name == preferred))
                .and_then(Option::take)
            {
                out.columns.push(column);
            }
        }
        out.columns.extend(carried_columns.into_iter().flatten());
        let size_names: Vec<String> = size_columns.iter().map(|c| c.name.clone()).collect();
        out.columns.extend(size_columns);

        let stats = PivotStats {
            input_rows: row_count,
            groups: groups.len(),
            size_columns: size_names.len(),
            total_quantity,
            dropped_sizes,
        };
        debug!(
            rows = stats.input_rows,
            groups = stats.groups,
            sizes = stats.size_columns,
            dropped = stats.dropped_sizes.len(),
            "pivoted size columns"
        );
        if !issues.is_empty() {
            warn!(count = issues.len(), "pivot finished with non-fatal data issues");
        }

        Ok(PivotOutput {
            table: out,
            size_columns: size_names,
            issues,
            stats,
        })
    }

    fn index_of(&self, table: &Table, name: &str) -> SizePivotResult<usize> {
        table.column_index(name).ok_or_else(|| SizePivotError::Schema {
            missing: vec![name.to_string()],
        })
    }

    /// Empty and blank cells count as zero; anything else non-numeric is an issue
    fn coerce_quantity(&self, row: usize, cell: &CellValue, issues: &mut Vec<DataIssue>) -> f64 {
        let parsed = match cell {
            CellValue::Number(n) => Some(*n),
            CellValue::Empty => return 0.0,
            CellValue::Text(s) if s.trim().is_empty() => return 0.0,
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Date(_) => None,
        };
        match parsed {
            Some(n) if n.is_finite() => n,
            _ => {
                issues.push(DataIssue::new(
                    row,
                    &self.config.qty_column,
                    IssueKind::QuantityCoercion,
                    cell,
                ));
                0.0
            }
        }
    }
}

/// Label used as the output column name for a size cell; blank means no size
pub fn size_label(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Empty => None,
        CellValue::Text(s) if s.trim().is_empty() => None,
        other => Some(other.to_display_string()),
    }
}

/// Pivot with explicit column names and default post-processing
pub fn pivot(
    table: &Table,
    key_columns: &[&str],
    size_column: &str,
    qty_column: &str,
) -> SizePivotResult<Table> {
    let config = PivotConfig {
        key_columns: key_columns.iter().map(|s| s.to_string()).collect(),
        size_column: size_column.to_string(),
        qty_column: qty_column.to_string(),
        ..PivotConfig::default()
    };
    config.validate()?;
    Ok(PivotEngine::new(config).pivot(table)?.table)
}
