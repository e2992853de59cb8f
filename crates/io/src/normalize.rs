// Schema normalization: drop administrative columns, align period labels

use std::collections::HashSet;

use crate::error::LoadError;
use crate::period::{Period, Series};
use crate::table::{RawTable, SourceSchema};

/// A source row reduced to its identity plus a period-keyed series.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub index: usize,
    pub region_name: String,
    pub region_id: u64,
    pub size_rank: u32,
    pub series: Series,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub name: String,
    /// Period vocabulary in column order.
    pub periods: Vec<Period>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&NormalizedRow> {
        self.rows.get(index)
    }
}

/// Strip a source-specific trailing suffix from a column label.
///
/// `2021-12-31` with `suffix_len = 3` becomes `2021-12`. Returns `None` when
/// the label is not longer than the suffix.
pub fn strip_period_suffix(label: &str, suffix_len: usize) -> Option<&str> {
    if suffix_len == 0 {
        return Some(label);
    }
    let count = label.chars().count();
    if count <= suffix_len {
        return None;
    }
    let cut = label
        .char_indices()
        .nth(count - suffix_len)
        .map(|(i, _)| i)
        .unwrap_or(label.len());
    Some(&label[..cut])
}

/// Normalize with the schema's own column set and suffix rule.
pub fn normalize_table(table: &RawTable, schema: &SourceSchema) -> Result<NormalizedTable, LoadError> {
    normalize(table, &schema.admin_columns, schema.period_suffix_len)
}

/// Drop `admin_columns`, rename every surviving column to its bare period
/// label and parse the cells as numbers. Empty cells become missing periods.
pub fn normalize(
    table: &RawTable,
    admin_columns: &[String],
    period_suffix_len: usize,
) -> Result<NormalizedTable, LoadError> {
    let admin: HashSet<&str> = admin_columns.iter().map(|s| s.as_str()).collect();

    let mut columns: Vec<(usize, Period)> = Vec::new();
    let mut seen: HashSet<Period> = HashSet::new();
    for (col_idx, header) in table.headers.iter().enumerate() {
        if admin.contains(header.as_str()) {
            continue;
        }
        let invalid = || LoadError::InvalidPeriodLabel {
            table: table.name.clone(),
            label: header.clone(),
        };
        let bare = strip_period_suffix(header, period_suffix_len).ok_or_else(invalid)?;
        let period: Period = bare.parse().map_err(|_| invalid())?;
        if !seen.insert(period) {
            return Err(LoadError::DuplicatePeriod {
                table: table.name.clone(),
                period: period.to_string(),
            });
        }
        columns.push((col_idx, period));
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    for raw in &table.rows {
        let mut series = Series::new();
        for &(col_idx, period) in &columns {
            let cell = raw.cells.get(col_idx).map(|s| s.trim()).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().map_err(|_| LoadError::MalformedValue {
                table: table.name.clone(),
                row: raw.index,
                column: table.headers[col_idx].clone(),
                value: cell.to_string(),
            })?;
            if value.is_finite() {
                series.insert(period, value);
            }
        }
        rows.push(NormalizedRow {
            index: raw.index,
            region_name: raw.region_name.clone(),
            region_id: raw.region_id,
            size_rank: raw.size_rank,
            series,
        });
    }

    log::debug!(
        "{}: normalized {} period columns ({} admin columns dropped)",
        table.name,
        columns.len(),
        table.headers.len() - columns.len()
    );

    Ok(NormalizedTable {
        name: table.name.clone(),
        periods: columns.into_iter().map(|(_, p)| p).collect(),
        rows,
    })
}
