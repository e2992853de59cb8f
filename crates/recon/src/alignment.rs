//! Positional alignment between the primary and secondary tables.
//!
//! The secondary source is joined by row index, not by region key: primary
//! row `i` takes secondary row `i` when `i < secondary.len()`. Nothing in
//! the join checks that both rows name the same region; [`check_alignment`]
//! reports where they differ.

use rentratio_io::NormalizedTable;

/// Secondary row index paired with `row_index`, if any.
pub fn secondary_index(row_index: usize, secondary_len: usize) -> Option<usize> {
    (row_index < secondary_len).then_some(row_index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    pub index: usize,
    pub primary_name: String,
    pub secondary_name: String,
}

/// Indices where both tables have a row but the composite names differ.
pub fn check_alignment(primary: &NormalizedTable, secondary: &NormalizedTable) -> Vec<Misalignment> {
    primary
        .rows
        .iter()
        .zip(secondary.rows.iter())
        .enumerate()
        .filter(|(_, (p, s))| p.region_name != s.region_name)
        .map(|(index, (p, s))| Misalignment {
            index,
            primary_name: p.region_name.clone(),
            secondary_name: s.region_name.clone(),
        })
        .collect()
}
