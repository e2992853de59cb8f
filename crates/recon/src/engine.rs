use std::collections::hash_map::Entry;

use rentratio_io::{NormalizedRow, NormalizedTable};

use crate::alignment::secondary_index;
use crate::derived::price_to_rent;
use crate::model::{CanonicalRegion, Collision, ReconciliationResult, Resolution};
use crate::policy::DuplicatePolicy;

/// Composite name of the nation-wide aggregate row.
pub const DEFAULT_SENTINEL: &str = "United States";

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Rows with exactly this composite name are skipped.
    pub sentinel: String,
    pub policy: DuplicatePolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.into(),
            policy: DuplicatePolicy::builtin(),
        }
    }
}

/// Split `"City, ST"` into `("City", "ST")`.
///
/// Only the first `", "` separates; the state part must be non-empty and
/// comma-free.
pub fn split_composite_name(name: &str) -> Option<(&str, &str)> {
    let (city, state) = name.split_once(", ")?;
    let (city, state) = (city.trim(), state.trim());
    if city.is_empty() || state.is_empty() || state.contains(',') {
        return None;
    }
    Some((city, state))
}

/// Region key for a city: its lowercase form.
pub fn region_key(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Build the canonical region map from the primary rows, attaching the
/// secondary row at the same index when there is one.
///
/// Single pass over the primary table in source order.
pub fn reconcile(
    primary: &NormalizedTable,
    secondary: Option<&NormalizedTable>,
    options: &ReconcileOptions,
) -> ReconciliationResult {
    let secondary_len = secondary.map(|t| t.len()).unwrap_or(0);
    let mut result = ReconciliationResult::default();

    for row in &primary.rows {
        if row.region_name == options.sentinel {
            result.skipped_rows += 1;
            continue;
        }
        let Some((city, state)) = split_composite_name(&row.region_name) else {
            log::warn!(
                "{}, row {}: cannot split region name '{}' into city and state",
                primary.name,
                row.index,
                row.region_name
            );
            result.skipped_rows += 1;
            continue;
        };
        let key = region_key(city);

        match result.regions.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(build_region(&key, state, row, secondary, secondary_len));
                result.order.push(key);
            }
            Entry::Occupied(mut slot) => {
                let existing_state = slot.get().state.clone();
                log::warn!("{key} already exists! new: {state}, existing: {existing_state}");
                result.duplicate_keys.insert(key.clone());

                let resolution = options.policy.resolve(&key, state);
                if resolution == Resolution::Overwrite {
                    slot.insert(build_region(&key, state, row, secondary, secondary_len));
                } else {
                    log::debug!("{key}: keeping {existing_state}, discarding row {}", row.index);
                }

                result.collisions.push(Collision {
                    key,
                    incoming_state: state.to_string(),
                    existing_state,
                    row_index: row.index,
                    resolution,
                });
            }
        }
    }

    result
}

fn build_region(
    key: &str,
    state: &str,
    row: &NormalizedRow,
    secondary: Option<&NormalizedTable>,
    secondary_len: usize,
) -> CanonicalRegion {
    let secondary_series = secondary_index(row.index, secondary_len)
        .and_then(|i| secondary.and_then(|t| t.row(i)))
        .map(|r| r.series.clone());
    let derived_series = price_to_rent(Some(&row.series), secondary_series.as_ref());

    CanonicalRegion {
        key: key.to_string(),
        state: state.to_string(),
        size_rank: row.size_rank,
        region_id: row.region_id,
        row_index: row.index,
        primary_series: row.series.clone(),
        secondary_series,
        derived_series,
    }
}
