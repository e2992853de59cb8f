use std::collections::{BTreeSet, HashMap};

use rentratio_io::Series;

// ---------------------------------------------------------------------------
// Canonical region
// ---------------------------------------------------------------------------

/// Which of a region's three series to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesKind {
    /// Home value index (primary source).
    Primary,
    /// Rental index (secondary source), positionally aligned.
    Secondary,
    /// Price-to-rent: primary / secondary / 12.
    Derived,
}

/// The reconciled unit of record for one region key.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRegion {
    /// Lowercase city name. Not unique across states.
    pub key: String,
    /// State code of the retained row.
    pub state: String,
    pub size_rank: u32,
    pub region_id: u64,
    /// Primary-source row index of the retained row.
    pub row_index: usize,
    pub primary_series: Series,
    pub secondary_series: Option<Series>,
    pub derived_series: Option<Series>,
}

impl CanonicalRegion {
    pub fn series(&self, kind: SeriesKind) -> Option<&Series> {
        match kind {
            SeriesKind::Primary => Some(&self.primary_series),
            SeriesKind::Secondary => self.secondary_series.as_ref(),
            SeriesKind::Derived => self.derived_series.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Collisions
// ---------------------------------------------------------------------------

/// Outcome of a duplicate-key collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The colliding row was discarded.
    KeepExisting,
    /// The colliding row replaced the existing entry.
    Overwrite,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeepExisting => write!(f, "keep_existing"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// One detected duplicate key, in detection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub key: String,
    pub incoming_state: String,
    pub existing_state: String,
    /// Primary row index of the incoming row.
    pub row_index: usize,
    pub resolution: Resolution,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Everything reconciliation produces. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    pub regions: HashMap<String, CanonicalRegion>,
    /// Keys in first-seen order.
    pub order: Vec<String>,
    pub duplicate_keys: BTreeSet<String>,
    pub collisions: Vec<Collision>,
    /// Sentinel and unsplittable rows.
    pub skipped_rows: usize,
}

impl ReconciliationResult {
    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&CanonicalRegion> {
        self.regions.get(&key.trim().to_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_duplicate(&self, key: &str) -> bool {
        self.duplicate_keys.contains(&key.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalRegion> + '_ {
        self.order.iter().filter_map(|k| self.regions.get(k))
    }

    pub fn summary(&self) -> ReconSummary {
        let with_secondary = self.regions.values().filter(|r| r.secondary_series.is_some()).count();
        let with_derived = self.regions.values().filter(|r| r.derived_series.is_some()).count();
        ReconSummary {
            regions: self.regions.len(),
            with_secondary,
            with_derived,
            duplicate_keys: self.duplicate_keys.len(),
            collisions: self.collisions.len(),
            overwritten: self
                .collisions
                .iter()
                .filter(|c| c.resolution == Resolution::Overwrite)
                .count(),
            skipped_rows: self.skipped_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconSummary {
    pub regions: usize,
    pub with_secondary: usize,
    pub with_derived: usize,
    pub duplicate_keys: usize,
    pub collisions: usize,
    pub overwritten: usize,
    pub skipped_rows: usize,
}
