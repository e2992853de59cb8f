//! Startup pipeline: load both sources, normalize, reconcile.

use log::{debug, info, warn};
use rentratio_config::AnalyzerConfig;
use rentratio_io::{load_normalized, LoadError};
use rentratio_recon::{check_alignment, reconcile, ReconciliationResult};

/// Build the in-memory dataset the session queries. Any load failure is
/// fatal; nothing is partially reconciled.
pub fn load_dataset(config: &AnalyzerConfig) -> Result<ReconciliationResult, LoadError> {
    info!("Processing data...");

    let primary_schema = config.primary_schema();
    let primary = load_normalized(&config.primary.path, &primary_schema)?;
    debug!(
        "{}: {} rows, {} periods from {}",
        primary.name,
        primary.len(),
        primary.periods.len(),
        config.primary.path.display()
    );

    let secondary_schema = config.secondary_schema();
    let secondary = load_normalized(&config.secondary.path, &secondary_schema)?;
    debug!(
        "{}: {} rows, {} periods from {}",
        secondary.name,
        secondary.len(),
        secondary.periods.len(),
        config.secondary.path.display()
    );

    let misaligned = check_alignment(&primary, &secondary);
    if let Some(first) = misaligned.first() {
        warn!(
            "{} rows differ in name between {} and {} at the same index (first at row {}: {:?} vs {:?})",
            misaligned.len(),
            primary.name,
            secondary.name,
            first.index,
            first.primary_name,
            first.secondary_name
        );
    }

    let result = reconcile(&primary, Some(&secondary), &config.reconcile_options());
    let summary = result.summary();
    debug!(
        "{} regions ({} with rent), {} duplicate keys, {} rows skipped",
        summary.regions, summary.with_secondary, summary.duplicate_keys, summary.skipped_rows
    );

    info!("Finished processing data.");
    Ok(result)
}
