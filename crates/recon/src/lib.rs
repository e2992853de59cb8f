//! `rentratio-recon`: region reconciliation and derived metrics.
//!
//! Pure engine crate: receives normalized tables, returns the canonical
//! region map. No CLI or file IO.

pub mod alignment;
pub mod derived;
pub mod engine;
pub mod model;
pub mod policy;

pub use alignment::{check_alignment, Misalignment};
pub use derived::price_to_rent;
pub use engine::{reconcile, ReconcileOptions, DEFAULT_SENTINEL};
pub use model::{CanonicalRegion, Collision, ReconSummary, ReconciliationResult, Resolution, SeriesKind};
pub use policy::{DuplicatePolicy, DuplicateRule};
