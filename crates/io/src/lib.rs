//! `rentratio-io`: source loading for the home value (ZHVI) and rental (ZORI)
//! index tables.
//!
//! [`table`] turns CSV text into typed rows; [`normalize`] drops the
//! administrative columns and maps every remaining column onto a shared
//! [`Period`] vocabulary.

pub mod error;
pub mod normalize;
pub mod period;
pub mod table;

pub use error::LoadError;
pub use normalize::{normalize, normalize_table, NormalizedRow, NormalizedTable};
pub use period::{Period, Series};
pub use table::{load_table, parse_table, RawRow, RawTable, SourceSchema};

use std::path::Path;

/// Load and normalize one source in a single step.
pub fn load_normalized(path: &Path, schema: &SourceSchema) -> Result<NormalizedTable, LoadError> {
    let raw = load_table(path, schema)?;
    normalize_table(&raw, schema)
}
