/// Errors raised while reading or normalizing a source table.
///
/// All variants are fatal at startup: the pipeline never runs on a partially
/// loaded dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("{table}: source unavailable ({path}): {reason}")]
    SourceUnavailable {
        table: String,
        path: String,
        reason: String,
    },
    /// A required administrative column is absent from the header.
    #[error("{table}: missing column '{column}'")]
    SchemaMismatch { table: String, column: String },
    /// A cell could not be parsed as the type its column requires.
    #[error("{table}, row {row}: cannot parse '{value}' in column '{column}'")]
    MalformedValue {
        table: String,
        row: usize,
        column: String,
        value: String,
    },
    /// A surviving column label is not a calendar period.
    #[error("{table}: invalid period label '{label}'")]
    InvalidPeriodLabel { table: String, label: String },
    /// Two columns normalize to the same period.
    #[error("{table}: period '{period}' appears in more than one column")]
    DuplicatePeriod { table: String, period: String },
    /// CSV framing error (ragged row, bad quoting).
    #[error("{table}: CSV error: {reason}")]
    Csv { table: String, reason: String },
}

impl LoadError {
    /// Name of the table the error refers to.
    pub fn table(&self) -> &str {
        match self {
            Self::SourceUnavailable { table, .. }
            | Self::SchemaMismatch { table, .. }
            | Self::MalformedValue { table, .. }
            | Self::InvalidPeriodLabel { table, .. }
            | Self::DuplicatePeriod { table, .. }
            | Self::Csv { table, .. } => table,
        }
    }
}
