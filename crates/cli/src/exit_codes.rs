//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (including `q` and end of input) |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3       | config           | Config file unreadable or invalid        |
//! | 4-5     | load             | Source table errors at startup           |

use rentratio_config::ConfigError;
use rentratio_io::LoadError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - session ended with `q` or end of input.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. the input channel failed).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. Emitted by clap itself.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Config (3)
// =============================================================================

/// Config file could not be read, parsed or validated.
pub const EXIT_CONFIG: u8 = 3;

// =============================================================================
// Load (4-5)
// =============================================================================

/// A source file could not be opened or read.
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 4;

/// A source file was readable but its columns or cells are not as expected.
pub const EXIT_SCHEMA: u8 = 5;

/// Map a ConfigError to its exit code.
pub fn config_exit_code(_err: &ConfigError) -> u8 {
    EXIT_CONFIG
}

/// Map a LoadError to its exit code.
pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::SourceUnavailable { .. } => EXIT_SOURCE_UNAVAILABLE,
        LoadError::SchemaMismatch { .. }
        | LoadError::MalformedValue { .. }
        | LoadError::InvalidPeriodLabel { .. }
        | LoadError::DuplicatePeriod { .. }
        | LoadError::Csv { .. } => EXIT_SCHEMA,
    }
}
