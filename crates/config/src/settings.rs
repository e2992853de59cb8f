// Analyzer settings
// Loaded from rentratio.toml (or --config); every section has a default.

use std::fs;
use std::path::{Path, PathBuf};

use rentratio_io::table::{REGION_ID, REGION_NAME, SIZE_RANK};
use rentratio_io::SourceSchema;
use rentratio_recon::policy::builtin_rules;
use rentratio_recon::{DuplicatePolicy, DuplicateRule, ReconcileOptions, DEFAULT_SENTINEL};
use serde::Deserialize;

use crate::error::ConfigError;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rentratio.toml";

pub const DEFAULT_ZHVI_PATH: &str = "data/zhvi_dec_2021.csv";
pub const DEFAULT_ZORI_PATH: &str = "data/zori_dec_2021.csv";

/// Cities plotted by the `D` command.
pub const DEFAULT_REGIONS: &[&str] = &["austin", "tampa", "columbus", "phoenix", "raleigh"];

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// One input table. A `[primary]` or `[secondary]` table replaces the
/// default as a whole, so `path` and `admin_columns` are both required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub admin_columns: Vec<String>,
    /// Characters stripped from the end of each period label.
    #[serde(default)]
    pub period_suffix_len: usize,
}

impl SourceConfig {
    fn from_schema(path: &str, schema: SourceSchema) -> Self {
        Self {
            path: PathBuf::from(path),
            admin_columns: schema.admin_columns,
            period_suffix_len: schema.period_suffix_len,
        }
    }

    pub fn schema(&self, name: &str) -> SourceSchema {
        SourceSchema {
            name: name.to_string(),
            admin_columns: self.admin_columns.clone(),
            period_suffix_len: self.period_suffix_len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionsConfig {
    /// Composite name of the nation-wide row.
    pub sentinel: String,
    /// Region keys used by the `D` command.
    pub defaults: Vec<String>,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            defaults: DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Y-axis tick spacing per chart panel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelsConfig {
    pub value_tick: f64,
    pub rent_tick: f64,
    pub ratio_tick: f64,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            value_tick: 25_000.0,
            rent_tick: 125.0,
            ratio_tick: 2.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub primary: SourceConfig,
    pub secondary: SourceConfig,
    pub regions: RegionsConfig,
    /// `[[duplicates]]` allow-list. An explicit empty list disables it.
    pub duplicates: Vec<DuplicateRule>,
    pub panels: PanelsConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            primary: SourceConfig::from_schema(DEFAULT_ZHVI_PATH, SourceSchema::zhvi()),
            secondary: SourceConfig::from_schema(DEFAULT_ZORI_PATH, SourceSchema::zori()),
            regions: RegionsConfig::default(),
            duplicates: builtin_rules(),
            panels: PanelsConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. Relative source paths resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_toml(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// `explicit` if given, else `./rentratio.toml` if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        for source in [&mut self.primary, &mut self.secondary] {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, source) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if source.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{name}: path must not be empty")));
            }
            for required in [REGION_NAME, REGION_ID, SIZE_RANK] {
                if !source.admin_columns.iter().any(|c| c == required) {
                    return Err(ConfigError::Validation(format!(
                        "{name}: admin_columns must include '{required}'"
                    )));
                }
            }
        }

        if self.regions.defaults.iter().all(|r| r.trim().is_empty()) {
            return Err(ConfigError::Validation("regions.defaults must not be empty".into()));
        }

        for (i, rule) in self.duplicates.iter().enumerate() {
            let key = rule.key.trim().to_lowercase();
            if key.is_empty() || rule.state.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "duplicates[{i}]: key and state are required"
                )));
            }
            if self.duplicates[..i].iter().any(|r| r.key.trim().to_lowercase() == key) {
                return Err(ConfigError::Validation(format!(
                    "duplicates[{i}]: more than one rule for '{key}'"
                )));
            }
        }

        for (name, tick) in [
            ("value_tick", self.panels.value_tick),
            ("rent_tick", self.panels.rent_tick),
            ("ratio_tick", self.panels.ratio_tick),
        ] {
            if !(tick.is_finite() && tick > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "panels.{name} must be a positive number, got {tick}"
                )));
            }
        }

        Ok(())
    }

    pub fn primary_schema(&self) -> SourceSchema {
        self.primary.schema("zhvi")
    }

    pub fn secondary_schema(&self) -> SourceSchema {
        self.secondary.schema("zori")
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::new(self.duplicates.iter().cloned())
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            sentinel: self.regions.sentinel.clone(),
            policy: self.duplicate_policy(),
        }
    }

    /// Default region list with blanks removed.
    pub fn default_regions(&self) -> Vec<String> {
        self.regions
            .defaults
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
