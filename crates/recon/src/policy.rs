//! Duplicate-key allow-list.
//!
//! City names collide across states ("austin" in TX and MN). Each rule pins
//! a key to the state whose row should win; a colliding row from any other
//! state is discarded. Keys without a rule fall through to last-row-wins.

use serde::Deserialize;

use crate::model::Resolution;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DuplicateRule {
    /// Region key (lowercase city).
    pub key: String,
    /// Expected two-letter state code, stored uppercase.
    pub state: String,
}

impl DuplicateRule {
    pub fn new(key: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            key: key.into().trim().to_lowercase(),
            state: state.into().trim().to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicatePolicy {
    rules: Vec<DuplicateRule>,
}

impl DuplicatePolicy {
    pub fn new(rules: impl IntoIterator<Item = DuplicateRule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|r| DuplicateRule::new(r.key, r.state))
                .collect(),
        }
    }

    /// The shipped rules: austin/TX, columbus/OH, dayton/OH.
    pub fn builtin() -> Self {
        Self::new(builtin_rules())
    }

    pub fn rules(&self) -> &[DuplicateRule] {
        &self.rules
    }

    pub fn rule_for(&self, key: &str) -> Option<&DuplicateRule> {
        self.rules.iter().find(|r| r.key == key)
    }

    /// Decide what a colliding row for `key` from `incoming_state` does.
    pub fn resolve(&self, key: &str, incoming_state: &str) -> Resolution {
        match self.rule_for(key) {
            Some(rule) if !rule.state.eq_ignore_ascii_case(incoming_state.trim()) => Resolution::KeepExisting,
            _ => Resolution::Overwrite,
        }
    }
}

pub fn builtin_rules() -> Vec<DuplicateRule> {
    vec![
        DuplicateRule::new("austin", "TX"),
        DuplicateRule::new("columbus", "OH"),
        DuplicateRule::new("dayton", "OH"),
    ]
}
