//! Validation rule-set configuration.
//!
//! The project-name allow-list is deployment data, not code: it ships with
//! built-in defaults and can be overridden per deployment by a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RulesResult;

/// Namespace whose batches update existing projects and must therefore
/// reference project names already known to the system.
pub const UPDATE_RECORDS_NAMESPACE: &str = "Update Records";

/// Injected configuration for namespace-conditional rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Project names that already exist in the target system.
    pub valid_project_names: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            valid_project_names: vec![
                "Project A".to_string(),
                "Project B".to_string(),
                "Project C".to_string(),
            ],
        }
    }
}

impl RuleSet {
    /// Load a rule-set from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> RulesResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the rule-set as pretty JSON, for per-deployment editing.
    pub fn save(&self, path: impl AsRef<Path>) -> RulesResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// True if the project name already exists in the target system.
    pub fn is_known_project(&self, name: &str) -> bool {
        self.valid_project_names.iter().any(|n| n == name)
    }
}
