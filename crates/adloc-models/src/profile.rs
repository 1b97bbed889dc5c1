//! Audience profile rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One row of an imported audience profile table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudienceProfile {
    /// Kept as text; never interpreted numerically
    pub age: String,
    pub gender: String,
    pub demographic_info: String,
    pub search_history: String,
}

impl AudienceProfile {
    pub fn new(
        age: impl Into<String>,
        gender: impl Into<String>,
        demographic_info: impl Into<String>,
        search_history: impl Into<String>,
    ) -> Self {
        Self {
            age: age.into(),
            gender: gender.into(),
            demographic_info: demographic_info.into(),
            search_history: search_history.into(),
        }
    }

    /// Short one-line preview (`age, gender, demographic`).
    pub fn preview(&self) -> String {
        [self.age.as_str(), self.gender.as_str(), self.demographic_info.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}
