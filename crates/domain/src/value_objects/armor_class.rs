//! Armor class with its contributing sources

use serde::{Deserialize, Serialize};

/// Armor class as printed in a stat block, e.g. `19 (natural armor)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorClass {
    pub value: i32,
    /// What the value is derived from ("natural armor", "plate", "shield").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<String>,
    /// Condition under which this value applies ("with mage armor").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl ArmorClass {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            from: Vec::new(),
            condition: None,
        }
    }

    pub fn with_from(mut self, from: Vec<String>) -> Self {
        self.from = from;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn is_natural_armor(&self) -> bool {
        self.from
            .iter()
            .any(|f| f.eq_ignore_ascii_case("natural armor"))
    }
}
