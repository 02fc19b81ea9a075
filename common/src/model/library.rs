use serde::{Deserialize, Serialize};

use crate::model::template::{CheckFrequency, ItemCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<RiskLevel> {
        match s {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// A reusable check item from the seeded catalog. Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: String,
    pub text: String,
    pub frequency: CheckFrequency,
    /// `Generic` or `RideSpecific(<ride category>)`.
    pub category: ItemCategory,
    pub hint: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub is_required: bool,
    pub is_active: bool,
    pub sort_index: u32,
}
