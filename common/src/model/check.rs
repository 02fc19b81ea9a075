use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::template::CheckFrequency;

/// Outcome of a performed check, derived from how many items were ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Partial,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "passed",
            CheckStatus::Partial => "partial",
            CheckStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<CheckStatus> {
        match s {
            "passed" => Some(CheckStatus::Passed),
            "partial" => Some(CheckStatus::Partial),
            "failed" => Some(CheckStatus::Failed),
            _ => None,
        }
    }
}

/// One performed safety check. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub id: String,
    pub owner_id: String,
    pub ride_id: String,
    pub template_id: String,
    pub frequency: CheckFrequency,
    pub check_date: DateTime<Utc>,
    pub inspector_name: String,
    pub notes: Option<String>,
    pub status: CheckStatus,
    pub weather: Option<String>,
    pub compliance_officer: Option<String>,
    /// Base64 PNG of the inspector's signature, when captured.
    pub signature: Option<String>,
    pub environment_notes: Option<String>,
}

/// Per-item outcome captured at submission time.
///
/// `item_text` is copied from the template item so history survives later
/// template edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_id: String,
    pub template_item_id: String,
    pub item_text: String,
    pub is_checked: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckWithResults {
    pub check: Check,
    pub results: Vec<CheckResult>,
}

/// Aggregate counters over a set of checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStats {
    pub total: u32,
    pub passed: u32,
    pub partial: u32,
    pub failed: u32,
    /// Rounded percentage of passed checks, 0 when there are none.
    pub pass_rate: u32,
    pub months: Vec<MonthlyCheckStats>,
}

/// Counters for one calendar month of check dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCheckStats {
    pub year: i32,
    pub month: u32,
    pub total: u32,
    pub passed: u32,
    pub pass_rate: u32,
}

/// Advisory usage summary shown before destructive template actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateUsage {
    pub check_count: u32,
    pub earliest_check: Option<DateTime<Utc>>,
    pub latest_check: Option<DateTime<Utc>>,
}
