use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a dated record stands relative to today and its notice window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    Current,
    DueSoon,
    Overdue,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Current => "current",
            ScheduleStatus::DueSoon => "due-soon",
            ScheduleStatus::Overdue => "overdue",
        }
    }
}

/// An external inspection (e.g. ADIPS) booked against a ride.
/// Soft-deleted: rows are kept with `is_active = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionSchedule {
    pub id: String,
    pub owner_id: String,
    pub ride_id: String,
    pub inspection_type: String,
    pub inspector: Option<String>,
    pub due_date: NaiveDate,
    pub advance_notice_days: u32,
    pub notes: Option<String>,
    pub is_active: bool,
    pub status: ScheduleStatus,
}

/// A recurring NDT requirement. The due date is derived from the last
/// inspection date plus the frequency in calendar months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdtSchedule {
    pub id: String,
    pub owner_id: String,
    pub ride_id: String,
    pub component: String,
    pub method: String,
    pub last_inspection_date: NaiveDate,
    pub frequency_months: u32,
    pub advance_notice_days: u32,
    pub notes: Option<String>,
    pub due_date: NaiveDate,
    pub status: ScheduleStatus,
}

/// A logged maintenance activity, optionally with a follow-up due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,
    pub owner_id: String,
    pub ride_id: String,
    pub title: String,
    pub description: Option<String>,
    pub performed_date: NaiveDate,
    pub performed_by: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub next_due_date: Option<NaiveDate>,
    pub advance_notice_days: u32,
    /// Only present when `next_due_date` is set.
    pub status: Option<ScheduleStatus>,
}
