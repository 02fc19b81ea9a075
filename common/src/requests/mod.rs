use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::template::{CheckFrequency, ItemCategory};

/// Payload for `POST /api/templates/save`. With `id` set the named template
/// is renamed and its items replaced wholesale; without it a new inactive
/// template is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTemplateRequest {
    pub id: Option<String>,
    pub owner_id: String,
    pub ride_id: String,
    pub name: String,
    pub frequency: CheckFrequency,
    pub items: Vec<SaveTemplateItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTemplateItem {
    pub text: String,
    pub category: ItemCategory,
    pub is_required: bool,
}

/// Payload for `POST /api/checks/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCheckRequest {
    pub owner_id: String,
    pub ride_id: String,
    pub template_id: String,
    pub frequency: CheckFrequency,
    pub inspector_name: String,
    /// Defaults to the submission time when absent.
    pub check_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub weather: Option<String>,
    pub compliance_officer: Option<String>,
    pub signature: Option<String>,
    pub environment_notes: Option<String>,
    /// When true every item flagged required must be checked (the daily
    /// check path). The generic path accepts partial completion.
    #[serde(default)]
    pub enforce_required: bool,
    /// Items omitted here are recorded as unchecked.
    pub items: Vec<SubmittedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedItem {
    pub template_item_id: String,
    pub is_checked: bool,
    pub notes: Option<String>,
}

/// Payload for `POST /api/reports/pdf`: render every check in the date
/// range (or all of them) into one PDF, one page per check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfExportRequest {
    pub owner_id: String,
    pub ride_id: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Payload for `POST /api/reports/email`. Field names match the dispatch
/// function's JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailReportRequest {
    pub owner_id: String,
    pub check_ids: Vec<String>,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
}

/// Payload for ride create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRideRequest {
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub category: String,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub year: Option<i32>,
    pub notes: Option<String>,
}

fn default_notice_days() -> u32 {
    30
}

/// Payload for inspection schedule create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveInspectionRequest {
    pub id: Option<String>,
    pub owner_id: String,
    pub ride_id: String,
    pub inspection_type: String,
    pub inspector: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default = "default_notice_days")]
    pub advance_notice_days: u32,
    pub notes: Option<String>,
}

/// Payload for NDT schedule create/update. The due date is not accepted
/// here; it is derived from `last_inspection_date + frequency_months`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveNdtRequest {
    pub id: Option<String>,
    pub owner_id: String,
    pub ride_id: String,
    pub component: String,
    pub method: String,
    pub last_inspection_date: NaiveDate,
    pub frequency_months: u32,
    #[serde(default = "default_notice_days")]
    pub advance_notice_days: u32,
    pub notes: Option<String>,
}

/// Payload for maintenance record create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMaintenanceRequest {
    pub id: Option<String>,
    pub owner_id: String,
    pub ride_id: String,
    pub title: String,
    pub description: Option<String>,
    pub performed_date: NaiveDate,
    pub performed_by: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub next_due_date: Option<NaiveDate>,
    #[serde(default = "default_notice_days")]
    pub advance_notice_days: u32,
}

/// Metadata part of a document upload (the `json` multipart field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub owner_id: String,
    pub ride_id: String,
    pub category: String,
    pub filename: String,
}
