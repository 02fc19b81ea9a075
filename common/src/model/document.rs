use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored regulatory document or generated report.
///
/// The file lives on disk under `{owner_id}/{ride_id}/{category}/{filename}`
/// inside the configured data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub owner_id: String,
    pub ride_id: String,
    /// Document category, e.g. `certificates`, `insurance`, `manuals`,
    /// `check-reports`.
    pub category: String,
    pub filename: String,
    pub content_md5: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Outbox record for a report email handed to the external sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDispatch {
    pub id: String,
    pub owner_id: String,
    pub check_ids: Vec<String>,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub pdf_path: String,
    pub created_at: DateTime<Utc>,
}
