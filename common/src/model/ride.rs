use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered ride or piece of equipment. Every other record in the
/// system hangs off one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Ride category key (e.g. `coaster`, `inflatable`), used to filter
    /// ride-specific library items.
    pub category: String,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub year: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
