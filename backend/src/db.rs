//! SQLite access: schema, connection opening and the seeded check item
//! library.
//!
//! Connections are opened per operation and dropped when the handler
//! finishes. Multi-step writes (template activation, item replacement,
//! check submission, duplication) run inside explicit transactions so a
//! failing step never leaves partial state behind.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use std::path::Path;

/// Schema applied at startup. Every statement is idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS rides (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    manufacturer TEXT,
    serial_number TEXT,
    year INTEGER,
    notes TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS library_items (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    frequency TEXT NOT NULL,
    category TEXT NOT NULL,
    hint TEXT,
    risk_level TEXT,
    is_required INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    sort_index INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS templates (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    ride_id TEXT NOT NULL,
    name TEXT NOT NULL,
    frequency TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0,
    is_archived INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_templates_scope
    ON templates(owner_id, ride_id, frequency);

CREATE TABLE IF NOT EXISTS template_items (
    id TEXT PRIMARY KEY,
    template_id TEXT NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
    text TEXT NOT NULL,
    category TEXT NOT NULL,
    is_required INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_template_items_template
    ON template_items(template_id);

CREATE TABLE IF NOT EXISTS checks (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    ride_id TEXT NOT NULL,
    template_id TEXT NOT NULL,
    frequency TEXT NOT NULL,
    check_date TEXT NOT NULL,
    inspector_name TEXT NOT NULL,
    notes TEXT,
    status TEXT NOT NULL,
    weather TEXT,
    compliance_officer TEXT,
    signature TEXT,
    environment_notes TEXT
);
CREATE INDEX IF NOT EXISTS idx_checks_scope
    ON checks(owner_id, ride_id, check_date);

CREATE TABLE IF NOT EXISTS check_results (
    check_id TEXT NOT NULL REFERENCES checks(id) ON DELETE CASCADE,
    template_item_id TEXT NOT NULL,
    item_text TEXT NOT NULL,
    is_checked INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    PRIMARY KEY (check_id, template_item_id)
);

CREATE TABLE IF NOT EXISTS inspection_schedules (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    ride_id TEXT NOT NULL,
    inspection_type TEXT NOT NULL,
    inspector TEXT,
    due_date TEXT NOT NULL,
    advance_notice_days INTEGER NOT NULL DEFAULT 30,
    notes TEXT,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS ndt_schedules (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    ride_id TEXT NOT NULL,
    component TEXT NOT NULL,
    method TEXT NOT NULL,
    last_inspection_date TEXT NOT NULL,
    frequency_months INTEGER NOT NULL,
    advance_notice_days INTEGER NOT NULL DEFAULT 30,
    notes TEXT
);

CREATE TABLE IF NOT EXISTS maintenance_records (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    ride_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    performed_date TEXT NOT NULL,
    performed_by TEXT,
    category TEXT,
    cost REAL,
    next_due_date TEXT,
    advance_notice_days INTEGER NOT NULL DEFAULT 30
);

CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    ride_id TEXT NOT NULL,
    category TEXT NOT NULL,
    filename TEXT NOT NULL,
    content_md5 TEXT NOT NULL,
    size_bytes INTEGER NOT NULL,
    uploaded_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_scope
    ON documents(owner_id, ride_id);

CREATE TABLE IF NOT EXISTS email_dispatches (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    check_ids TEXT NOT NULL,
    recipient_email TEXT NOT NULL,
    recipient_name TEXT,
    pdf_path TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Seeded check item library: (id, text, frequency, category tag, hint,
/// risk level, is_required, sort_index). Read-only after seeding.
const LIBRARY_SEED: &[(&str, &str, &str, &str, Option<&str>, Option<&str>, bool, u32)] = &[
    ("lib-001", "All guards and fences secure and undamaged", "daily", "generic",
     Some("Walk the full perimeter"), Some("high"), true, 0),
    ("lib-002", "Passenger restraints close, lock and release correctly", "daily", "generic",
     Some("Test every position"), Some("high"), true, 1),
    ("lib-003", "Emergency stop cuts power from every operating position", "daily", "generic",
     None, Some("high"), true, 2),
    ("lib-004", "Entrance and exit gates operate and latch", "daily", "generic",
     None, Some("medium"), true, 3),
    ("lib-005", "Ride area clear of debris and trip hazards", "daily", "generic",
     None, Some("low"), false, 4),
    ("lib-006", "Signage legible and correctly displayed", "daily", "generic",
     Some("Height/rider restriction boards included"), Some("low"), false, 5),
    ("lib-007", "No visible hydraulic or pneumatic leaks", "daily", "generic",
     None, Some("medium"), true, 6),
    ("lib-008", "Electrical cabinets closed and cables protected", "daily", "generic",
     None, Some("medium"), true, 7),
    ("lib-010", "Restraint locking checked on empty test cycle", "preuse", "generic",
     Some("Run at least one full cycle"), Some("high"), true, 0),
    ("lib-011", "Communication between operator and attendants working", "preuse", "generic",
     None, Some("medium"), true, 1),
    ("lib-012", "Weather within the ride's operating limits", "preuse", "generic",
     Some("Check wind speed for high rides"), Some("medium"), true, 2),
    ("lib-020", "Structural bolts checked for torque marks", "monthly", "generic",
     Some("Spot-check marked fasteners"), Some("high"), true, 0),
    ("lib-021", "Wear parts measured against manufacturer limits", "monthly", "generic",
     None, Some("medium"), true, 1),
    ("lib-022", "Bearings greased per the maintenance manual", "monthly", "generic",
     None, Some("low"), false, 2),
    ("lib-030", "Full structural examination completed", "yearly", "generic",
     Some("Record in the ride logbook"), Some("high"), true, 0),
    ("lib-031", "Electrical installation inspection in date", "yearly", "generic",
     None, Some("high"), true, 1),
    ("lib-040", "Track sections aligned and locking pins seated", "daily", "ride:coaster",
     None, Some("high"), true, 8),
    ("lib-041", "Chain lift and anti-rollback devices engage", "daily", "ride:coaster",
     None, Some("high"), true, 9),
    ("lib-050", "Blower output and internal pressure correct", "daily", "ride:inflatable",
     Some("Check for sagging walls"), Some("high"), true, 8),
    ("lib-051", "Anchor points all attached and staked", "daily", "ride:inflatable",
     None, Some("high"), true, 9),
];

/// Open the database, enabling foreign key enforcement.
pub fn open(path: &Path) -> Result<Connection, String> {
    let conn = Connection::open(path).map_err(|e| e.to_string())?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| e.to_string())?;
    Ok(conn)
}

/// Apply the schema and seed the check item library. Safe to run on every
/// startup.
pub fn init(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;
    seed_library(conn)
}

fn seed_library(conn: &Connection) -> Result<(), String> {
    let mut stmt = conn
        .prepare(
            "INSERT OR IGNORE INTO library_items
             (id, text, frequency, category, hint, risk_level, is_required, is_active, sort_index)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
        )
        .map_err(|e| e.to_string())?;
    for (id, text, frequency, category, hint, risk, required, sort) in LIBRARY_SEED {
        stmt.execute(rusqlite::params![
            id, text, frequency, category, hint, risk, required, sort
        ])
        .map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Timestamps are stored as RFC 3339 text.
pub fn datetime_to_sql(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp '{}': {}", s, e))
}

/// Calendar dates are stored as `yyyy-MM-dd` text.
pub fn date_to_sql(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("bad date '{}': {}", s, e))
}

#[cfg(test)]
pub(crate) fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    init(&conn).expect("schema init");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = test_conn();
        init(&conn).expect("second init");
        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM library_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count as usize, LIBRARY_SEED.len());
    }

    #[test]
    fn date_helpers_round_trip() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(parse_date(&date_to_sql(&d)).unwrap(), d);
        let dt = Utc::now();
        assert_eq!(parse_datetime(&datetime_to_sql(&dt)).unwrap(), dt);
    }
}
