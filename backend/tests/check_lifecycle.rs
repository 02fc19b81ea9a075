//! The full check lifecycle driven through the service layer: build and
//! activate a template, perform a check against it, then read the history,
//! statistics and CSV export back.

use backend::db;
use backend::services::checks::history::{list_checks, HistoryFilter};
use backend::services::checks::{active_template, checks_to_csv, compute_stats, submit_check};
use backend::services::rides::save_ride;
use backend::services::templates::{
    activate_template, archive_template, duplicate_template, save_template, template_usage,
};
use common::model::check::CheckStatus;
use common::model::template::{CheckFrequency, ItemCategory, Template};
use common::requests::{
    SaveRideRequest, SaveTemplateItem, SaveTemplateRequest, SubmitCheckRequest, SubmittedItem,
};
use rusqlite::Connection;

fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::init(&conn).expect("schema init");
    conn
}

fn setup_ride(conn: &Connection) -> String {
    save_ride(
        conn,
        &SaveRideRequest {
            id: None,
            owner_id: "owner-1".to_string(),
            name: "Wild Mouse".to_string(),
            category: "coaster".to_string(),
            manufacturer: Some("Zierer".to_string()),
            serial_number: Some("WM-1987-04".to_string()),
            year: Some(1987),
            notes: None,
        },
    )
    .unwrap()
    .id
}

fn morning_safety(conn: &mut Connection, ride_id: &str) -> Template {
    let template = save_template(
        conn,
        &SaveTemplateRequest {
            id: None,
            owner_id: "owner-1".to_string(),
            ride_id: ride_id.to_string(),
            name: "Morning Safety".to_string(),
            frequency: CheckFrequency::Daily,
            items: ["Guards secure", "Restraints lock", "E-stop works"]
                .into_iter()
                .map(|text| SaveTemplateItem {
                    text: text.to_string(),
                    category: ItemCategory::Library,
                    is_required: true,
                })
                .collect(),
        },
    )
    .unwrap();
    activate_template(conn, &template.id).unwrap()
}

fn submit_two_of_three(conn: &mut Connection, ride_id: &str, template: &Template) {
    submit_check(
        conn,
        &SubmitCheckRequest {
            owner_id: "owner-1".to_string(),
            ride_id: ride_id.to_string(),
            template_id: template.id.clone(),
            frequency: CheckFrequency::Daily,
            inspector_name: "J. Smith".to_string(),
            check_date: None,
            notes: Some("restraint 3 sticking".to_string()),
            weather: Some("Dry".to_string()),
            compliance_officer: None,
            signature: None,
            environment_notes: None,
            enforce_required: false,
            items: template.items[..2]
                .iter()
                .map(|item| SubmittedItem {
                    template_item_id: item.id.clone(),
                    is_checked: true,
                    notes: None,
                })
                .collect(),
        },
    )
    .unwrap();
}

#[test]
fn morning_safety_scenario() {
    let mut conn = test_conn();
    let ride_id = setup_ride(&conn);
    let template = morning_safety(&mut conn, &ride_id);
    submit_two_of_three(&mut conn, &ride_id, &template);

    let history = list_checks(&conn, "owner-1", &ride_id, &HistoryFilter::default()).unwrap();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.check.status, CheckStatus::Partial);
    assert_eq!(entry.check.inspector_name, "J. Smith");
    assert_eq!(entry.results.len(), 3);
    assert_eq!(entry.results.iter().filter(|r| r.is_checked).count(), 2);
    assert_eq!(entry.results.iter().filter(|r| !r.is_checked).count(), 1);

    let stats = compute_stats(&conn, "owner-1", &ride_id, &HistoryFilter::default()).unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.partial, 1);
    assert_eq!(stats.pass_rate, 0);
    assert_eq!(stats.months.len(), 1);

    let csv_text = checks_to_csv(&history).unwrap();
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][2], "J. Smith");
    assert_eq!(&rows[0][3], "partial");
}

#[test]
fn exactly_one_template_active_per_scope() {
    let mut conn = test_conn();
    let ride_id = setup_ride(&conn);
    let first = morning_safety(&mut conn, &ride_id);
    let copy = duplicate_template(&mut conn, &first.id).unwrap();
    assert!(!copy.is_active);

    let copy = activate_template(&mut conn, &copy.id).unwrap();
    assert!(copy.is_active);

    let active = active_template(&conn, "owner-1", &ride_id, CheckFrequency::Daily)
        .unwrap()
        .expect("an active template");
    assert_eq!(active.id, copy.id);

    let active_count: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM templates WHERE is_active = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(active_count, 1);
}

#[test]
fn archiving_the_active_template_leaves_no_template_to_check_against() {
    let mut conn = test_conn();
    let ride_id = setup_ride(&conn);
    let template = morning_safety(&mut conn, &ride_id);

    archive_template(&conn, &template.id).unwrap();
    assert!(
        active_template(&conn, "owner-1", &ride_id, CheckFrequency::Daily)
            .unwrap()
            .is_none()
    );
}

#[test]
fn history_survives_template_edits_and_usage_is_reported() {
    let mut conn = test_conn();
    let ride_id = setup_ride(&conn);
    let template = morning_safety(&mut conn, &ride_id);
    submit_two_of_three(&mut conn, &ride_id, &template);

    let usage = template_usage(&conn, &template.id).unwrap();
    assert_eq!(usage.check_count, 1);
    assert!(usage.earliest_check.is_some());

    // Replace the items wholesale; the recorded check keeps its own copy
    // of the item texts.
    save_template(
        &mut conn,
        &SaveTemplateRequest {
            id: Some(template.id.clone()),
            owner_id: "owner-1".to_string(),
            ride_id: ride_id.clone(),
            name: "Morning Safety v2".to_string(),
            frequency: CheckFrequency::Daily,
            items: vec![SaveTemplateItem {
                text: "Completely new item".to_string(),
                category: ItemCategory::Custom,
                is_required: true,
            }],
        },
    )
    .unwrap();

    let history = list_checks(&conn, "owner-1", &ride_id, &HistoryFilter::default()).unwrap();
    assert_eq!(history[0].results.len(), 3);
    assert!(history[0]
        .results
        .iter()
        .any(|r| r.item_text == "Guards secure"));
}
