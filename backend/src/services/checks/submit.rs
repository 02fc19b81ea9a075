use actix_web::web;
use chrono::Utc;
use common::model::check::{Check, CheckResult, CheckWithResults};
use common::requests::SubmitCheckRequest;
use log::warn;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::fs;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::checks::status::derive_status;
use crate::services::documents::upload::{filename_component, record_stored_file};
use crate::services::reports::pdf;
use crate::services::rides::load_ride;
use crate::services::templates::list;

pub async fn process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<SubmitCheckRequest>,
) -> impl actix_web::Responder {
    let mut conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match submit_check(&mut conn, &payload) {
        Ok(saved) => {
            // The check is recorded; a failed report snapshot must not
            // undo that.
            if let Err(e) = snapshot_report(&conn, &cfg, &saved) {
                warn!("check {} saved but report snapshot failed: {}", saved.check.id, e);
            }
            actix_web::HttpResponse::Ok().json(saved)
        }
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Record one performed check: validation, canonical status derivation,
/// then the Check row plus one CheckResult per template item in a single
/// transaction. Items the payload does not mention are recorded as
/// unchecked. Result rows copy the item text so later template edits do
/// not orphan history.
pub fn submit_check(
    conn: &mut Connection,
    req: &SubmitCheckRequest,
) -> Result<CheckWithResults, String> {
    if req.inspector_name.trim().is_empty() {
        return Err("Inspector name is required".to_string());
    }

    let template = list::load_template(conn, &req.template_id)?;
    if template.owner_id != req.owner_id || template.ride_id != req.ride_id {
        return Err("Template does not belong to this ride".to_string());
    }

    let mut submitted = HashMap::new();
    for item in &req.items {
        if !template.items.iter().any(|t| t.id == item.template_item_id) {
            return Err(format!("Unknown check item: {}", item.template_item_id));
        }
        submitted.insert(item.template_item_id.as_str(), item);
    }

    if req.enforce_required {
        for item in &template.items {
            let checked = submitted
                .get(item.id.as_str())
                .map(|s| s.is_checked)
                .unwrap_or(false);
            if item.is_required && !checked {
                return Err(format!("Required item not checked: {}", item.text));
            }
        }
    }

    let checked_count = template
        .items
        .iter()
        .filter(|item| {
            submitted
                .get(item.id.as_str())
                .map(|s| s.is_checked)
                .unwrap_or(false)
        })
        .count();
    let status = derive_status(checked_count, template.items.len());

    let check = Check {
        id: Uuid::new_v4().to_string(),
        owner_id: req.owner_id.clone(),
        ride_id: req.ride_id.clone(),
        template_id: req.template_id.clone(),
        frequency: req.frequency,
        check_date: req.check_date.unwrap_or_else(Utc::now),
        inspector_name: req.inspector_name.trim().to_string(),
        notes: req.notes.clone(),
        status,
        weather: req.weather.clone(),
        compliance_officer: req.compliance_officer.clone(),
        signature: req.signature.clone(),
        environment_notes: req.environment_notes.clone(),
    };

    let tx = conn.transaction().map_err(|e| e.to_string())?;
    tx.execute(
        "INSERT INTO checks
         (id, owner_id, ride_id, template_id, frequency, check_date, inspector_name,
          notes, status, weather, compliance_officer, signature, environment_notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            check.id,
            check.owner_id,
            check.ride_id,
            check.template_id,
            check.frequency.as_str(),
            db::datetime_to_sql(&check.check_date),
            check.inspector_name,
            check.notes,
            check.status.as_str(),
            check.weather,
            check.compliance_officer,
            check.signature,
            check.environment_notes
        ],
    )
    .map_err(|e| e.to_string())?;

    let mut results = Vec::with_capacity(template.items.len());
    for item in &template.items {
        let entry = submitted.get(item.id.as_str());
        let result = CheckResult {
            check_id: check.id.clone(),
            template_item_id: item.id.clone(),
            item_text: item.text.clone(),
            is_checked: entry.map(|s| s.is_checked).unwrap_or(false),
            notes: entry.and_then(|s| s.notes.clone()),
        };
        tx.execute(
            "INSERT INTO check_results (check_id, template_item_id, item_text, is_checked, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.check_id,
                result.template_item_id,
                result.item_text,
                result.is_checked,
                result.notes
            ],
        )
        .map_err(|e| e.to_string())?;
        results.push(result);
    }
    tx.commit().map_err(|e| e.to_string())?;

    Ok(CheckWithResults { check, results })
}

/// Best-effort PDF snapshot of a freshly recorded check, registered in the
/// document store under `check-reports`.
fn snapshot_report(
    conn: &Connection,
    cfg: &AppConfig,
    saved: &CheckWithResults,
) -> Result<(), String> {
    let ride = load_ride(conn, &saved.check.ride_id)?;
    let filename = format!(
        "check-report-{}-{}-{}.pdf",
        filename_component(&ride.name),
        saved.check.check_date.format("%Y-%m-%d"),
        &saved.check.id[..8]
    );
    let dir = cfg
        .data_dir
        .join(&saved.check.owner_id)
        .join(&saved.check.ride_id)
        .join("check-reports");
    fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    let path = dir.join(&filename);

    pdf::render_checks_report(
        std::slice::from_ref(saved),
        &ride,
        &cfg.fonts_dir,
        &path,
    )?;
    record_stored_file(
        conn,
        &saved.check.owner_id,
        &saved.check.ride_id,
        "check-reports",
        &filename,
        &path,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::templates::{activate_template, save_template};
    use common::model::check::CheckStatus;
    use common::model::template::{CheckFrequency, ItemCategory, Template};
    use common::requests::{SaveTemplateItem, SaveTemplateRequest, SubmittedItem};

    fn morning_safety(conn: &mut Connection) -> Template {
        let t = save_template(
            conn,
            &SaveTemplateRequest {
                id: None,
                owner_id: "owner-1".to_string(),
                ride_id: "ride-1".to_string(),
                name: "Morning Safety".to_string(),
                frequency: CheckFrequency::Daily,
                items: vec![
                    SaveTemplateItem {
                        text: "Guards secure".to_string(),
                        category: ItemCategory::Library,
                        is_required: true,
                    },
                    SaveTemplateItem {
                        text: "Restraints lock".to_string(),
                        category: ItemCategory::Library,
                        is_required: true,
                    },
                    SaveTemplateItem {
                        text: "E-stop works".to_string(),
                        category: ItemCategory::Library,
                        is_required: true,
                    },
                ],
            },
        )
        .unwrap();
        activate_template(conn, &t.id).unwrap()
    }

    fn request(template: &Template, items: Vec<SubmittedItem>) -> SubmitCheckRequest {
        SubmitCheckRequest {
            owner_id: "owner-1".to_string(),
            ride_id: "ride-1".to_string(),
            template_id: template.id.clone(),
            frequency: CheckFrequency::Daily,
            inspector_name: "J. Smith".to_string(),
            check_date: None,
            notes: None,
            weather: Some("Dry, light wind".to_string()),
            compliance_officer: None,
            signature: None,
            environment_notes: None,
            enforce_required: false,
            items,
        }
    }

    fn ticked(template: &Template, index: usize) -> SubmittedItem {
        SubmittedItem {
            template_item_id: template.items[index].id.clone(),
            is_checked: true,
            notes: None,
        }
    }

    #[test]
    fn two_of_three_checked_is_partial_with_full_result_rows() {
        let mut conn = db::test_conn();
        let template = morning_safety(&mut conn);
        let req = request(&template, vec![ticked(&template, 0), ticked(&template, 1)]);

        let saved = submit_check(&mut conn, &req).unwrap();
        assert_eq!(saved.check.status, CheckStatus::Partial);
        assert_eq!(saved.check.inspector_name, "J. Smith");
        assert_eq!(saved.results.len(), 3);
        assert_eq!(saved.results.iter().filter(|r| r.is_checked).count(), 2);

        // One result row per template item, in the database too.
        let count: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM check_results WHERE check_id = ?1",
                params![saved.check.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn status_covers_all_three_outcomes() {
        let mut conn = db::test_conn();
        let template = morning_safety(&mut conn);

        let none = submit_check(&mut conn, &request(&template, Vec::new())).unwrap();
        assert_eq!(none.check.status, CheckStatus::Failed);

        let all = submit_check(
            &mut conn,
            &request(
                &template,
                vec![
                    ticked(&template, 0),
                    ticked(&template, 1),
                    ticked(&template, 2),
                ],
            ),
        )
        .unwrap();
        assert_eq!(all.check.status, CheckStatus::Passed);
    }

    #[test]
    fn submitted_item_order_does_not_change_the_outcome() {
        let mut conn = db::test_conn();
        let template = morning_safety(&mut conn);

        let forward = submit_check(
            &mut conn,
            &request(&template, vec![ticked(&template, 0), ticked(&template, 2)]),
        )
        .unwrap();
        let reversed = submit_check(
            &mut conn,
            &request(&template, vec![ticked(&template, 2), ticked(&template, 0)]),
        )
        .unwrap();

        assert_eq!(forward.check.status, reversed.check.status);
        assert_eq!(
            forward.results.iter().filter(|r| r.is_checked).count(),
            reversed.results.iter().filter(|r| r.is_checked).count()
        );
    }

    #[test]
    fn enforce_required_rejects_unchecked_required_items() {
        let mut conn = db::test_conn();
        let template = morning_safety(&mut conn);
        let mut req = request(&template, vec![ticked(&template, 0)]);
        req.enforce_required = true;
        let err = submit_check(&mut conn, &req).unwrap_err();
        assert!(err.contains("Required item not checked"));

        // Nothing was written.
        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM checks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn missing_inspector_and_unknown_items_are_rejected() {
        let mut conn = db::test_conn();
        let template = morning_safety(&mut conn);

        let mut req = request(&template, Vec::new());
        req.inspector_name = "  ".to_string();
        assert!(submit_check(&mut conn, &req).is_err());

        let req = request(
            &template,
            vec![SubmittedItem {
                template_item_id: "not-an-item".to_string(),
                is_checked: true,
                notes: None,
            }],
        );
        assert!(submit_check(&mut conn, &req).is_err());
    }
}
