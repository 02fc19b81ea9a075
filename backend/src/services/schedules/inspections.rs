use actix_web::web;
use chrono::Utc;
use common::model::schedule::InspectionSchedule;
use common::requests::SaveInspectionRequest;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::schedules::status::{schedule_status, validate_notice_days};

pub async fn save_process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveInspectionRequest>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match save_inspection(&conn, &payload) {
        Ok(schedule) => actix_web::HttpResponse::Ok().json(schedule),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

pub async fn list_process(
    cfg: web::Data<AppConfig>,
    path: web::Path<(String, String)>,
) -> impl actix_web::Responder {
    let (owner_id, ride_id) = path.into_inner();
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match list_inspections(&conn, &owner_id, &ride_id) {
        Ok(schedules) => actix_web::HttpResponse::Ok().json(schedules),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

pub async fn delete_process(
    cfg: web::Data<AppConfig>,
    id: web::Path<String>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match deactivate_inspection(&conn, &id) {
        Ok(()) => actix_web::HttpResponse::Ok().body("Inspection schedule removed"),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Create or update an inspection booking. The due date is direct input.
pub fn save_inspection(
    conn: &Connection,
    req: &SaveInspectionRequest,
) -> Result<InspectionSchedule, String> {
    if req.inspection_type.trim().is_empty() {
        return Err("Inspection type must not be empty".to_string());
    }
    validate_notice_days(req.advance_notice_days)?;

    let id = match &req.id {
        Some(id) => {
            let updated = conn
                .execute(
                    "UPDATE inspection_schedules
                     SET inspection_type = ?1, inspector = ?2, due_date = ?3,
                         advance_notice_days = ?4, notes = ?5
                     WHERE id = ?6 AND owner_id = ?7 AND is_active = 1",
                    params![
                        req.inspection_type.trim(),
                        req.inspector,
                        db::date_to_sql(&req.due_date),
                        req.advance_notice_days,
                        req.notes,
                        id,
                        req.owner_id
                    ],
                )
                .map_err(|e| e.to_string())?;
            if updated == 0 {
                return Err("Inspection schedule not found".to_string());
            }
            id.clone()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO inspection_schedules
                 (id, owner_id, ride_id, inspection_type, inspector, due_date,
                  advance_notice_days, notes, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
                params![
                    id,
                    req.owner_id,
                    req.ride_id,
                    req.inspection_type.trim(),
                    req.inspector,
                    db::date_to_sql(&req.due_date),
                    req.advance_notice_days,
                    req.notes
                ],
            )
            .map_err(|e| e.to_string())?;
            id
        }
    };

    load_inspection(conn, &id)
}

/// Active inspection bookings for one ride, soonest due first, each with
/// its status badge computed against today.
pub fn list_inspections(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
) -> Result<Vec<InspectionSchedule>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id, owner_id, ride_id, inspection_type, inspector, due_date,
                    advance_notice_days, notes, is_active
             FROM inspection_schedules
             WHERE owner_id = ?1 AND ride_id = ?2 AND is_active = 1
             ORDER BY due_date",
        )
        .map_err(|e| e.to_string())?;
    let today = Utc::now().date_naive();
    let rows = stmt
        .query_map(params![owner_id, ride_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, u32>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, bool>(8)?,
            ))
        })
        .map_err(|e| e.to_string())?;

    let mut out = Vec::new();
    for row in rows {
        let (id, owner_id, ride_id, inspection_type, inspector, due, notice, notes, is_active) =
            row.map_err(|e| e.to_string())?;
        let due_date = db::parse_date(&due)?;
        out.push(InspectionSchedule {
            id,
            owner_id,
            ride_id,
            inspection_type,
            inspector,
            due_date,
            advance_notice_days: notice,
            notes,
            is_active,
            status: schedule_status(today, due_date, notice),
        });
    }
    Ok(out)
}

fn load_inspection(conn: &Connection, id: &str) -> Result<InspectionSchedule, String> {
    let (id, owner_id, ride_id, inspection_type, inspector, due, notice, notes, is_active) = conn
        .query_row(
            "SELECT id, owner_id, ride_id, inspection_type, inspector, due_date,
                    advance_notice_days, notes, is_active
             FROM inspection_schedules WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, u32>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, bool>(8)?,
                ))
            },
        )
        .map_err(|_| "Inspection schedule not found".to_string())?;

    let due_date = db::parse_date(&due)?;
    Ok(InspectionSchedule {
        id,
        owner_id,
        ride_id,
        inspection_type,
        inspector,
        due_date,
        advance_notice_days: notice,
        notes,
        is_active,
        status: schedule_status(Utc::now().date_naive(), due_date, notice),
    })
}

/// Soft delete: the row is kept with `is_active = false`.
pub fn deactivate_inspection(conn: &Connection, id: &str) -> Result<(), String> {
    let updated = conn
        .execute(
            "UPDATE inspection_schedules SET is_active = 0 WHERE id = ?1 AND is_active = 1",
            params![id],
        )
        .map_err(|e| e.to_string())?;
    if updated == 0 {
        return Err("Inspection schedule not found".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn request(due_in_days: u64) -> SaveInspectionRequest {
        SaveInspectionRequest {
            id: None,
            owner_id: "owner-1".to_string(),
            ride_id: "ride-1".to_string(),
            inspection_type: "ADIPS".to_string(),
            inspector: Some("R. Hale".to_string()),
            due_date: Utc::now()
                .date_naive()
                .checked_add_days(Days::new(due_in_days))
                .unwrap(),
            advance_notice_days: 30,
            notes: None,
        }
    }

    #[test]
    fn save_computes_the_status_badge() {
        let conn = db::test_conn();
        let soon = save_inspection(&conn, &request(5)).unwrap();
        assert_eq!(
            soon.status,
            common::model::schedule::ScheduleStatus::DueSoon
        );
        let current = save_inspection(&conn, &request(60)).unwrap();
        assert_eq!(
            current.status,
            common::model::schedule::ScheduleStatus::Current
        );
    }

    #[test]
    fn delete_is_soft() {
        let conn = db::test_conn();
        let saved = save_inspection(&conn, &request(10)).unwrap();
        deactivate_inspection(&conn, &saved.id).unwrap();

        assert!(list_inspections(&conn, "owner-1", "ride-1").unwrap().is_empty());
        // The row survives for history.
        let kept: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM inspection_schedules WHERE id = ?1",
                params![saved.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(kept, 1);
        // A second delete finds nothing active.
        assert!(deactivate_inspection(&conn, &saved.id).is_err());
    }

    #[test]
    fn notice_window_is_validated() {
        let conn = db::test_conn();
        let mut req = request(10);
        req.advance_notice_days = 0;
        assert!(save_inspection(&conn, &req).is_err());
        req.advance_notice_days = 400;
        assert!(save_inspection(&conn, &req).is_err());
    }
}
