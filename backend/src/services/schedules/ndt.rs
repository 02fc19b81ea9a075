use actix_web::web;
use chrono::{Months, NaiveDate, Utc};
use common::model::schedule::NdtSchedule;
use common::requests::SaveNdtRequest;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::schedules::status::{schedule_status, validate_notice_days};

pub async fn save_process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveNdtRequest>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match save_ndt(&conn, &payload) {
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
    match list_ndt(&conn, &owner_id, &ride_id) {
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
    match delete_ndt(&conn, &id) {
        Ok(()) => actix_web::HttpResponse::Ok().body("NDT schedule deleted"),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// The next NDT due date: last inspection plus the frequency in calendar
/// months. Month-end dates clamp the way the calendar does (31 Jan + 1
/// month lands on the last day of February).
pub fn ndt_due_date(last_inspection: NaiveDate, frequency_months: u32) -> Result<NaiveDate, String> {
    last_inspection
        .checked_add_months(Months::new(frequency_months))
        .ok_or_else(|| "NDT due date out of range".to_string())
}

/// Create or update an NDT requirement. The due date is never accepted
/// from the caller; it is derived on every read.
pub fn save_ndt(conn: &Connection, req: &SaveNdtRequest) -> Result<NdtSchedule, String> {
    if req.component.trim().is_empty() {
        return Err("Component must not be empty".to_string());
    }
    if req.method.trim().is_empty() {
        return Err("NDT method must not be empty".to_string());
    }
    if req.frequency_months == 0 {
        return Err("Frequency must be at least one month".to_string());
    }
    validate_notice_days(req.advance_notice_days)?;

    let id = match &req.id {
        Some(id) => {
            let updated = conn
                .execute(
                    "UPDATE ndt_schedules
                     SET component = ?1, method = ?2, last_inspection_date = ?3,
                         frequency_months = ?4, advance_notice_days = ?5, notes = ?6
                     WHERE id = ?7 AND owner_id = ?8",
                    params![
                        req.component.trim(),
                        req.method.trim(),
                        db::date_to_sql(&req.last_inspection_date),
                        req.frequency_months,
                        req.advance_notice_days,
                        req.notes,
                        id,
                        req.owner_id
                    ],
                )
                .map_err(|e| e.to_string())?;
            if updated == 0 {
                return Err("NDT schedule not found".to_string());
            }
            id.clone()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO ndt_schedules
                 (id, owner_id, ride_id, component, method, last_inspection_date,
                  frequency_months, advance_notice_days, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    req.owner_id,
                    req.ride_id,
                    req.component.trim(),
                    req.method.trim(),
                    db::date_to_sql(&req.last_inspection_date),
                    req.frequency_months,
                    req.advance_notice_days,
                    req.notes
                ],
            )
            .map_err(|e| e.to_string())?;
            id
        }
    };

    load_ndt(conn, &id)
}

/// NDT requirements for one ride with derived due dates and status badges.
pub fn list_ndt(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
) -> Result<Vec<NdtSchedule>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id FROM ndt_schedules
             WHERE owner_id = ?1 AND ride_id = ?2
             ORDER BY last_inspection_date",
        )
        .map_err(|e| e.to_string())?;
    let ids = stmt
        .query_map(params![owner_id, ride_id], |row| row.get::<_, String>(0))
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        out.push(load_ndt(conn, &id)?);
    }
    out.sort_by_key(|s| s.due_date);
    Ok(out)
}

fn load_ndt(conn: &Connection, id: &str) -> Result<NdtSchedule, String> {
    let (id, owner_id, ride_id, component, method, last, frequency, notice, notes) = conn
        .query_row(
            "SELECT id, owner_id, ride_id, component, method, last_inspection_date,
                    frequency_months, advance_notice_days, notes
             FROM ndt_schedules WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, u32>(6)?,
                    row.get::<_, u32>(7)?,
                    row.get::<_, Option<String>>(8)?,
                ))
            },
        )
        .map_err(|_| "NDT schedule not found".to_string())?;

    let last_inspection_date = db::parse_date(&last)?;
    let due_date = ndt_due_date(last_inspection_date, frequency)?;
    Ok(NdtSchedule {
        id,
        owner_id,
        ride_id,
        component,
        method,
        last_inspection_date,
        frequency_months: frequency,
        advance_notice_days: notice,
        notes,
        due_date,
        status: schedule_status(Utc::now().date_naive(), due_date, notice),
    })
}

pub fn delete_ndt(conn: &Connection, id: &str) -> Result<(), String> {
    let deleted = conn
        .execute("DELETE FROM ndt_schedules WHERE id = ?1", params![id])
        .map_err(|e| e.to_string())?;
    if deleted == 0 {
        return Err("NDT schedule not found".to_string());
    }
    Ok(())
}
