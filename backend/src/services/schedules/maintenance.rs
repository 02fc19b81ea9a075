use actix_web::web;
use chrono::Utc;
use common::model::schedule::MaintenanceRecord;
use common::requests::SaveMaintenanceRequest;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::schedules::status::{schedule_status, validate_notice_days};

pub async fn save_process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveMaintenanceRequest>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match save_maintenance(&conn, &payload) {
        Ok(record) => actix_web::HttpResponse::Ok().json(record),
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
    match list_maintenance(&conn, &owner_id, &ride_id) {
        Ok(records) => actix_web::HttpResponse::Ok().json(records),
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
    match delete_maintenance(&conn, &id) {
        Ok(()) => actix_web::HttpResponse::Ok().body("Maintenance record deleted"),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Log a maintenance activity, optionally with a follow-up due date.
pub fn save_maintenance(
    conn: &Connection,
    req: &SaveMaintenanceRequest,
) -> Result<MaintenanceRecord, String> {
    if req.title.trim().is_empty() {
        return Err("Maintenance title must not be empty".to_string());
    }
    validate_notice_days(req.advance_notice_days)?;

    let id = match &req.id {
        Some(id) => {
            let updated = conn
                .execute(
                    "UPDATE maintenance_records
                     SET title = ?1, description = ?2, performed_date = ?3, performed_by = ?4,
                         category = ?5, cost = ?6, next_due_date = ?7, advance_notice_days = ?8
                     WHERE id = ?9 AND owner_id = ?10",
                    params![
                        req.title.trim(),
                        req.description,
                        db::date_to_sql(&req.performed_date),
                        req.performed_by,
                        req.category,
                        req.cost,
                        req.next_due_date.as_ref().map(db::date_to_sql),
                        req.advance_notice_days,
                        id,
                        req.owner_id
                    ],
                )
                .map_err(|e| e.to_string())?;
            if updated == 0 {
                return Err("Maintenance record not found".to_string());
            }
            id.clone()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO maintenance_records
                 (id, owner_id, ride_id, title, description, performed_date, performed_by,
                  category, cost, next_due_date, advance_notice_days)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    req.owner_id,
                    req.ride_id,
                    req.title.trim(),
                    req.description,
                    db::date_to_sql(&req.performed_date),
                    req.performed_by,
                    req.category,
                    req.cost,
                    req.next_due_date.as_ref().map(db::date_to_sql),
                    req.advance_notice_days
                ],
            )
            .map_err(|e| e.to_string())?;
            id
        }
    };

    load_maintenance(conn, &id)
}

/// Maintenance log for one ride, most recent work first. The status badge
/// is only present on records with a follow-up due date.
pub fn list_maintenance(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
) -> Result<Vec<MaintenanceRecord>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id FROM maintenance_records
             WHERE owner_id = ?1 AND ride_id = ?2
             ORDER BY performed_date DESC",
        )
        .map_err(|e| e.to_string())?;
    let ids = stmt
        .query_map(params![owner_id, ride_id], |row| row.get::<_, String>(0))
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        out.push(load_maintenance(conn, &id)?);
    }
    Ok(out)
}

fn load_maintenance(conn: &Connection, id: &str) -> Result<MaintenanceRecord, String> {
    let (id, owner_id, ride_id, title, description, performed, performed_by, category, cost, next_due, notice) =
        conn.query_row(
            "SELECT id, owner_id, ride_id, title, description, performed_date, performed_by,
                    category, cost, next_due_date, advance_notice_days
             FROM maintenance_records WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<f64>>(8)?,
                    row.get::<_, Option<String>>(9)?,
                    row.get::<_, u32>(10)?,
                ))
            },
        )
        .map_err(|_| "Maintenance record not found".to_string())?;

    let next_due_date = next_due.as_deref().map(db::parse_date).transpose()?;
    Ok(MaintenanceRecord {
        id,
        owner_id,
        ride_id,
        title,
        description,
        performed_date: db::parse_date(&performed)?,
        performed_by,
        category,
        cost,
        next_due_date,
        advance_notice_days: notice,
        status: next_due_date.map(|due| schedule_status(Utc::now().date_naive(), due, notice)),
    })
}

pub fn delete_maintenance(conn: &Connection, id: &str) -> Result<(), String> {
    let deleted = conn
        .execute("DELETE FROM maintenance_records WHERE id = ?1", params![id])
        .map_err(|e| e.to_string())?;
    if deleted == 0 {
        return Err("Maintenance record not found".to_string());
    }
    Ok(())
}
