use actix_web::web;
use common::model::ride::Ride;
use rusqlite::{params, Connection, Row};

use crate::config::AppConfig;
use crate::db;

pub async fn process(
    cfg: web::Data<AppConfig>,
    path: web::Path<(String, String)>,
) -> impl actix_web::Responder {
    let (owner_id, ride_id) = path.into_inner();
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match load_ride(&conn, &ride_id) {
        Ok(ride) if ride.owner_id == owner_id => actix_web::HttpResponse::Ok().json(ride),
        Ok(_) => actix_web::HttpResponse::NotFound().body("Ride not found"),
        Err(e) => actix_web::HttpResponse::NotFound().body(e),
    }
}

pub(crate) fn map_ride_row(row: &Row) -> Result<Ride, rusqlite::Error> {
    Ok(Ride {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        manufacturer: row.get(4)?,
        serial_number: row.get(5)?,
        year: row.get(6)?,
        notes: row.get(7)?,
        created_at: db::parse_datetime(&row.get::<_, String>(8)?)
            .unwrap_or_else(|_| chrono::Utc::now()),
    })
}

pub(crate) const RIDE_COLUMNS: &str =
    "id, owner_id, name, category, manufacturer, serial_number, year, notes, created_at";

/// One ride by id, or an error when the id is unknown.
pub fn load_ride(conn: &Connection, ride_id: &str) -> Result<Ride, String> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM rides WHERE id = ?1", RIDE_COLUMNS))
        .map_err(|e| e.to_string())?;
    stmt.query_row(params![ride_id], |row| map_ride_row(row))
        .map_err(|_| "Ride not found".to_string())
}
