use actix_web::web;
use chrono::Utc;
use common::model::ride::Ride;
use common::requests::SaveRideRequest;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::rides::get;

pub async fn process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveRideRequest>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match save_ride(&conn, &payload) {
        Ok(ride) => actix_web::HttpResponse::Ok().json(ride),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Create a ride or update an existing one's details.
pub fn save_ride(conn: &Connection, req: &SaveRideRequest) -> Result<Ride, String> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err("Ride name must not be empty".to_string());
    }
    if req.category.trim().is_empty() {
        return Err("Ride category must not be empty".to_string());
    }

    let ride_id = match &req.id {
        Some(id) => {
            let updated = conn
                .execute(
                    "UPDATE rides SET name = ?1, category = ?2, manufacturer = ?3,
                            serial_number = ?4, year = ?5, notes = ?6
                     WHERE id = ?7 AND owner_id = ?8",
                    params![
                        name,
                        req.category.trim(),
                        req.manufacturer,
                        req.serial_number,
                        req.year,
                        req.notes,
                        id,
                        req.owner_id
                    ],
                )
                .map_err(|e| e.to_string())?;
            if updated == 0 {
                return Err("Ride not found".to_string());
            }
            id.clone()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO rides
                 (id, owner_id, name, category, manufacturer, serial_number, year, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    req.owner_id,
                    name,
                    req.category.trim(),
                    req.manufacturer,
                    req.serial_number,
                    req.year,
                    req.notes,
                    db::datetime_to_sql(&Utc::now())
                ],
            )
            .map_err(|e| e.to_string())?;
            id
        }
    };

    get::load_ride(conn, &ride_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> SaveRideRequest {
        SaveRideRequest {
            id: None,
            owner_id: "owner-1".to_string(),
            name: name.to_string(),
            category: "coaster".to_string(),
            manufacturer: Some("Zierer".to_string()),
            serial_number: None,
            year: Some(2018),
            notes: None,
        }
    }

    #[test]
    fn create_then_update() {
        let conn = db::test_conn();
        let ride = save_ride(&conn, &request("Wild Mouse")).unwrap();
        assert_eq!(ride.name, "Wild Mouse");
        assert_eq!(ride.category, "coaster");

        let mut edit = request("Wild Mouse Mk II");
        edit.id = Some(ride.id.clone());
        let edited = save_ride(&conn, &edit).unwrap();
        assert_eq!(edited.id, ride.id);
        assert_eq!(edited.name, "Wild Mouse Mk II");
    }

    #[test]
    fn blank_name_is_rejected() {
        let conn = db::test_conn();
        let mut req = request(" ");
        req.name = "  ".to_string();
        assert!(save_ride(&conn, &req).is_err());
    }

    #[test]
    fn update_of_unknown_ride_fails() {
        let conn = db::test_conn();
        let mut req = request("Ghost Train");
        req.id = Some("missing".to_string());
        assert!(save_ride(&conn, &req).is_err());
    }
}
