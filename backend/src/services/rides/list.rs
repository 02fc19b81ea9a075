use actix_web::web;
use common::model::ride::Ride;
use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::db;
use crate::services::rides::get::{map_ride_row, RIDE_COLUMNS};

pub async fn process(
    cfg: web::Data<AppConfig>,
    owner_id: web::Path<String>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match list_rides(&conn, &owner_id) {
        Ok(rides) => actix_web::HttpResponse::Ok().json(rides),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

/// All rides of one owner, alphabetical by name.
pub fn list_rides(conn: &Connection, owner_id: &str) -> Result<Vec<Ride>, String> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM rides WHERE owner_id = ?1 ORDER BY name",
            RIDE_COLUMNS
        ))
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![owner_id], |row| map_ride_row(row))
        .map_err(|e| e.to_string())?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rides::save::save_ride;
    use common::requests::SaveRideRequest;

    fn ride(owner: &str, name: &str) -> SaveRideRequest {
        SaveRideRequest {
            id: None,
            owner_id: owner.to_string(),
            name: name.to_string(),
            category: "flat".to_string(),
            manufacturer: None,
            serial_number: None,
            year: None,
            notes: None,
        }
    }

    #[test]
    fn lists_only_the_owners_rides_by_name() {
        let conn = db::test_conn();
        save_ride(&conn, &ride("owner-1", "Waltzer")).unwrap();
        save_ride(&conn, &ride("owner-1", "Dodgems")).unwrap();
        save_ride(&conn, &ride("owner-2", "Gallopers")).unwrap();

        let rides = list_rides(&conn, "owner-1").unwrap();
        assert_eq!(rides.len(), 2);
        assert_eq!(rides[0].name, "Dodgems");
        assert_eq!(rides[1].name, "Waltzer");
    }
}
