use actix_web::web;
use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::db;

pub async fn process(
    cfg: web::Data<AppConfig>,
    ride_id: web::Path<String>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match dependent_records(&conn, &ride_id) {
        Ok(0) => match delete_ride(&conn, &ride_id) {
            Ok(()) => actix_web::HttpResponse::Ok().body("Ride deleted"),
            Err(e) => actix_web::HttpResponse::BadRequest().body(e),
        },
        Ok(count) => actix_web::HttpResponse::Conflict().body(format!(
            "Ride still has {} linked records; delete those first",
            count
        )),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

/// How many templates, checks, schedules, maintenance records and documents
/// still reference a ride. A ride can only be deleted once this reaches
/// zero; nothing is cascaded across domains.
pub fn dependent_records(conn: &Connection, ride_id: &str) -> Result<u32, String> {
    let mut total = 0u32;
    for table in [
        "templates",
        "checks",
        "inspection_schedules",
        "ndt_schedules",
        "maintenance_records",
        "documents",
    ] {
        let count: u32 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE ride_id = ?1", table),
                params![ride_id],
                |row| row.get(0),
            )
            .map_err(|e| e.to_string())?;
        total += count;
    }
    Ok(total)
}

pub fn delete_ride(conn: &Connection, ride_id: &str) -> Result<(), String> {
    let deleted = conn
        .execute("DELETE FROM rides WHERE id = ?1", params![ride_id])
        .map_err(|e| e.to_string())?;
    if deleted == 0 {
        return Err("Ride not found".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rides::save::save_ride;
    use crate::services::templates::save_template;
    use common::model::template::{CheckFrequency, ItemCategory};
    use common::requests::{SaveRideRequest, SaveTemplateItem, SaveTemplateRequest};

    fn make_ride(conn: &Connection) -> String {
        save_ride(
            conn,
            &SaveRideRequest {
                id: None,
                owner_id: "owner-1".to_string(),
                name: "Waltzer".to_string(),
                category: "flat".to_string(),
                manufacturer: None,
                serial_number: None,
                year: None,
                notes: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn ride_with_templates_reports_dependents() {
        let mut conn = db::test_conn();
        let ride_id = make_ride(&conn);
        assert_eq!(dependent_records(&conn, &ride_id).unwrap(), 0);

        save_template(
            &mut conn,
            &SaveTemplateRequest {
                id: None,
                owner_id: "owner-1".to_string(),
                ride_id: ride_id.clone(),
                name: "Daily".to_string(),
                frequency: CheckFrequency::Daily,
                items: vec![SaveTemplateItem {
                    text: "Guards".to_string(),
                    category: ItemCategory::Generic,
                    is_required: true,
                }],
            },
        )
        .unwrap();

        assert_eq!(dependent_records(&conn, &ride_id).unwrap(), 1);
        delete_ride(&conn, &ride_id).unwrap();
        assert!(delete_ride(&conn, &ride_id).is_err());
    }
}
