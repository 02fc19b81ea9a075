use actix_web::web;
use chrono::Utc;
use common::model::check::CheckWithResults;

use crate::config::AppConfig;
use crate::db;
use crate::services::checks::history::{list_checks, HistoryFilter, HistoryQuery};
use crate::services::documents::upload::filename_component;
use crate::services::rides::load_ride;

pub async fn process(
    cfg: web::Data<AppConfig>,
    path: web::Path<(String, String)>,
    query: web::Query<HistoryQuery>,
) -> impl actix_web::Responder {
    let (owner_id, ride_id) = path.into_inner();
    let filter = match HistoryFilter::from_query(&query) {
        Ok(filter) => filter,
        Err(e) => return actix_web::HttpResponse::BadRequest().body(e),
    };
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    let ride = match load_ride(&conn, &ride_id) {
        Ok(ride) => ride,
        Err(e) => return actix_web::HttpResponse::NotFound().body(e),
    };
    let checks = match list_checks(&conn, &owner_id, &ride_id, &filter) {
        Ok(checks) => checks,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match checks_to_csv(&checks) {
        Ok(csv) => {
            let filename = format!(
                "checks-export-{}-{}.csv",
                filename_component(&ride.name),
                Utc::now().format("%Y-%m-%d")
            );
            actix_web::HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(csv)
        }
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

/// One CSV row per check: date, frequency, inspector, status, notes.
pub fn checks_to_csv(checks: &[CheckWithResults]) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["date", "frequency", "inspector", "status", "notes"])
        .map_err(|e| e.to_string())?;
    for entry in checks {
        let check = &entry.check;
        writer
            .write_record([
                check.check_date.format("%Y-%m-%d").to_string(),
                check.frequency.as_str().to_string(),
                check.inspector_name.clone(),
                check.status.as_str().to_string(),
                check.notes.clone().unwrap_or_default(),
            ])
            .map_err(|e| e.to_string())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}
