use actix_web::web;
use common::model::library::{LibraryItem, RiskLevel};
use common::model::template::{CheckFrequency, ItemCategory};
use rusqlite::{params, Connection};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db;

#[derive(Deserialize)]
pub struct LibraryQuery {
    pub frequency: Option<String>,
    /// `generic`, or a ride category key to get both the generic items and
    /// the ones specific to that category.
    pub category: Option<String>,
}

pub async fn process(
    cfg: web::Data<AppConfig>,
    query: web::Query<LibraryQuery>,
) -> impl actix_web::Responder {
    let frequency = match &query.frequency {
        Some(f) => match CheckFrequency::parse(f) {
            Some(f) => Some(f),
            None => {
                return actix_web::HttpResponse::BadRequest()
                    .body(format!("Unknown frequency: {}", f))
            }
        },
        None => None,
    };
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match list_library_items(&conn, frequency, query.category.as_deref()) {
        Ok(items) => actix_web::HttpResponse::Ok().json(items),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

/// Active library items ordered by sort index, optionally narrowed to one
/// frequency and one ride category. Passing a ride category keeps the
/// generic items and adds that category's specific ones.
pub fn list_library_items(
    conn: &Connection,
    frequency: Option<CheckFrequency>,
    ride_category: Option<&str>,
) -> Result<Vec<LibraryItem>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id, text, frequency, category, hint, risk_level, is_required, is_active, sort_index
             FROM library_items
             WHERE is_active = 1 AND (?1 IS NULL OR frequency = ?1)
             ORDER BY sort_index, id",
        )
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![frequency.map(|f| f.as_str())], |row| {
            Ok(LibraryItem {
                id: row.get(0)?,
                text: row.get(1)?,
                frequency: CheckFrequency::parse(&row.get::<_, String>(2)?)
                    .unwrap_or(CheckFrequency::Daily),
                category: ItemCategory::from_tag(&row.get::<_, String>(3)?)
                    .unwrap_or(ItemCategory::Generic),
                hint: row.get(4)?,
                risk_level: row
                    .get::<_, Option<String>>(5)?
                    .as_deref()
                    .and_then(RiskLevel::parse),
                is_required: row.get(6)?,
                is_active: row.get(7)?,
                sort_index: row.get(8)?,
            })
        })
        .map_err(|e| e.to_string())?;

    let items = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let items = match ride_category {
        None => items,
        Some("generic") => items
            .into_iter()
            .filter(|item| item.category == ItemCategory::Generic)
            .collect(),
        Some(category) => items
            .into_iter()
            .filter(|item| match &item.category {
                ItemCategory::Generic => true,
                ItemCategory::RideSpecific(c) => c == category,
                _ => false,
            })
            .collect(),
    };
    Ok(items)
}
