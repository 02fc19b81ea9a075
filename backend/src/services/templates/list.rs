use actix_web::web;
use common::model::template::{CheckFrequency, ItemCategory, Template, TemplateItem};
use rusqlite::{params, Connection, Row};

use crate::config::AppConfig;
use crate::db;

pub async fn process(
    cfg: web::Data<AppConfig>,
    path: web::Path<(String, String, String)>,
) -> impl actix_web::Responder {
    let (owner_id, ride_id, frequency) = path.into_inner();
    let frequency = match CheckFrequency::parse(&frequency) {
        Some(f) => f,
        None => {
            return actix_web::HttpResponse::BadRequest()
                .body(format!("Unknown frequency: {}", frequency))
        }
    };
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match list_templates(&conn, &owner_id, &ride_id, frequency) {
        Ok(templates) => actix_web::HttpResponse::Ok().json(templates),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

fn map_template_row(row: &Row) -> Result<Template, rusqlite::Error> {
    Ok(Template {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        ride_id: row.get(2)?,
        name: row.get(3)?,
        frequency: CheckFrequency::parse(&row.get::<_, String>(4)?)
            .unwrap_or(CheckFrequency::Daily),
        is_active: row.get(5)?,
        is_archived: row.get(6)?,
        created_at: db::parse_datetime(&row.get::<_, String>(7)?)
            .unwrap_or_else(|_| chrono::Utc::now()),
        items: Vec::new(),
    })
}

const TEMPLATE_COLUMNS: &str =
    "id, owner_id, ride_id, name, frequency, is_active, is_archived, created_at";

/// All templates for one (owner, ride, frequency) scope, newest first,
/// each with its ordered items.
pub fn list_templates(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    frequency: CheckFrequency,
) -> Result<Vec<Template>, String> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM templates
             WHERE owner_id = ?1 AND ride_id = ?2 AND frequency = ?3
             ORDER BY created_at DESC",
            TEMPLATE_COLUMNS
        ))
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![owner_id, ride_id, frequency.as_str()], |row| {
            map_template_row(row)
        })
        .map_err(|e| e.to_string())?;

    let mut templates = Vec::new();
    for row in rows {
        let mut template = row.map_err(|e| e.to_string())?;
        template.items = load_items(conn, &template.id)?;
        templates.push(template);
    }
    Ok(templates)
}

/// One template with its items, or an error when the id is unknown.
pub fn load_template(conn: &Connection, template_id: &str) -> Result<Template, String> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM templates WHERE id = ?1",
            TEMPLATE_COLUMNS
        ))
        .map_err(|e| e.to_string())?;
    let mut template = stmt
        .query_row(params![template_id], |row| map_template_row(row))
        .map_err(|_| "Template not found".to_string())?;
    template.items = load_items(conn, template_id)?;
    Ok(template)
}

/// Items of a template in sort order.
pub fn load_items(conn: &Connection, template_id: &str) -> Result<Vec<TemplateItem>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id, template_id, text, category, is_required, sort_order
             FROM template_items WHERE template_id = ?1 ORDER BY sort_order",
        )
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![template_id], |row| {
            Ok(TemplateItem {
                id: row.get(0)?,
                template_id: row.get(1)?,
                text: row.get(2)?,
                category: ItemCategory::from_tag(&row.get::<_, String>(3)?)
                    .unwrap_or(ItemCategory::Custom),
                is_required: row.get(4)?,
                sort_order: row.get(5)?,
            })
        })
        .map_err(|e| e.to_string())?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}
