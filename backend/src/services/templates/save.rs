use actix_web::web;
use chrono::Utc;
use common::model::template::Template;
use common::requests::SaveTemplateRequest;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::templates::list;

pub async fn process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveTemplateRequest>,
) -> impl actix_web::Responder {
    let mut conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match save_template(&mut conn, &payload) {
        Ok(template) => actix_web::HttpResponse::Ok().json(template),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Create a template or replace an existing one's name and items.
///
/// Editing never diffs: the old item rows are deleted and the submitted
/// list re-inserted with `sort_order` following the array order, all in
/// one transaction. New templates start inactive.
pub fn save_template(conn: &mut Connection, req: &SaveTemplateRequest) -> Result<Template, String> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err("Template name must not be empty".to_string());
    }
    if req.items.is_empty() {
        return Err("A template needs at least one check item".to_string());
    }
    let mut seen = HashSet::new();
    for item in &req.items {
        if item.text.trim().is_empty() {
            return Err("Check item text must not be empty".to_string());
        }
        if !seen.insert(item.text.as_str()) {
            return Err(format!("Duplicate check item: {}", item.text));
        }
    }

    let tx = conn.transaction().map_err(|e| e.to_string())?;

    let template_id = match &req.id {
        Some(id) => {
            let updated = tx
                .execute(
                    "UPDATE templates SET name = ?1
                     WHERE id = ?2 AND owner_id = ?3 AND ride_id = ?4",
                    params![name, id, req.owner_id, req.ride_id],
                )
                .map_err(|e| e.to_string())?;
            if updated == 0 {
                return Err("Template not found".to_string());
            }
            tx.execute(
                "DELETE FROM template_items WHERE template_id = ?1",
                params![id],
            )
            .map_err(|e| e.to_string())?;
            id.clone()
        }
        None => {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO templates
                 (id, owner_id, ride_id, name, frequency, is_active, is_archived, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)",
                params![
                    id,
                    req.owner_id,
                    req.ride_id,
                    name,
                    req.frequency.as_str(),
                    db::datetime_to_sql(&Utc::now())
                ],
            )
            .map_err(|e| e.to_string())?;
            id
        }
    };

    for (index, item) in req.items.iter().enumerate() {
        tx.execute(
            "INSERT INTO template_items (id, template_id, text, category, is_required, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Uuid::new_v4().to_string(),
                template_id,
                item.text.trim(),
                item.category.as_tag(),
                item.is_required,
                index as u32
            ],
        )
        .map_err(|e| e.to_string())?;
    }

    tx.commit().map_err(|e| e.to_string())?;
    list::load_template(conn, &template_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::template::{CheckFrequency, ItemCategory};
    use common::requests::SaveTemplateItem;

    fn item(text: &str, required: bool) -> SaveTemplateItem {
        SaveTemplateItem {
            text: text.to_string(),
            category: ItemCategory::Custom,
            is_required: required,
        }
    }

    fn request(items: Vec<SaveTemplateItem>) -> SaveTemplateRequest {
        SaveTemplateRequest {
            id: None,
            owner_id: "owner-1".to_string(),
            ride_id: "ride-1".to_string(),
            name: "Morning walkaround".to_string(),
            frequency: CheckFrequency::Daily,
            items,
        }
    }

    #[test]
    fn creates_inactive_template_with_ordered_items() {
        let mut conn = db::test_conn();
        let req = request(vec![item("Guards", true), item("Restraints", true)]);
        let template = save_template(&mut conn, &req).unwrap();
        assert!(!template.is_active);
        assert_eq!(template.items.len(), 2);
        assert_eq!(template.items[0].sort_order, 0);
        assert_eq!(template.items[1].sort_order, 1);
        assert_eq!(template.items[0].text, "Guards");
    }

    #[test]
    fn rejects_empty_name_and_empty_items() {
        let mut conn = db::test_conn();
        let mut req = request(vec![item("Guards", true)]);
        req.name = "  ".to_string();
        assert!(save_template(&mut conn, &req).is_err());

        let req = request(Vec::new());
        assert!(save_template(&mut conn, &req).is_err());
    }

    #[test]
    fn rejects_duplicate_item_text() {
        let mut conn = db::test_conn();
        let req = request(vec![item("Guards", true), item("Guards", false)]);
        assert!(save_template(&mut conn, &req).is_err());
    }

    #[test]
    fn edit_replaces_items_wholesale() {
        let mut conn = db::test_conn();
        let created =
            save_template(&mut conn, &request(vec![item("Guards", true), item("Gates", false)]))
                .unwrap();

        let mut edit = request(vec![item("Restraints", true)]);
        edit.id = Some(created.id.clone());
        edit.name = "Renamed".to_string();
        let edited = save_template(&mut conn, &edit).unwrap();

        assert_eq!(edited.name, "Renamed");
        assert_eq!(edited.items.len(), 1);
        assert_eq!(edited.items[0].text, "Restraints");
        let count: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM template_items WHERE template_id = ?1",
                params![created.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn edit_of_unknown_template_rolls_back() {
        let mut conn = db::test_conn();
        let mut req = request(vec![item("Guards", true)]);
        req.id = Some("missing".to_string());
        assert!(save_template(&mut conn, &req).is_err());
        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM template_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
