use actix_web::web;
use chrono::Utc;
use common::model::template::Template;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::templates::list;

pub async fn process(
    cfg: web::Data<AppConfig>,
    template_id: web::Path<String>,
) -> impl actix_web::Responder {
    let mut conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match duplicate_template(&mut conn, &template_id) {
        Ok(template) => actix_web::HttpResponse::Ok().json(template),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Deep-copy a template: header cloned with " (Copy)" appended to the
/// name, items cloned preserving text/required/order under fresh ids.
/// The copy is never active or archived, whatever the source was.
pub fn duplicate_template(conn: &mut Connection, template_id: &str) -> Result<Template, String> {
    let source = list::load_template(conn, template_id)?;

    let tx = conn.transaction().map_err(|e| e.to_string())?;
    let copy_id = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO templates
         (id, owner_id, ride_id, name, frequency, is_active, is_archived, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)",
        params![
            copy_id,
            source.owner_id,
            source.ride_id,
            format!("{} (Copy)", source.name),
            source.frequency.as_str(),
            db::datetime_to_sql(&Utc::now())
        ],
    )
    .map_err(|e| e.to_string())?;

    for item in &source.items {
        tx.execute(
            "INSERT INTO template_items (id, template_id, text, category, is_required, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Uuid::new_v4().to_string(),
                copy_id,
                item.text,
                item.category.as_tag(),
                item.is_required,
                item.sort_order
            ],
        )
        .map_err(|e| e.to_string())?;
    }

    tx.commit().map_err(|e| e.to_string())?;
    list::load_template(conn, &copy_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::templates::activate::activate_template;
    use crate::services::templates::save::save_template;
    use common::model::template::{CheckFrequency, ItemCategory};
    use common::requests::{SaveTemplateItem, SaveTemplateRequest};

    #[test]
    fn copy_matches_source_items_but_is_inactive() {
        let mut conn = db::test_conn();
        let source = save_template(
            &mut conn,
            &SaveTemplateRequest {
                id: None,
                owner_id: "owner-1".to_string(),
                ride_id: "ride-1".to_string(),
                name: "Morning Safety".to_string(),
                frequency: CheckFrequency::Daily,
                items: vec![
                    SaveTemplateItem {
                        text: "Guards secure".to_string(),
                        category: ItemCategory::Library,
                        is_required: true,
                    },
                    SaveTemplateItem {
                        text: "Restraints lock".to_string(),
                        category: ItemCategory::Custom,
                        is_required: false,
                    },
                ],
            },
        )
        .unwrap();
        let source = activate_template(&mut conn, &source.id).unwrap();

        let copy = duplicate_template(&mut conn, &source.id).unwrap();

        assert_eq!(copy.name, "Morning Safety (Copy)");
        assert!(!copy.is_active);
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.items.len(), source.items.len());
        for (a, b) in copy.items.iter().zip(source.items.iter()) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.is_required, b.is_required);
            assert_eq!(a.sort_order, b.sort_order);
            assert_ne!(a.id, b.id);
            assert_eq!(a.template_id, copy.id);
        }
    }
}
