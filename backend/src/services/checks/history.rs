use actix_web::web;
use chrono::NaiveDate;
use common::model::check::{Check, CheckResult, CheckStatus, CheckWithResults};
use common::model::template::CheckFrequency;
use rusqlite::{params, Connection, Row};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Free text matched against inspector name and notes.
    pub q: Option<String>,
    pub frequency: Option<String>,
    pub status: Option<String>,
}

/// Parsed history filters. Date bounds are inclusive.
#[derive(Debug, Default, Clone)]
pub struct HistoryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub frequency: Option<CheckFrequency>,
    pub status: Option<CheckStatus>,
}

impl HistoryFilter {
    pub fn from_query(query: &HistoryQuery) -> Result<HistoryFilter, String> {
        let from = query.from.as_deref().map(db::parse_date).transpose()?;
        let to = query.to.as_deref().map(db::parse_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err("Date range start must not be after its end".to_string());
            }
        }
        let frequency = match &query.frequency {
            Some(f) => Some(
                CheckFrequency::parse(f).ok_or_else(|| format!("Unknown frequency: {}", f))?,
            ),
            None => None,
        };
        let status = match &query.status {
            Some(s) => {
                Some(CheckStatus::parse(s).ok_or_else(|| format!("Unknown status: {}", s))?)
            }
            None => None,
        };
        Ok(HistoryFilter {
            from,
            to,
            search: query.q.clone().filter(|q| !q.trim().is_empty()),
            frequency,
            status,
        })
    }
}

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
    match list_checks(&conn, &owner_id, &ride_id, &filter) {
        Ok(checks) => actix_web::HttpResponse::Ok().json(checks),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

fn map_check_row(row: &Row) -> Result<Check, rusqlite::Error> {
    Ok(Check {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        ride_id: row.get(2)?,
        template_id: row.get(3)?,
        frequency: CheckFrequency::parse(&row.get::<_, String>(4)?)
            .unwrap_or(CheckFrequency::Daily),
        check_date: db::parse_datetime(&row.get::<_, String>(5)?)
            .unwrap_or_else(|_| chrono::Utc::now()),
        inspector_name: row.get(6)?,
        notes: row.get(7)?,
        status: CheckStatus::parse(&row.get::<_, String>(8)?).unwrap_or(CheckStatus::Failed),
        weather: row.get(9)?,
        compliance_officer: row.get(10)?,
        signature: row.get(11)?,
        environment_notes: row.get(12)?,
    })
}

fn matches(check: &Check, filter: &HistoryFilter) -> bool {
    let date = check.check_date.date_naive();
    if let Some(from) = filter.from {
        if date < from {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if date > to {
            return false;
        }
    }
    if let Some(frequency) = filter.frequency {
        if check.frequency != frequency {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if check.status != status {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let in_inspector = check.inspector_name.to_lowercase().contains(&needle);
        let in_notes = check
            .notes
            .as_deref()
            .map(|n| n.to_lowercase().contains(&needle))
            .unwrap_or(false);
        if !in_inspector && !in_notes {
            return false;
        }
    }
    true
}

/// Check history for one ride, newest first, with result rows attached.
pub fn list_checks(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    filter: &HistoryFilter,
) -> Result<Vec<CheckWithResults>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id, owner_id, ride_id, template_id, frequency, check_date, inspector_name,
                    notes, status, weather, compliance_officer, signature, environment_notes
             FROM checks WHERE owner_id = ?1 AND ride_id = ?2
             ORDER BY check_date DESC",
        )
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![owner_id, ride_id], |row| map_check_row(row))
        .map_err(|e| e.to_string())?;

    let mut out = Vec::new();
    for row in rows {
        let check = row.map_err(|e| e.to_string())?;
        if !matches(&check, filter) {
            continue;
        }
        let results = load_results(conn, &check.id)?;
        out.push(CheckWithResults { check, results });
    }
    Ok(out)
}

/// One check by id, with its result rows.
pub fn load_check(conn: &Connection, check_id: &str) -> Result<CheckWithResults, String> {
    let mut stmt = conn
        .prepare(
            "SELECT id, owner_id, ride_id, template_id, frequency, check_date, inspector_name,
                    notes, status, weather, compliance_officer, signature, environment_notes
             FROM checks WHERE id = ?1",
        )
        .map_err(|e| e.to_string())?;
    let check = stmt
        .query_row(params![check_id], |row| map_check_row(row))
        .map_err(|_| "Check not found".to_string())?;
    let results = load_results(conn, check_id)?;
    Ok(CheckWithResults { check, results })
}

fn load_results(conn: &Connection, check_id: &str) -> Result<Vec<CheckResult>, String> {
    let mut stmt = conn
        .prepare(
            "SELECT cr.check_id, cr.template_item_id, cr.item_text, cr.is_checked, cr.notes
             FROM check_results cr
             LEFT JOIN template_items ti ON ti.id = cr.template_item_id
             WHERE cr.check_id = ?1
             ORDER BY COALESCE(ti.sort_order, 0), cr.template_item_id",
        )
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![check_id], |row| {
            Ok(CheckResult {
                check_id: row.get(0)?,
                template_item_id: row.get(1)?,
                item_text: row.get(2)?,
                is_checked: row.get(3)?,
                notes: row.get(4)?,
            })
        })
        .map_err(|e| e.to_string())?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::checks::submit::submit_check;
    use crate::services::templates::{activate_template, save_template};
    use common::model::template::{ItemCategory, Template};
    use common::requests::{
        SaveTemplateItem, SaveTemplateRequest, SubmitCheckRequest, SubmittedItem,
    };

    fn setup_template(conn: &mut Connection) -> Template {
        let t = save_template(
            conn,
            &SaveTemplateRequest {
                id: None,
                owner_id: "owner-1".to_string(),
                ride_id: "ride-1".to_string(),
                name: "Daily".to_string(),
                frequency: CheckFrequency::Daily,
                items: vec![
                    SaveTemplateItem {
                        text: "Guards".to_string(),
                        category: ItemCategory::Generic,
                        is_required: true,
                    },
                    SaveTemplateItem {
                        text: "Gates".to_string(),
                        category: ItemCategory::Generic,
                        is_required: false,
                    },
                ],
            },
        )
        .unwrap();
        activate_template(conn, &t.id).unwrap()
    }

    fn submit(
        conn: &mut Connection,
        template: &Template,
        inspector: &str,
        checked: usize,
        notes: Option<&str>,
    ) -> CheckWithResults {
        let items = template
            .items
            .iter()
            .take(checked)
            .map(|item| SubmittedItem {
                template_item_id: item.id.clone(),
                is_checked: true,
                notes: None,
            })
            .collect();
        submit_check(
            conn,
            &SubmitCheckRequest {
                owner_id: "owner-1".to_string(),
                ride_id: "ride-1".to_string(),
                template_id: template.id.clone(),
                frequency: CheckFrequency::Daily,
                inspector_name: inspector.to_string(),
                check_date: None,
                notes: notes.map(str::to_string),
                weather: None,
                compliance_officer: None,
                signature: None,
                environment_notes: None,
                enforce_required: false,
                items,
            },
        )
        .unwrap()
    }

    #[test]
    fn filters_by_search_frequency_and_status() {
        let mut conn = db::test_conn();
        let template = setup_template(&mut conn);
        submit(&mut conn, &template, "J. Smith", 2, None);
        submit(&mut conn, &template, "A. Jones", 1, Some("worn seal on pump"));
        submit(&mut conn, &template, "A. Jones", 0, None);

        let all = list_checks(&conn, "owner-1", "ride-1", &HistoryFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let smith = HistoryFilter {
            search: Some("smith".to_string()),
            ..Default::default()
        };
        assert_eq!(list_checks(&conn, "owner-1", "ride-1", &smith).unwrap().len(), 1);

        let seal = HistoryFilter {
            search: Some("Seal".to_string()),
            ..Default::default()
        };
        assert_eq!(list_checks(&conn, "owner-1", "ride-1", &seal).unwrap().len(), 1);

        let failed = HistoryFilter {
            status: Some(CheckStatus::Failed),
            ..Default::default()
        };
        assert_eq!(
            list_checks(&conn, "owner-1", "ride-1", &failed).unwrap().len(),
            1
        );

        let monthly = HistoryFilter {
            frequency: Some(CheckFrequency::Monthly),
            ..Default::default()
        };
        assert!(list_checks(&conn, "owner-1", "ride-1", &monthly)
            .unwrap()
            .is_empty());

        // Other owners never see these rows.
        assert!(
            list_checks(&conn, "owner-2", "ride-1", &HistoryFilter::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let query = HistoryQuery {
            from: Some("2026-02-01".to_string()),
            to: Some("2026-01-01".to_string()),
            q: None,
            frequency: None,
            status: None,
        };
        assert!(HistoryFilter::from_query(&query).is_err());
    }
}
