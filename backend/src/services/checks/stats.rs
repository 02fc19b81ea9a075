use actix_web::web;
use chrono::Datelike;
use common::model::check::{CheckStats, CheckStatus, CheckWithResults, MonthlyCheckStats};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db;
use crate::services::checks::history::{list_checks, HistoryFilter, HistoryQuery};

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
    match compute_stats(&conn, &owner_id, &ride_id, &filter) {
        Ok(stats) => actix_web::HttpResponse::Ok().json(stats),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

fn pass_rate(passed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (passed as f64 * 100.0 / total as f64).round() as u32
}

/// Aggregate counters plus per-calendar-month pass rates over the filtered
/// history of one ride.
pub fn compute_stats(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    filter: &HistoryFilter,
) -> Result<CheckStats, String> {
    let checks = list_checks(conn, owner_id, ride_id, filter)?;
    Ok(aggregate(&checks))
}

fn aggregate(checks: &[CheckWithResults]) -> CheckStats {
    let mut passed = 0u32;
    let mut partial = 0u32;
    let mut failed = 0u32;
    // (year, month) -> (total, passed); keys sorted for the output.
    let mut months = std::collections::BTreeMap::<(i32, u32), (u32, u32)>::new();

    for entry in checks {
        match entry.check.status {
            CheckStatus::Passed => passed += 1,
            CheckStatus::Partial => partial += 1,
            CheckStatus::Failed => failed += 1,
        }
        let date = entry.check.check_date.date_naive();
        let bucket = months.entry((date.year(), date.month())).or_insert((0, 0));
        bucket.0 += 1;
        if entry.check.status == CheckStatus::Passed {
            bucket.1 += 1;
        }
    }

    let total = checks.len() as u32;
    CheckStats {
        total,
        passed,
        partial,
        failed,
        pass_rate: pass_rate(passed, total),
        months: months
            .into_iter()
            .map(|((year, month), (total, passed))| MonthlyCheckStats {
                year,
                month,
                total,
                passed,
                pass_rate: pass_rate(passed, total),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use common::model::check::Check;
    use common::model::template::CheckFrequency;

    fn check(date: &str, status: CheckStatus) -> CheckWithResults {
        CheckWithResults {
            check: Check {
                id: format!("c-{}-{}", date, status.as_str()),
                owner_id: "owner-1".to_string(),
                ride_id: "ride-1".to_string(),
                template_id: "t-1".to_string(),
                frequency: CheckFrequency::Daily,
                check_date: NaiveDateTime::parse_from_str(
                    &format!("{} 08:00:00", date),
                    "%Y-%m-%d %H:%M:%S",
                )
                .unwrap()
                .and_utc(),
                inspector_name: "J. Smith".to_string(),
                notes: None,
                status,
                weather: None,
                compliance_officer: None,
                signature: None,
                environment_notes: None,
            },
            results: Vec::new(),
        }
    }

    #[test]
    fn empty_history_is_all_zeroes() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.pass_rate, 0);
        assert!(stats.months.is_empty());
    }

    #[test]
    fn groups_by_calendar_month_with_rounded_rates() {
        let stats = aggregate(&[
            check("2026-01-05", CheckStatus::Passed),
            check("2026-01-20", CheckStatus::Partial),
            check("2026-01-28", CheckStatus::Passed),
            check("2026-02-02", CheckStatus::Failed),
        ]);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.partial, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.pass_rate, 50);

        assert_eq!(stats.months.len(), 2);
        let january = &stats.months[0];
        assert_eq!((january.year, january.month), (2026, 1));
        assert_eq!(january.total, 3);
        assert_eq!(january.passed, 2);
        assert_eq!(january.pass_rate, 67);
        let february = &stats.months[1];
        assert_eq!((february.year, february.month), (2026, 2));
        assert_eq!(february.pass_rate, 0);
    }
}
