//! Email dispatch as a background job. The job renders the selected
//! checks into one PDF in the outbox directory and records an
//! `EmailDispatch` row; an external sender drains the outbox. No mail is
//! sent from this process.

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::jobs::JobStatus;
use common::requests::EmailReportRequest;
use rusqlite::params;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::checks::history::load_check;
use crate::services::reports::pdf;
use crate::services::rides;

pub async fn process(
    cfg: web::Data<AppConfig>,
    state: web::Data<JobsState>,
    payload: web::Json<EmailReportRequest>,
) -> impl Responder {
    match schedule_email_dispatch(cfg.get_ref().clone(), &state, payload.into_inner()).await {
        Ok(job_id) => HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id })),
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

/// Cheap shape check only; deliverability is the external sender's
/// problem.
pub fn validate_request(req: &EmailReportRequest) -> Result<(), String> {
    if req.check_ids.is_empty() {
        return Err("At least one check must be selected".to_string());
    }
    if !(req.recipient_email.contains('@') && req.recipient_email.contains('.')) {
        return Err(format!("Bad recipient address: {}", req.recipient_email));
    }
    Ok(())
}

pub async fn schedule_email_dispatch(
    cfg: AppConfig,
    state: &JobsState,
    req: EmailReportRequest,
) -> Result<String, String> {
    validate_request(&req)?;
    let job_id = state.register().await;
    let tx = state.tx.clone();
    let job_id_task = job_id.clone();

    tokio::spawn(async move {
        let _ = tx
            .send(JobUpdate::new(job_id_task.clone(), JobStatus::InProgress(0)))
            .await;

        let job_id_blocking = job_id_task.clone();
        let handle =
            tokio::task::spawn_blocking(move || dispatch_blocking(&job_id_blocking, &cfg, &req));

        let status = match handle.await {
            Ok(Ok(path)) => JobStatus::Completed(path),
            Ok(Err(e)) => JobStatus::Failed(e),
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        let _ = tx.send(JobUpdate::new(job_id_task, status)).await;
    });

    Ok(job_id)
}

/// Render the combined report into the outbox and record the dispatch.
fn dispatch_blocking(
    job_id: &str,
    cfg: &AppConfig,
    req: &EmailReportRequest,
) -> Result<String, String> {
    let conn = db::open(&cfg.database_path)?;

    let mut checks = Vec::with_capacity(req.check_ids.len());
    for check_id in &req.check_ids {
        let entry = load_check(&conn, check_id)?;
        if entry.check.owner_id != req.owner_id {
            return Err("Check not found".to_string());
        }
        checks.push(entry);
    }
    let ride = rides::load_ride(&conn, &checks[0].check.ride_id)?;

    let outbox_dir = cfg.outbox_dir();
    let pdf_path = outbox_dir.join(format!("{}.pdf", job_id));
    pdf::render_checks_report(&checks, &ride, &cfg.fonts_dir, &pdf_path)?;

    conn.execute(
        "INSERT INTO email_dispatches
         (id, owner_id, check_ids, recipient_email, recipient_name, pdf_path, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            Uuid::new_v4().to_string(),
            req.owner_id,
            serde_json::to_string(&req.check_ids).map_err(|e| e.to_string())?,
            req.recipient_email,
            req.recipient_name,
            pdf_path.display().to_string(),
            db::datetime_to_sql(&Utc::now())
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(pdf_path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(recipient: &str, check_ids: Vec<String>) -> EmailReportRequest {
        EmailReportRequest {
            owner_id: "owner-1".to_string(),
            check_ids,
            recipient_email: recipient.to_string(),
            recipient_name: None,
        }
    }

    #[test]
    fn recipient_shape_is_checked() {
        let ids = vec!["check-1".to_string()];
        assert!(validate_request(&request("ops@example.com", ids.clone())).is_ok());
        assert!(validate_request(&request("not-an-address", ids.clone())).is_err());
        assert!(validate_request(&request("missing-dot@example", ids)).is_err());
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert!(validate_request(&request("ops@example.com", Vec::new())).is_err());
    }
}
