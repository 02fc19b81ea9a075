//! Bulk PDF export as a background job: render every check in the
//! requested range, one page per check, reporting per-page progress while
//! the client polls `GET /api/jobs/{job_id}`.

use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::requests::PdfExportRequest;
use genpdf::elements::PageBreak;
use std::fs::File;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::db;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::checks::history::{list_checks, HistoryFilter};
use crate::services::reports::pdf;
use crate::services::rides;

/// Progress message from the blocking worker: either a whole-job status
/// change or one rendered page, translated to a percentage for the shared
/// job map.
#[derive(Debug)]
pub enum ReportUpdate {
    Job(JobStatus),
    Page { index: usize, total: usize },
}

pub async fn process(
    cfg: web::Data<AppConfig>,
    state: web::Data<JobsState>,
    payload: web::Json<PdfExportRequest>,
) -> impl Responder {
    match schedule_pdf_export(cfg.get_ref().clone(), &state, payload.into_inner()).await {
        Ok(job_id) => HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id })),
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

/// Register the job, spawn its worker and return the job id immediately.
pub async fn schedule_pdf_export(
    cfg: AppConfig,
    state: &JobsState,
    req: PdfExportRequest,
) -> Result<String, String> {
    let job_id = state.register().await;
    let tx = state.tx.clone();
    let job_id_task = job_id.clone();

    tokio::spawn(async move {
        // Dedicated channel for this job; a listener folds its updates
        // into the central job map.
        let (report_tx, mut report_rx) = mpsc::channel::<ReportUpdate>(100);
        let updater_tx = tx.clone();
        let job_id_updater = job_id_task.clone();
        tokio::spawn(async move {
            while let Some(update) = report_rx.recv().await {
                let status = match update {
                    ReportUpdate::Job(status) => status,
                    ReportUpdate::Page { index, total } => {
                        let progress = if total > 0 {
                            ((index + 1) as f32 / total as f32 * 100.0) as u32
                        } else {
                            100
                        };
                        JobStatus::InProgress(progress)
                    }
                };
                let _ = updater_tx
                    .send(JobUpdate::new(job_id_updater.clone(), status))
                    .await;
            }
        });

        let job_id_blocking = job_id_task.clone();
        let handle = tokio::task::spawn_blocking(move || {
            export_blocking(report_tx, &job_id_blocking, &cfg, &req)
        });

        let status = match handle.await {
            Ok(Ok(path)) => JobStatus::Completed(path),
            Ok(Err(e)) => JobStatus::Failed(e),
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        let _ = tx.send(JobUpdate::new(job_id_task, status)).await;
    });

    Ok(job_id)
}

/// The synchronous worker: load the filtered history, append a page per
/// check and render to `{reports_dir}/{job_id}.pdf`.
fn export_blocking(
    tx: mpsc::Sender<ReportUpdate>,
    job_id: &str,
    cfg: &AppConfig,
    req: &PdfExportRequest,
) -> Result<String, String> {
    let _ = tx.blocking_send(ReportUpdate::Job(JobStatus::InProgress(0)));

    let conn = db::open(&cfg.database_path)?;
    let ride = rides::load_ride(&conn, &req.ride_id)?;
    let filter = HistoryFilter {
        from: req.from,
        to: req.to,
        ..Default::default()
    };
    let checks = list_checks(&conn, &req.owner_id, &req.ride_id, &filter)?;
    if checks.is_empty() {
        return Err("No checks in the selected range".to_string());
    }

    let mut doc = pdf::configure_document(&cfg.fonts_dir)?;
    let mut temp_files = Vec::new();
    let total = checks.len();
    for (i, entry) in checks.iter().enumerate() {
        if i > 0 {
            doc.push(PageBreak::new());
        }
        pdf::append_check_page(&mut doc, entry, &ride, &mut temp_files)?;
        let _ = tx.blocking_send(ReportUpdate::Page { index: i, total });
    }

    let reports_dir = cfg.reports_dir();
    std::fs::create_dir_all(&reports_dir).map_err(|e| e.to_string())?;
    let output = reports_dir.join(format!("{}.pdf", job_id));
    let mut out_file = File::create(&output).map_err(|e| e.to_string())?;
    doc.render(&mut out_file).map_err(|e| e.to_string())?;

    Ok(output.display().to_string())
}
