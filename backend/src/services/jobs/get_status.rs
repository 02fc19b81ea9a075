use actix_web::{web, Responder};

use crate::job_controller::state::JobsState;

pub(crate) async fn process(
    job_id: web::Path<String>,
    state: web::Data<JobsState>,
) -> impl Responder {
    let jobs = state.jobs.read().await;
    match jobs.get(job_id.as_str()) {
        Some(status) => actix_web::HttpResponse::Ok().json(status),
        None => actix_web::HttpResponse::NotFound().body("Job ID not found"),
    }
}
