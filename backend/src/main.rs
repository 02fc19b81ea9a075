use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::job_controller::state::{start_job_updater, JobsState};
use backend::{db, services};
use env_logger::Env;
use log::info;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cfg = AppConfig::from_env();

    // Apply the schema and seed the library before accepting requests.
    let conn = db::open(&cfg.database_path).map_err(io::Error::other)?;
    db::init(&conn).map_err(io::Error::other)?;
    drop(conn);
    std::fs::create_dir_all(&cfg.data_dir)?;

    // Initialize job controller state
    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState {
        jobs: Arc::new(RwLock::new(HashMap::new())),
        tx,
    };

    // Start job updater task
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    info!("Server running at http://{}:{}", cfg.host, cfg.port);

    let bind = (cfg.host.clone(), cfg.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(cfg.clone()))
            .service(services::rides::configure_routes())
            .service(services::library::configure_routes())
            .service(services::templates::configure_routes())
            .service(services::checks::configure_routes())
            .service(services::schedules::configure_routes())
            .service(services::schedules::maintenance_routes())
            .service(services::documents::configure_routes())
            .service(services::reports::configure_routes())
            .service(services::jobs::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
