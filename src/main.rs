mod db;
mod errors;
mod handlers;
mod models;
mod session;
mod store;
mod utils;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use std::collections::HashMap;
use std::env;

use crate::store::postgres::PgStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Initialize the database pool and the store handed to every handler
    let pool = db::create_pool().await;
    let store = web::Data::new(PgStore::new(pool));

    // Fetch the server bind address from an environment variable, default to "127.0.0.1:8080"
    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!("Starting server at {}", bind_address);

    // Set up Prometheus metrics
    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "fitadmin_backend".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .expect("Failed to create Prometheus metrics");

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // Logging middleware
            .wrap(prometheus.clone()) // Prometheus metrics middleware
            .app_data(store.clone())
            .service(
                web::resource("/sessions/start")
                    .route(web::post().to(handlers::session::start_session::<PgStore>)),
            )
            .service(
                web::resource("/sessions/{sessionId}/log-exercise")
                    .route(web::post().to(handlers::session::log_exercise::<PgStore>)),
            )
            .service(
                web::resource("/sessions/{sessionId}/finish")
                    .route(web::patch().to(handlers::session::finish_session::<PgStore>)),
            )
            .service(
                web::resource("/summary/program/{uid}")
                    .route(web::get().to(handlers::session::latest_program_summary::<PgStore>)),
            )
            .service(
                web::resource("/users")
                    .route(web::post().to(handlers::user::create_user::<PgStore>)),
            )
            .service(
                web::resource("/users/{uid}/stats")
                    .route(web::get().to(handlers::user::get_user_stats::<PgStore>)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
