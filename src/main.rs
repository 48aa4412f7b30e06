use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod notify;
mod object_storage;
mod routes;
mod seed;
mod settings_cache;
mod sheet;
mod store;

use config::Config;
use notify::{Notifier, WahaClient};
use settings_cache::SettingsCache;
use store::{HrisStore, MemoryStore, SqliteStore};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRIS UNUGHA API"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn HrisStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_db(url).await?;
            info!("Running on SQLite store");
            Arc::new(SqliteStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, running on in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    seed::ensure_default_settings(store.as_ref()).await?;
    if config.seed_on_start {
        seed::load_sample_data(store.as_ref()).await?;
        info!("Sample dataset loaded");
    }

    let notifier: Arc<dyn Notifier> = Arc::new(WahaClient::new());

    let store_data: Data<dyn HrisStore> = Data::from(store);
    let notifier_data: Data<dyn Notifier> = Data::from(notifier);
    let settings_cache = Data::new(SettingsCache::new());

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store_data.clone())
            .app_data(notifier_data.clone())
            .app_data(settings_cache.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            // Configure login + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
