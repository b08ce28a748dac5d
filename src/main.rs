mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::auth_service::AuthService;
use crate::services::city_catalog::CityCatalog;
use crate::services::mailer::{LogMailer, Mailer};
use crate::services::seed_service::SeedService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    info!("connecting to database");
    let db = db::establish_connection(&config.database_url)
        .await
        .map_err(io::Error::other)?;

    if config.auto_migrate {
        db::sync_schema(&db).await.map_err(io::Error::other)?;
    }

    if let Some(admin) = &config.admin {
        if AuthService::ensure_admin(&db, admin, config.password_iterations)
            .await
            .map_err(io::Error::other)?
        {
            info!(email = %admin.email, "admin account created");
        }
    }

    if config.demo_seed && SeedService::seed_demo(&db, config.password_iterations).await.map_err(io::Error::other)? {
        info!("demo data seeded");
    }

    let catalog = match &config.cities_file {
        Some(path) => CityCatalog::from_file(path).await,
        None => CityCatalog::bundled(),
    }
    .map_err(io::Error::other)?;
    info!(cities = catalog.len(), "city catalog loaded");

    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let bind_addr = config.bind_addr;

    let db = web::Data::new(db);
    let config = web::Data::new(config);
    let catalog = web::Data::new(catalog);
    let mailer = web::Data::from(mailer);

    info!(%bind_addr, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(config.clone())
            .app_data(catalog.clone())
            .app_data(mailer.clone())
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}

/// RUST_LOG filters (default `info`); LOG_FORMAT=json switches to JSON lines
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
