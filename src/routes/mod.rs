pub mod activities;
pub mod admin;
pub mod auth;
pub mod community;
pub mod dashboard;
pub mod health;
pub mod profile;
pub mod search;
pub mod stops;
pub mod trips;

use actix_web::{error, web, HttpRequest};

use crate::error::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .service(health::health_check)
            .configure(auth::auth_routes)
            // before /trips: a matched scope never falls through to the next one
            .configure(stops::stops_routes)
            .configure(activities::activities_routes)
            .configure(trips::trips_routes)
            .configure(search::search_routes)
            .configure(profile::profile_routes)
            .configure(community::community_routes)
            .configure(dashboard::dashboard_routes)
            .configure(admin::admin_routes)
    );
}

// Malformed bodies, paths and query strings answer 400 {"error": ...}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => format!("Invalid JSON body: {other}"),
        };
        AppError::bad_request(message).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::bad_request(format!("Invalid path: {err}")).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::bad_request(format!("Invalid query: {err}")).into())
}
