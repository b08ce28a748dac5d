// Shared fixtures for unit and HTTP tests

use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::config::AppConfig;
use crate::db;
use crate::middleware::auth::SESSION_COOKIE;
use crate::models::users::{self, Role};
use crate::models::{activity, trip_stop};
use crate::routes;
use crate::services::activity_service::NewActivity;
use crate::services::auth_service::create_user;
use crate::services::city_catalog::CityCatalog;
use crate::services::mailer::testing::RecordingMailer;
use crate::services::mailer::Mailer;
use crate::services::saved_destination_service::NewDestination;
use crate::services::stop_service::NewStop;
use crate::services::trip_service::NewTrip;
use crate::utils::password::hash_password;

/// Keeps PBKDF2 cheap in tests
pub const FAST_ITERATIONS: u32 = 1_000;

pub const TEST_PASSWORD: &str = "secret1";

/// A fresh in-memory database with the schema applied
pub async fn test_db() -> DatabaseConnection {
    let db = db::establish_connection("sqlite::memory:").await.unwrap();
    db::sync_schema(&db).await.unwrap();
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        jwt_secret: "test-secret".to_string(),
        app_url: "http://app.test".to_string(),
        cookie_secure: false,
        password_iterations: FAST_ITERATIONS,
        auto_migrate: true,
        demo_seed: false,
        admin: None,
        cities_file: None,
    }
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

/// A plain user named after the local part of the email
pub async fn insert_user(db: &DatabaseConnection, email: &str) -> users::Model {
    let name = email.split('@').next().unwrap_or(email);
    let hash = hash_password(TEST_PASSWORD, FAST_ITERATIONS).unwrap();
    create_user(db, name, email, hash, Role::User).await.unwrap()
}

pub fn new_trip(title: &str, start: &str, end: &str) -> NewTrip {
    NewTrip {
        title: title.to_string(),
        description: None,
        start_date: date(start),
        end_date: date(end),
        is_public: false,
        budget: None,
    }
}

/// A stop whose display name is the capitalised city id
pub fn new_stop(city_id: &str, arrival: &str, departure: &str) -> NewStop {
    let mut chars = city_id.chars();
    let city_name = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();

    NewStop {
        city_id: city_id.to_string(),
        city_name,
        arrival_date: date(arrival),
        departure_date: date(departure),
        order: None,
    }
}

pub fn new_activity(stop_id: &str, name: &str, cost: &str) -> NewActivity {
    NewActivity {
        trip_stop_id: stop_id.to_string(),
        name: name.to_string(),
        cost: cost.parse().unwrap(),
        currency: "USD".to_string(),
        duration: 60,
        start_time: None,
    }
}

pub fn new_destination(city_id: &str) -> NewDestination {
    NewDestination {
        city_id: city_id.to_string(),
        city_name: city_id.to_uppercase(),
        country: "Somewhere".to_string(),
        region: None,
    }
}

pub fn stop_model(id: &str, city_name: &str, arrival: &str, departure: &str, order: i32) -> trip_stop::Model {
    trip_stop::Model {
        id: id.to_string(),
        trip_id: "trip".to_string(),
        city_id: city_name.to_lowercase(),
        city_name: city_name.to_string(),
        arrival_date: date(arrival),
        departure_date: date(departure),
        order,
    }
}

pub fn activity_model(id: &str, stop_id: &str, name: &str, cost: &str) -> activity::Model {
    activity::Model {
        id: id.to_string(),
        trip_stop_id: stop_id.to_string(),
        name: name.to_string(),
        cost: cost.parse::<Decimal>().unwrap(),
        currency: "USD".to_string(),
        duration: 60,
        start_time: None,
        created_at: Utc::now(),
    }
}

/// The full API over `db`, with a mailer that only logs
pub fn test_app(
    db: DatabaseConnection,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    test_app_with_mailer(db, Arc::new(RecordingMailer::default()))
}

pub fn test_app_with_mailer(
    db: DatabaseConnection,
    mailer: Arc<RecordingMailer>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mailer: Arc<dyn Mailer> = mailer;

    App::new()
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(test_config()))
        .app_data(web::Data::new(CityCatalog::bundled().unwrap()))
        .app_data(web::Data::from(mailer))
        .configure(routes::configure_routes)
}

/// POST /api/auth/signup with the shared test password
pub fn signup_request(name: &str, email: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "name": name, "email": email, "password": TEST_PASSWORD }))
}

/// The session cookie a response set
pub fn session_of<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("response sets the session cookie")
}
