use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::models::health::HealthResponse;

/// GET /api/health - Liveness plus database reachability (PUBLIC)
#[get("/health")]
pub async fn health_check(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let database = match db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "database ping failed");
            false
        }
    };

    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
        time: Utc::now(),
    };

    if database {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
