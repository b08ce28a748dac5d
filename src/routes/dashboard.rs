use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::dashboard_service::DashboardService;

/// GET /api/dashboard - Trip counts and recently updated trips (PROTECTED)
#[get("/dashboard")]
pub async fn dashboard(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let overview = DashboardService::overview(db.get_ref(), &auth_user.user_id, today).await?;
    Ok(HttpResponse::Ok().json(overview))
}

pub fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}
