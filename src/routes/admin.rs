use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppResult;
use crate::middleware::AdminUser;
use crate::services::admin_service::AdminService;

/// GET /api/admin/stats - Platform counts and newest users (ADMIN)
#[get("/stats")]
pub async fn admin_stats(admin: AdminUser, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    info!(admin = %admin.0.email, "admin stats requested");
    let stats = AdminService::stats(db.get_ref(), Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").service(admin_stats));
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::config::AdminBootstrap;
    use crate::services::auth_service::AuthService;
    use crate::test_support::{session_of, signup_request, test_app, test_db, FAST_ITERATIONS};

    #[actix_web::test]
    async fn stats_require_an_admin_session() {
        let db = test_db().await;
        let bootstrap = AdminBootstrap { email: "root@example.com".into(), password: "rootpass".into() };
        assert!(AuthService::ensure_admin(&db, &bootstrap, FAST_ITERATIONS).await.unwrap());
        let app = test::init_service(test_app(db)).await;

        let req = test::TestRequest::get().uri("/api/admin/stats").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let user = session_of(&test::call_service(&app, signup_request("Ana", "ana@example.com").to_request()).await);
        let req = test::TestRequest::get().uri("/api/admin/stats").cookie(user).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Forbidden");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "root@example.com", "password": "rootpass" }))
            .to_request();
        let admin = session_of(&test::call_service(&app, req).await);

        let req = test::TestRequest::get().uri("/api/admin/stats").cookie(admin).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let stats: Value = test::read_body_json(resp).await;
        assert_eq!(stats["totalUsers"], 2);
        assert_eq!(stats["recentUsers"].as_array().unwrap().len(), 2);
    }
}
