use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppResult;
use crate::services::community_service::CommunityService;

/// GET /api/community/trips - Latest public trips with owner and stop count (PUBLIC)
#[get("/trips")]
pub async fn community_trips(db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let trips = CommunityService::public_trips(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(trips))
}

/// GET /api/public/trips/{id} - Read-only view of a public trip (PUBLIC)
#[get("/trips/{id}")]
pub async fn public_trip(path: web::Path<String>, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let trip = CommunityService::public_trip(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(trip))
}

pub fn community_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/community").service(community_trips))
        .service(web::scope("/public").service(public_trip));
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_support::{session_of, signup_request, test_app, test_db};

    #[actix_web::test]
    async fn only_public_trips_are_visible_anonymously() {
        let app = test::init_service(test_app(test_db().await)).await;
        let cookie = session_of(&test::call_service(&app, signup_request("Ana", "ana@example.com").to_request()).await);

        let mut ids = Vec::new();
        for (title, public) in [("Shared", true), ("Secret", false)] {
            let req = test::TestRequest::post()
                .uri("/api/trips")
                .cookie(cookie.clone())
                .set_json(json!({
                    "title": title, "startDate": "2026-05-01", "endDate": "2026-05-03", "isPublic": public
                }))
                .to_request();
            let trip: Value = test::call_and_read_body_json(&app, req).await;
            ids.push(trip["id"].as_str().unwrap().to_string());
        }

        let req = test::TestRequest::get().uri("/api/community/trips").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["title"], "Shared");
        assert_eq!(listed[0]["ownerName"], "Ana");
        assert_eq!(listed[0]["stopCount"], 0);

        let req = test::TestRequest::get().uri(&format!("/api/public/trips/{}", ids[0])).to_request();
        let detail: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(detail["totalCost"], 0.0);
        assert_eq!(detail["stops"], json!([]));

        let req = test::TestRequest::get().uri(&format!("/api/public/trips/{}", ids[1])).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
