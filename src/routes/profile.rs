use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{clear_session_cookie, session_cookie};
use crate::middleware::AuthUser;
use crate::services::profile_service::{ProfileService, ProfileUpdate};
use crate::services::saved_destination_service::{NewDestination, SavedDestinationService};
use crate::utils::input::non_blank;
use crate::utils::jwt;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub language: Option<String>,
}

#[derive(Validate)]
struct ProfileChanges {
    #[validate(email(message = "Invalid email address"))]
    email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDestinationRequest {
    pub city_id: Option<String>,
    pub city_name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
}

/// GET /api/profile - Current user's profile with counts (PROTECTED)
#[get("")]
pub async fn get_profile(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let profile = ProfileService::get(db.get_ref(), &auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/profile - Update name, email, photo or language; blank fields are ignored (PROTECTED)
/// The session cookie is reissued so its claims match the new name and email.
#[put("")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let changes = ProfileUpdate {
        name: non_blank(body.name.as_deref()),
        email: non_blank(body.email.as_deref()),
        photo: non_blank(body.photo.as_deref()),
        language: non_blank(body.language.as_deref()),
    };
    ProfileChanges { email: changes.email.clone() }.validate()?;

    let user = ProfileService::update(db.get_ref(), &auth_user.user_id, changes).await?;
    let token = jwt::generate_token(&user, &config.jwt_secret)?;

    let profile = ProfileService::get(db.get_ref(), &auth_user.user_id).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, config.cookie_secure))
        .json(profile))
}

/// DELETE /api/profile - Delete the account and everything it owns (PROTECTED)
#[delete("")]
pub async fn delete_profile(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    ProfileService::delete_account(db.get_ref(), &auth_user.user_id).await?;

    Ok(HttpResponse::Ok()
        .cookie(clear_session_cookie(config.cookie_secure))
        .json(json!({ "success": true, "message": "Account deleted" })))
}

/// GET /api/profile/saved-destinations - Bookmarked cities, newest first (PROTECTED)
#[get("/saved-destinations")]
pub async fn list_saved_destinations(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let saved = SavedDestinationService::list(db.get_ref(), &auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(saved))
}

/// POST /api/profile/saved-destinations - Bookmark a city (PROTECTED)
#[post("/saved-destinations")]
pub async fn save_destination(
    auth_user: AuthUser,
    body: web::Json<SaveDestinationRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let (Some(city_id), Some(city_name), Some(country)) = (
        non_blank(body.city_id.as_deref()),
        non_blank(body.city_name.as_deref()),
        non_blank(body.country.as_deref()),
    ) else {
        return Err(AppError::bad_request("Missing required fields: cityId, cityName, country"));
    };

    let input = NewDestination { city_id, city_name, country, region: non_blank(body.region.as_deref()) };
    let saved = SavedDestinationService::save(db.get_ref(), &auth_user.user_id, input).await?;
    Ok(HttpResponse::Created().json(saved))
}

/// DELETE /api/profile/saved-destinations/{id} - Remove a bookmark (PROTECTED)
#[delete("/saved-destinations/{id}")]
pub async fn remove_saved_destination(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    SavedDestinationService::remove(db.get_ref(), &auth_user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .service(get_profile)
            .service(update_profile)
            .service(delete_profile)
            .service(list_saved_destinations)
            .service(save_destination)
            .service(remove_saved_destination),
    );
}
