use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{clear_session_cookie, session_cookie, SessionError};
use crate::middleware::AuthUser;
use crate::models::dto::UserSummary;
use crate::models::users;
use crate::services::auth_service::AuthService;
use crate::services::mailer::Mailer;
use crate::utils::input::non_blank;
use crate::utils::jwt;

// DTO for signup/register; every field is checked by hand for a single message
#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Validate)]
struct NewAccount {
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: String,
}

/// POST /api/auth/signup and /api/auth/register - Create an account and open a session (PUBLIC)
pub async fn signup(
    body: web::Json<SignupRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    // 1. All three fields are required
    let body = body.into_inner();
    let (Some(name), Some(email), Some(password)) = (
        non_blank(body.name.as_deref()),
        non_blank(body.email.as_deref()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::bad_request("All fields are required"));
    };

    // 2. Email format and password length
    let account = NewAccount { email, password };
    account.validate()?;

    // 3. Create the user
    let user = AuthService::signup(
        db.get_ref(),
        &name,
        &account.email,
        &account.password,
        config.password_iterations,
    )
    .await?;

    // 4. Open the session
    session_response(HttpResponse::Created(), &user, &config)
}

/// POST /api/auth/login - Open a session (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    let (Some(email), Some(password)) = (non_blank(body.email.as_deref()), body.password.as_deref()) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let user = AuthService::login(db.get_ref(), &email, password).await?;
    session_response(HttpResponse::Ok(), &user, &config)
}

/// GET /api/auth/me - Account behind the session token (PROTECTED)
#[get("/me")]
pub async fn me(req: HttpRequest) -> AppResult<HttpResponse> {
    let user = AuthUser::from_http_request(&req).await.map_err(|e| match e {
        SessionError::Missing => AppError::Unauthorized("Not authenticated".to_string()),
        SessionError::Invalid | SessionError::UnknownUser => AppError::Unauthorized("Invalid token".to_string()),
        SessionError::Database(e) => AppError::Database(e),
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "user": {
            "id": user.user_id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
        }
    })))
}

/// POST /api/auth/logout - Drop the session cookie and go back to the login page (PUBLIC)
#[post("/logout")]
pub async fn logout(config: web::Data<AppConfig>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("{}/login", config.app_url)))
        .cookie(clear_session_cookie(config.cookie_secure))
        .finish()
}

/// POST /api/auth/forgot-password - Mail a reset link if the account exists (PUBLIC)
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    mailer: web::Data<dyn Mailer>,
) -> AppResult<HttpResponse> {
    let Some(email) = non_blank(body.email.as_deref()) else {
        return Err(AppError::bad_request("Email is required"));
    };

    AuthService::forgot_password(db.get_ref(), mailer.get_ref(), &config.app_url, &email).await?;

    // same answer whether or not the account exists
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// POST /api/auth/reset-password - Set a new password with a reset token (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    AuthService::reset_password(db.get_ref(), &body.token, &body.password, config.password_iterations).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

fn session_response(
    mut builder: actix_web::HttpResponseBuilder,
    user: &users::Model,
    config: &AppConfig,
) -> AppResult<HttpResponse> {
    let token = jwt::generate_token(user, &config.jwt_secret)?;

    Ok(builder
        .cookie(session_cookie(token, config.cookie_secure))
        .json(json!({
            "success": true,
            "user": UserSummary::from(user),
        })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(web::resource(["/signup", "/register"]).route(web::post().to(signup)))
            .service(login)
            .service(me)
            .service(logout)
            .service(forgot_password)
            .service(reset_password),
    );
}
