use actix_web::{
    cookie::{time, Cookie, SameSite},
    dev::Payload,
    http::header,
    web, FromRequest, HttpRequest,
};
use futures::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::users::{self, Role};
use crate::utils::jwt::{self, SESSION_TTL_DAYS};

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "auth-token";

/// Account of the authenticated caller, resolved from the session token
/// Used as an extractor in protected routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// An authenticated caller whose role is ADMIN
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Why a request carries no usable session
#[derive(Debug)]
pub enum SessionError {
    Missing,
    Invalid,
    /// The token verifies but its account was deleted
    UnknownUser,
    Database(DbErr),
}

impl AuthUser {
    /// Decode the caller's session from the auth-token cookie, falling back
    /// to an `Authorization: Bearer <token>` header, then load the account.
    /// Name, email and role are read from the user row, not the claims.
    pub async fn from_http_request(req: &HttpRequest) -> Result<Self, SessionError> {
        let token = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| bearer_token(req))
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::Missing)?;

        let config = req
            .app_data::<web::Data<AppConfig>>()
            .ok_or(SessionError::Invalid)?;

        let claims = jwt::verify_token(&token, &config.jwt_secret).map_err(|e| {
            debug!(error = %e, "rejected session token");
            SessionError::Invalid
        })?;

        let db = req
            .app_data::<web::Data<DatabaseConnection>>()
            .ok_or(SessionError::Invalid)?;

        let user = users::Entity::find_by_id(claims.sub.as_str())
            .one(db.get_ref())
            .await
            .map_err(SessionError::Database)?
            .ok_or_else(|| {
                debug!(user_id = %claims.sub, "session for a deleted account");
                SessionError::UnknownUser
            })?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Database(e) => AppError::Database(e),
            _ => AppError::unauthorized(),
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { AuthUser::from_http_request(&req).await.map_err(AppError::from) })
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match AuthUser::from_http_request(&req).await {
                Ok(user) if user.role == Role::Admin => Ok(AdminUser(user)),
                Ok(_) => Err(AppError::Forbidden),
                Err(e) => Err(AppError::from(e)),
            }
        })
    }
}

/// The cookie set after signup/login
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .finish()
}

/// An expired, empty cookie that makes the browser drop the session
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}
