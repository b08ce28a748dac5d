use chrono::{Duration, Utc};
use rand::RngCore;
use sea_orm::*;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};
use crate::models::users::{self, Role};
use crate::services::mailer::Mailer;
use crate::utils::password;

const EMAIL_TAKEN: &str = "User already exists with this email";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

pub const RESET_TOKEN_TTL_HOURS: i64 = 1;
const RESET_TOKEN_BYTES: usize = 32;

pub struct AuthService;

impl AuthService {
    /// Create a USER account; the email must not be registered yet
    pub async fn signup(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        plain_password: &str,
        iterations: u32,
    ) -> AppResult<users::Model> {
        let email = normalize_email(email);

        // 1. Refuse a second account for the same email
        if Self::find_by_email(db, &email).await?.is_some() {
            return Err(AppError::bad_request(EMAIL_TAKEN));
        }

        // 2. Hash and insert (the unique index still guards a concurrent signup)
        let password_hash = password::hash_password(plain_password, iterations)?;
        let user = create_user(db, name.trim(), &email, password_hash, Role::User)
            .await
            .map_err(|e| if e.is_unique_violation() { AppError::bad_request(EMAIL_TAKEN) } else { e })?;

        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Check credentials; unknown email and wrong password fail the same way
    pub async fn login(
        db: &DatabaseConnection,
        email: &str,
        plain_password: &str,
    ) -> AppResult<users::Model> {
        let invalid = || AppError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let user = Self::find_by_email(db, &normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        if !password::verify_password(plain_password, &user.password_hash)? {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Store a one-hour reset token and mail the link.
    /// Silent when the email is unknown so account existence is not revealed.
    pub async fn forgot_password(
        db: &DatabaseConnection,
        mailer: &dyn Mailer,
        app_url: &str,
        email: &str,
    ) -> AppResult<()> {
        let Some(user) = Self::find_by_email(db, &normalize_email(email)).await? else {
            return Ok(());
        };

        let token = reset_token();
        let expiry = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        let to = user.email.clone();
        let mut active: users::ActiveModel = user.into();
        active.reset_token = Set(Some(token.clone()));
        active.reset_token_expiry = Set(Some(expiry));
        active.update(db).await?;

        let link = format!("{app_url}/reset-password?token={token}");
        if let Err(e) = mailer.send_password_reset(&to, &link).await {
            error!(error = %e, "failed to send password reset mail");
        }

        Ok(())
    }

    /// Replace the password of the account holding an unexpired reset token
    pub async fn reset_password(
        db: &DatabaseConnection,
        token: &str,
        new_password: &str,
        iterations: u32,
    ) -> AppResult<()> {
        let invalid = || AppError::bad_request(INVALID_RESET_TOKEN);

        let token = token.trim();
        if token.is_empty() {
            return Err(invalid());
        }

        let user = users::Entity::find()
            .filter(users::Column::ResetToken.eq(token))
            .one(db)
            .await?
            .ok_or_else(invalid)?;

        match user.reset_token_expiry {
            Some(expiry) if expiry > Utc::now() => {}
            _ => return Err(invalid()),
        }

        let user_id = user.id.clone();
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password::hash_password(new_password, iterations)?);
        active.reset_token = Set(None);
        active.reset_token_expiry = Set(None);
        active.update(db).await?;

        info!(%user_id, "password reset");
        Ok(())
    }

    /// Create the configured administrator unless the email is already taken.
    /// Returns true when an account was created.
    pub async fn ensure_admin(
        db: &DatabaseConnection,
        admin: &AdminBootstrap,
        iterations: u32,
    ) -> AppResult<bool> {
        let email = normalize_email(&admin.email);

        if let Some(existing) = Self::find_by_email(db, &email).await? {
            if existing.role != Role::Admin {
                warn!(%email, "ADMIN_EMAIL belongs to a non-admin account, left unchanged");
            }
            return Ok(false);
        }

        let password_hash = password::hash_password(&admin.password, iterations)?;
        let user = create_user(db, "Administrator", &email, password_hash, Role::Admin).await?;

        info!(user_id = %user.id, %email, "administrator account created");
        Ok(true)
    }

    pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?)
    }
}

/// Insert a user row with a fresh id
pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: &str,
    password_hash: String,
    role: Role,
) -> AppResult<users::Model> {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        name: Set(name.to_string()),
        role: Set(role),
        photo: Set(None),
        language: Set(None),
        reset_token: Set(None),
        reset_token_expiry: Set(None),
        created_at: Set(Utc::now()),
    };

    Ok(user.insert(db).await?)
}

/// Emails are compared trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::testing::RecordingMailer;
    use crate::test_support::{test_db, FAST_ITERATIONS};

    #[actix_web::test]
    async fn signup_rejects_duplicate_email_ignoring_case() {
        let db = test_db().await;
        AuthService::signup(&db, "Ana", "ana@example.com", "secret1", FAST_ITERATIONS)
            .await
            .unwrap();

        let err = AuthService::signup(&db, "Ana 2", " ANA@example.com ", "secret2", FAST_ITERATIONS)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), EMAIL_TAKEN);
    }

    #[actix_web::test]
    async fn login_checks_password() {
        let db = test_db().await;
        let created = AuthService::signup(&db, "Ana", "ana@example.com", "secret1", FAST_ITERATIONS)
            .await
            .unwrap();

        let user = AuthService::login(&db, "Ana@Example.com", "secret1").await.unwrap();
        assert_eq!(user.id, created.id);

        let wrong = AuthService::login(&db, "ana@example.com", "nope").await.unwrap_err();
        let unknown = AuthService::login(&db, "bob@example.com", "secret1").await.unwrap_err();
        assert_eq!(wrong.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown.to_string(), INVALID_CREDENTIALS);
    }

    #[actix_web::test]
    async fn reset_flow_replaces_password_once() {
        let db = test_db().await;
        let mailer = RecordingMailer::default();
        AuthService::signup(&db, "Ana", "ana@example.com", "secret1", FAST_ITERATIONS)
            .await
            .unwrap();

        AuthService::forgot_password(&db, &mailer, "http://app.test", "ana@example.com")
            .await
            .unwrap();

        let (to, link) = mailer.sent.lock().unwrap()[0].clone();
        assert_eq!(to, "ana@example.com");
        let token = link
            .strip_prefix("http://app.test/reset-password?token=")
            .expect("reset link format")
            .to_string();
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);

        AuthService::reset_password(&db, &token, "brand-new", FAST_ITERATIONS)
            .await
            .unwrap();
        assert!(AuthService::login(&db, "ana@example.com", "brand-new").await.is_ok());

        // the token is single use
        let err = AuthService::reset_password(&db, &token, "again!", FAST_ITERATIONS)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_RESET_TOKEN);
    }

    #[actix_web::test]
    async fn expired_reset_token_is_refused() {
        let db = test_db().await;
        let user = AuthService::signup(&db, "Ana", "ana@example.com", "secret1", FAST_ITERATIONS)
            .await
            .unwrap();

        let mut active: users::ActiveModel = user.into();
        active.reset_token = Set(Some("stale".to_string()));
        active.reset_token_expiry = Set(Some(Utc::now() - Duration::minutes(1)));
        active.update(&db).await.unwrap();

        let err = AuthService::reset_password(&db, "stale", "brand-new", FAST_ITERATIONS)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_RESET_TOKEN);
    }

    #[actix_web::test]
    async fn forgot_password_for_unknown_email_sends_nothing() {
        let db = test_db().await;
        let mailer = RecordingMailer::default();

        AuthService::forgot_password(&db, &mailer, "http://app.test", "ghost@example.com")
            .await
            .unwrap();
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn admin_bootstrap_runs_once() {
        let db = test_db().await;
        let admin = AdminBootstrap {
            email: "root@globetrotter.com".to_string(),
            password: "admin-pass".to_string(),
        };

        assert!(AuthService::ensure_admin(&db, &admin, FAST_ITERATIONS).await.unwrap());
        assert!(!AuthService::ensure_admin(&db, &admin, FAST_ITERATIONS).await.unwrap());

        let stored = AuthService::find_by_email(&db, "root@globetrotter.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.role, Role::Admin);
    }
}
