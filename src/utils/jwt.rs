use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::error::AppError;
use crate::models::users::{self, Role};

/// Lifetime of a session token, and of the cookie carrying it
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // user id
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,        // expiration timestamp
}

/// Sign a session token for a user
pub fn generate_token(user: &users::Model, secret: &str) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(SESSION_TTL_DAYS))
        .ok_or_else(|| AppError::internal("Failed to calculate expiration"))?
        .timestamp();

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
}

/// Verify the signature and expiry of a session token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
}
