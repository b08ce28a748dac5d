use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Every failure a handler can surface.
///
/// Client-facing variants carry the message sent back in `{"error": ...}`.
/// `Database` and `Internal` are logged and answered with a generic 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the database rejected a write on a unique index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        )
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // field_errors() is a HashMap; sort so the reported field is stable
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {field}"),
                })
            })
            .unwrap_or_else(|| "Invalid request".to_string());

        Self::BadRequest(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Database(_) | Self::Internal(_) => {
                error!(error = %self, "request failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(AppError::bad_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(AppError::unauthorized(), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Forbidden, StatusCode::FORBIDDEN)]
    #[case(AppError::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Database(DbErr::Custom("boom".into())), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_variant(#[case] err: AppError, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    async fn body_of(err: AppError) -> Value {
        let response = err.error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[actix_web::test]
    async fn client_errors_carry_their_message() {
        let body = body_of(AppError::bad_request("Destination already saved")).await;
        assert_eq!(body["error"], "Destination already saved");
    }

    #[actix_web::test]
    async fn server_errors_are_redacted() {
        let body = body_of(AppError::Database(DbErr::Custom("relation users missing".into()))).await;
        assert_eq!(body["error"], "Internal Server Error");
    }

    #[test]
    fn validation_errors_report_custom_message() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
            password: String,
        }

        let err: AppError = Probe { password: "abc".into() }
            .validate()
            .expect_err("too short")
            .into();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }
}
