use sea_orm::*;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::dto::ProfileResponse;
use crate::models::{saved_destination, trip, users};
use crate::services::auth_service::normalize_email;
use crate::services::trip_service::delete_trips_cascade;

const EMAIL_IN_USE: &str = "Email already in use";

/// Fields a user may change on their own profile; `None` keeps the current value
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub language: Option<String>,
}

pub struct ProfileService;

impl ProfileService {
    pub async fn get(db: &DatabaseConnection, user_id: &str) -> AppResult<ProfileResponse> {
        let user = Self::find_user(db, user_id).await?;

        let trip_count = trip::Entity::find()
            .filter(trip::Column::UserId.eq(user_id))
            .count(db)
            .await?;
        let saved_destination_count = saved_destination::Entity::find()
            .filter(saved_destination::Column::UserId.eq(user_id))
            .count(db)
            .await?;

        Ok(ProfileResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            photo: user.photo,
            language: user.language,
            role: user.role,
            created_at: user.created_at,
            trip_count,
            saved_destination_count,
        })
    }

    pub async fn update(db: &DatabaseConnection, user_id: &str, changes: ProfileUpdate) -> AppResult<users::Model> {
        let user = Self::find_user(db, user_id).await?;

        let email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = email.as_deref().filter(|e| *e != user.email) {
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .filter(users::Column::Id.ne(user_id))
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(AppError::bad_request(EMAIL_IN_USE));
            }
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(photo) = changes.photo {
            active.photo = Set(Some(photo));
        }
        if let Some(language) = changes.language {
            active.language = Set(Some(language));
        }

        active
            .update(db)
            .await
            .map_err(AppError::from)
            .map_err(|e| if e.is_unique_violation() { AppError::bad_request(EMAIL_IN_USE) } else { e })
    }

    /// Remove the account with its trips (stops, activities) and saved destinations
    pub async fn delete_account(db: &DatabaseConnection, user_id: &str) -> AppResult<()> {
        let user = Self::find_user(db, user_id).await?;

        let txn = db.begin().await?;

        let trip_ids: Vec<String> = trip::Entity::find()
            .filter(trip::Column::UserId.eq(user_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        delete_trips_cascade(&txn, trip_ids).await?;

        saved_destination::Entity::delete_many()
            .filter(saved_destination::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        users::Entity::delete_by_id(user.id.clone()).exec(&txn).await?;

        txn.commit().await?;

        info!(user_id = %user.id, "account deleted");
        Ok(())
    }

    async fn find_user(db: &DatabaseConnection, user_id: &str) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
