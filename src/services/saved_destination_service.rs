use chrono::Utc;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::saved_destination;

const ALREADY_SAVED: &str = "Destination already saved";

#[derive(Debug, Clone)]
pub struct NewDestination {
    pub city_id: String,
    pub city_name: String,
    pub country: String,
    pub region: Option<String>,
}

pub struct SavedDestinationService;

impl SavedDestinationService {
    /// The user's bookmarks, newest first
    pub async fn list(db: &DatabaseConnection, user_id: &str) -> AppResult<Vec<saved_destination::Model>> {
        Ok(saved_destination::Entity::find()
            .filter(saved_destination::Column::UserId.eq(user_id))
            .order_by_desc(saved_destination::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Bookmark a city; a city can be saved once per user
    pub async fn save(
        db: &DatabaseConnection,
        user_id: &str,
        input: NewDestination,
    ) -> AppResult<saved_destination::Model> {
        // 1. Check first for a readable error
        let existing = saved_destination::Entity::find()
            .filter(saved_destination::Column::UserId.eq(user_id))
            .filter(saved_destination::Column::CityId.eq(&input.city_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(AppError::bad_request(ALREADY_SAVED));
        }

        // 2. Insert; the unique (user_id, city_id) index catches a concurrent save
        let saved = saved_destination::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            city_id: Set(input.city_id),
            city_name: Set(input.city_name),
            country: Set(input.country),
            region: Set(input.region),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(AppError::from)
        .map_err(|e| if e.is_unique_violation() { AppError::bad_request(ALREADY_SAVED) } else { e })?;

        info!(%user_id, city_id = %saved.city_id, "destination saved");
        Ok(saved)
    }

    pub async fn remove(db: &DatabaseConnection, user_id: &str, id: &str) -> AppResult<()> {
        let result = saved_destination::Entity::delete_many()
            .filter(saved_destination::Column::Id.eq(id))
            .filter(saved_destination::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_user, new_destination, test_db};

    #[actix_web::test]
    async fn second_save_of_a_city_is_refused() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let bob = insert_user(&db, "bob@example.com").await;

        SavedDestinationService::save(&db, &ana.id, new_destination("paris")).await.unwrap();
        let err = SavedDestinationService::save(&db, &ana.id, new_destination("paris"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), ALREADY_SAVED);

        // another user may save the same city
        SavedDestinationService::save(&db, &bob.id, new_destination("paris")).await.unwrap();
    }

    #[actix_web::test]
    async fn unique_index_backs_the_check() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        SavedDestinationService::save(&db, &ana.id, new_destination("paris")).await.unwrap();

        // bypass the service check, as a concurrent request would
        let raw = saved_destination::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(ana.id.clone()),
            city_id: Set("paris".to_string()),
            city_name: Set("Paris".to_string()),
            country: Set("France".to_string()),
            region: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .map_err(AppError::from)
        .unwrap_err();
        assert!(raw.is_unique_violation());
    }

    #[actix_web::test]
    async fn only_the_owner_can_remove() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let bob = insert_user(&db, "bob@example.com").await;
        let saved = SavedDestinationService::save(&db, &ana.id, new_destination("kyoto")).await.unwrap();

        let err = SavedDestinationService::remove(&db, &bob.id, &saved.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        SavedDestinationService::remove(&db, &ana.id, &saved.id).await.unwrap();
        assert!(SavedDestinationService::list(&db, &ana.id).await.unwrap().is_empty());
    }
}
