use chrono::NaiveDate;
use sea_orm::*;
use sea_orm::sea_query::Expr;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::dto::StopWithActivities;
use crate::models::trip_stop;
use crate::services::trip_service::{delete_stops_cascade, TripService};

pub const STOP_NOT_FOUND: &str = "Stop not found";

#[derive(Debug, Clone)]
pub struct NewStop {
    pub city_id: String,
    pub city_name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    /// Appended after the last stop when absent
    pub order: Option<i32>,
}

pub struct StopService;

impl StopService {
    pub async fn list(db: &DatabaseConnection, user_id: &str, trip_id: &str) -> AppResult<Vec<StopWithActivities>> {
        let trip = TripService::find_owned(db, user_id, trip_id).await?;
        TripService::stops_with_activities(db, &trip.id).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        user_id: &str,
        trip_id: &str,
        input: NewStop,
    ) -> AppResult<trip_stop::Model> {
        let trip = TripService::find_owned(db, user_id, trip_id).await?;

        if input.arrival_date > input.departure_date {
            return Err(AppError::bad_request("Arrival date must be on or before departure date"));
        }

        let order = match input.order {
            Some(order) => order,
            None => Self::next_order(db, &trip.id).await?,
        };

        let stop = trip_stop::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            trip_id: Set(trip.id),
            city_id: Set(input.city_id),
            city_name: Set(input.city_name),
            arrival_date: Set(input.arrival_date),
            departure_date: Set(input.departure_date),
            order: Set(order),
        }
        .insert(db)
        .await?;

        info!(stop_id = %stop.id, trip_id = %stop.trip_id, order, "stop added");
        Ok(stop)
    }

    /// The stop if it belongs to a trip owned by the user; 404 otherwise
    pub async fn find_owned(
        db: &DatabaseConnection,
        user_id: &str,
        trip_id: &str,
        stop_id: &str,
    ) -> AppResult<trip_stop::Model> {
        let trip = TripService::find_owned(db, user_id, trip_id).await?;

        trip_stop::Entity::find_by_id(stop_id)
            .filter(trip_stop::Column::TripId.eq(trip.id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found(STOP_NOT_FOUND))
    }

    /// Delete a stop and its activities
    pub async fn delete(db: &DatabaseConnection, user_id: &str, trip_id: &str, stop_id: &str) -> AppResult<()> {
        let stop = Self::find_owned(db, user_id, trip_id, stop_id).await?;

        let txn = db.begin().await?;
        delete_stops_cascade(&txn, vec![stop.id.clone()]).await?;
        txn.commit().await?;

        info!(stop_id = %stop.id, trip_id = %stop.trip_id, "stop deleted");
        Ok(())
    }

    /// max(order) + 1 over the trip's stops, 0 for the first stop
    async fn next_order(db: &DatabaseConnection, trip_id: &str) -> AppResult<i32> {
        let max: Option<Option<i32>> = trip_stop::Entity::find()
            .select_only()
            .column_as(Expr::col(trip_stop::Column::Order).max(), "max_order")
            .filter(trip_stop::Column::TripId.eq(trip_id))
            .into_tuple()
            .one(db)
            .await?;

        Ok(max.flatten().map_or(0, |m| m.saturating_add(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity;
    use crate::services::activity_service::ActivityService;
    use crate::test_support::{insert_user, new_activity, new_stop, new_trip, test_db};

    #[actix_web::test]
    async fn order_is_appended_when_absent_and_kept_when_given() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let trip = TripService::create(&db, &ana.id, new_trip("Italy", "2026-06-01", "2026-06-10"))
            .await
            .unwrap();

        let first = StopService::create(&db, &ana.id, &trip.id, new_stop("rome", "2026-06-01", "2026-06-03"))
            .await
            .unwrap();
        let second = StopService::create(&db, &ana.id, &trip.id, new_stop("florence", "2026-06-04", "2026-06-06"))
            .await
            .unwrap();
        let pinned = StopService::create(
            &db,
            &ana.id,
            &trip.id,
            NewStop {
                order: Some(7),
                ..new_stop("venice", "2026-06-07", "2026-06-10")
            },
        )
        .await
        .unwrap();
        let after_pinned = StopService::create(&db, &ana.id, &trip.id, new_stop("milan", "2026-06-10", "2026-06-10"))
            .await
            .unwrap();

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(pinned.order, 7);
        assert_eq!(after_pinned.order, 8);
    }

    #[actix_web::test]
    async fn stops_are_listed_by_order_then_arrival() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let trip = TripService::create(&db, &ana.id, new_trip("Italy", "2026-06-01", "2026-06-10"))
            .await
            .unwrap();

        for (city, arrival, order) in [("b", "2026-06-05", 1), ("a", "2026-06-01", 1), ("c", "2026-06-08", 0)] {
            let input = NewStop {
                order: Some(order),
                ..new_stop(city, arrival, arrival)
            };
            StopService::create(&db, &ana.id, &trip.id, input).await.unwrap();
        }

        let cities: Vec<String> = StopService::list(&db, &ana.id, &trip.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.stop.city_id)
            .collect();
        assert_eq!(cities, vec!["c", "a", "b"]);
    }

    #[actix_web::test]
    async fn arrival_after_departure_is_rejected() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let trip = TripService::create(&db, &ana.id, new_trip("Italy", "2026-06-01", "2026-06-10"))
            .await
            .unwrap();

        let err = StopService::create(&db, &ana.id, &trip.id, new_stop("rome", "2026-06-05", "2026-06-02"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn deleting_a_stop_removes_its_activities() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let trip = TripService::create(&db, &ana.id, new_trip("Italy", "2026-06-01", "2026-06-10"))
            .await
            .unwrap();
        let rome = StopService::create(&db, &ana.id, &trip.id, new_stop("rome", "2026-06-01", "2026-06-03"))
            .await
            .unwrap();
        let naples = StopService::create(&db, &ana.id, &trip.id, new_stop("naples", "2026-06-04", "2026-06-05"))
            .await
            .unwrap();
        ActivityService::create(&db, &ana.id, &trip.id, new_activity(&rome.id, "Colosseum", "18"))
            .await
            .unwrap();
        ActivityService::create(&db, &ana.id, &trip.id, new_activity(&naples.id, "Pizza", "12"))
            .await
            .unwrap();

        StopService::delete(&db, &ana.id, &trip.id, &rome.id).await.unwrap();

        let left = activity::Entity::find().all(&db).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].trip_stop_id, naples.id);
        assert!(trip_stop::Entity::find_by_id(rome.id.clone()).one(&db).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn stop_of_another_trip_is_not_found() {
        let db = test_db().await;
        let ana = insert_user(&db, "ana@example.com").await;
        let italy = TripService::create(&db, &ana.id, new_trip("Italy", "2026-06-01", "2026-06-10"))
            .await
            .unwrap();
        let spain = TripService::create(&db, &ana.id, new_trip("Spain", "2026-07-01", "2026-07-10"))
            .await
            .unwrap();
        let rome = StopService::create(&db, &ana.id, &italy.id, new_stop("rome", "2026-06-01", "2026-06-03"))
            .await
            .unwrap();

        let err = StopService::delete(&db, &ana.id, &spain.id, &rome.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
