use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::dto::ActivityWithStop;
use crate::models::{activity, trip_stop};
use crate::services::stop_service::StopService;
use crate::services::trip_service::TripService;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// An activity whose lenient fields were already coerced
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub trip_stop_id: String,
    pub name: String,
    pub cost: Decimal,
    pub currency: String,
    pub duration: i32,
    pub start_time: Option<DateTime<Utc>>,
}

pub struct ActivityService;

impl ActivityService {
    /// Every activity of an owned trip with its stop, by stop arrival date
    pub async fn list_for_trip(
        db: &DatabaseConnection,
        user_id: &str,
        trip_id: &str,
    ) -> AppResult<Vec<ActivityWithStop>> {
        let trip = TripService::find_owned(db, user_id, trip_id).await?;

        let stops: HashMap<String, trip_stop::Model> = trip_stop::Entity::find()
            .filter(trip_stop::Column::TripId.eq(trip.id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        if stops.is_empty() {
            return Ok(Vec::new());
        }

        let activities = activity::Entity::find()
            .filter(activity::Column::TripStopId.is_in(stops.keys().cloned()))
            .order_by_asc(activity::Column::CreatedAt)
            .all(db)
            .await?;

        let mut listed: Vec<ActivityWithStop> = activities
            .into_iter()
            .filter_map(|activity| {
                let trip_stop = stops.get(&activity.trip_stop_id)?.clone();
                Some(ActivityWithStop { activity, trip_stop })
            })
            .collect();

        // stable: same-stop activities keep their creation order
        listed.sort_by_key(|a| (a.trip_stop.arrival_date, a.trip_stop.order));
        Ok(listed)
    }

    pub async fn create(
        db: &DatabaseConnection,
        user_id: &str,
        trip_id: &str,
        input: NewActivity,
    ) -> AppResult<activity::Model> {
        // 1. The stop must belong to the trip, and the trip to the caller
        let stop = StopService::find_owned(db, user_id, trip_id, &input.trip_stop_id).await?;

        // 2. Insert
        let created = activity::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            trip_stop_id: Set(stop.id),
            name: Set(input.name),
            cost: Set(input.cost),
            currency: Set(input.currency),
            duration: Set(input.duration),
            start_time: Set(input.start_time),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(activity_id = %created.id, stop_id = %created.trip_stop_id, "activity added");
        Ok(created)
    }

    pub async fn delete(
        db: &DatabaseConnection,
        user_id: &str,
        trip_id: &str,
        activity_id: &str,
    ) -> AppResult<()> {
        let trip = TripService::find_owned(db, user_id, trip_id).await?;

        let found = activity::Entity::find_by_id(activity_id)
            .find_also_related(trip_stop::Entity)
            .one(db)
            .await?;

        match found {
            Some((activity, Some(stop))) if stop.trip_id == trip.id => {
                activity::Entity::delete_by_id(activity.id).exec(db).await?;
                Ok(())
            }
            _ => Err(AppError::not_found("Activity not found")),
        }
    }
}
