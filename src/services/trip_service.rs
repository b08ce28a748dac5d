use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::dto::{StopWithActivities, TripDetail, TripSummary};
use crate::models::{activity, trip, trip_stop};

pub const TRIP_NOT_FOUND: &str = "Not found or unauthorized";

/// Longest trip accepted, in calendar days counting both ends
pub const MAX_TRIP_DAYS: i64 = 366;

/// A validated new trip
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_public: bool,
    pub budget: Option<Decimal>,
}

/// Partial update; `None` leaves a field unchanged.
/// `description` and `budget` use `Some(None)` to clear the value.
#[derive(Debug, Default, Clone)]
pub struct TripPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_public: Option<bool>,
    pub budget: Option<Option<Decimal>>,
}

pub struct TripService;

impl TripService {
    /// The user's trips, newest first, with their stop counts
    pub async fn list_for_user(db: &DatabaseConnection, user_id: &str) -> AppResult<Vec<TripSummary>> {
        let trips = trip::Entity::find()
            .filter(trip::Column::UserId.eq(user_id))
            .order_by_desc(trip::Column::CreatedAt)
            .all(db)
            .await?;

        Self::with_stop_counts(db, trips).await
    }

    pub async fn create(db: &DatabaseConnection, user_id: &str, input: NewTrip) -> AppResult<trip::Model> {
        ensure_date_order(input.start_date, input.end_date)?;

        let now = Utc::now();
        let trip = trip::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_public: Set(input.is_public),
            budget: Set(input.budget),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(trip_id = %trip.id, %user_id, "trip created");
        Ok(trip)
    }

    /// The trip if it exists and belongs to the user; 404 otherwise
    pub async fn find_owned(db: &DatabaseConnection, user_id: &str, trip_id: &str) -> AppResult<trip::Model> {
        trip::Entity::find_by_id(trip_id)
            .filter(trip::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found(TRIP_NOT_FOUND))
    }

    pub async fn detail(db: &DatabaseConnection, user_id: &str, trip_id: &str) -> AppResult<TripDetail> {
        let trip = Self::find_owned(db, user_id, trip_id).await?;
        let stops = Self::stops_with_activities(db, &trip.id).await?;
        Ok(TripDetail { trip, stops })
    }

    pub async fn update(
        db: &DatabaseConnection,
        user_id: &str,
        trip_id: &str,
        patch: TripPatch,
    ) -> AppResult<trip::Model> {
        let current = Self::find_owned(db, user_id, trip_id).await?;

        // Validate the resulting range, not just the supplied half
        let start = patch.start_date.unwrap_or(current.start_date);
        let end = patch.end_date.unwrap_or(current.end_date);
        ensure_date_order(start, end)?;

        let mut active: trip::ActiveModel = current.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(start_date) = patch.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = patch.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(is_public) = patch.is_public {
            active.is_public = Set(is_public);
        }
        if let Some(budget) = patch.budget {
            active.budget = Set(budget);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Delete an owned trip with its stops and their activities
    pub async fn delete(db: &DatabaseConnection, user_id: &str, trip_id: &str) -> AppResult<()> {
        let trip = Self::find_owned(db, user_id, trip_id).await?;

        let txn = db.begin().await?;
        delete_trips_cascade(&txn, vec![trip.id.clone()]).await?;
        txn.commit().await?;

        info!(trip_id = %trip.id, %user_id, "trip deleted");
        Ok(())
    }

    /// Stops of a trip in itinerary order (ties by arrival date), each with its activities
    pub async fn stops_with_activities<C: ConnectionTrait>(
        db: &C,
        trip_id: &str,
    ) -> AppResult<Vec<StopWithActivities>> {
        let stops = trip_stop::Entity::find()
            .filter(trip_stop::Column::TripId.eq(trip_id))
            .order_by_asc(trip_stop::Column::Order)
            .order_by_asc(trip_stop::Column::ArrivalDate)
            .all(db)
            .await?;

        if stops.is_empty() {
            return Ok(Vec::new());
        }

        let stop_ids: Vec<String> = stops.iter().map(|s| s.id.clone()).collect();
        let mut by_stop: HashMap<String, Vec<activity::Model>> = HashMap::new();
        for item in activity::Entity::find()
            .filter(activity::Column::TripStopId.is_in(stop_ids))
            .order_by_asc(activity::Column::CreatedAt)
            .all(db)
            .await?
        {
            by_stop.entry(item.trip_stop_id.clone()).or_default().push(item);
        }

        Ok(stops
            .into_iter()
            .map(|stop| {
                let mut activities = by_stop.remove(&stop.id).unwrap_or_default();
                // scheduled activities first, in time order
                activities.sort_by_key(|a| (a.start_time.is_none(), a.start_time, a.created_at));
                StopWithActivities { stop, activities }
            })
            .collect())
    }

    /// Attach the number of stops to each trip, keeping the input order
    pub async fn with_stop_counts(
        db: &DatabaseConnection,
        trips: Vec<trip::Model>,
    ) -> AppResult<Vec<TripSummary>> {
        let counts = stop_counts(db, trips.iter().map(|t| t.id.clone()).collect()).await?;

        Ok(trips
            .into_iter()
            .map(|trip| {
                let stop_count = counts.get(&trip.id).copied().unwrap_or(0);
                TripSummary { trip, stop_count }
            })
            .collect())
    }
}

pub fn ensure_date_order(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::bad_request("Start date must be on or before end date"));
    }
    if (end - start).num_days() >= MAX_TRIP_DAYS {
        return Err(AppError::bad_request(format!("A trip cannot span more than {MAX_TRIP_DAYS} days")));
    }
    Ok(())
}

pub async fn stop_counts<C: ConnectionTrait>(db: &C, trip_ids: Vec<String>) -> AppResult<HashMap<String, u64>> {
    let mut counts = HashMap::new();
    if trip_ids.is_empty() {
        return Ok(counts);
    }

    let stops = trip_stop::Entity::find()
        .filter(trip_stop::Column::TripId.is_in(trip_ids))
        .all(db)
        .await?;
    for stop in stops {
        *counts.entry(stop.trip_id).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Remove trips, their stops and those stops' activities.
/// Call inside a transaction.
pub async fn delete_trips_cascade<C: ConnectionTrait>(conn: &C, trip_ids: Vec<String>) -> Result<(), DbErr> {
    if trip_ids.is_empty() {
        return Ok(());
    }

    let stop_ids: Vec<String> = trip_stop::Entity::find()
        .filter(trip_stop::Column::TripId.is_in(trip_ids.clone()))
        .all(conn)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    delete_stops_cascade(conn, stop_ids).await?;

    trip::Entity::delete_many()
        .filter(trip::Column::Id.is_in(trip_ids))
        .exec(conn)
        .await?;
    Ok(())
}

/// Remove stops and their activities. Call inside a transaction.
pub async fn delete_stops_cascade<C: ConnectionTrait>(conn: &C, stop_ids: Vec<String>) -> Result<(), DbErr> {
    if stop_ids.is_empty() {
        return Ok(());
    }

    activity::Entity::delete_many()
        .filter(activity::Column::TripStopId.is_in(stop_ids.clone()))
        .exec(conn)
        .await?;
    trip_stop::Entity::delete_many()
        .filter(trip_stop::Column::Id.is_in(stop_ids))
        .exec(conn)
        .await?;
    Ok(())
}
