use chrono::NaiveDate;
use sea_orm::*;

use crate::error::AppResult;
use crate::models::dto::DashboardResponse;
use crate::models::trip;
use crate::services::trip_service::TripService;

const RECENT_TRIPS: u64 = 3;

pub struct DashboardService;

impl DashboardService {
    /// Trip counts for the user and the three most recently touched trips.
    /// A trip is upcoming when it starts today or later.
    pub async fn overview(db: &DatabaseConnection, user_id: &str, today: NaiveDate) -> AppResult<DashboardResponse> {
        let owned = trip::Entity::find().filter(trip::Column::UserId.eq(user_id));

        let total_trips = owned.clone().count(db).await?;
        let upcoming_trips = owned
            .clone()
            .filter(trip::Column::StartDate.gte(today))
            .count(db)
            .await?;

        let recent = owned
            .order_by_desc(trip::Column::UpdatedAt)
            .limit(RECENT_TRIPS)
            .all(db)
            .await?;

        Ok(DashboardResponse {
            total_trips,
            upcoming_trips,
            recent_trips: TripService::with_stop_counts(db, recent).await?,
        })
    }
}
