use chrono::NaiveDate;
use sea_orm::*;

use crate::error::AppResult;
use crate::models::dto::{AdminStats, RecentUser};
use crate::models::{activity, trip, trip_stop, users};

const RECENT_USERS: u64 = 5;

pub struct AdminService;

impl AdminService {
    /// Platform counts; a trip is active until its end date has passed
    pub async fn stats(db: &DatabaseConnection, today: NaiveDate) -> AppResult<AdminStats> {
        let total_users = users::Entity::find().count(db).await?;
        let total_trips = trip::Entity::find().count(db).await?;
        let active_trips = trip::Entity::find()
            .filter(trip::Column::EndDate.gte(today))
            .count(db)
            .await?;
        let total_stops = trip_stop::Entity::find().count(db).await?;
        let total_activities = activity::Entity::find().count(db).await?;

        let recent_users = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .limit(RECENT_USERS)
            .all(db)
            .await?
            .into_iter()
            .map(|u| RecentUser {
                id: u.id,
                name: u.name,
                email: u.email,
                created_at: u.created_at,
            })
            .collect();

        Ok(AdminStats {
            total_users,
            total_trips,
            active_trips,
            total_stops,
            total_activities,
            recent_users,
        })
    }
}
