// Response shapes composed from several tables
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{activity, trip, trip_stop, users};

/// `{id, name, email}` returned by signup and login
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&users::Model> for UserSummary {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[serde(flatten)]
    pub trip: trip::Model,
    pub stop_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopWithActivities {
    #[serde(flatten)]
    pub stop: trip_stop::Model,
    pub activities: Vec<activity::Model>,
}

#[derive(Debug, Serialize)]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: trip::Model,
    pub stops: Vec<StopWithActivities>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityWithStop {
    #[serde(flatten)]
    pub activity: activity::Model,
    pub trip_stop: trip_stop::Model,
}

/// A public trip as listed on the community page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTripSummary {
    #[serde(flatten)]
    pub trip: trip::Model,
    pub owner_name: String,
    pub stop_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTripDetail {
    #[serde(flatten)]
    pub trip: trip::Model,
    pub owner_name: String,
    pub stops: Vec<StopWithActivities>,
    pub total_cost: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub language: Option<String>,
    pub role: users::Role,
    pub created_at: DateTime<Utc>,
    pub trip_count: u64,
    pub saved_destination_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_trips: u64,
    pub upcoming_trips: u64,
    pub recent_trips: Vec<TripSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_trips: u64,
    pub active_trips: u64,
    pub total_stops: u64,
    pub total_activities: u64,
    pub recent_users: Vec<RecentUser>,
}
