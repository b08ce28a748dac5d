use rust_decimal::Decimal;
use sea_orm::*;

use crate::error::{AppError, AppResult};
use crate::models::dto::{PublicTripDetail, PublicTripSummary};
use crate::models::{trip, users};
use crate::services::trip_service::{stop_counts, TripService};

pub const COMMUNITY_PAGE_SIZE: u64 = 20;

/// Read-only views of trips their owners made public
pub struct CommunityService;

impl CommunityService {
    /// The latest public trips with owner names and stop counts
    pub async fn public_trips(db: &DatabaseConnection) -> AppResult<Vec<PublicTripSummary>> {
        let rows = trip::Entity::find()
            .filter(trip::Column::IsPublic.eq(true))
            .order_by_desc(trip::Column::CreatedAt)
            .limit(COMMUNITY_PAGE_SIZE)
            .find_also_related(users::Entity)
            .all(db)
            .await?;

        let counts = stop_counts(db, rows.iter().map(|(t, _)| t.id.clone()).collect()).await?;

        Ok(rows
            .into_iter()
            .map(|(trip, owner)| PublicTripSummary {
                stop_count: counts.get(&trip.id).copied().unwrap_or(0),
                owner_name: owner_name(owner),
                trip,
            })
            .collect())
    }

    /// A public trip with its itinerary; private and missing trips are both 404
    pub async fn public_trip(db: &DatabaseConnection, trip_id: &str) -> AppResult<PublicTripDetail> {
        let (trip, owner) = trip::Entity::find_by_id(trip_id)
            .filter(trip::Column::IsPublic.eq(true))
            .find_also_related(users::Entity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Trip not found"))?;

        let stops = TripService::stops_with_activities(db, &trip.id).await?;
        let total_cost: Decimal = stops
            .iter()
            .flat_map(|s| s.activities.iter().map(|a| a.cost))
            .sum();

        Ok(PublicTripDetail {
            owner_name: owner_name(owner),
            trip,
            stops,
            total_cost,
        })
    }
}

fn owner_name(owner: Option<users::Model>) -> String {
    owner.map(|u| u.name).unwrap_or_else(|| "Unknown traveler".to_string())
}
