// ============================================================================
// SERVICE : DEMO SEED
// ============================================================================
//
// Inserts a demo traveler with two sample trips when DEMO_SEED is on.
//
// Points of attention:
//   - Idempotent: nothing happens when the demo email already exists
//   - Runs in one transaction so a failed seed leaves no half-built trip
//   - The demo password is public; never enable the seed in production
//
// ============================================================================

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::users::Role;
use crate::models::{activity, trip, trip_stop};
use crate::services::auth_service::{create_user, AuthService};
use crate::utils::password;

pub const DEMO_EMAIL: &str = "traveler@globetrotter.com";
pub const DEMO_PASSWORD: &str = "globetrotter";

struct DemoActivity {
    name: &'static str,
    start: &'static str,
    duration: i32,
    cost: i64,
}

struct DemoStop {
    city_id: &'static str,
    city_name: &'static str,
    arrival: &'static str,
    departure: &'static str,
    activities: &'static [DemoActivity],
}

struct DemoTrip {
    title: &'static str,
    description: &'static str,
    start: &'static str,
    end: &'static str,
    budget: i64,
    stops: &'static [DemoStop],
}

const DEMO_TRIPS: &[DemoTrip] = &[
    DemoTrip {
        title: "European Adventure",
        description: "Exploring the beauty of Paris and Rome",
        start: "2026-06-01",
        end: "2026-06-10",
        budget: 3500,
        stops: &[
            DemoStop {
                city_id: "paris",
                city_name: "Paris",
                arrival: "2026-06-01",
                departure: "2026-06-05",
                activities: &[
                    DemoActivity { name: "Visit Eiffel Tower", start: "2026-06-02T10:00:00", duration: 180, cost: 25 },
                    DemoActivity { name: "Louvre Museum Tour", start: "2026-06-03T09:00:00", duration: 240, cost: 20 },
                    DemoActivity { name: "Seine River Cruise", start: "2026-06-04T19:00:00", duration: 120, cost: 15 },
                ],
            },
            DemoStop {
                city_id: "rome",
                city_name: "Rome",
                arrival: "2026-06-06",
                departure: "2026-06-10",
                activities: &[
                    DemoActivity { name: "Colosseum Tour", start: "2026-06-07T10:00:00", duration: 150, cost: 18 },
                    DemoActivity { name: "Vatican Museums", start: "2026-06-08T09:00:00", duration: 240, cost: 25 },
                    DemoActivity { name: "Authentic Pasta Making Class", start: "2026-06-09T15:00:00", duration: 180, cost: 75 },
                ],
            },
        ],
    },
    DemoTrip {
        title: "Japan Discovery",
        description: "Exploring modern Tokyo and traditional Kyoto",
        start: "2026-09-15",
        end: "2026-09-25",
        budget: 4200,
        stops: &[
            DemoStop {
                city_id: "tokyo",
                city_name: "Tokyo",
                arrival: "2026-09-15",
                departure: "2026-09-20",
                activities: &[
                    DemoActivity { name: "TeamLab Borderless Museum", start: "2026-09-16T14:00:00", duration: 150, cost: 35 },
                    DemoActivity { name: "Sushi Making Workshop", start: "2026-09-17T11:00:00", duration: 180, cost: 90 },
                ],
            },
            DemoStop {
                city_id: "kyoto",
                city_name: "Kyoto",
                arrival: "2026-09-21",
                departure: "2026-09-25",
                activities: &[
                    DemoActivity { name: "Fushimi Inari Shrine", start: "2026-09-22T08:00:00", duration: 180, cost: 0 },
                    DemoActivity { name: "Tea Ceremony Experience", start: "2026-09-23T15:00:00", duration: 120, cost: 45 },
                ],
            },
        ],
    },
];

pub struct SeedService;

impl SeedService {
    /// Returns true when the demo data was inserted
    pub async fn seed_demo(db: &DatabaseConnection, iterations: u32) -> AppResult<bool> {
        if AuthService::find_by_email(db, DEMO_EMAIL).await?.is_some() {
            info!("demo data already present");
            return Ok(false);
        }

        let password_hash = password::hash_password(DEMO_PASSWORD, iterations)?;

        let txn = db.begin().await?;
        let user = create_user(&txn, "Demo Traveler", DEMO_EMAIL, password_hash, Role::User).await?;

        for demo in DEMO_TRIPS {
            let now = Utc::now();
            let trip = trip::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                user_id: Set(user.id.clone()),
                title: Set(demo.title.to_string()),
                description: Set(Some(demo.description.to_string())),
                start_date: Set(day(demo.start)?),
                end_date: Set(day(demo.end)?),
                is_public: Set(true),
                budget: Set(Some(Decimal::from(demo.budget))),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;

            for (order, stop) in (0i32..).zip(demo.stops) {
                let saved_stop = trip_stop::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    trip_id: Set(trip.id.clone()),
                    city_id: Set(stop.city_id.to_string()),
                    city_name: Set(stop.city_name.to_string()),
                    arrival_date: Set(day(stop.arrival)?),
                    departure_date: Set(day(stop.departure)?),
                    order: Set(order),
                }
                .insert(&txn)
                .await?;

                for item in stop.activities {
                    let start = NaiveDateTime::parse_from_str(item.start, "%Y-%m-%dT%H:%M:%S")
                        .map_err(|e| AppError::internal(format!("bad demo timestamp {}: {e}", item.start)))?;

                    activity::ActiveModel {
                        id: Set(Uuid::new_v4().to_string()),
                        trip_stop_id: Set(saved_stop.id.clone()),
                        name: Set(item.name.to_string()),
                        cost: Set(Decimal::from(item.cost)),
                        currency: Set("USD".to_string()),
                        duration: Set(item.duration),
                        start_time: Set(Some(start.and_utc())),
                        created_at: Set(Utc::now()),
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }

        txn.commit().await?;
        info!(email = DEMO_EMAIL, trips = DEMO_TRIPS.len(), "demo data seeded");
        Ok(true)
    }
}

fn day(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::internal(format!("bad demo date {raw}: {e}")))
}
