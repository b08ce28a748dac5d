use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::budget_service::{BudgetService, BudgetSummary};
use crate::services::calendar_service::{CalendarResponse, CalendarService};
use crate::services::trip_service::{NewTrip, TripPatch, TripService};
use crate::utils::input::{coerce_decimal, non_blank, parse_date};

// DTO for trip creation; dates are strings so both date and timestamp forms pass
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: Option<bool>,
    #[serde(alias = "totalBudget")]
    pub budget: Option<Value>,
}

// DTO for partial updates; a present `null` clears description/budget
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "present", alias = "totalBudget")]
    pub budget: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBudgetResponse {
    pub trip_id: String,
    pub title: String,
    #[serde(flatten)]
    pub summary: BudgetSummary,
}

/// GET /api/trips - The caller's trips with stop counts (PROTECTED)
#[get("")]
pub async fn list_trips(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let trips = TripService::list_for_user(db.get_ref(), &auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(trips))
}

/// POST /api/trips - Create a trip (PROTECTED)
#[post("")]
pub async fn create_trip(
    auth_user: AuthUser,
    body: web::Json<CreateTripRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    // 1. Required fields
    let (Some(title), Some(start), Some(end)) = (
        non_blank(body.title.as_deref()),
        non_blank(body.start_date.as_deref()),
        non_blank(body.end_date.as_deref()),
    ) else {
        return Err(AppError::bad_request("Missing required fields: title, startDate, endDate"));
    };

    // 2. Parse; an unusable budget means no budget
    let input = NewTrip {
        title,
        description: non_blank(body.description.as_deref()),
        start_date: date_field("startDate", &start)?,
        end_date: date_field("endDate", &end)?,
        is_public: body.is_public.unwrap_or(false),
        budget: coerce_decimal(body.budget.as_ref()),
    };

    // 3. Insert
    let trip = TripService::create(db.get_ref(), &auth_user.user_id, input).await?;
    Ok(HttpResponse::Created().json(trip))
}

/// GET /api/trips/{id} - A trip with its stops and their activities (PROTECTED)
#[get("/{trip_id}")]
pub async fn get_trip(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let detail = TripService::detail(db.get_ref(), &auth_user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /api/trips/{id} - Update some fields of a trip (PROTECTED)
#[put("/{trip_id}")]
pub async fn update_trip(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateTripRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let title = match body.title {
        Some(raw) => Some(
            non_blank(Some(raw.as_str())).ok_or_else(|| AppError::bad_request("Title cannot be empty"))?,
        ),
        None => None,
    };

    let patch = TripPatch {
        title,
        description: body.description.map(|v| non_blank(v.as_str())),
        start_date: body.start_date.as_deref().map(|d| date_field("startDate", d)).transpose()?,
        end_date: body.end_date.as_deref().map(|d| date_field("endDate", d)).transpose()?,
        is_public: body.is_public,
        budget: body.budget.map(|v| coerce_decimal(Some(&v))),
    };

    let trip = TripService::update(db.get_ref(), &auth_user.user_id, &path, patch).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/// DELETE /api/trips/{id} - Delete a trip with its stops and activities (PROTECTED)
#[delete("/{trip_id}")]
pub async fn delete_trip(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    TripService::delete(db.get_ref(), &auth_user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// GET /api/trips/{id}/budget - Cost totals against the trip budget (PROTECTED)
#[get("/{trip_id}/budget")]
pub async fn trip_budget(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let trip = TripService::find_owned(db.get_ref(), &auth_user.user_id, &path).await?;
    let stops = TripService::stops_with_activities(db.get_ref(), &trip.id).await?;

    Ok(HttpResponse::Ok().json(TripBudgetResponse {
        summary: BudgetService::summarize(trip.budget, &stops),
        trip_id: trip.id,
        title: trip.title,
    }))
}

/// GET /api/trips/{id}/calendar - Day-by-day view of the trip (PROTECTED)
#[get("/{trip_id}/calendar")]
pub async fn trip_calendar(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let trip = TripService::find_owned(db.get_ref(), &auth_user.user_id, &path).await?;
    let stops = TripService::stops_with_activities(db.get_ref(), &trip.id).await?;

    Ok(HttpResponse::Ok().json(CalendarResponse {
        trip_id: &trip.id,
        start_date: trip.start_date,
        end_date: trip.end_date,
        days: CalendarService::build(trip.start_date, trip.end_date, &stops),
    }))
}

pub fn date_field(name: &str, raw: &str) -> AppResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| AppError::bad_request(format!("Invalid date for {name}: {raw}")))
}

// Some(value) whenever the key is present, null included
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

pub fn trips_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips")
            .service(list_trips)
            .service(create_trip)
            .service(trip_budget)
            .service(trip_calendar)
            .service(get_trip)
            .service(update_trip)
            .service(delete_trip),
    );
}
