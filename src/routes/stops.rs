use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::routes::trips::date_field;
use crate::services::city_catalog::CityCatalog;
use crate::services::stop_service::{NewStop, StopService};
use crate::utils::input::non_blank;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStopRequest {
    pub city_id: Option<String>,
    pub city_name: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub order: Option<i32>,
}

/// GET /api/trips/{tripId}/stops - Stops of a trip in order, with activities (PROTECTED)
#[get("")]
pub async fn list_stops(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let stops = StopService::list(db.get_ref(), &auth_user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(stops))
}

/// POST /api/trips/{tripId}/stops - Add a city to a trip (PROTECTED)
#[post("")]
pub async fn create_stop(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<CreateStopRequest>,
    db: web::Data<DatabaseConnection>,
    catalog: web::Data<CityCatalog>,
) -> AppResult<HttpResponse> {
    let missing = || AppError::bad_request("Missing required fields: cityId, cityName, arrivalDate, departureDate");

    // 1. City: the name may be looked up in the catalog when only the id is sent
    let city_id = non_blank(body.city_id.as_deref()).ok_or_else(missing)?;
    let city_name = non_blank(body.city_name.as_deref())
        .or_else(|| catalog.find(&city_id).map(|c| c.name.clone()))
        .ok_or_else(missing)?;

    // 2. Dates
    let arrival = non_blank(body.arrival_date.as_deref()).ok_or_else(missing)?;
    let departure = non_blank(body.departure_date.as_deref()).ok_or_else(missing)?;

    let input = NewStop {
        city_id,
        city_name,
        arrival_date: date_field("arrivalDate", &arrival)?,
        departure_date: date_field("departureDate", &departure)?,
        order: body.order,
    };

    // 3. Insert
    let stop = StopService::create(db.get_ref(), &auth_user.user_id, &path, input).await?;
    Ok(HttpResponse::Created().json(stop))
}

/// DELETE /api/trips/{tripId}/stops/{stopId} - Remove a stop and its activities (PROTECTED)
#[delete("/{stop_id}")]
pub async fn delete_stop(
    auth_user: AuthUser,
    path: web::Path<(String, String)>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let (trip_id, stop_id) = path.into_inner();
    StopService::delete(db.get_ref(), &auth_user.user_id, &trip_id, &stop_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn stops_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips/{trip_id}/stops")
            .service(list_stops)
            .service(create_stop)
            .service(delete_stop),
    );
}
