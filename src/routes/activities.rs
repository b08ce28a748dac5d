use actix_web::{delete, get, post, web, HttpResponse};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::activity_service::{ActivityService, NewActivity, DEFAULT_CURRENCY, DEFAULT_DURATION_MINUTES};
use crate::utils::input::{coerce_decimal, coerce_positive_int, non_blank, parse_timestamp};

/// Activity form body. Numbers arrive as JSON numbers or strings, so the
/// lenient fields stay raw until coerced.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub trip_stop_id: Option<String>,
    pub name: Option<String>,
    pub cost: Option<Value>,
    pub currency: Option<String>,
    pub duration: Option<Value>,
    pub start_time: Option<String>,
}

impl CreateActivityRequest {
    fn into_new_activity(self) -> AppResult<NewActivity> {
        let missing = || AppError::bad_request("Missing required fields: tripStopId, name");

        Ok(NewActivity {
            trip_stop_id: non_blank(self.trip_stop_id.as_deref()).ok_or_else(missing)?,
            name: non_blank(self.name.as_deref()).ok_or_else(missing)?,
            cost: coerce_decimal(self.cost.as_ref()).unwrap_or(Decimal::ZERO),
            currency: non_blank(self.currency.as_deref()).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            duration: coerce_positive_int(self.duration.as_ref()).unwrap_or(DEFAULT_DURATION_MINUTES),
            start_time: self.start_time.as_deref().and_then(parse_timestamp),
        })
    }
}

/// GET /api/trips/{tripId}/activities - All activities of a trip with their stop (PROTECTED)
#[get("")]
pub async fn list_activities(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let activities = ActivityService::list_for_trip(db.get_ref(), &auth_user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(activities))
}

/// POST /api/trips/{tripId}/activities - Attach an activity to a stop (PROTECTED)
#[post("")]
pub async fn create_activity(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<CreateActivityRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().into_new_activity()?;
    let activity = ActivityService::create(db.get_ref(), &auth_user.user_id, &path, input).await?;
    Ok(HttpResponse::Created().json(activity))
}

/// DELETE /api/trips/{tripId}/activities/{activityId} - Remove an activity (PROTECTED)
#[delete("/{activity_id}")]
pub async fn delete_activity(
    auth_user: AuthUser,
    path: web::Path<(String, String)>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let (trip_id, activity_id) = path.into_inner();
    ActivityService::delete(db.get_ref(), &auth_user.user_id, &trip_id, &activity_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn activities_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips/{trip_id}/activities")
            .service(list_activities)
            .service(create_activity)
            .service(delete_activity),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> CreateActivityRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn unusable_fields_fall_back_to_defaults() {
        let input = request(json!({
            "tripStopId": "s1",
            "name": "Museum",
            "cost": "free",
            "duration": "two hours",
            "startTime": "after lunch"
        }))
        .into_new_activity()
        .unwrap();

        assert_eq!(input.cost, Decimal::ZERO);
        assert_eq!(input.duration, DEFAULT_DURATION_MINUTES);
        assert_eq!(input.currency, "USD");
        assert_eq!(input.start_time, None);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let input = request(json!({
            "tripStopId": "s1",
            "name": "Cooking class",
            "cost": "85.50",
            "currency": "JPY",
            "duration": "180",
            "startTime": "2026-09-16T10:00"
        }))
        .into_new_activity()
        .unwrap();

        assert_eq!(input.cost, "85.50".parse::<Decimal>().unwrap());
        assert_eq!(input.duration, 180);
        assert_eq!(input.currency, "JPY");
        assert_eq!(input.start_time.unwrap().to_rfc3339(), "2026-09-16T10:00:00+00:00");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = request(json!({ "tripStopId": "s1", "name": "  " }))
            .into_new_activity()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: tripStopId, name");
    }
}
