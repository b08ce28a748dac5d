use chrono::NaiveDate;
use serde::Serialize;

use crate::models::dto::StopWithActivities;
use crate::services::trip_service::MAX_TRIP_DAYS;

#[derive(Debug, Serialize)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub stops: Vec<&'a StopWithActivities>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse<'a> {
    pub trip_id: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<CalendarDay<'a>>,
}

pub struct CalendarService;

impl CalendarService {
    /// One entry per day of [start, end], listing the stops whose
    /// [arrival, departure] covers that day. Empty when end < start;
    /// never longer than `MAX_TRIP_DAYS`.
    pub fn build(start: NaiveDate, end: NaiveDate, stops: &[StopWithActivities]) -> Vec<CalendarDay<'_>> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .take(MAX_TRIP_DAYS as usize)
            .map(|date| CalendarDay {
                date,
                stops: stops
                    .iter()
                    .filter(|s| s.stop.arrival_date <= date && date <= s.stop.departure_date)
                    .collect(),
            })
            .collect()
    }
}
