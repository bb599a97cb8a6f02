//! Availability endpoints (booking calendar and day slots)

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    availability::CalendarMonth,
    error::{AppError, AppResult},
    models::{catalog::DurationQuery, parse_date},
    services::availability::{DaySlots, MonthAvailability},
    AppState,
};

use super::shop_now;

/// Query for the month calendar
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// Month (YYYY-MM); defaults to the current month
    pub month: Option<String>,
    /// Total duration in minutes
    pub duration: Option<u32>,
    /// Comma-separated catalog service IDs (instead of duration)
    pub service_ids: Option<String>,
}

/// Query for the slots of one day
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DayQuery {
    /// Day (YYYY-MM-DD)
    pub date: String,
    pub duration: Option<u32>,
    pub service_ids: Option<String>,
}

/// Duration from an explicit value or from the selected services
async fn requested_duration(state: &AppState, query: DurationQuery) -> AppResult<u32> {
    if let Some(duration) = query.duration {
        return Ok(duration);
    }
    let ids = query.parsed_service_ids().map_err(AppError::Validation)?;
    if ids.is_empty() {
        return Err(AppError::Validation(
            "Provide duration or service_ids".to_string(),
        ));
    }
    Ok(state.services.catalog.resolve_selection(&ids).await?.duration_minutes)
}

/// Bookable days of a month grid
#[utoipa::path(
    get,
    path = "/availability/days",
    tag = "availability",
    params(MonthQuery),
    responses(
        (status = 200, description = "Bookability per calendar day", body = MonthAvailability),
        (status = 400, description = "Invalid month or duration", body = crate::error::ErrorResponse),
        (status = 503, description = "Bookings could not be fetched", body = crate::error::ErrorResponse)
    )
)]
pub async fn month_days(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthAvailability>> {
    let now = shop_now(&state)?;
    let month = match query.month.as_deref() {
        Some(value) => CalendarMonth::parse(value)?,
        None => CalendarMonth::containing(now.date()),
    };
    let duration = requested_duration(
        &state,
        DurationQuery {
            duration: query.duration,
            service_ids: query.service_ids,
        },
    )
    .await?;

    let result = state.services.availability.month_days(month, duration, now).await?;
    Ok(Json(result))
}

/// Available start times of a day, grouped by period
#[utoipa::path(
    get,
    path = "/availability/slots",
    tag = "availability",
    params(DayQuery),
    responses(
        (status = 200, description = "Available slots", body = DaySlots),
        (status = 400, description = "Invalid date or duration", body = crate::error::ErrorResponse)
    )
)]
pub async fn day_slots(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<DaySlots>> {
    let now = shop_now(&state)?;
    let date = parse_date(&query.date, "date")?;
    let duration = requested_duration(
        &state,
        DurationQuery {
            duration: query.duration,
            service_ids: query.service_ids,
        },
    )
    .await?;

    let result = state.services.availability.day_slots(date, duration, now).await?;
    Ok(Json(result))
}
