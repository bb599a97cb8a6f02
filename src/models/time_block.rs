//! Admin time blocks (units held without an appointment)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::availability::format_minute;

/// A set of units on one day blocked by an admin
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeBlock {
    pub id: Uuid,
    pub day: NaiveDate,
    /// Start minutes of the blocked units
    pub start_minutes: Vec<i16>,
    pub reason: Option<String>,
    pub created_by: Option<Uuid>,
    pub crea_date: DateTime<Utc>,
}

impl TimeBlock {
    /// Blocked start times as HH:MM
    pub fn times(&self) -> Vec<String> {
        self.start_minutes
            .iter()
            .filter_map(|m| u16::try_from(*m).ok())
            .map(format_minute)
            .collect()
    }
}

/// Create time block request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTimeBlock {
    /// Day (YYYY-MM-DD)
    pub date: String,
    /// Start times to block (HH:MM)
    #[validate(length(min = 1, message = "Select at least one time"))]
    pub times: Vec<String>,
    #[validate(length(max = 200))]
    pub reason: Option<String>,
}

/// Query parameters for time blocks
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TimeBlockQuery {
    /// From this day (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Until this day (YYYY-MM-DD)
    pub end_date: Option<String>,
}
