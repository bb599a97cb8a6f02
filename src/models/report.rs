//! Revenue report and dashboard DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::appointment::Appointment;

/// A name with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedEntry {
    pub name: String,
    pub count: i64,
}

/// Revenue over a date range
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevenueReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Sum of confirmed appointment prices
    pub total_revenue: Decimal,
    pub confirmed_count: i64,
    pub pending_count: i64,
    pub cancelled_count: i64,
    /// Individual services performed in confirmed appointments
    pub total_services: i64,
    pub top_clients: Vec<RankedEntry>,
    pub top_services: Vec<RankedEntry>,
}

/// Admin dashboard figures
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub day: NaiveDate,
    pub month_revenue: Decimal,
    pub month_confirmed: i64,
    pub today_revenue: Decimal,
    pub average_ticket: Decimal,
    pub best_service: Option<String>,
    pub pending_count: i64,
    /// Today's live appointments, by start time
    pub today_appointments: Vec<Appointment>,
}

/// Query parameters for the revenue report
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RevenueQuery {
    /// First day (YYYY-MM-DD)
    pub start_date: String,
    /// Last day (YYYY-MM-DD)
    pub end_date: String,
}
