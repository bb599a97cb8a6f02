//! Data models for the barbershop server

pub mod appointment;
pub mod catalog;
pub mod profile;
pub mod report;
pub mod time_block;

// Re-export commonly used types
pub use appointment::{Appointment, AppointmentStatus, BookingRequester, ServiceSelection};
pub use catalog::{CatalogService, Product};
pub use profile::{Profile, Role};
pub use time_block::TimeBlock;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{AppError, AppResult};

/// Parse a YYYY-MM-DD request field
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

/// Parse a HH:MM request field
pub fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}

/// Parse an optional YYYY-MM-DD request field
pub fn parse_optional_date(value: Option<&String>, field: &str) -> AppResult<Option<NaiveDate>> {
    value.map(|v| parse_date(v, field)).transpose()
}
