//! Appointment models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::profile::Profile;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Only live appointments hold their time units
    pub fn occupies_time(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// Allowed agenda transitions; setting the current status again is a no-op
    pub fn can_become(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
            )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for AppointmentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AppointmentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AppointmentStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

/// A stored appointment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Client name at booking time
    pub client_name: String,
    /// Booked services, joined with " + "
    pub service_names: String,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub price: Decimal,
    pub status: AppointmentStatus,
    /// Paid at the shop
    pub payment_method: String,
    /// Admin who booked on behalf of the client
    pub created_by: Option<Uuid>,
    pub crea_date: DateTime<Utc>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Aggregate of the catalog services chosen for one booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceSelection {
    pub service_ids: Vec<i32>,
    pub duration_minutes: u32,
    pub price: Decimal,
    pub service_names: String,
}

/// Who is booking, and for whom
#[derive(Debug, Clone)]
pub enum BookingRequester {
    /// A client booking for themselves
    SelfBooking { client: Profile },
    /// An admin booking on behalf of a client
    AdminOnBehalfOf { admin: Uuid, client: Profile },
}

impl BookingRequester {
    pub fn client(&self) -> &Profile {
        match self {
            BookingRequester::SelfBooking { client } => client,
            BookingRequester::AdminOnBehalfOf { client, .. } => client,
        }
    }

    pub fn created_by(&self) -> Option<Uuid> {
        match self {
            BookingRequester::SelfBooking { .. } => None,
            BookingRequester::AdminOnBehalfOf { admin, .. } => Some(*admin),
        }
    }
}

/// A booking ready to be confirmed
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub selection: ServiceSelection,
    pub requester: BookingRequester,
}

/// Appointment row to insert, with the units it occupies
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub service_names: String,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub price: Decimal,
    pub status: AppointmentStatus,
    pub created_by: Option<Uuid>,
    /// Start minutes of every granularity unit held
    pub units: Vec<u16>,
    /// Loyalty points credited to the client on insert
    pub loyalty_points: i32,
}

/// Create appointment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointment {
    /// Day (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    pub time: String,
    /// Selected catalog services
    #[validate(length(min = 1, message = "Select at least one service"))]
    pub service_ids: Vec<i32>,
    /// Book on behalf of this client (admins only)
    pub client_id: Option<Uuid>,
}

/// Query parameters for the agenda
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AppointmentQuery {
    /// From this day (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Until this day (YYYY-MM-DD)
    pub end_date: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub client_id: Option<Uuid>,
}

/// Parsed agenda filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub client_id: Option<Uuid>,
    /// Leave out cancelled appointments
    pub live_only: bool,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.start.map_or(true, |d| appointment.day >= d)
            && self.end.map_or(true, |d| appointment.day <= d)
            && self.status.map_or(true, |s| appointment.status == s)
            && self.client_id.map_or(true, |c| appointment.client_id == c)
            && (!self.live_only || appointment.status.occupies_time())
    }
}
