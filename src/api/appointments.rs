//! Appointment endpoints (booking, agenda, status changes)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{
            Appointment, AppointmentQuery, BookingConfirmation, BookingRequester, CreateAppointment,
        },
        parse_date, parse_time,
    },
    AppState,
};

use super::{shop_now, AuthenticatedUser};

/// Book an appointment
///
/// Clients book for themselves; admins may pass `client_id` to book on
/// behalf of a client.
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 409, description = "Slot no longer available", body = crate::error::ErrorResponse),
        (status = 422, description = "Profile incomplete", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAppointment>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    data.validate()?;
    let day = parse_date(&data.date, "date")?;
    let start_time = parse_time(&data.time, "time")?;

    let requester = match data.client_id {
        Some(client_id) if client_id != claims.sub => {
            let admin = state.services.clients.require_admin(&claims).await?;
            let client = state.services.clients.get(client_id).await?;
            BookingRequester::AdminOnBehalfOf {
                admin: admin.id,
                client,
            }
        }
        _ => BookingRequester::SelfBooking {
            client: state.services.clients.current(&claims).await?,
        },
    };

    if day.and_time(start_time) <= shop_now(&state)? {
        return Err(AppError::Validation("Cannot book a time in the past".to_string()));
    }

    let selection = state.services.catalog.resolve_selection(&data.service_ids).await?;
    let appointment = state
        .services
        .booking
        .confirm_booking(BookingConfirmation {
            day,
            start_time,
            selection,
            requester,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// List appointments (admin agenda)
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments by day and time", body = Vec<Appointment>)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    state.services.clients.require_admin(&claims).await?;
    let appointments = state.services.agenda.list(&query).await?;
    Ok(Json(appointments))
}

/// Upcoming appointments of the caller
#[utoipa::path(
    get,
    path = "/me/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upcoming appointments", body = Vec<Appointment>)
    )
)]
pub async fn my_appointments(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Appointment>>> {
    let today = shop_now(&state)?.date();
    let appointments = state
        .services
        .agenda
        .upcoming_for_client(claims.sub, today)
        .await?;
    Ok(Json(appointments))
}

/// Confirm a pending appointment
#[utoipa::path(
    post,
    path = "/appointments/{id}/confirm",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment confirmed", body = Appointment),
        (status = 422, description = "Appointment was cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_appointment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let actor = state.services.clients.require_admin(&claims).await?;
    let appointment = state.services.agenda.confirm(id, &actor).await?;
    Ok(Json(appointment))
}

/// Cancel an appointment and release its time
#[utoipa::path(
    post,
    path = "/appointments/{id}/cancel",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment cancelled", body = Appointment)
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let actor = state.services.clients.current(&claims).await?;
    let appointment = state.services.agenda.cancel(id, &actor).await?;
    Ok(Json(appointment))
}
