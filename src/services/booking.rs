//! Booking confirmation
//!
//! Turns a chosen day, start time and service selection into a stored
//! appointment. Fitness is not re-checked against availability here: the
//! store's unit uniqueness decides, and a lost race surfaces as
//! [`AppError::SlotConflict`].

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    availability::{format_minute, minute_of_day, OperatingHours},
    error::{AppError, AppResult},
    models::appointment::{
        Appointment, AppointmentStatus, BookingConfirmation, BookingRequester, NewAppointment,
    },
    repository::AppointmentStore,
};

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn AppointmentStore>,
    hours: OperatingHours,
    loyalty_points: i32,
}

impl BookingService {
    pub fn new(store: Arc<dyn AppointmentStore>, hours: OperatingHours, loyalty_points: i32) -> Self {
        Self {
            store,
            hours,
            loyalty_points,
        }
    }

    pub async fn confirm_booking(&self, booking: BookingConfirmation) -> AppResult<Appointment> {
        let new = self.prepare(&booking)?;
        let (day, start, units) = (new.day, new.start_time, new.units.len());

        match self.store.create_appointment(new).await {
            Ok(appointment) => {
                tracing::info!(
                    "Booked {} {} for client {} ({} units{})",
                    day,
                    start.format("%H:%M"),
                    appointment.client_id,
                    units,
                    match booking.requester.created_by() {
                        Some(admin) => format!(", by admin {}", admin),
                        None => String::new(),
                    }
                );
                Ok(appointment)
            }
            Err(AppError::SlotConflict(msg)) => {
                tracing::info!("Booking conflict on {} {}: {}", day, start.format("%H:%M"), msg);
                Err(AppError::SlotConflict(msg))
            }
            Err(e) => {
                tracing::warn!("Booking on {} {} failed: {}", day, start.format("%H:%M"), e);
                Err(e)
            }
        }
    }

    /// Input sanity and the appointment row to insert
    fn prepare(&self, booking: &BookingConfirmation) -> AppResult<NewAppointment> {
        let selection = &booking.selection;
        if selection.duration_minutes == 0 {
            return Err(AppError::Validation(
                "Booking duration must be positive".to_string(),
            ));
        }

        let start = minute_of_day(booking.start_time);
        if !self.hours.is_aligned(start) {
            return Err(AppError::Validation(format!(
                "{} is not a bookable start time",
                format_minute(start)
            )));
        }
        if self.hours.is_closed_on(booking.day) {
            return Err(AppError::Validation(format!(
                "The shop is closed on {}",
                booking.day
            )));
        }
        let units = self.hours.occupied_units(start, selection.duration_minutes);
        // Units stop at closing, so a short expansion means the booking overruns
        if units.len() as u32 != self.hours.units_needed(selection.duration_minutes) {
            return Err(AppError::Validation(format!(
                "A {} minute booking at {} runs past closing time",
                selection.duration_minutes,
                format_minute(start)
            )));
        }

        let client = booking.requester.client();
        if let BookingRequester::SelfBooking { client } = &booking.requester {
            if !client.is_complete() {
                return Err(AppError::ProfileIncomplete(
                    "Complete your name and phone before booking".to_string(),
                ));
            }
        }

        Ok(NewAppointment {
            id: Uuid::new_v4(),
            client_id: client.id,
            client_name: client.display_name().to_string(),
            service_names: selection.service_names.clone(),
            day: booking.day,
            start_time: booking.start_time,
            duration_minutes: selection.duration_minutes,
            price: selection.price,
            status: AppointmentStatus::Confirmed,
            created_by: booking.requester.created_by(),
            units,
            loyalty_points: self.loyalty_points,
        })
    }
}
