//! Agenda: listing appointments and moving them through their statuses

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{Appointment, AppointmentFilter, AppointmentQuery, AppointmentStatus},
        parse_optional_date,
        profile::Profile,
    },
    repository::AppointmentStore,
};

#[derive(Clone)]
pub struct AgendaService {
    store: Arc<dyn AppointmentStore>,
    loyalty_points: i32,
}

impl AgendaService {
    pub fn new(store: Arc<dyn AppointmentStore>, loyalty_points: i32) -> Self {
        Self {
            store,
            loyalty_points,
        }
    }

    pub async fn list(&self, query: &AppointmentQuery) -> AppResult<Vec<Appointment>> {
        let filter = AppointmentFilter {
            start: parse_optional_date(query.start_date.as_ref(), "start_date")?,
            end: parse_optional_date(query.end_date.as_ref(), "end_date")?,
            status: query.status,
            client_id: query.client_id,
            live_only: false,
        };
        self.store.list_appointments(filter).await
    }

    /// A client's live appointments from `today` on
    pub async fn upcoming_for_client(&self, client_id: Uuid, today: NaiveDate) -> AppResult<Vec<Appointment>> {
        self.store
            .list_appointments(AppointmentFilter {
                start: Some(today),
                client_id: Some(client_id),
                live_only: true,
                ..AppointmentFilter::default()
            })
            .await
    }

    /// Pending to confirmed; credits the client's loyalty points
    pub async fn confirm(&self, id: Uuid, actor: &Profile) -> AppResult<Appointment> {
        actor.require_admin()?;
        let appointment = self
            .store
            .update_status(id, AppointmentStatus::Confirmed, self.loyalty_points)
            .await?;
        tracing::info!("Appointment {} confirmed by {}", id, actor.id);
        Ok(appointment)
    }

    /// Cancel and release the appointment's units immediately.
    ///
    /// Clients may cancel only their own appointments.
    pub async fn cancel(&self, id: Uuid, actor: &Profile) -> AppResult<Appointment> {
        if !actor.is_admin() {
            let appointment = self.store.get_appointment(id).await?;
            if appointment.client_id != actor.id {
                return Err(AppError::Authorization(
                    "You can only cancel your own appointments".to_string(),
                ));
            }
        }
        let appointment = self
            .store
            .update_status(id, AppointmentStatus::Cancelled, 0)
            .await?;
        tracing::info!("Appointment {} cancelled by {}", id, actor.id);
        Ok(appointment)
    }
}
