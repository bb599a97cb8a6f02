//! In-memory appointment store
//!
//! Same contract as the Postgres repository, including the unit uniqueness
//! check, with all state behind one lock. Backs the service tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::appointments::AppointmentStore;
use crate::{
    availability::{BookedIntervals, DateRange},
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment},
};

#[derive(Default)]
struct MemoryData {
    appointments: HashMap<Uuid, Appointment>,
    /// Units held per appointment
    units: HashMap<Uuid, Vec<u16>>,
    /// Units held by time blocks or anything else outside appointments
    blocked: BookedIntervals,
    loyalty: HashMap<Uuid, i32>,
}

impl MemoryData {
    fn occupied(&self) -> BookedIntervals {
        let mut booked = self.blocked.clone();
        for (id, units) in &self.units {
            if let Some(appointment) = self.appointments.get(id) {
                booked
                    .entry(appointment.day)
                    .or_default()
                    .extend(units.iter().copied());
            }
        }
        booked
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAppointmentStore {
    data: Arc<RwLock<MemoryData>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold units on `day` without an appointment
    pub fn block(&self, day: chrono::NaiveDate, units: &[u16]) -> AppResult<()> {
        let mut data = self.write()?;
        data.blocked.entry(day).or_default().extend(units.iter().copied());
        Ok(())
    }

    /// Loyalty points credited to `client_id` so far
    pub fn loyalty_points(&self, client_id: Uuid) -> i32 {
        self.data
            .read()
            .map(|data| data.loyalty.get(&client_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, MemoryData>> {
        self.data
            .write()
            .map_err(|_| AppError::Internal("appointment store lock poisoned".to_string()))
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, MemoryData>> {
        self.data
            .read()
            .map_err(|_| AppError::Internal("appointment store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn fetch_booked_intervals(&self, range: DateRange) -> AppResult<BookedIntervals> {
        let data = self.read()?;
        Ok(data
            .occupied()
            .into_iter()
            .filter(|(day, _)| range.contains(*day))
            .collect())
    }

    async fn create_appointment(&self, new: NewAppointment) -> AppResult<Appointment> {
        let mut data = self.write()?;

        let occupied = data.occupied();
        if let Some(busy) = occupied.get(&new.day) {
            if new.units.iter().any(|u| busy.contains(u)) {
                return Err(AppError::SlotConflict(
                    "The selected time is no longer available".to_string(),
                ));
            }
        }

        let appointment = Appointment {
            id: new.id,
            client_id: new.client_id,
            client_name: new.client_name,
            service_names: new.service_names,
            day: new.day,
            start_time: new.start_time,
            duration_minutes: i32::try_from(new.duration_minutes)
                .map_err(|_| AppError::Validation("Duration is too long".to_string()))?,
            price: new.price,
            status: new.status,
            payment_method: "local".to_string(),
            created_by: new.created_by,
            crea_date: Utc::now(),
            modif_date: None,
        };

        if new.status == AppointmentStatus::Confirmed {
            *data.loyalty.entry(new.client_id).or_default() += new.loyalty_points.max(0);
        }
        data.units.insert(new.id, new.units);
        data.appointments.insert(new.id, appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment(&self, id: Uuid) -> AppResult<Appointment> {
        self.read()?
            .appointments
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> AppResult<Vec<Appointment>> {
        let data = self.read()?;
        let mut rows: Vec<Appointment> = data
            .appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.day, a.start_time));
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        next: AppointmentStatus,
        loyalty_points: i32,
    ) -> AppResult<Appointment> {
        let mut data = self.write()?;
        let current = data
            .appointments
            .get(&id)
            .map(|a| a.status)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        if !current.can_become(next) {
            return Err(AppError::BusinessRule(format!(
                "A {} appointment cannot become {}",
                current, next
            )));
        }

        if current != next {
            match next {
                AppointmentStatus::Cancelled => {
                    data.units.remove(&id);
                }
                AppointmentStatus::Confirmed => {
                    let client_id = data.appointments[&id].client_id;
                    *data.loyalty.entry(client_id).or_default() += loyalty_points.max(0);
                }
                AppointmentStatus::Pending => {}
            }
        }

        let appointment = data
            .appointments
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
        appointment.status = next;
        appointment.modif_date = Some(Utc::now());
        Ok(appointment.clone())
    }
}
