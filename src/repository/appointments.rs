//! Appointments repository
//!
//! Appointments and the granularity units they occupy. Every live
//! appointment owns one `occupied_units` row per unit; the primary key of
//! that table rejects double bookings at commit time.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    availability::{BookedIntervals, DateRange},
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment},
};

/// Storage seam used by the booking, availability and agenda services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Occupied units per day over `range` (appointments and time blocks)
    async fn fetch_booked_intervals(&self, range: DateRange) -> AppResult<BookedIntervals>;

    /// Insert an appointment and its units atomically.
    ///
    /// Fails with [`AppError::SlotConflict`] when any unit is already held.
    async fn create_appointment(&self, appointment: NewAppointment) -> AppResult<Appointment>;

    async fn get_appointment(&self, id: Uuid) -> AppResult<Appointment>;

    /// Appointments matching `filter`, by day then start time
    async fn list_appointments(&self, filter: AppointmentFilter) -> AppResult<Vec<Appointment>>;

    /// Move an appointment to `next`, releasing its units when cancelled and
    /// crediting `loyalty_points` when it becomes confirmed
    async fn update_status(
        &self,
        id: Uuid,
        next: AppointmentStatus,
        loyalty_points: i32,
    ) -> AppResult<Appointment>;
}

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Unit start minutes as stored (SMALLINT)
fn unit_rows(units: &[u16]) -> AppResult<Vec<i16>> {
    units
        .iter()
        .map(|u| {
            i16::try_from(*u)
                .map_err(|_| AppError::Validation(format!("Unit minute {} is out of range", u)))
        })
        .collect()
}

async fn credit_loyalty(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    client_id: Uuid,
    points: i32,
) -> AppResult<()> {
    if points > 0 {
        sqlx::query(
            "UPDATE profiles SET loyalty_points = loyalty_points + $2, modif_date = NOW() WHERE id = $1",
        )
        .bind(client_id)
        .bind(points)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl AppointmentStore for AppointmentsRepository {
    async fn fetch_booked_intervals(&self, range: DateRange) -> AppResult<BookedIntervals> {
        let rows: Vec<(NaiveDate, i16)> = sqlx::query_as(
            "SELECT day, start_minute FROM occupied_units WHERE day BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_store)?;

        let mut booked = BookedIntervals::new();
        for (day, minute) in rows {
            if let Ok(minute) = u16::try_from(minute) {
                booked.entry(day).or_default().insert(minute);
            }
        }
        Ok(booked)
    }

    async fn create_appointment(&self, new: NewAppointment) -> AppResult<Appointment> {
        let units = unit_rows(&new.units)?;
        let duration = i32::try_from(new.duration_minutes)
            .map_err(|_| AppError::Validation("Duration is too long".to_string()))?;

        let mut tx = self.pool.begin().await.map_err(AppError::from_store)?;

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, client_id, client_name, service_names, day, start_time,
                duration_minutes, price, status, payment_method, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'local', $10)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(new.client_id)
        .bind(&new.client_name)
        .bind(&new.service_names)
        .bind(new.day)
        .bind(new.start_time)
        .bind(duration)
        .bind(new.price)
        .bind(new.status)
        .bind(new.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from_store)?;

        sqlx::query(
            r#"
            INSERT INTO occupied_units (day, start_minute, appointment_id)
            SELECT $1, unit, $3 FROM UNNEST($2::SMALLINT[]) AS unit
            "#,
        )
        .bind(new.day)
        .bind(units)
        .bind(new.id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from_store)?;

        if new.status == AppointmentStatus::Confirmed {
            credit_loyalty(&mut tx, new.client_id, new.loyalty_points).await?;
        }

        tx.commit().await.map_err(AppError::from_store)?;
        Ok(appointment)
    }

    async fn get_appointment(&self, id: Uuid) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_store)?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> AppResult<Vec<Appointment>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM appointments WHERE TRUE");
        if let Some(start) = filter.start {
            builder.push(" AND day >= ").push_bind(start);
        }
        if let Some(end) = filter.end {
            builder.push(" AND day <= ").push_bind(end);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(client_id) = filter.client_id {
            builder.push(" AND client_id = ").push_bind(client_id);
        }
        if filter.live_only {
            builder.push(" AND status <> 'cancelled'");
        }
        builder.push(" ORDER BY day, start_time");

        let rows = builder
            .build_query_as::<Appointment>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from_store)?;
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        next: AppointmentStatus,
        loyalty_points: i32,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await.map_err(AppError::from_store)?;

        let current: AppointmentStatus =
            sqlx::query_scalar("SELECT status FROM appointments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::from_store)?
                .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        if !current.can_become(next) {
            return Err(AppError::BusinessRule(format!(
                "A {} appointment cannot become {}",
                current, next
            )));
        }

        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2, modif_date = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from_store)?;

        if current != next {
            match next {
                AppointmentStatus::Cancelled => {
                    sqlx::query("DELETE FROM occupied_units WHERE appointment_id = $1")
                        .bind(id)
                        .execute(&mut *tx)
                        .await
                        .map_err(AppError::from_store)?;
                }
                AppointmentStatus::Confirmed => {
                    credit_loyalty(&mut tx, appointment.client_id, loyalty_points).await?;
                }
                AppointmentStatus::Pending => {}
            }
        }

        tx.commit().await.map_err(AppError::from_store)?;
        Ok(appointment)
    }
}
