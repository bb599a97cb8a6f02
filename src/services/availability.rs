//! Availability service: fetches a booked-interval snapshot and runs the
//! engine over it.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    availability::{
        self, AvailabilityKey, BusyUnits, CalendarMonth, DateRange, OperatingHours, SlotGroups,
        Tagged, VisibleWindow,
    },
    error::{AppError, AppResult},
    repository::AppointmentStore,
};

/// One cell of the booking calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    pub day: NaiveDate,
    pub is_bookable: bool,
    /// False for the padding days of adjacent months
    pub in_month: bool,
}

/// Bookable days of a month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthAvailability {
    /// Range and duration this result was computed for
    pub window: AvailabilityKey,
    pub month: CalendarMonth,
    pub days: Vec<CalendarDay>,
}

/// Available start times of one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySlots {
    pub window: AvailabilityKey,
    pub date: NaiveDate,
    pub is_bookable: bool,
    pub slots: SlotGroups,
}

#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn AppointmentStore>,
    hours: OperatingHours,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AppointmentStore>, hours: OperatingHours) -> Self {
        Self { store, hours }
    }

    pub fn operating_hours(&self) -> &OperatingHours {
        &self.hours
    }

    /// Bookability of every day in the padded grid of `month`
    pub async fn month_days(
        &self,
        month: CalendarMonth,
        duration_minutes: u32,
        reference_now: NaiveDateTime,
    ) -> AppResult<MonthAvailability> {
        check_duration(duration_minutes)?;
        let grid = month.grid();
        let booked = self.fetch(grid).await?;

        let days = availability::list_bookable_days(
            &grid,
            duration_minutes,
            &self.hours,
            &booked,
            reference_now,
        )
        .into_iter()
        .map(|d| CalendarDay {
            day: d.day,
            is_bookable: d.is_bookable,
            in_month: month.contains(d.day),
        })
        .collect::<Vec<_>>();

        tracing::debug!(
            "Computed availability for {} ({} min): {} bookable days",
            month,
            duration_minutes,
            days.iter().filter(|d| d.in_month && d.is_bookable).count()
        );

        Ok(MonthAvailability {
            window: AvailabilityKey {
                range: grid,
                duration_minutes,
            },
            month,
            days,
        })
    }

    /// Start times on `date` that hold `duration_minutes`
    pub async fn day_slots(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        reference_now: NaiveDateTime,
    ) -> AppResult<DaySlots> {
        check_duration(duration_minutes)?;
        let range = DateRange::new(date, date)?;
        let booked = self.fetch(range).await?;
        let free = BusyUnits::new();
        let busy = booked.get(&date).unwrap_or(&free);

        let slots =
            availability::list_available_slots(date, duration_minutes, &self.hours, busy, reference_now);

        Ok(DaySlots {
            window: AvailabilityKey {
                range,
                duration_minutes,
            },
            date,
            is_bookable: !slots.is_empty(),
            slots,
        })
    }

    /// Compute `month` and hand it back only if it is still what `window`
    /// shows once the snapshot has been fetched.
    pub async fn visible_month(
        &self,
        window: &VisibleWindow,
        month: CalendarMonth,
        duration_minutes: u32,
        reference_now: NaiveDateTime,
    ) -> AppResult<Option<MonthAvailability>> {
        let result = self.month_days(month, duration_minutes, reference_now).await?;
        Ok(window.accept(Tagged {
            key: result.window,
            value: result,
        }))
    }

    async fn fetch(&self, range: DateRange) -> AppResult<availability::BookedIntervals> {
        self.store.fetch_booked_intervals(range).await.map_err(|e| {
            tracing::warn!(
                "Failed to fetch booked intervals for {}..{}: {}",
                range.start,
                range.end,
                e
            );
            e
        })
    }
}

fn check_duration(duration_minutes: u32) -> AppResult<()> {
    if duration_minutes == 0 {
        return Err(AppError::Validation(
            "Duration must be a positive number of minutes".to_string(),
        ));
    }
    Ok(())
}
