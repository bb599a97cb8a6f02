//! Time blocking: admins hold units so they cannot be booked

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use uuid::Uuid;
use validator::Validate;

use crate::{
    availability::{format_minute, minute_of_day, OperatingHours},
    error::{AppError, AppResult},
    models::{
        parse_date, parse_optional_date, parse_time,
        profile::Profile,
        time_block::{CreateTimeBlock, TimeBlock, TimeBlockQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TimeBlocksService {
    repository: Repository,
    hours: OperatingHours,
}

impl TimeBlocksService {
    pub fn new(repository: Repository, hours: OperatingHours) -> Self {
        Self { repository, hours }
    }

    /// Blocks in the query range; defaults to the next 30 days from `today`
    pub async fn list(&self, query: &TimeBlockQuery, today: NaiveDate) -> AppResult<Vec<TimeBlock>> {
        let start = parse_optional_date(query.start_date.as_ref(), "start_date")?.unwrap_or(today);
        let end = match parse_optional_date(query.end_date.as_ref(), "end_date")? {
            Some(end) => end,
            None => start.checked_add_days(Days::new(30)).unwrap_or(start),
        };
        if end < start {
            return Err(AppError::Validation("end_date is before start_date".to_string()));
        }
        self.repository.time_blocks.list(start, end).await
    }

    pub async fn create(&self, data: &CreateTimeBlock, admin: &Profile) -> AppResult<TimeBlock> {
        admin.require_admin()?;
        data.validate()?;
        let day = parse_date(&data.date, "date")?;
        let units = block_units(&self.hours, &data.times)?;

        let block = self
            .repository
            .time_blocks
            .create(day, &units, data.reason.as_deref(), admin.id)
            .await?;
        tracing::info!(
            "Time block {} on {}: {}",
            block.id,
            day,
            block.times().join(", ")
        );
        Ok(block)
    }

    pub async fn delete(&self, id: Uuid, admin: &Profile) -> AppResult<()> {
        admin.require_admin()?;
        self.repository.time_blocks.delete(id).await?;
        tracing::info!("Time block {} removed", id);
        Ok(())
    }
}

/// Validated, sorted, de-duplicated unit minutes for "HH:MM" start times
pub fn block_units(hours: &OperatingHours, times: &[String]) -> AppResult<Vec<i16>> {
    let mut units = BTreeSet::new();
    for time in times {
        let minute = minute_of_day(parse_time(time, "time")?);
        if !hours.is_aligned(minute) {
            return Err(AppError::Validation(format!(
                "{} is not a slot start within opening hours",
                format_minute(minute)
            )));
        }
        units.insert(minute);
    }
    units
        .into_iter()
        .map(|m| i16::try_from(m).map_err(|_| AppError::Internal(format!("unit {} out of range", m))))
        .collect()
}
