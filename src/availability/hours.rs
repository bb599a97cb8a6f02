//! Shop operating hours (opening, closing, granularity, closed weekdays)

use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::AvailabilityError;

const MINUTES_PER_DAY: u16 = 24 * 60;

// ---------------------------------------------------------------------------
// WeekdaySet
// ---------------------------------------------------------------------------

/// Set of weekdays, identified 0..=6 with 0 = Sunday
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from weekday identifiers (0 = Sunday ... 6 = Saturday)
    pub fn from_ids(ids: &[u8]) -> Result<Self, AvailabilityError> {
        let mut set = Self::empty();
        for &id in ids {
            if id > 6 {
                return Err(AvailabilityError::InvalidConfiguration(format!(
                    "weekday identifier {} is outside 0..=6",
                    id
                )));
            }
            set.0 |= 1 << id;
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_sunday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    /// Weekday identifiers in ascending order
    pub fn ids(&self) -> Vec<u8> {
        (0..7).filter(|id| self.0 & (1 << id) != 0).collect()
    }
}

// ---------------------------------------------------------------------------
// OperatingHours
// ---------------------------------------------------------------------------

/// Immutable operating-hours configuration of the shop.
///
/// Only constructible through [`OperatingHours::new`], so every value in
/// circulation has `opening < closing`, a positive granularity and room for
/// at least one granularity unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatingHours {
    opening_minute: u16,
    closing_minute: u16,
    granularity_minutes: u16,
    closed_weekdays: WeekdaySet,
}

impl OperatingHours {
    pub fn new(
        opening_minute: u16,
        closing_minute: u16,
        granularity_minutes: u16,
        closed_weekdays: WeekdaySet,
    ) -> Result<Self, AvailabilityError> {
        if granularity_minutes == 0 {
            return Err(AvailabilityError::InvalidConfiguration(
                "slot granularity must be positive".to_string(),
            ));
        }
        if closing_minute <= opening_minute {
            return Err(AvailabilityError::InvalidConfiguration(format!(
                "closing minute {} is not after opening minute {}",
                closing_minute, opening_minute
            )));
        }
        if closing_minute > MINUTES_PER_DAY {
            return Err(AvailabilityError::InvalidConfiguration(format!(
                "closing minute {} is past midnight",
                closing_minute
            )));
        }
        if closing_minute - opening_minute < granularity_minutes {
            return Err(AvailabilityError::InvalidConfiguration(
                "business day is shorter than one slot".to_string(),
            ));
        }

        Ok(Self {
            opening_minute,
            closing_minute,
            granularity_minutes,
            closed_weekdays,
        })
    }

    /// Parse "HH:MM" opening and closing times
    pub fn from_times(
        opening: &str,
        closing: &str,
        granularity_minutes: u16,
        closed_weekday_ids: &[u8],
    ) -> Result<Self, AvailabilityError> {
        let opening = parse_hhmm(opening)?;
        let closing = if closing == "24:00" {
            MINUTES_PER_DAY
        } else {
            parse_hhmm(closing)?
        };
        Self::new(
            opening,
            closing,
            granularity_minutes,
            WeekdaySet::from_ids(closed_weekday_ids)?,
        )
    }

    pub fn opening_minute(&self) -> u16 {
        self.opening_minute
    }

    pub fn closing_minute(&self) -> u16 {
        self.closing_minute
    }

    pub fn granularity(&self) -> u16 {
        self.granularity_minutes
    }

    pub fn closed_weekdays(&self) -> WeekdaySet {
        self.closed_weekdays
    }

    pub fn is_closed_on(&self, day: impl Datelike) -> bool {
        self.closed_weekdays.contains(day.weekday())
    }

    /// Number of candidate start positions in a business day.
    ///
    /// Candidate `k` starts at `opening + k * granularity`; the last one
    /// starts no later than `closing - granularity`.
    pub fn candidate_count(&self) -> u16 {
        (self.closing_minute - self.opening_minute) / self.granularity_minutes
    }

    /// Granularity units needed to hold `duration_minutes`
    pub fn units_needed(&self, duration_minutes: u32) -> u32 {
        duration_minutes.div_ceil(u32::from(self.granularity_minutes))
    }

    /// Whether `start_minute` sits on a candidate position
    pub fn is_aligned(&self, start_minute: u16) -> bool {
        start_minute >= self.opening_minute
            && start_minute + self.granularity_minutes <= self.closing_minute
            && (start_minute - self.opening_minute) % self.granularity_minutes == 0
    }

    /// Whether a unit starting at `unit_minute` ends at or before closing.
    ///
    /// A unit that would run past closing does not fit, even when it starts
    /// before it.
    pub(crate) fn unit_fits(&self, unit_minute: u32) -> bool {
        unit_minute
            .checked_add(u32::from(self.granularity_minutes))
            .map_or(false, |end| end <= u32::from(self.closing_minute))
    }

    /// Start minutes of the units a booking of `duration_minutes` occupies,
    /// stopping at the first unit that does not fit before closing.
    ///
    /// The result is shorter than [`units_needed`](Self::units_needed) exactly
    /// when the booking runs past closing time.
    pub fn occupied_units(&self, start_minute: u16, duration_minutes: u32) -> Vec<u16> {
        let step = u32::from(self.granularity_minutes);
        (0..self.units_needed(duration_minutes))
            .map_while(|i| i.checked_mul(step)?.checked_add(u32::from(start_minute)))
            .take_while(|m| self.unit_fits(*m))
            .filter_map(|m| u16::try_from(m).ok())
            .collect()
    }
}

/// Minutes since midnight of a time of day
pub fn minute_of_day(time: impl Timelike) -> u16 {
    // hour < 24 and minute < 60, so this never exceeds 1439
    (time.hour() * 60 + time.minute()) as u16
}

/// Time of day for a minute offset (clamped to 23:59)
pub fn time_from_minute(minute: u16) -> NaiveTime {
    let minute = u32::from(minute.min(MINUTES_PER_DAY - 1));
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// "HH:MM" display form of a minute offset
pub fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn parse_hhmm(value: &str) -> Result<u16, AvailabilityError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(minute_of_day)
        .map_err(|_| {
            AvailabilityError::InvalidConfiguration(format!("invalid time '{}' (use HH:MM)", value))
        })
}
