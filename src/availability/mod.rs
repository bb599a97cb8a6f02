//! Appointment-slot availability engine
//!
//! Pure computation over an immutable snapshot: operating hours, the busy
//! granularity units of each day and a requested service duration. No I/O
//! happens here; the caller fetches the snapshot and hands it over by value
//! or by shared reference.
//!
//! The day predicate ([`is_day_bookable`]) and the slot listing
//! ([`list_available_slots`]) are both driven by the same lazy iterator of
//! fitting start minutes, so a day is bookable exactly when its listing is
//! non-empty.

pub mod calendar;
pub mod hours;
pub mod window;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use calendar::{CalendarMonth, DateRange};
pub use hours::{format_minute, minute_of_day, time_from_minute, OperatingHours, WeekdaySet};
pub use window::{AvailabilityKey, Tagged, VisibleWindow};

/// Occupied unit start minutes of a single day
pub type BusyUnits = BTreeSet<u16>;

/// Occupied units per day; a day without an entry is fully free
pub type BookedIntervals = BTreeMap<NaiveDate, BusyUnits>;

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid operating hours: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),
}

/// Bookability of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayAvailability {
    pub day: NaiveDate,
    pub is_bookable: bool,
}

/// A start time verified to hold the requested duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotOffer {
    pub day: NaiveDate,
    /// Minutes since midnight
    pub start_minute: u16,
    /// Display time (HH:MM)
    pub time: String,
}

impl SlotOffer {
    fn new(day: NaiveDate, start_minute: u16) -> Self {
        Self {
            day,
            start_minute,
            time: format_minute(start_minute),
        }
    }
}

/// Period of the day a slot is shown under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub fn of(start_minute: u16) -> Self {
        match start_minute / 60 {
            h if h < 12 => DayPeriod::Morning,
            h if h < 18 => DayPeriod::Afternoon,
            _ => DayPeriod::Evening,
        }
    }
}

/// Available slots of a day, split by period. All three buckets are always
/// present, possibly empty, each in ascending time order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotGroups {
    pub morning: Vec<SlotOffer>,
    pub afternoon: Vec<SlotOffer>,
    pub evening: Vec<SlotOffer>,
}

impl SlotGroups {
    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty()
    }

    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.evening.len()
    }

    /// All offers in ascending time order
    pub fn iter(&self) -> impl Iterator<Item = &SlotOffer> {
        self.morning.iter().chain(&self.afternoon).chain(&self.evening)
    }

    pub fn start_minutes(&self) -> Vec<u16> {
        self.iter().map(|offer| offer.start_minute).collect()
    }

    fn push(&mut self, offer: SlotOffer) {
        match DayPeriod::of(offer.start_minute) {
            DayPeriod::Morning => self.morning.push(offer),
            DayPeriod::Afternoon => self.afternoon.push(offer),
            DayPeriod::Evening => self.evening.push(offer),
        }
    }
}

/// Start minutes on `day` that can hold `duration_minutes`, ascending.
///
/// The iterator is bounded by the candidate count of `hours`, computed once.
/// A zero duration needs no units, so every free future candidate fits;
/// rejecting it is the caller's job.
fn fitting_starts<'a>(
    day: NaiveDate,
    duration_minutes: u32,
    hours: &'a OperatingHours,
    busy: &'a BusyUnits,
    reference_now: NaiveDateTime,
) -> impl Iterator<Item = u16> + 'a {
    let today = reference_now.date();
    let count = if day < today || hours.is_closed_on(day) {
        0
    } else {
        hours.candidate_count()
    };
    let not_after = (day == today).then(|| minute_of_day(reference_now.time()));
    let step = hours.granularity();
    let units = hours.units_needed(duration_minutes);

    (0..count)
        .map(move |k| hours.opening_minute() + k * step)
        .filter(move |&t| not_after.map_or(true, |now| t > now))
        .filter(move |t| !busy.contains(t))
        .filter(move |&t| fits(hours, busy, t, units))
}

/// Every unit from `start` must end by closing time and be free
fn fits(hours: &OperatingHours, busy: &BusyUnits, start: u16, units: u32) -> bool {
    let step = u32::from(hours.granularity());
    (0..units).all(|i| {
        match i.checked_mul(step).and_then(|o| o.checked_add(u32::from(start))) {
            Some(unit) => {
                hours.unit_fits(unit) && u16::try_from(unit).map_or(false, |u| !busy.contains(&u))
            }
            None => false,
        }
    })
}

/// Whether `day` has at least one start time holding `duration_minutes`.
///
/// Stops at the first fitting start time.
pub fn is_day_bookable(
    day: NaiveDate,
    duration_minutes: u32,
    hours: &OperatingHours,
    busy: &BusyUnits,
    reference_now: NaiveDateTime,
) -> bool {
    fitting_starts(day, duration_minutes, hours, busy, reference_now)
        .next()
        .is_some()
}

/// Every start time on `day` holding `duration_minutes`, grouped by period
pub fn list_available_slots(
    day: NaiveDate,
    duration_minutes: u32,
    hours: &OperatingHours,
    busy: &BusyUnits,
    reference_now: NaiveDateTime,
) -> SlotGroups {
    let mut groups = SlotGroups::default();
    for start in fitting_starts(day, duration_minutes, hours, busy, reference_now) {
        groups.push(SlotOffer::new(day, start));
    }
    groups
}

/// Bookability of every day in `range`, in order
pub fn list_bookable_days(
    range: &DateRange,
    duration_minutes: u32,
    hours: &OperatingHours,
    booked: &BookedIntervals,
    reference_now: NaiveDateTime,
) -> Vec<DayAvailability> {
    let free = BusyUnits::new();
    range
        .days()
        .map(|day| DayAvailability {
            day,
            is_bookable: is_day_bookable(
                day,
                duration_minutes,
                hours,
                booked.get(&day).unwrap_or(&free),
                reference_now,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    // 2026-10-20 is a Tuesday; 2026-10-18 a Sunday
    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn hm(h: u16, m: u16) -> u16 {
        h * 60 + m
    }

    fn hours(open: u16, close: u16, closed: &[u8]) -> OperatingHours {
        OperatingHours::new(open, close, 30, WeekdaySet::from_ids(closed).unwrap()).unwrap()
    }

    fn busy(units: &[u16]) -> BusyUnits {
        units.iter().copied().collect()
    }

    // Reference "now" well before every test day
    fn early() -> NaiveDateTime {
        at(1, 8, 0)
    }

    #[test]
    fn test_full_day_ninety_minutes() {
        let h = hours(hm(9, 0), hm(19, 0), &[]);
        let slots = list_available_slots(date(20), 90, &h, &busy(&[]), early());
        let starts = slots.start_minutes();

        assert_eq!(starts.first(), Some(&hm(9, 0)));
        assert_eq!(starts.last(), Some(&hm(17, 30)));
        assert!(!starts.contains(&hm(18, 0)));
        assert_eq!(starts.len(), 18);
    }

    #[test]
    fn test_busy_first_unit() {
        let h = hours(hm(9, 0), hm(11, 0), &[]);
        let slots = list_available_slots(date(20), 60, &h, &busy(&[hm(9, 0)]), early());
        assert_eq!(slots.start_minutes(), vec![hm(9, 30), hm(10, 0)]);
    }

    #[test]
    fn test_today_skips_elapsed_starts() {
        let h = hours(hm(9, 0), hm(12, 0), &[]);
        let slots = list_available_slots(date(20), 30, &h, &busy(&[]), at(20, 10, 15));
        assert_eq!(slots.start_minutes(), vec![hm(10, 30), hm(11, 0), hm(11, 30)]);
    }

    #[test]
    fn test_current_minute_is_not_bookable() {
        let h = hours(hm(9, 0), hm(12, 0), &[]);
        let slots = list_available_slots(date(20), 30, &h, &busy(&[]), at(20, 10, 30));
        assert_eq!(slots.start_minutes(), vec![hm(11, 0), hm(11, 30)]);
    }

    #[test]
    fn test_fully_booked_day() {
        let h = hours(hm(9, 0), hm(19, 0), &[]);
        let all: BusyUnits = (0..h.candidate_count()).map(|k| hm(9, 0) + k * 30).collect();

        assert!(!is_day_bookable(date(20), 30, &h, &all, early()));
        let slots = list_available_slots(date(20), 30, &h, &all, early());
        assert!(slots.morning.is_empty());
        assert!(slots.afternoon.is_empty());
        assert!(slots.evening.is_empty());
    }

    #[test]
    fn test_past_day_never_bookable() {
        let h = hours(hm(9, 0), hm(19, 0), &[]);
        assert!(!is_day_bookable(date(19), 30, &h, &busy(&[]), at(20, 0, 0)));
        assert!(list_available_slots(date(19), 30, &h, &busy(&[]), at(20, 0, 0)).is_empty());
    }

    #[test]
    fn test_closed_weekday_never_bookable() {
        let h = hours(hm(9, 0), hm(19, 0), &[0]);
        assert!(!is_day_bookable(date(18), 30, &h, &busy(&[]), early()));
        assert!(is_day_bookable(date(19), 30, &h, &busy(&[]), early()));
    }

    #[test]
    fn test_boundary_fit() {
        let h = hours(hm(9, 0), hm(10, 0), &[]);
        // 09:00 + 60 ends exactly at closing
        assert_eq!(
            list_available_slots(date(20), 60, &h, &busy(&[]), early()).start_minutes(),
            vec![hm(9, 0)]
        );
        // 61 minutes needs three units, which overruns closing
        assert!(!is_day_bookable(date(20), 61, &h, &busy(&[]), early()));
    }

    #[test]
    fn test_uneven_closing_never_offers_partial_unit() {
        // 09:00-10:10: a 10:00 start would end at 10:30
        let h = hours(hm(9, 0), hm(10, 10), &[]);
        assert_eq!(
            list_available_slots(date(20), 30, &h, &busy(&[]), early()).start_minutes(),
            vec![hm(9, 0), hm(9, 30)]
        );
    }

    #[test]
    fn test_uneven_closing_multi_unit_needs_whole_units() {
        // 09:00-10:10, 60 min: a 09:30 start would hold the 10:00-10:30 unit
        let h = hours(hm(9, 0), hm(10, 10), &[]);
        assert_eq!(
            list_available_slots(date(20), 60, &h, &busy(&[]), early()).start_minutes(),
            vec![hm(9, 0)]
        );
    }

    #[test]
    fn test_duration_longer_than_any_day() {
        let h = hours(hm(9, 0), hm(19, 0), &[]);
        assert!(!is_day_bookable(date(20), u32::MAX, &h, &busy(&[]), early()));
        assert!(list_available_slots(date(20), u32::MAX, &h, &busy(&[]), early()).is_empty());
    }

    #[test]
    fn test_gap_too_short_for_duration() {
        let h = hours(hm(9, 0), hm(12, 0), &[]);
        // Free: 09:30 only between busy 09:00 and 10:00, then 11:00-12:00
        let b = busy(&[hm(9, 0), hm(10, 0), hm(10, 30)]);
        assert_eq!(
            list_available_slots(date(20), 60, &h, &b, early()).start_minutes(),
            vec![hm(11, 0)]
        );
    }

    #[test]
    fn test_groups_by_period() {
        let h = hours(hm(11, 0), hm(19, 0), &[]);
        let b = busy(&[hm(12, 30), hm(13, 0), hm(13, 30), hm(14, 0), hm(14, 30), hm(15, 0), hm(15, 30), hm(16, 0), hm(16, 30), hm(17, 0)]);
        let slots = list_available_slots(date(20), 30, &h, &b, early());

        let times = |v: &Vec<SlotOffer>| v.iter().map(|o| o.time.clone()).collect::<Vec<_>>();
        assert_eq!(times(&slots.morning), vec!["11:00", "11:30"]);
        assert_eq!(times(&slots.afternoon), vec!["12:00", "17:30"]);
        assert_eq!(times(&slots.evening), vec!["18:00", "18:30"]);
        assert_eq!(slots.len(), 6);
    }

    #[test]
    fn test_empty_buckets_are_present() {
        let h = hours(hm(9, 0), hm(11, 0), &[]);
        let slots = list_available_slots(date(20), 30, &h, &busy(&[]), early());
        assert_eq!(slots.morning.len(), 4);
        assert!(slots.afternoon.is_empty());
        assert!(slots.evening.is_empty());

        let json = serde_json::to_value(&slots).unwrap();
        assert!(json["afternoon"].as_array().unwrap().is_empty());
        assert!(json["evening"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_day_period_boundaries() {
        assert_eq!(DayPeriod::of(hm(11, 59)), DayPeriod::Morning);
        assert_eq!(DayPeriod::of(hm(12, 0)), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::of(hm(17, 59)), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::of(hm(18, 0)), DayPeriod::Evening);
    }

    #[test]
    fn test_bookable_days_over_range() {
        let h = hours(hm(9, 0), hm(10, 0), &[0]);
        let mut booked = BookedIntervals::new();
        booked.insert(date(21), busy(&[hm(9, 0), hm(9, 30)]));

        let range = DateRange::new(date(17), date(22)).unwrap();
        let days = list_bookable_days(&range, 30, &h, &booked, at(19, 9, 40));
        let flags: Vec<(u32, bool)> = days
            .iter()
            .map(|d| (chrono::Datelike::day(&d.day), d.is_bookable))
            .collect();

        assert_eq!(
            flags,
            vec![
                (17, false), // past
                (18, false), // Sunday
                (19, false), // today, 09:30 already elapsed
                (20, true),
                (21, false), // fully booked
                (22, true),
            ]
        );
    }

    /// Small exhaustive grid of busy patterns and durations used by the
    /// property tests below.
    fn scenarios() -> Vec<(BusyUnits, u32, NaiveDate, NaiveDateTime)> {
        let h = hours(hm(9, 0), hm(12, 0), &[]);
        let candidates: Vec<u16> = (0..h.candidate_count()).map(|k| hm(9, 0) + k * 30).collect();
        let mut out = Vec::new();
        for mask in 0u32..(1 << candidates.len()) {
            let b: BusyUnits = candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, m)| *m)
                .collect();
            for duration in [15, 30, 45, 60, 90, 120, 180, 200] {
                out.push((b.clone(), duration, date(20), early()));
                out.push((b.clone(), duration, date(20), at(20, 10, 0)));
            }
        }
        out
    }

    #[test]
    fn test_predicate_agrees_with_listing() {
        let h = hours(hm(9, 0), hm(12, 0), &[]);
        for (b, duration, day, now) in scenarios() {
            let bookable = is_day_bookable(day, duration, &h, &b, now);
            let slots = list_available_slots(day, duration, &h, &b, now);
            assert_eq!(bookable, !slots.is_empty(), "busy={:?} duration={}", b, duration);
        }
    }

    #[test]
    fn test_longer_duration_never_adds_starts() {
        let h = hours(hm(9, 0), hm(12, 0), &[]);
        let durations = [15, 30, 45, 60, 90, 120, 180, 200];
        for (b, _, day, now) in scenarios().into_iter().step_by(durations.len()) {
            for pair in durations.windows(2) {
                let shorter: BTreeSet<u16> =
                    list_available_slots(day, pair[0], &h, &b, now).start_minutes().into_iter().collect();
                let longer: BTreeSet<u16> =
                    list_available_slots(day, pair[1], &h, &b, now).start_minutes().into_iter().collect();
                assert!(longer.is_subset(&shorter), "busy={:?} {:?}", b, pair);
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let h = hours(hm(9, 0), hm(19, 0), &[0]);
        let b = busy(&[hm(10, 0), hm(14, 30)]);
        let first = list_available_slots(date(20), 45, &h, &b, early());
        let second = list_available_slots(date(20), 45, &h, &b, early());
        assert_eq!(first, second);
        assert_eq!(
            is_day_bookable(date(20), 45, &h, &b, early()),
            is_day_bookable(date(20), 45, &h, &b, early())
        );
    }
}
