//! Next-fire-date computation for a single step.
//!
//! [`next_fire_date`] is a pure function of `(kind, base, time zone)` and is
//! safe to call from any thread.
//!
//! # Calendar anomalies
//!
//! Wall-clock instants are resolved with jiff's `compatible` disambiguation:
//!
//! - a time that falls in a spring-forward gap is moved forward by the length
//!   of the gap (02:30 on a 02:00→03:00 day becomes 03:30)
//! - a time that occurs twice on a fall-back day resolves to the earlier
//!   occurrence
//!
//! Neither case is an error.

use jiff::{
    civil::{Date, Time, Weekday},
    tz::TimeZone,
    SignedDuration, Span, Timestamp,
};

use crate::{
    error::{ChimeError, Result, ScheduleResultExt},
    models::StepKind,
};


/// Upper bound on the day-by-day scan for a weekday-restricted fixed time.
pub const WEEKDAY_SEARCH_DAYS: usize = 8;

/// Computes the next instant `kind` fires at, given its base instant.
///
/// # Errors
///
/// Returns [`ChimeError::Scheduling`] when a weekday-restricted fixed time
/// finds no matching day within [`WEEKDAY_SEARCH_DAYS`], or when the calendar
/// cannot represent the result.
pub fn next_fire_date(kind: &StepKind, base: Timestamp, time_zone: &TimeZone) -> Result<Timestamp> {
    match kind {
        StepKind::Timer {
            duration_seconds,
            every_n_days,
        } => {
            let candidate = add_seconds(base, *duration_seconds)?;
            match every_n_days {
                Some(days) => align_to_cadence(base, candidate, days.get(), time_zone),
                None => Ok(candidate),
            }
        }
        StepKind::RelativeToPrev { offset_seconds } => add_seconds(base, *offset_seconds),
        StepKind::FixedTime {
            hour,
            minute,
            weekdays,
        } => {
            let time = Time::new(*hour, *minute, 0, 0).schedule_context("Invalid wall-clock time")?;
            match weekdays {
                Some(days) => next_on_weekdays(base, time, days, time_zone),
                None => next_daily(base, time, time_zone),
            }
        }
    }
}

impl StepKind {
    /// Method form of [`next_fire_date`].
    pub fn next_fire_date(&self, base: Timestamp, time_zone: &TimeZone) -> Result<Timestamp> {
        next_fire_date(self, base, time_zone)
    }
}

fn add_seconds(base: Timestamp, seconds: i64) -> Result<Timestamp> {
    base.checked_add(SignedDuration::from_secs(seconds))
        .schedule_context("Fire time out of range")
}

/// Resolves `time` on `date` to an instant, never failing on DST gaps.
fn at_wall_clock(date: Date, time: Time, time_zone: &TimeZone) -> Result<Timestamp> {
    time_zone
        .to_ambiguous_zoned(date.to_datetime(time))
        .compatible()
        .map(|zoned| zoned.timestamp())
        .schedule_context("Failed to construct local time")
}

/// Moves a multi-day timer result onto the base's every-`n`-days cadence,
/// keeping the base's time of day.
fn align_to_cadence(
    base: Timestamp,
    candidate: Timestamp,
    every_n_days: u32,
    time_zone: &TimeZone,
) -> Result<Timestamp> {
    let base_local = base.to_zoned(time_zone.clone());
    let base_day = base_local.date();
    let candidate_day = candidate.to_zoned(time_zone.clone()).date();
    if candidate_day == base_day {
        return Ok(candidate);
    }

    let days_apart = i64::from(
        base_day
            .until(candidate_day)
            .schedule_context("Failed to measure day distance")?
            .get_days(),
    );
    let period = i64::from(every_n_days);
    // ceil(days_apart / period), never before the base day
    let periods = (-(-days_apart).div_euclid(period)).max(0);
    let span = Span::new()
        .try_days(periods * period)
        .schedule_context("Cadence span out of range")?;
    let target_day = base_day
        .checked_add(span)
        .schedule_context("Cadence day out of range")?;

    at_wall_clock(target_day, base_local.time(), time_zone)
}

fn next_daily(base: Timestamp, time: Time, time_zone: &TimeZone) -> Result<Timestamp> {
    let day = base.to_zoned(time_zone.clone()).date();
    let same_day = at_wall_clock(day, time, time_zone)?;
    if same_day > base {
        return Ok(same_day);
    }
    let next_day = day.tomorrow().schedule_context("Day out of range")?;
    at_wall_clock(next_day, time, time_zone)
}

fn next_on_weekdays(
    base: Timestamp,
    time: Time,
    weekdays: &[Weekday],
    time_zone: &TimeZone,
) -> Result<Timestamp> {
    let mut day = base.to_zoned(time_zone.clone()).date();
    for _ in 0..WEEKDAY_SEARCH_DAYS {
        if weekdays.contains(&day.weekday()) {
            let candidate = at_wall_clock(day, time, time_zone)?;
            if candidate > base {
                return Ok(candidate);
            }
        }
        day = day.tomorrow().schedule_context("Day out of range")?;
    }
    Err(ChimeError::scheduling(format!(
        "No matching weekday for {time} within {WEEKDAY_SEARCH_DAYS} days of {base}"
    )))
}
