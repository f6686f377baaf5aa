//! Bringing a habit up to date
//!
//! Every day from the one after the latest record up to and including
//! `today` needs an entry, collected in calendar order. Nothing is kept
//! between calls: the position in the sequence is recomputed from the
//! series each time, so a session interrupted halfway resumes at the
//! first day that is still missing.

use log::debug;

use crate::lib::{
    date::Date,
    duration::Duration,
    error::{HabitError, Result},
    series::{DurationRecord, HabitSeries},
};

/// Largest accepted value for the hours of a single day
pub const MAX_HOURS: u32 = 23;
/// Largest accepted value for the minutes of a single day
pub const MAX_MINUTES: u32 = 59;

/// Where the collection of missing days stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    /// nothing was missing to begin with
    UpToDate,
    /// `0` is the next day that needs an entry
    AwaitingEntry(Date),
    /// the last missing day was just filled
    Complete,
}

/// Gap filler relative to a fixed current day
#[derive(Debug, Clone, Copy)]
pub struct GapFill {
    today: Date,
}

impl GapFill {
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    /// First day that still needs an entry, if any
    fn cursor(&self, series: &HabitSeries) -> Option<Date> {
        let cursor = match series.latest_date() {
            Ok(latest) => latest.next(),
            Err(_) => self.today,
        };
        if cursor > self.today {
            None
        } else {
            Some(cursor)
        }
    }

    /// State of a series before any entry of this session is submitted
    pub fn state(&self, series: &HabitSeries) -> FillState {
        match self.cursor(series) {
            Some(date) => FillState::AwaitingEntry(date),
            None => FillState::UpToDate,
        }
    }

    /// All the days that still need an entry, oldest first
    pub fn pending(&self, series: &HabitSeries) -> Pending {
        Pending {
            next: self.cursor(series),
            last: self.today,
        }
    }

    /// Record the time spent on `date`
    ///
    /// `hours` and `minutes` are the raw user input. `date` must be the
    /// day currently awaited, so that entries cannot be applied to the
    /// wrong day if the caller's view of the state is stale.
    pub fn submit(
        &self,
        series: &mut HabitSeries,
        date: Date,
        hours: &str,
        minutes: &str,
    ) -> Result<FillState> {
        let duration = parse_entry(hours, minutes)?;
        let expected = match self.cursor(series) {
            Some(cursor) => cursor,
            None => {
                return Err(HabitError::OutOfSequence {
                    expected: series.latest_date().map(Date::next).unwrap_or(self.today),
                    found: date,
                })
            }
        };
        if date != expected {
            return Err(HabitError::OutOfSequence { expected, found: date });
        }
        series.append(DurationRecord::new(date, duration))?;
        let state = match self.cursor(series) {
            Some(next) => FillState::AwaitingEntry(next),
            None => FillState::Complete,
        };
        debug!("'{}' filled {}, now {:?}", series.name(), date, state);
        Ok(state)
    }
}

/// Iterator over the missing days of a series
#[derive(Debug, Clone)]
pub struct Pending {
    next: Option<Date>,
    last: Date,
}

impl Iterator for Pending {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        let curr = self.next?;
        self.next = Some(curr.next()).filter(|d| *d <= self.last);
        Some(curr)
    }
}

/// Validate one day of user input
///
/// Both fields are whole numbers, hours in `0..=23` and minutes in `0..=59`.
pub fn parse_entry(hours: &str, minutes: &str) -> Result<Duration> {
    let field = |name: &'static str, input: &str, max: u32| {
        input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n <= max)
            .ok_or_else(|| HabitError::InvalidDuration {
                field: name,
                input: input.to_string(),
                max,
            })
    };
    let h = field("hours", hours, MAX_HOURS)?;
    let m = field("minutes", minutes, MAX_MINUTES)?;
    Ok(Duration::from_hm(h, m))
}
