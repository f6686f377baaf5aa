//! Summaries derived from a habit's history
//!
//! Averages are gated on the amount of data: an average over fewer
//! days than its window would be misleading and is not produced.

use std::str::FromStr;

use crate::lib::{
    duration::Duration,
    error::{HabitError, Result},
    series::{DurationRecord, HabitSeries},
};

/// Minimum number of records for the overall average
pub const OVERALL_MIN: usize = 2;
/// The last-week average needs strictly more records than this
pub const WEEK: usize = 7;
/// The last-month average needs strictly more records than this
pub const MONTH: usize = 30;

const DAYS_PER_YEAR: f64 = 365.0;

/// Mean duration, truncated to the minute
pub fn average(records: &[DurationRecord]) -> Result<Duration> {
    if records.is_empty() {
        return Err(HabitError::EmptySeries);
    }
    let total = records.iter().map(|r| r.duration.minutes() as u64).sum::<u64>();
    Ok(Duration::from_minutes((total / records.len() as u64) as u32))
}

/// Most recent `n` records, or all of them if there are fewer
fn tail(series: &HabitSeries, n: usize) -> &[DurationRecord] {
    let records = series.records();
    &records[records.len().saturating_sub(n)..]
}

pub fn overall_average(series: &HabitSeries) -> Option<Duration> {
    if series.len() < OVERALL_MIN {
        None
    } else {
        average(series.records()).ok()
    }
}

pub fn last7_average(series: &HabitSeries) -> Option<Duration> {
    if series.len() > WEEK {
        average(tail(series, WEEK)).ok()
    } else {
        None
    }
}

pub fn last30_average(series: &HabitSeries) -> Option<Duration> {
    if series.len() > MONTH {
        average(tail(series, MONTH)).ok()
    } else {
        None
    }
}

/// Average of the last `days` records, clamped to what is recorded
///
/// Returns the number of days actually used alongside the average.
pub fn last_n_average(series: &HabitSeries, days: usize) -> Result<(usize, Duration)> {
    if days == 0 {
        return Err(HabitError::InvalidDays(days.to_string()));
    }
    let records = tail(series, days);
    Ok((records.len(), average(records)?))
}

/// The three gated averages of a series, computed together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Averages {
    pub days: usize,
    pub overall: Option<Duration>,
    pub last7: Option<Duration>,
    pub last30: Option<Duration>,
}

impl Averages {
    pub fn of(series: &HabitSeries) -> Self {
        Self {
            days: series.len(),
            overall: overall_average(series),
            last7: last7_average(series),
            last30: last30_average(series),
        }
    }
}

/// Friendly rendering, e.g. `"2 hours and 35 minutes"` or `"1 minute"`
pub fn human_readable(duration: Duration) -> String {
    let hours = duration.whole_hours();
    let minutes = duration.rem_minutes();
    match (hours, minutes) {
        (0, 1) => "1 minute".to_string(),
        (0, m) => format!("{} minutes", m),
        (1, 0) => "1 hour".to_string(),
        (1, 1) => "1 hour and 1 minute".to_string(),
        (1, m) => format!("1 hour and {} minutes", m),
        (h, 0) => format!("{} hours", h),
        (h, 1) => format!("{} hours and 1 minute", h),
        (h, m) => format!("{} hours and {} minutes", h, m),
    }
}

/// Target total number of hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal(u32);

impl Goal {
    pub fn from_hours(hours: u32) -> Result<Self> {
        if hours == 0 {
            Err(HabitError::InvalidGoal(hours.to_string()))
        } else {
            Ok(Self(hours))
        }
    }

    pub fn hours(self) -> u32 {
        self.0
    }
}

impl FromStr for Goal {
    type Err = HabitError;

    /// Whole positive number of hours, thousands separators allowed (`10,000`)
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().replace(',', "");
        let hours = digits
            .parse::<u32>()
            .map_err(|_| HabitError::InvalidGoal(s.to_string()))?;
        Self::from_hours(hours).map_err(|_| HabitError::InvalidGoal(s.to_string()))
    }
}

/// How far along the goal is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalProgress {
    Reached {
        completed_hours: f64,
        goal_hours: u32,
    },
    InProgress(Projection),
}

/// Linear extrapolation of the average pace until the goal is met
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub completed_hours: f64,
    pub goal_hours: u32,
    pub percent_complete: f64,
    pub average_hours_per_day: f64,
    pub hours_remaining: f64,
    pub days_remaining: f64,
    pub years_remaining: f64,
}

impl Projection {
    /// Percentage as displayed, rounded to the nearest integer
    pub fn percent_rounded(&self) -> u32 {
        self.percent_complete.round() as u32
    }
}

pub fn goal_progress(series: &HabitSeries, goal: Goal) -> Result<GoalProgress> {
    if series.is_empty() {
        return Err(HabitError::EmptySeries);
    }
    let completed_hours = series.total().hours();
    let goal_hours = goal.hours();
    if completed_hours >= goal_hours as f64 {
        return Ok(GoalProgress::Reached { completed_hours, goal_hours });
    }
    let average_hours_per_day = completed_hours / series.len() as f64;
    if average_hours_per_day <= 0.0 {
        return Err(HabitError::ProjectionUndefined);
    }
    let hours_remaining = goal_hours as f64 - completed_hours;
    let days_remaining = hours_remaining / average_hours_per_day;
    Ok(GoalProgress::InProgress(Projection {
        completed_hours,
        goal_hours,
        percent_complete: completed_hours / goal_hours as f64 * 100.0,
        average_hours_per_day,
        hours_remaining,
        days_remaining,
        years_remaining: days_remaining / DAYS_PER_YEAR,
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::date::{Date, Month::*};

    fn series_of(minutes: &[u32]) -> HabitSeries {
        let mut series = HabitSeries::new("test");
        let mut d = Date::from(2024, Jan, 1).unwrap();
        for m in minutes {
            series.append(DurationRecord::new(d, Duration::from_minutes(*m))).unwrap();
            d = d.next();
        }
        series
    }

    macro_rules! hr {
        ( $h:expr, $m:expr => $s:expr ) => {
            assert_eq!(human_readable(Duration::from_hm($h, $m)), $s);
        };
    }

    #[test]
    fn human_readable_table() {
        hr!(0, 0 => "0 minutes");
        hr!(0, 1 => "1 minute");
        hr!(0, 45 => "45 minutes");
        hr!(1, 0 => "1 hour");
        hr!(1, 1 => "1 hour and 1 minute");
        hr!(1, 20 => "1 hour and 20 minutes");
        hr!(2, 0 => "2 hours");
        hr!(2, 1 => "2 hours and 1 minute");
        hr!(2, 30 => "2 hours and 30 minutes");
    }

    #[test]
    fn average_truncates() {
        let series = series_of(&[10, 15]);
        assert_eq!(average(series.records()).unwrap(), Duration::from_minutes(12));
        assert!(matches!(average(&[]), Err(HabitError::EmptySeries)));
    }

    #[test]
    fn overall_needs_two() {
        assert_eq!(overall_average(&series_of(&[30])), None);
        assert_eq!(overall_average(&series_of(&[30, 60])), Some(Duration::from_minutes(45)));
    }

    #[test]
    fn week_gating() {
        let seven = series_of(&[10; 7]);
        assert_eq!(last7_average(&seven), None);
        let eight = series_of(&[10; 8]);
        assert_eq!(last7_average(&eight), Some(Duration::from_minutes(10)));
        // only the most recent seven count
        let eight = series_of(&[80, 10, 10, 10, 10, 10, 10, 10]);
        assert_eq!(last7_average(&eight), Some(Duration::from_minutes(10)));
        assert_eq!(overall_average(&eight), Some(Duration::from_minutes(18)));
    }

    #[test]
    fn month_gating() {
        assert_eq!(last30_average(&series_of(&[20; 30])), None);
        assert_eq!(last30_average(&series_of(&[20; 31])), Some(Duration::from_minutes(20)));
        let avg = Averages::of(&series_of(&[20; 31]));
        assert_eq!(avg.days, 31);
        assert!(avg.overall.is_some() && avg.last7.is_some() && avg.last30.is_some());
    }

    #[test]
    fn last_n() {
        let series = series_of(&[60, 30, 0]);
        assert_eq!(last_n_average(&series, 2).unwrap(), (2, Duration::from_minutes(15)));
        assert_eq!(last_n_average(&series, 10).unwrap(), (3, Duration::from_minutes(30)));
        assert!(matches!(last_n_average(&series, 0), Err(HabitError::InvalidDays(_))));
    }

    #[test]
    fn goal_parsing() {
        assert_eq!("10,000".parse::<Goal>().unwrap().hours(), 10000);
        assert_eq!(" 100 ".parse::<Goal>().unwrap().hours(), 100);
        for bad in ["0", "-5", "ten", "", "1.5"] {
            assert!(matches!(bad.parse::<Goal>(), Err(HabitError::InvalidGoal(_))), "{}", bad);
        }
        assert!(Goal::from_hours(0).is_err());
    }

    #[test]
    fn goal_halfway() {
        // 25 days of 2 hours
        let series = series_of(&[120; 25]);
        let goal = Goal::from_hours(100).unwrap();
        match goal_progress(&series, goal).unwrap() {
            GoalProgress::InProgress(p) => {
                assert_eq!(p.completed_hours, 50.0);
                assert_eq!(p.percent_rounded(), 50);
                assert_eq!(p.average_hours_per_day, 2.0);
                assert_eq!(p.hours_remaining, 50.0);
                assert_eq!(p.days_remaining, 25.0);
                assert!((p.years_remaining - 0.07).abs() < 0.005);
            }
            other => panic!("expected a projection, got {:?}", other),
        }
    }

    #[test]
    fn goal_reached() {
        let series = series_of(&[600; 10]);
        assert_eq!(
            goal_progress(&series, Goal::from_hours(100).unwrap()).unwrap(),
            GoalProgress::Reached { completed_hours: 100.0, goal_hours: 100 }
        );
    }

    #[test]
    fn goal_undefined() {
        let series = series_of(&[0, 0, 0]);
        assert!(matches!(
            goal_progress(&series, Goal::from_hours(10).unwrap()),
            Err(HabitError::ProjectionUndefined)
        ));
        assert!(matches!(
            goal_progress(&HabitSeries::new("x"), Goal::from_hours(10).unwrap()),
            Err(HabitError::EmptySeries)
        ));
    }
}
