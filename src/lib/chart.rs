//! Plottable data for a habit
//!
//! The daily series is always present. Longer histories also get weekly
//! and then monthly means, so that the trend stays readable once the
//! daily points become noise.

use std::fmt;

use crate::lib::{
    date::Date,
    error::{HabitError, Result},
    period::Period,
    series::HabitSeries,
};

/// Above this many minutes on a single day, the whole chart is in hours
pub const MINUTES_CEILING: u32 = 120;
/// From this many records on, weekly means are added
pub const WEEKLY_FROM: usize = 15;
/// From this many records on, monthly means are added
pub const MONTHLY_FROM: usize = 62;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Minutes,
    Hours,
}

impl Unit {
    /// Unit fitting the longest day of the series
    fn fitting(max_minutes: u32) -> Self {
        if max_minutes <= MINUTES_CEILING {
            Unit::Minutes
        } else {
            Unit::Hours
        }
    }

    fn convert(self, minutes: u32) -> f64 {
        match self {
            Unit::Minutes => minutes as f64,
            Unit::Hours => minutes as f64 / 60.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Minutes => write!(f, "minutes"),
            Unit::Hours => write!(f, "hours"),
        }
    }
}

/// One value of the chart, at a date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub date: Date,
    pub value: f64,
}

/// Mean over a calendar week or month
///
/// Plotted at the last day of its period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub period: Period,
    pub days: usize,
    pub mean: f64,
}

impl Bucket {
    pub fn point(&self) -> Point {
        Point {
            date: self.period.1,
            value: self.mean,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub unit: Unit,
    pub daily: Vec<Point>,
    pub weekly: Option<Vec<Bucket>>,
    pub monthly: Option<Vec<Bucket>>,
}

/// How to group days into buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Week,
    Month,
}

impl Grouping {
    fn period_of(self, date: Date) -> Period {
        match self {
            Grouping::Week => Period::week_of(date),
            Grouping::Month => Period::month_of(date),
        }
    }
}

/// Mean of the daily values in each calendar period
///
/// `daily` must be sorted by date. Periods with no value do not appear.
pub fn bucket(daily: &[Point], grouping: Grouping) -> Vec<Bucket> {
    let mut buckets: Vec<(Period, usize, f64)> = Vec::new();
    for pt in daily {
        match buckets.last_mut() {
            Some((period, days, sum)) if period.contains(pt.date) => {
                *days += 1;
                *sum += pt.value;
            }
            _ => buckets.push((grouping.period_of(pt.date), 1, pt.value)),
        }
    }
    buckets
        .into_iter()
        .map(|(period, days, sum)| Bucket {
            period,
            days,
            mean: sum / days as f64,
        })
        .collect()
}

/// Build the chart data, with as many aggregation tiers as the length allows
pub fn build(series: &HabitSeries) -> Result<ChartSeries> {
    let max = series.durations().max().ok_or(HabitError::EmptySeries)?;
    let unit = Unit::fitting(max.minutes());
    let daily = series
        .records()
        .iter()
        .map(|r| Point {
            date: r.date,
            value: unit.convert(r.duration.minutes()),
        })
        .collect::<Vec<_>>();
    let n = daily.len();
    let weekly = if n >= WEEKLY_FROM {
        Some(bucket(&daily, Grouping::Week))
    } else {
        None
    };
    let monthly = if n >= MONTHLY_FROM {
        Some(bucket(&daily, Grouping::Month))
    } else {
        None
    };
    Ok(ChartSeries { unit, daily, weekly, monthly })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{
        date::Month::*,
        duration::Duration,
        series::DurationRecord,
    };

    macro_rules! dt {
        ( $y:tt - $m:tt - $d:tt ) => {
            Date::from($y, $m, $d).unwrap()
        };
    }

    fn series_from(start: Date, minutes: &[u32]) -> HabitSeries {
        let mut series = HabitSeries::new("chart");
        let mut d = start;
        for m in minutes {
            series.append(DurationRecord::new(d, Duration::from_minutes(*m))).unwrap();
            d = d.next();
        }
        series
    }

    fn series_len(n: usize) -> HabitSeries {
        series_from(dt!(2024-Jan-1), &vec![30; n])
    }

    #[test]
    fn minutes_when_short() {
        let chart = build(&series_from(dt!(2024-Jan-1), &[30, 90, 60])).unwrap();
        assert_eq!(chart.unit, Unit::Minutes);
        assert_eq!(
            chart.daily.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![30.0, 90.0, 60.0]
        );
    }

    #[test]
    fn aggregates_in_minutes() {
        // 2024-01-01 (Monday) .. 2024-03-02, 62 days
        let mut minutes = vec![60; 31];
        minutes.extend(vec![90; 29]);
        minutes.extend(vec![30; 2]);
        let chart = build(&series_from(dt!(2024-Jan-1), &minutes)).unwrap();
        assert_eq!(chart.unit, Unit::Minutes);
        let weekly = chart.weekly.unwrap();
        assert_eq!(weekly[0].mean, 60.0);
        assert_eq!(weekly[4].period, Period(dt!(2024-Jan-29), dt!(2024-Feb-4)));
        assert_eq!(weekly[4].mean, 540.0 / 7.0);
        let monthly = chart.monthly.unwrap();
        assert_eq!(
            monthly.iter().map(|b| (b.days, b.mean)).collect::<Vec<_>>(),
            vec![(31, 60.0), (29, 90.0), (2, 30.0)]
        );
    }

    #[test]
    fn hours_when_long() {
        let mut minutes = vec![150];
        minutes.extend(vec![90; 15]);
        let chart = build(&series_from(dt!(2024-Jan-1), &minutes)).unwrap();
        assert_eq!(chart.unit, Unit::Hours);
        assert_eq!(chart.daily[0].value, 2.5);
        assert_eq!(chart.daily[1].value, 1.5);
        let weekly = chart.weekly.unwrap();
        // 2024-01-01 is a Monday
        assert_eq!(weekly[0].mean, (2.5 + 6.0 * 1.5) / 7.0);
        assert_eq!(weekly[1].mean, 1.5);
    }

    #[test]
    fn boundary_at_two_hours() {
        assert_eq!(build(&series_from(dt!(2024-Jan-1), &[120])).unwrap().unit, Unit::Minutes);
        assert_eq!(build(&series_from(dt!(2024-Jan-1), &[121])).unwrap().unit, Unit::Hours);
    }

    #[test]
    fn tiers() {
        macro_rules! tier {
            ( $n:expr => $weekly:expr, $monthly:expr ) => {{
                let chart = build(&series_len($n)).unwrap();
                assert_eq!(chart.daily.len(), $n);
                assert_eq!(chart.weekly.is_some(), $weekly, "weekly for {}", $n);
                assert_eq!(chart.monthly.is_some(), $monthly, "monthly for {}", $n);
            }};
        }
        tier!(1 => false, false);
        tier!(14 => false, false);
        tier!(15 => true, false);
        tier!(61 => true, false);
        tier!(62 => true, true);
    }

    #[test]
    fn calendar_buckets() {
        // Wed 2024-01-31 .. Tue 2024-02-06
        let series = series_from(dt!(2024-Jan-31), &[10, 20, 30, 40, 50, 60, 70]);
        let chart = build(&series).unwrap();
        let weeks = bucket(&chart.daily, Grouping::Week);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].period, Period(dt!(2024-Jan-29), dt!(2024-Feb-4)));
        assert_eq!(weeks[0].days, 5);
        assert_eq!(weeks[0].mean, 30.0);
        assert_eq!(weeks[0].point().date, dt!(2024-Feb-4));
        assert_eq!(weeks[1].days, 2);
        assert_eq!(weeks[1].mean, 65.0);
        let months = bucket(&chart.daily, Grouping::Month);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].mean, 10.0);
        assert_eq!(months[1].mean, 45.0);
        assert_eq!(months[1].point().date, dt!(2024-Feb-29));
    }

    #[test]
    fn gaps_leave_no_empty_bucket() {
        let series = HabitSeries::load(
            "gappy",
            vec![("2024-01-01", "00:10"), ("2024-03-01", "00:30")],
        )
        .unwrap();
        let chart = build(&series).unwrap();
        let months = bucket(&chart.daily, Grouping::Month);
        assert_eq!(months.len(), 2);
        assert!(months.iter().all(|b| b.days == 1));
    }

    #[test]
    fn empty_has_no_chart() {
        assert!(matches!(build(&HabitSeries::new("x")), Err(HabitError::EmptySeries)));
    }
}
