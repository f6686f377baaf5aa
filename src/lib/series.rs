//! In-memory history of one habit
//!
//! A `HabitSeries` is always sorted by date with no duplicates.
//! It only grows at the end, one day at a time.

use log::debug;

use crate::lib::{
    date::Date,
    duration::Duration,
    error::{HabitError, Result},
};

/// Time spent on the habit during one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRecord {
    pub date: Date,
    pub duration: Duration,
}

impl DurationRecord {
    pub fn new(date: Date, duration: Duration) -> Self {
        Self { date, duration }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSeries {
    name: String,
    records: Vec<DurationRecord>,
}

impl HabitSeries {
    /// A habit with no data yet
    pub fn new<S>(name: S) -> Self
    where
        S: ToString,
    {
        Self {
            name: name.to_string(),
            records: Vec::new(),
        }
    }

    /// Validate raw `(date, duration)` text pairs into a series
    ///
    /// Input may come in any order, the result is sorted.
    /// The first invalid row aborts the whole load.
    pub fn load<S, I, D, T>(name: S, raw: I) -> Result<Self>
    where
        S: ToString,
        I: IntoIterator<Item = (D, T)>,
        D: AsRef<str>,
        T: AsRef<str>,
    {
        let mut rows = Vec::new();
        for (row, (date, duration)) in raw.into_iter().enumerate() {
            let date = date.as_ref().parse::<Date>().map_err(|e| HabitError::MalformedRecord {
                row,
                hint: e.fix_hint(),
                reason: e.to_string(),
            })?;
            let duration = duration.as_ref().parse::<Duration>().map_err(|e| {
                HabitError::MalformedRecord {
                    row,
                    hint: e.fix_hint(),
                    reason: e.to_string(),
                }
            })?;
            rows.push((row, DurationRecord::new(date, duration)));
        }
        // stable, so the second occurrence of a date is the one reported
        rows.sort_by_key(|(_, rec)| rec.date);
        for pair in rows.windows(2) {
            let (_, prev) = pair[0];
            let (row, curr) = pair[1];
            if prev.date == curr.date {
                return Err(HabitError::MalformedRecord {
                    row,
                    reason: format!("{} is recorded more than once", curr.date),
                    hint: "keep a single line per day".to_string(),
                });
            }
        }
        let mut total = Duration::ZERO;
        for (row, rec) in &rows {
            total = total.checked_add(rec.duration).ok_or_else(|| HabitError::MalformedRecord {
                row: *row,
                reason: format!("the total time recorded exceeds {} minutes", u32::MAX),
                hint: "check the number of hours on this line".to_string(),
            })?;
        }
        let series = Self {
            name: name.to_string(),
            records: rows.into_iter().map(|(_, rec)| rec).collect(),
        };
        debug!("loaded {} records for '{}'", series.len(), series.name);
        Ok(series)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[DurationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Result<Date> {
        self.records.first().map(|r| r.date).ok_or(HabitError::EmptySeries)
    }

    /// Most recent recorded day
    pub fn latest_date(&self) -> Result<Date> {
        self.records.last().map(|r| r.date).ok_or(HabitError::EmptySeries)
    }

    pub fn durations(&self) -> impl Iterator<Item = Duration> + '_ {
        self.records.iter().map(|r| r.duration)
    }

    /// Sum of all recorded durations
    pub fn total(&self) -> Duration {
        self.durations().sum()
    }

    /// Add the record for the day following `latest_date`
    ///
    /// An empty series accepts any date.
    pub fn append(&mut self, record: DurationRecord) -> Result<()> {
        if let Ok(latest) = self.latest_date() {
            let expected = latest.next();
            if record.date != expected {
                return Err(HabitError::OutOfSequence {
                    expected,
                    found: record.date,
                });
            }
        }
        debug!("'{}': {} -> {}", self.name, record.date, record.duration);
        self.records.push(record);
        Ok(())
    }

    /// Days between the first and last record that have no entry
    pub fn gaps(&self) -> Vec<Date> {
        let mut missing = Vec::new();
        for pair in self.records.windows(2) {
            let mut d = pair[0].date.next();
            while d < pair[1].date {
                missing.push(d);
                d = d.next();
            }
        }
        missing
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::date::Month::*;

    macro_rules! dt {
        ( $y:tt - $m:tt - $d:tt ) => {
            Date::from($y, $m, $d).unwrap()
        };
    }

    macro_rules! rec {
        ( $y:tt - $m:tt - $d:tt => $min:expr ) => {
            DurationRecord::new(dt!($y - $m - $d), Duration::from_minutes($min))
        };
    }

    #[test]
    fn load_sorts() {
        let series = HabitSeries::load(
            "piano",
            vec![("2024-01-03", "00:10"), ("2024-01-01", "01:00"), ("2024-01-02", "00:30:00")],
        )
        .unwrap();
        assert_eq!(
            series.records(),
            &[rec!(2024-Jan-1 => 60), rec!(2024-Jan-2 => 30), rec!(2024-Jan-3 => 10)]
        );
        assert_eq!(series.latest_date().unwrap(), dt!(2024-Jan-3));
        assert_eq!(series.first_date().unwrap(), dt!(2024-Jan-1));
        assert_eq!(series.total(), Duration::from_hm(1, 40));
    }

    #[test]
    fn load_rejects() {
        macro_rules! malformed {
            ( $raw:expr => $row:expr ) => {
                match HabitSeries::load("x", $raw) {
                    Err(HabitError::MalformedRecord { row, .. }) => assert_eq!(row, $row),
                    other => panic!("expected malformed record, got {:?}", other),
                }
            };
        }
        malformed!(vec![("2024-01-01", "00:10"), ("2024-02-30", "00:10")] => 1);
        malformed!(vec![("2024-01-01", "0:10")] => 0);
        malformed!(vec![("2024-01-01", "1:30")] => 0);
        malformed!(vec![("2024-01-01", "71582788:00"), ("2024-01-02", "71582788:00")] => 1);
        malformed!(vec![("2024-01-01", "00:10"), ("2024-01-02", "00:10"), ("2024-01-01", "00:20")] => 2);
    }

    #[test]
    fn empty() {
        let series = HabitSeries::load("x", Vec::<(&str, &str)>::new()).unwrap();
        assert!(series.is_empty());
        assert!(matches!(series.latest_date(), Err(HabitError::EmptySeries)));
    }

    #[test]
    fn append_in_sequence() {
        let mut series = HabitSeries::new("guitar");
        series.append(rec!(2024-Feb-28 => 5)).unwrap();
        series.append(rec!(2024-Feb-29 => 5)).unwrap();
        series.append(rec!(2024-Mar-1 => 5)).unwrap();
        match series.append(rec!(2024-Mar-3 => 5)) {
            Err(HabitError::OutOfSequence { expected, found }) => {
                assert_eq!(expected, dt!(2024-Mar-2));
                assert_eq!(found, dt!(2024-Mar-3));
            }
            other => panic!("expected out of sequence, got {:?}", other),
        }
        assert!(series.append(rec!(2024-Mar-1 => 5)).is_err());
        assert!(series.append(rec!(2024-Feb-1 => 5)).is_err());
        assert_eq!(series.len(), 3);
        assert!(series.records().windows(2).all(|w| w[0].date < w[1].date));
        assert!(series.gaps().is_empty());
    }

    #[test]
    fn gaps_listed() {
        let series = HabitSeries::load(
            "x",
            vec![("2024-01-01", "00:10"), ("2024-01-04", "00:10"), ("2024-01-05", "00:10")],
        )
        .unwrap();
        assert_eq!(series.gaps(), vec![dt!(2024-Jan-2), dt!(2024-Jan-3)]);
    }
}
