use std::fmt;

use crate::lib::date::{Date, Month};

/// `Period(a, b)` is the range of dates from `a` to `b` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period(pub Date, pub Date);

impl Period {
    /// Monday to Sunday week containing `date`
    pub fn week_of(date: Date) -> Self {
        Self(date.start_of_week(), date.end_of_week())
    }

    /// Calendar month containing `date`
    pub fn month_of(date: Date) -> Self {
        Self(date.start_of_month(), date.end_of_month())
    }

    pub fn contains(&self, date: Date) -> bool {
        self.0 <= date && date <= self.1
    }
}

/// Shortest unambiguous form: `2024-01`, `2024-01-05..11`, `2024-01-29..02-04`
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (start, end) = (self.0, self.1);
        let whole_month = start.day() == 1 && end.day() == end.month().count(end.year());
        let merge_day = |f: &mut fmt::Formatter| {
            if whole_month {
                Ok(())
            } else if start.day() == end.day() {
                write!(f, "-{:02}", start.day())
            } else {
                write!(f, "-{:02}..{:02}", start.day(), end.day())
            }
        };
        let merge_month = |f: &mut fmt::Formatter| {
            if start.month() == end.month() {
                write!(f, "-{:02}", start.month().number())?;
                merge_day(f)
            } else {
                write!(
                    f,
                    "-{:02}-{:02}..{:02}-{:02}",
                    start.month().number(),
                    start.day(),
                    end.month().number(),
                    end.day()
                )
            }
        };
        if start.year() == end.year() {
            if start.month() == Month::Jan && start.day() == 1 && end.month() == Month::Dec && end.day() == 31 {
                write!(f, "{}", start.year())
            } else {
                write!(f, "{}", start.year())?;
                merge_month(f)
            }
        } else {
            write!(f, "{}..{}", start, end)
        }
    }
}
