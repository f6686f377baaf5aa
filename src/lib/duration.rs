//! Time spent on a habit during one day
//!
//! Resolution is one minute: files store `HH:MM`, and the `HH:MM:SS`
//! variant is only accepted when the seconds are zero.

use std::fmt;
use std::iter::Sum;
use std::ops;
use std::str::FromStr;

/// A non-negative number of minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(u32);

impl Duration {
    pub const ZERO: Self = Duration(0);

    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    /// Total number of minutes
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Whole hours, the remaining minutes are in `rem_minutes`
    pub fn whole_hours(self) -> u32 {
        self.0 / 60
    }

    pub fn rem_minutes(self) -> u32 {
        self.0 % 60
    }

    /// Fractional number of hours
    pub fn hours(self) -> f64 {
        self.0 as f64 / 60.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// `HH:MM:SS` with zero seconds, the format of exported files
    pub fn with_seconds(self) -> String {
        format!("{}:00", self)
    }
}

/// `HH:MM`, zero-padded, as written to habit files
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.whole_hours(), self.rem_minutes())
    }
}

/// Saturates at the largest representable duration
impl ops::Add for Duration {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Duration> for Duration {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Ways in which a stored duration can be wrong
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DurationError {
    /// not `HH:MM` or `HH:MM:SS`
    Syntax(String),
    /// minutes or seconds field above 59
    OutOfRange(String),
    /// nonzero seconds cannot be represented
    SubMinute(String),
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, DurationError> {
        let fields = s.trim().split(':').collect::<Vec<_>>();
        let shape_ok = (fields.len() == 2 || fields.len() == 3)
            && fields[0].len() >= 2
            && fields[1..].iter().all(|f| f.len() == 2)
            && fields.iter().all(|f| f.bytes().all(|b| b.is_ascii_digit()));
        if !shape_ok {
            return Err(DurationError::Syntax(s.to_string()));
        }
        let number = |f: &str| f.parse::<u32>().map_err(|_| DurationError::Syntax(s.to_string()));
        let hours = number(fields[0])?;
        let minutes = number(fields[1])?;
        if minutes >= 60 {
            return Err(DurationError::OutOfRange(s.to_string()));
        }
        if let Some(seconds) = fields.get(2) {
            match number(seconds)? {
                0 => (),
                1..=59 => return Err(DurationError::SubMinute(s.to_string())),
                _ => return Err(DurationError::OutOfRange(s.to_string())),
            }
        }
        hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .map(Duration)
            .ok_or_else(|| DurationError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DurationError::*;
        match self {
            Syntax(s) => write!(f, "'{}' is not a duration of the form HH:MM", s),
            OutOfRange(s) => write!(f, "'{}' has a field out of range", s),
            SubMinute(s) => write!(f, "'{}' is more precise than one minute", s),
        }
    }
}

impl std::error::Error for DurationError {}

impl DurationError {
    /// What message to show to help fix the duration error
    pub fn fix_hint(&self) -> String {
        use DurationError::*;
        match self {
            Syntax(_) => "durations are written HH:MM with at least two digits of hours, e.g. 01:30".to_string(),
            OutOfRange(_) => "minutes and seconds are in the range 00 ..= 59".to_string(),
            SubMinute(_) => "round to the minute and write HH:MM".to_string(),
        }
    }
}
