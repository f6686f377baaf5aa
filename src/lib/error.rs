//! Recoverable failures of the tracking core
//!
//! None of these abort a session: the caller that triggered one
//! re-prompts or reports it and carries on.

use std::path::PathBuf;

use crate::lib::date::Date;

#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    /// unparseable or duplicated row in loaded data, `row` counts from 0
    #[error("record {row} is malformed: {reason}")]
    MalformedRecord { row: usize, reason: String, hint: String },
    /// append that would leave a gap or go back in time
    #[error("expected an entry for {expected}, got {found}")]
    OutOfSequence { expected: Date, found: Date },
    #[error("no records to compute from")]
    EmptySeries,
    #[error("invalid {field} '{input}': expected a whole number in 0..={max}")]
    InvalidDuration { field: &'static str, input: String, max: u32 },
    #[error("invalid goal '{0}': expected a positive whole number of hours")]
    InvalidGoal(String),
    #[error("invalid number of days '{0}': expected a positive whole number")]
    InvalidDays(String),
    #[error("average time per day is zero, no completion date can be projected")]
    ProjectionUndefined,
    #[error("could not access {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HabitError>;

impl HabitError {
    pub fn persistence<P>(path: P, source: std::io::Error) -> Self
    where
        P: Into<PathBuf>,
    {
        HabitError::Persistence { path: path.into(), source }
    }
}
