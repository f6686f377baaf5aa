//! Implementations that are useful accross the whole project
//!
//! Date and duration management, the habit series itself, and everything
//! that is derived from it (gap filling, statistics, chart data)

pub mod chart;
pub mod date;
pub mod duration;
pub mod error;
pub mod gapfill;
pub mod period;
pub mod series;
pub mod stats;
