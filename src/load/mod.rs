//! Reading and writing habit files
//!
//! `store` owns the files, `parse` turns their text into located rows
//! and `error` reports what is wrong with them.

pub mod error;
pub mod parse;
pub mod store;
