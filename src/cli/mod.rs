pub mod config;
pub mod lang;
pub mod plot;
pub mod prompt;
pub mod session;
pub mod table;
