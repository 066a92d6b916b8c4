//! # User Interface
//!
//! Colored terminal output. Logs go to stderr so command results on
//! stdout stay machine-readable.

pub mod log;

pub use log::{banner, debug, error, header, info, percent, success, truncate, warn, Log};
