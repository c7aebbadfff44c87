//! Utility functions and helpers for the darija-translate service.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and secret redaction for log lines.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
