//! Utility modules for common functionality.
//!
//! - error: Error context with trace ids shared by every error type
//! - logging: Tracing subscriber setup
//! - parsing: Parsing of hex quantities and calendar dates

mod error;
pub mod logging;
mod parsing;

pub use error::*;
pub use parsing::*;
