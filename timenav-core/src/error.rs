//! Errors raised while building or parsing calendar values

use thiserror::Error;

/// Error type for calendar construction and parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("Year out of range: {0}")]
    YearOutOfRange(i32),

    #[error("Invalid month: {0} (must be 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid day: {day} for {year}-{month:02}")]
    InvalidDay { day: u32, month: u32, year: i32 },

    #[error("Invalid hour: {0} (must be 0-23)")]
    InvalidHour(u32),

    #[error("Invalid minute: {0} (must be 0-59)")]
    InvalidMinute(u32),

    #[error("Invalid second: {0} (must be 0-59)")]
    InvalidSecond(u32),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl TimeError {
    pub(crate) fn parse(details: impl Into<String>) -> Self {
        Self::Parse(details.into())
    }
}
