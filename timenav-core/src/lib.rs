//! Timenav Core - Calendar primitive
//!
//! This crate provides the calendar types the interval model is built on:
//! - `Time`: UTC instant with field accessors, delta arithmetic and strftime formatting
//! - `CalendarUnit` / `Delta`: the six navigable units and sparse field deltas
//! - `Fields`: sparse field-set input for building a `Time`
//! - `Clock`: injectable source of "now"
//! - `TimeError`: construction and parse failures

mod clock;
mod error;
mod fields;
mod time;
mod unit;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::TimeError;
pub use fields::Fields;
pub use time::{days_in_month, is_leap_year, Time, MAX_YEAR, MIN_YEAR};
pub use unit::{CalendarUnit, Delta};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalendarUnit, Clock, Delta, Fields, FixedClock, SystemClock, Time, TimeError};
}
