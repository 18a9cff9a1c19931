//! Timenav - hierarchical time intervals
//!
//! Intervals come in six fixed sizes, coarsest first: year, month, ISO week,
//! day, hour and five minutes. A `TimeInterval` can step to its neighbours,
//! jump by its parent size, zoom out to the enclosing interval and list the
//! elapsed intervals one size finer.
//!
//! Anything that depends on the current time takes a `timenav_core::Clock`.

mod interval;
mod sizes;

pub use interval::TimeInterval;
pub use sizes::{
    is_valid_rank, rank_count, size_at, Format, IntoSize, SizeDescriptor, DAY, FIVE_MINUTES,
    HOUR, MONTH, RANK_COUNT, SIZES, WEEK, YEAR,
};

/// Re-export of the calendar crate
pub use timenav_core as calendar;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{size_at, SizeDescriptor, TimeInterval};
    pub use crate::{DAY, FIVE_MINUTES, HOUR, MONTH, WEEK, YEAR};
    pub use timenav_core::prelude::*;
}
