//! Time intervals of the fixed sizes and the algebra for moving between them
//!
//! A `TimeInterval` is a rank into `SIZES` plus an anchor instant somewhere
//! inside the interval. The anchor need not be the start; these denote the
//! same month:
//!
//! ```
//! use timenav::{TimeInterval, MONTH};
//! use timenav_core::Time;
//!
//! let a = TimeInterval::at(MONTH, Time::from_ymd(2009, 4, 15).unwrap());
//! let b = TimeInterval::at(MONTH, Time::from_ymd_hm(2009, 4, 1, 12, 0).unwrap());
//! assert_eq!(a.beginning(), b.beginning());
//! ```
//!
//! Week anchors are kept on the Thursday of their ISO week and five-minute
//! anchors on a multiple of five minutes. Bounds are derived on demand.

use serde::Serialize;
use std::fmt;
use timenav_core::{CalendarUnit, Clock, Fields, Time, TimeError};
use tracing::{debug, trace, warn};

use crate::sizes::{size_at, Format, IntoSize, SizeDescriptor, RANK_COUNT};

/// Upper bound on candidates examined by `down_choices`
const DOWN_CHOICE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInterval {
    rank: usize,
    anchor: Time,
}

impl TimeInterval {
    // ========== Construction ==========

    /// Interval of `rank` containing `anchor`.
    ///
    /// # Panics
    /// If `rank` is not a valid rank.
    pub fn at(rank: usize, anchor: Time) -> Self {
        let size = size_at(rank);
        let anchor = match size.unit {
            CalendarUnit::Week => anchor.week_center(),
            CalendarUnit::Minute => anchor.floor_minute(size.multiplier),
            _ => anchor,
        };
        Self { rank, anchor }
    }

    /// Interval of `rank` containing the instant named by `fields`
    pub fn from_fields(rank: usize, fields: &Fields) -> Result<Self, TimeError> {
        Ok(Self::at(rank, fields.to_time()?))
    }

    /// Interval containing `anchor`, or the last completed interval of this
    /// size when no anchor is given
    pub fn create(rank: usize, anchor: Option<Time>, clock: &dyn Clock) -> Self {
        match anchor {
            Some(anchor) => Self::at(rank, anchor),
            None => {
                let anchor = clock.now().add(&size_at(rank).delta(-1));
                debug!(rank, %anchor, "defaulting to last completed interval");
                Self::at(rank, anchor)
            }
        }
    }

    /// The most recent interval of `rank` that has fully elapsed
    pub fn last_completed(rank: usize, clock: &dyn Clock) -> Self {
        Self::create(rank, None, clock)
    }

    // ========== Accessors ==========

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn anchor(&self) -> Time {
        self.anchor
    }

    pub fn size(&self) -> &'static SizeDescriptor {
        size_at(self.rank)
    }

    pub fn size_multiplier(&self) -> u32 {
        self.size().multiplier
    }

    pub fn size_unit(&self) -> CalendarUnit {
        self.size().unit
    }

    pub fn size_name(&self, omit_count_if_one: bool) -> String {
        self.size().name(omit_count_if_one)
    }

    /// Next coarser size. Panics at the year rank.
    pub fn larger_size(&self) -> &'static SizeDescriptor {
        size_at(self.parent_rank())
    }

    /// Next finer size. Panics at the five-minute rank.
    pub fn smaller_size(&self) -> &'static SizeDescriptor {
        size_at(self.rank + 1)
    }

    fn parent_rank(&self) -> usize {
        assert!(self.rank > 0, "the year rank has no larger size");
        self.rank - 1
    }

    // ========== Bounds ==========

    /// First instant of the interval
    pub fn beginning(&self) -> Time {
        let unit = self.size_unit();
        let start = self.anchor.truncate(unit);
        if unit == CalendarUnit::Week {
            // anchor sits on Thursday
            start.add_days(-3)
        } else {
            start
        }
    }

    /// First instant after the interval
    pub fn end(&self) -> Time {
        self.next().beginning()
    }

    /// Whether the interval has fully elapsed
    pub fn has_been(&self, clock: &dyn Clock) -> bool {
        self.end() <= clock.now()
    }

    /// Half-open containment: `beginning() <= time < end()`
    pub fn contains(&self, time: &Time) -> bool {
        self.beginning() <= *time && *time < self.end()
    }

    // ========== Navigation ==========

    /// Interval of this rank, anchored `count` intervals of `size` away
    pub fn add(&self, size: impl IntoSize, count: i64) -> Self {
        let size = size.into_size();
        Self::at(self.rank, self.anchor.add(&size.delta(count)))
    }

    pub fn next(&self) -> Self {
        self.add(self.rank, 1)
    }

    pub fn prev(&self) -> Self {
        self.add(self.rank, -1)
    }

    /// Same rank, one parent-size step forward (a day moves by a week, an
    /// hour by a day)
    pub fn next_jump(&self) -> Self {
        self.add(self.parent_rank(), 1)
    }

    pub fn prev_jump(&self) -> Self {
        self.add(self.parent_rank(), -1)
    }

    pub fn next_possible(&self, clock: &dyn Clock) -> bool {
        self.next().has_been(clock)
    }

    pub fn next_jump_possible(&self, clock: &dyn Clock) -> bool {
        self.next_jump().has_been(clock)
    }

    /// Whether jumping is defined at all (every rank but year)
    pub fn prev_jump_possible(&self) -> bool {
        self.rank > 0
    }

    /// The enclosing interval of the next coarser size
    pub fn up(&self) -> Option<Self> {
        if self.rank == 0 {
            return None;
        }
        Some(Self::at(self.rank - 1, self.anchor))
    }

    /// False from month upward, although `up()` still succeeds at month.
    pub fn up_possible(&self) -> bool {
        self.rank > 1
    }

    /// Elapsed intervals of the next finer size inside this one, oldest first.
    ///
    /// `None` at the finest rank. Enumeration stops at the first candidate
    /// that leaves this interval's unit value or has not fully elapsed.
    pub fn down_choices(&self, clock: &dyn Clock) -> Option<Vec<Self>> {
        if self.rank + 1 == RANK_COUNT {
            return None;
        }
        let child = self.smaller_size();
        let unit = self.size_unit();
        let target = self.anchor.field(unit);
        let start = self.beginning();

        let mut choices = Vec::new();
        for step in 0..DOWN_CHOICE_LIMIT {
            let candidate_time = start.add(&child.delta(step as i64));
            if candidate_time.field(unit) != target {
                break;
            }
            let candidate = Self::at(child.rank, candidate_time);
            if !candidate.has_been(clock) {
                break;
            }
            trace!(rank = child.rank, beginning = %candidate.beginning(), "down choice");
            choices.push(candidate);
        }
        if choices.len() == DOWN_CHOICE_LIMIT {
            warn!(
                rank = self.rank,
                anchor = %self.anchor,
                "down choices truncated at {} candidates",
                DOWN_CHOICE_LIMIT
            );
        }
        Some(choices)
    }

    /// Last completed interval of this rank
    pub fn last(&self, clock: &dyn Clock) -> Self {
        Self::create(self.rank, None, clock)
    }

    // ========== Formatting ==========

    /// Label in the context of the enclosing interval
    pub fn to_short_string(&self) -> String {
        self.anchor.format(self.size().short_format)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size().format {
            Format::Single(template) => f.write_str(&self.anchor.format(template)),
            Format::Range(start, end) => {
                f.write_str(&self.beginning().format(start))?;
                f.write_str(&self.end().format(end))
            }
        }
    }
}
