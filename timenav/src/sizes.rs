//! The fixed hierarchy of interval sizes
//!
//! Each size is a number (multiplier) of one calendar unit. `format` renders
//! an interval by itself; `short_format` renders it in the context of its
//! parent (the drop-down of finer intervals). A `Format::Range` formats the
//! start and end instants and concatenates the results.

use serde::Serialize;
use timenav_core::{CalendarUnit, Delta};

pub const YEAR: usize = 0;
pub const MONTH: usize = 1;
pub const WEEK: usize = 2;
pub const DAY: usize = 3;
pub const HOUR: usize = 4;
pub const FIVE_MINUTES: usize = 5;

/// Number of sizes in the hierarchy
pub const RANK_COUNT: usize = 6;

/// Display template for an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Format {
    /// Applied to the anchor
    Single(&'static str),
    /// Applied to the beginning and the end respectively
    Range(&'static str, &'static str),
}

/// One granularity of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeDescriptor {
    pub rank: usize,
    pub multiplier: u32,
    pub unit: CalendarUnit,
    pub format: Format,
    pub short_format: &'static str,
}

/// All sizes, coarsest first
pub static SIZES: [SizeDescriptor; RANK_COUNT] = [
    SizeDescriptor {
        rank: YEAR,
        multiplier: 1,
        unit: CalendarUnit::Year,
        format: Format::Single("%Y"),
        short_format: "%Y",
    },
    SizeDescriptor {
        rank: MONTH,
        multiplier: 1,
        unit: CalendarUnit::Month,
        format: Format::Single("%Y-%m"),
        short_format: "%m",
    },
    SizeDescriptor {
        rank: WEEK,
        multiplier: 1,
        unit: CalendarUnit::Week,
        format: Format::Single("%Y, week %V"),
        short_format: "%V",
    },
    SizeDescriptor {
        rank: DAY,
        multiplier: 1,
        unit: CalendarUnit::Day,
        format: Format::Single("%Y-%m-%d"),
        short_format: "%m-%d: %a",
    },
    SizeDescriptor {
        rank: HOUR,
        multiplier: 1,
        unit: CalendarUnit::Hour,
        format: Format::Range("%Y-%m-%d %H:00", "–%H:00"),
        short_format: "%H",
    },
    SizeDescriptor {
        rank: FIVE_MINUTES,
        multiplier: 5,
        unit: CalendarUnit::Minute,
        format: Format::Range("%Y-%m-%d %H:%M", "–%H:%M"),
        short_format: "%M",
    },
];

/// Descriptor for a rank.
///
/// # Panics
/// If `rank >= RANK_COUNT`; an out-of-range rank is a caller bug.
pub fn size_at(rank: usize) -> &'static SizeDescriptor {
    assert!(
        rank < RANK_COUNT,
        "interval rank {} out of range (0..{})",
        rank,
        RANK_COUNT
    );
    &SIZES[rank]
}

pub fn rank_count() -> usize {
    RANK_COUNT
}

pub fn is_valid_rank(rank: usize) -> bool {
    rank < RANK_COUNT
}

impl SizeDescriptor {
    /// Displayable name: "1 year", "5 minutes", or just "year" when
    /// `omit_count_if_one` is set and the multiplier is 1.
    pub fn name(&self, omit_count_if_one: bool) -> String {
        if omit_count_if_one && self.multiplier == 1 {
            return self.unit.name().to_string();
        }
        format!(
            "{} {}{}",
            self.multiplier,
            self.unit,
            if self.multiplier == 1 { "" } else { "s" }
        )
    }

    /// Field delta spanning `count` intervals of this size
    pub fn delta(&self, count: i64) -> Delta {
        Delta::of(self.unit, count * self.multiplier as i64)
    }
}

/// Something that resolves to a size: a rank or a descriptor
pub trait IntoSize {
    fn into_size(self) -> SizeDescriptor;
}

impl IntoSize for usize {
    fn into_size(self) -> SizeDescriptor {
        *size_at(self)
    }
}

impl IntoSize for SizeDescriptor {
    fn into_size(self) -> SizeDescriptor {
        self
    }
}

impl IntoSize for &SizeDescriptor {
    fn into_size(self) -> SizeDescriptor {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered_by_rank() {
        assert_eq!(rank_count(), 6);
        for (i, size) in SIZES.iter().enumerate() {
            assert_eq!(size.rank, i);
            assert_eq!(size_at(i), size);
        }
        for pair in SIZES.windows(2) {
            assert!(pair[0].unit < pair[1].unit);
        }
    }

    #[test]
    fn test_size_name() {
        assert_eq!(size_at(YEAR).name(false), "1 year");
        assert_eq!(size_at(YEAR).name(true), "year");
        assert_eq!(size_at(FIVE_MINUTES).name(false), "5 minutes");
        assert_eq!(size_at(FIVE_MINUTES).name(true), "5 minutes");
        assert_eq!(size_at(WEEK).name(false), "1 week");
    }

    #[test]
    fn test_delta_scales_by_multiplier() {
        assert_eq!(size_at(FIVE_MINUTES).delta(-2), Delta::of(CalendarUnit::Minute, -10));
        assert_eq!(size_at(MONTH).delta(3), Delta::of(CalendarUnit::Month, 3));
    }

    #[test]
    fn test_into_size_accepts_rank_or_descriptor() {
        assert_eq!(DAY.into_size(), SIZES[DAY]);
        assert_eq!((&SIZES[HOUR]).into_size().unit, CalendarUnit::Hour);
        assert!(is_valid_rank(FIVE_MINUTES));
        assert!(!is_valid_rank(RANK_COUNT));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_rank_panics() {
        size_at(RANK_COUNT);
    }

    #[test]
    fn test_format_serializes_untagged() {
        let json = serde_json::to_value(size_at(HOUR)).unwrap();
        assert_eq!(json["unit"], "hour");
        assert_eq!(json["format"][1], "–%H:00");
        assert_eq!(serde_json::to_value(size_at(MONTH)).unwrap()["format"], "%Y-%m");
    }
}
