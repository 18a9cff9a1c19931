//! Calendar units and sparse field deltas

use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar field, ordered from coarsest to finest.
///
/// `Week` sits between month and day; its field value is the ISO week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
}

impl CalendarUnit {
    /// All units, coarse to fine
    pub const ALL: [CalendarUnit; 6] = [
        CalendarUnit::Year,
        CalendarUnit::Month,
        CalendarUnit::Week,
        CalendarUnit::Day,
        CalendarUnit::Hour,
        CalendarUnit::Minute,
    ];

    /// Singular lowercase name ("year", "month", ...)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sparse shift of calendar fields, e.g. `{month: -1}` or `{minute: 25}`.
///
/// Year and month parts are calendar-relative (see `Time::add`); the rest
/// are exact durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Delta {
    pub year: i64,
    pub month: i64,
    pub week: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
}

impl Delta {
    /// Delta with a single non-zero field
    pub fn of(unit: CalendarUnit, amount: i64) -> Self {
        let mut delta = Self::default();
        *delta.slot(unit) = amount;
        delta
    }

    /// Amount for a unit
    pub fn get(&self, unit: CalendarUnit) -> i64 {
        match unit {
            CalendarUnit::Year => self.year,
            CalendarUnit::Month => self.month,
            CalendarUnit::Week => self.week,
            CalendarUnit::Day => self.day,
            CalendarUnit::Hour => self.hour,
            CalendarUnit::Minute => self.minute,
        }
    }

    pub fn is_zero(&self) -> bool {
        CalendarUnit::ALL.iter().all(|u| self.get(*u) == 0)
    }

    fn slot(&mut self, unit: CalendarUnit) -> &mut i64 {
        match unit {
            CalendarUnit::Year => &mut self.year,
            CalendarUnit::Month => &mut self.month,
            CalendarUnit::Week => &mut self.week,
            CalendarUnit::Day => &mut self.day,
            CalendarUnit::Hour => &mut self.hour,
            CalendarUnit::Minute => &mut self.minute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_ordered_coarse_to_fine() {
        assert!(CalendarUnit::Year < CalendarUnit::Month);
        assert!(CalendarUnit::Week < CalendarUnit::Day);
        assert!(CalendarUnit::Hour < CalendarUnit::Minute);
        assert_eq!(CalendarUnit::ALL.len(), 6);
    }

    #[test]
    fn test_delta_of_sets_single_field() {
        let d = Delta::of(CalendarUnit::Month, -1);
        assert_eq!(d.month, -1);
        assert_eq!(d.get(CalendarUnit::Year), 0);
        assert!(!d.is_zero());
        assert!(Delta::default().is_zero());
    }

    #[test]
    fn test_delta_deserializes_sparse() {
        let d: Delta = serde_json::from_str(r#"{"minute": 25}"#).unwrap();
        assert_eq!(d, Delta::of(CalendarUnit::Minute, 25));
    }

    #[test]
    fn test_unit_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CalendarUnit::Week).unwrap(), "\"week\"");
        assert_eq!(CalendarUnit::Hour.to_string(), "hour");
    }
}
