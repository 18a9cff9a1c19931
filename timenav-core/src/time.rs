//! Calendar instant for interval navigation
//!
//! Nanosecond-precision instant on the proleptic Gregorian calendar, stored
//! as i128 nanoseconds since the Unix epoch. UTC only.
//!
//! Design principles:
//! - No external datetime crates
//! - Field accessors derived on demand from the instant
//! - Construction from fields validates; arithmetic never fails

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{CalendarUnit, Delta, Fields, TimeError};

// ============================================================================
// Constants
// ============================================================================

pub const NANOS_PER_SECOND: i128 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from year 0 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// Years accepted when building an instant from fields
pub const MIN_YEAR: i32 = -1_000_000;
pub const MAX_YEAR: i32 = 1_000_000;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// ============================================================================
// Time
// ============================================================================

/// A point in time with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    /// Nanoseconds since Unix epoch (negative for pre-1970 instants)
    nanos: i128,
}

impl Time {
    // ========== Construction ==========

    /// 1970-01-01 00:00:00
    pub const EPOCH: Time = Time { nanos: 0 };

    pub fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    /// Create a date (time = 00:00)
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, TimeError> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Create a datetime at minute resolution
    pub fn from_ymd_hm(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> Result<Self, TimeError> {
        Self::from_ymd_hms(year, month, day, hour, minute, 0)
    }

    /// Create a datetime from validated components
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(TimeError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidMonth(month));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(TimeError::InvalidDay { day, month, year });
        }
        if hour > 23 {
            return Err(TimeError::InvalidHour(hour));
        }
        if minute > 59 {
            return Err(TimeError::InvalidMinute(minute));
        }
        if second > 59 {
            return Err(TimeError::InvalidSecond(second));
        }
        Ok(Self::from_civil(year, month, day, hour, minute)
            .add_nanos((second as i128) * NANOS_PER_SECOND))
    }

    /// Create from a sparse field set
    pub fn from_fields(fields: &Fields) -> Result<Self, TimeError> {
        fields.to_time()
    }

    /// Components already known to be in range
    fn from_civil(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        let days = days_from_civil(year, month, day);
        Self {
            nanos: (days as i128) * NANOS_PER_DAY
                + (hour as i128) * NANOS_PER_HOUR
                + (minute as i128) * NANOS_PER_MINUTE,
        }
    }

    // ========== Accessors ==========

    pub fn as_nanos(&self) -> i128 {
        self.nanos
    }

    pub fn year(&self) -> i32 {
        self.to_ymd().0
    }

    /// Month (1-12)
    pub fn month(&self) -> u32 {
        self.to_ymd().1
    }

    /// Day of month (1-31)
    pub fn day(&self) -> u32 {
        self.to_ymd().2
    }

    pub fn hour(&self) -> u32 {
        (self.day_nanos() / NANOS_PER_HOUR) as u32
    }

    pub fn minute(&self) -> u32 {
        ((self.day_nanos() % NANOS_PER_HOUR) / NANOS_PER_MINUTE) as u32
    }

    pub fn second(&self) -> u32 {
        ((self.day_nanos() % NANOS_PER_MINUTE) / NANOS_PER_SECOND) as u32
    }

    /// Day of week (1=Monday, 7=Sunday, ISO 8601)
    pub fn weekday(&self) -> u32 {
        // 1970-01-01 was a Thursday
        ((self.epoch_days() + 3).rem_euclid(7) + 1) as u32
    }

    /// Day of year (1-366)
    pub fn day_of_year(&self) -> u32 {
        let jan1 = days_from_civil(self.year(), 1, 1);
        (self.epoch_days() - jan1 + 1) as u32
    }

    /// ISO 8601 week number (1-53)
    ///
    /// A week belongs to the year containing its Thursday, so the number is
    /// the Thursday's ordinal week within that year.
    pub fn iso_week(&self) -> u32 {
        (self.week_center().day_of_year() - 1) / 7 + 1
    }

    /// Year the ISO week belongs to (may differ from `year()` near New Year)
    pub fn iso_year(&self) -> i32 {
        self.week_center().year()
    }

    /// Value of one calendar field; the week field is the ISO week number
    pub fn field(&self, unit: CalendarUnit) -> i64 {
        match unit {
            CalendarUnit::Year => self.year() as i64,
            CalendarUnit::Month => self.month() as i64,
            CalendarUnit::Week => self.iso_week() as i64,
            CalendarUnit::Day => self.day() as i64,
            CalendarUnit::Hour => self.hour() as i64,
            CalendarUnit::Minute => self.minute() as i64,
        }
    }

    /// Decompose into year, month, day
    pub fn to_ymd(&self) -> (i32, u32, u32) {
        civil_from_days(self.epoch_days())
    }

    fn epoch_days(&self) -> i64 {
        self.nanos.div_euclid(NANOS_PER_DAY) as i64
    }

    fn day_nanos(&self) -> i128 {
        self.nanos.rem_euclid(NANOS_PER_DAY)
    }

    // ========== Arithmetic ==========

    /// Shift by a sparse field delta.
    ///
    /// Year and month parts are folded into one month count and applied
    /// first, clamping the day to the target month's length (Jan 31 plus one
    /// month is the last day of February). Week, day, hour and minute parts
    /// are then added as exact durations.
    pub fn add(&self, delta: &Delta) -> Self {
        if delta.is_zero() {
            return *self;
        }
        let months = delta.year.saturating_mul(12).saturating_add(delta.month);
        let base = if months == 0 { *self } else { self.add_months(months) };
        let days = delta.week * 7 + delta.day;
        base.add_nanos(
            (days as i128) * NANOS_PER_DAY
                + (delta.hour as i128) * NANOS_PER_HOUR
                + (delta.minute as i128) * NANOS_PER_MINUTE,
        )
    }

    pub fn add_days(&self, days: i64) -> Self {
        self.add_nanos((days as i128) * NANOS_PER_DAY)
    }

    /// Add months, rolling over into years and clamping the day.
    ///
    /// Results past the `i32` year range saturate at its ends.
    pub fn add_months(&self, months: i64) -> Self {
        let (year, month, day) = self.to_ymd();
        let total = (year as i64 * 12 + (month as i64 - 1)).saturating_add(months);
        let year = i32::try_from(total.div_euclid(12))
            .unwrap_or(if total < 0 { i32::MIN } else { i32::MAX });
        let month = (total.rem_euclid(12) + 1) as u32;
        let day = day.min(days_in_month(year, month));
        let days = days_from_civil(year, month, day);
        Self {
            nanos: (days as i128) * NANOS_PER_DAY + self.day_nanos(),
        }
    }

    fn add_nanos(&self, nanos: i128) -> Self {
        Self {
            nanos: self.nanos + nanos,
        }
    }

    // ========== Normalization ==========

    /// Same time of day on the Thursday of this instant's ISO week
    pub fn week_center(&self) -> Self {
        self.add_days(4 - self.weekday() as i64)
    }

    /// Set the minute field; values past 59 roll over into later hours
    pub fn with_minute(&self, minute: u32) -> Self {
        let delta = minute as i128 - self.minute() as i128;
        self.add_nanos(delta * NANOS_PER_MINUTE)
    }

    /// Floor the minute field to a multiple of `step`; other fields unchanged
    pub fn floor_minute(&self, step: u32) -> Self {
        assert!(step > 0, "minute step must be positive");
        let minute = self.minute();
        self.with_minute(minute - minute % step)
    }

    /// Keep every field down to `unit` and reset the finer ones.
    ///
    /// Fields are copied coarse to fine; the week position copies the day,
    /// so truncating to `Week` keeps the date and drops the time of day.
    pub fn truncate(&self, unit: CalendarUnit) -> Self {
        let (year, month, day) = self.to_ymd();
        let (mut y, mut mo, mut d, mut h, mut mi) = (year, 1, 1, 0, 0);
        for current in CalendarUnit::ALL {
            match current {
                CalendarUnit::Year => y = year,
                CalendarUnit::Month => mo = month,
                CalendarUnit::Week | CalendarUnit::Day => d = day,
                CalendarUnit::Hour => h = self.hour(),
                CalendarUnit::Minute => mi = self.minute(),
            }
            if current == unit {
                break;
            }
        }
        Self::from_civil(y, mo, d, h, mi)
    }

    // ========== Formatting ==========

    /// Format as ISO 8601 string (`2009-04-15T10:35:00Z`)
    pub fn to_iso_string(&self) -> String {
        let (year, month, day) = self.to_ymd();
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            year,
            month,
            day,
            self.hour(),
            self.minute(),
            self.second()
        )
    }

    /// Format with a strftime-style template
    ///
    /// Supported directives:
    /// - %Y: 4-digit year
    /// - %m: 2-digit month (01-12)
    /// - %d: 2-digit day (01-31)
    /// - %H: 2-digit hour 24h (00-23)
    /// - %M: 2-digit minute (00-59)
    /// - %S: 2-digit second (00-59)
    /// - %V: ISO week (01-53)
    /// - %G: ISO week-based year
    /// - %u: weekday (1-7, Monday=1)
    /// - %j: day of year (001-366)
    /// - %a / %A: short / full weekday name
    /// - %b / %B: short / full month name
    /// - %%: literal percent
    ///
    /// Unknown directives are copied through unchanged.
    pub fn format(&self, template: &str) -> String {
        let (year, month, day) = self.to_ymd();
        let weekday = WEEKDAY_NAMES[(self.weekday() - 1) as usize];
        let month_name = MONTH_NAMES[(month - 1) as usize];

        let mut out = String::with_capacity(template.len() + 16);
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('Y') => out.push_str(&format!("{:04}", year)),
                Some('m') => out.push_str(&format!("{:02}", month)),
                Some('d') => out.push_str(&format!("{:02}", day)),
                Some('H') => out.push_str(&format!("{:02}", self.hour())),
                Some('M') => out.push_str(&format!("{:02}", self.minute())),
                Some('S') => out.push_str(&format!("{:02}", self.second())),
                Some('V') => out.push_str(&format!("{:02}", self.iso_week())),
                Some('G') => out.push_str(&format!("{:04}", self.iso_year())),
                Some('u') => out.push_str(&self.weekday().to_string()),
                Some('j') => out.push_str(&format!("{:03}", self.day_of_year())),
                Some('a') => out.push_str(&weekday[..3]),
                Some('A') => out.push_str(weekday),
                Some('b') => out.push_str(&month_name[..3]),
                Some('B') => out.push_str(month_name),
                Some('%') => out.push('%'),
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }
        out
    }

    // ========== Parsing ==========

    /// Parse an ISO 8601 instant
    ///
    /// Supported formats:
    /// - 2009-04-15
    /// - 2009-04-15T10:35
    /// - 2009-04-15T10:35:00
    /// - 2009-04-15 10:35:00Z
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        let s = s.strip_suffix('Z').unwrap_or(s);

        let (date_part, time_part) = match s.find(['T', ' ']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };

        let mut date = date_part.split('-');
        let year: i32 = parse_component(date.next(), "year")?;
        let month: u32 = parse_component(date.next(), "month")?;
        let day: u32 = parse_component(date.next(), "day")?;
        if date.next().is_some() {
            return Err(TimeError::parse("Expected YYYY-MM-DD"));
        }

        let (hour, minute, second) = match time_part {
            Some(time) => {
                let mut parts = time.split(':');
                let hour: u32 = parse_component(parts.next(), "hour")?;
                let minute: u32 = parse_component(parts.next(), "minute")?;
                let second: u32 = match parts.next() {
                    Some(p) => parse_component(Some(p), "second")?,
                    None => 0,
                };
                if parts.next().is_some() {
                    return Err(TimeError::parse("Expected HH:MM[:SS]"));
                }
                (hour, minute, second)
            }
            None => (0, 0, 0),
        };

        Self::from_ymd_hms(year, month, day, hour, minute, second)
    }
}

fn parse_component<T: FromStr>(part: Option<&str>, what: &str) -> Result<T, TimeError> {
    part.filter(|p| !p.is_empty())
        .ok_or_else(|| TimeError::parse(format!("Missing {}", what)))?
        .parse()
        .map_err(|_| TimeError::parse(format!("Invalid {}", what)))
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Calendar Utilities (Gregorian proleptic)
// ============================================================================

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in a month; 0 for an out-of-range month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

/// Convert civil date to days since Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146097 + doe - UNIX_EPOCH_DAYS
}

/// Convert days since Unix epoch to civil date
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = (if z >= 0 { z } else { z - 146096 }) / 146097;
    let doe = z - era * 146097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year as i32, m as u32, d as u32)
}

// ============================================================================
// Tests
// ============================================================================
