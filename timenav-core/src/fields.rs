//! Sparse field-set input for building a `Time`

use serde::{Deserialize, Serialize};

use crate::{Time, TimeError};

/// Calendar fields with coarse-to-fine defaults.
///
/// Only `year` is required; month and day default to 1, hour and minute to 0.
/// `{year: 2009, month: 4, day: 15}` names 2009-04-15 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
}

impl Fields {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            hour: None,
            minute: None,
        }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn with_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    /// Build the instant, validating every field
    pub fn to_time(&self) -> Result<Time, TimeError> {
        Time::from_ymd_hm(
            self.year,
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
        )
    }
}

impl TryFrom<Fields> for Time {
    type Error = TimeError;

    fn try_from(fields: Fields) -> Result<Self, Self::Error> {
        fields.to_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_coarse_to_fine() {
        let t = Fields::new(2008).to_time().unwrap();
        assert_eq!(t, Time::from_ymd(2008, 1, 1).unwrap());

        let t = Fields::new(2009).with_month(4).with_day(15).to_time().unwrap();
        assert_eq!(t, Time::from_ymd(2009, 4, 15).unwrap());
    }

    #[test]
    fn test_malformed_fields_rejected() {
        assert_eq!(
            Fields::new(2009).with_month(13).to_time(),
            Err(TimeError::InvalidMonth(13))
        );
        assert!(Fields::new(2009).with_month(2).with_day(29).to_time().is_err());
        assert!(Fields::new(2009).with_minute(60).to_time().is_err());
    }

    #[test]
    fn test_deserialize_partial_object() {
        let f: Fields = serde_json::from_str(r#"{"year": 2020, "month": 1, "day": 1, "hour": 10, "minute": 37}"#).unwrap();
        let t = Time::try_from(f).unwrap();
        assert_eq!(t.minute(), 37);
        assert_eq!(t.hour(), 10);
    }

    #[test]
    fn test_year_out_of_range_rejected() {
        assert_eq!(
            Fields::new(i32::MAX).with_month(6).to_time(),
            Err(TimeError::YearOutOfRange(i32::MAX))
        );
        assert!(Fields::new(i32::MIN).to_time().is_err());
    }
}
