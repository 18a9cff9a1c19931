//! Injectable source of the current instant

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::Time;

/// Source of "now".
///
/// Everything that depends on the current time (defaulted interval
/// construction, `has_been`) takes a `Clock` instead of reading the system
/// time directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> Time;
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        from_system_time(SystemTime::now())
    }
}

fn from_system_time(time: SystemTime) -> Time {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => Time::from_nanos(since.as_nanos() as i128),
        Err(e) => {
            let before = e.duration();
            warn!(seconds_before_epoch = before.as_secs(), "system clock is set before 1970");
            Time::from_nanos(-(before.as_nanos() as i128))
        }
    }
}

/// A clock stopped at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: Time,
}

impl FixedClock {
    pub fn new(now: Time) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Time {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let t = Time::from_ymd_hm(2009, 5, 1, 12, 0).unwrap();
        let clock = FixedClock::new(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_pre_epoch_system_time_kept() {
        let day_before = UNIX_EPOCH - std::time::Duration::from_secs(86_400);
        let t = from_system_time(day_before);
        assert_eq!(t, Time::from_ymd(1969, 12, 31).unwrap());
        assert_eq!(from_system_time(UNIX_EPOCH), Time::EPOCH);
    }

    #[test]
    fn test_system_clock_after_2020() {
        let now = SystemClock.now();
        assert!(now > Time::from_ymd(2020, 1, 1).unwrap());
    }
}
