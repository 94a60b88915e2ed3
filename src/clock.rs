//! Calendar clock
//!
//! "Today" is always injected; the engine never reads wall-clock time itself.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Source of the current calendar day
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Truncate a timestamp to its calendar day in the timestamp's own zone
pub fn calendar_day<Tz: TimeZone>(ts: &DateTime<Tz>) -> NaiveDate {
    ts.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(FixedClock(day).today(), day);
    }

    #[test]
    fn test_calendar_day_ignores_time_of_day() {
        let late = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap();
        assert_eq!(calendar_day(&late), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn test_calendar_day_uses_local_offset() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let ts = brt.with_ymd_and_hms(2026, 3, 2, 22, 0, 0).unwrap();
        // 01:00 UTC on the 3rd, but still the 2nd locally
        assert_eq!(calendar_day(&ts), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }
}
