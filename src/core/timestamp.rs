use chrono::{Local, NaiveDateTime};
use std::fmt::{self, Display};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Wall-clock time captured once at the start of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationTimestamp(NaiveDateTime);

impl InvocationTimestamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl Display for InvocationTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_display_format() {
        let datetime = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let ts = InvocationTimestamp::from_datetime(datetime);
        assert_eq!(ts.to_string(), "2024-03-01_12:00:00");
    }

    #[test]
    fn test_display_zero_pads() {
        let datetime = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(7, 4, 9)
            .unwrap();
        let ts = InvocationTimestamp::from_datetime(datetime);
        assert_eq!(ts.to_string(), "2023-01-05_07:04:09");
    }

    #[test]
    fn test_now_round_trips_through_format() {
        let ts = InvocationTimestamp::now();
        let parsed = NaiveDateTime::parse_from_str(&ts.to_string(), TIMESTAMP_FORMAT).unwrap();
        assert_eq!(parsed, ts.datetime().with_nanosecond(0).unwrap());
    }
}
