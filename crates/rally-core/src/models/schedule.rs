//! Clock times and schedule blocks.

use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute precision.
///
/// Formats as `9:00 AM` / `12:30 PM`, without a leading zero on the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Latest representable time, 11:59 PM.
    pub const LAST_MINUTE: ClockTime = ClockTime {
        minutes: (MINUTES_PER_DAY - 1) as u16,
    };

    /// Builds a time from a 24-hour clock hour and minute.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(PlannerError::invalid_parameter(
                "time",
                format!("{hour}:{minute:02} is not a valid time of day"),
            ));
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Builds a time from minutes past midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(PlannerError::invalid_parameter(
                "time",
                format!("{minutes} minutes is past the end of the day"),
            ));
        }
        Ok(Self {
            minutes: minutes as u16,
        })
    }

    /// Same as [`ClockTime::from_minutes`] but pins out-of-range values to
    /// [`ClockTime::LAST_MINUTE`].
    pub fn saturating_from_minutes(minutes: u32) -> Self {
        Self {
            minutes: minutes.min(MINUTES_PER_DAY - 1) as u16,
        }
    }

    /// Minutes past midnight.
    pub fn minutes(&self) -> u32 {
        u32::from(self.minutes)
    }

    /// Hour on the 24-hour clock.
    pub fn hour(&self) -> u32 {
        self.minutes() / 60
    }

    /// Minute within the hour.
    pub fn minute(&self) -> u32 {
        self.minutes() % 60
    }

    /// Parses `9:00 AM`, `9 am`, `12:30PM` or 24-hour `14:30`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rally_core::models::ClockTime;
    ///
    /// let t = ClockTime::parse("2:30 PM").unwrap();
    /// assert_eq!(t.hour(), 14);
    /// assert_eq!(t.to_string(), "2:30 PM");
    /// assert!(ClockTime::parse("25:00").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || {
            PlannerError::invalid_parameter("time", format!("cannot parse '{input}' as a time"))
        };

        let upper = input.trim().to_uppercase();
        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let (hour_text, minute_text) = clock.split_once(':').unwrap_or((clock, "0"));
        let hour: u32 = hour_text.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = minute_text.trim().parse().map_err(|_| invalid())?;

        let hour = match meridiem {
            Some(pm) => {
                if !(1..=12).contains(&hour) {
                    return Err(invalid());
                }
                match (hour, pm) {
                    (12, false) => 0,
                    (12, true) => 12,
                    (h, true) => h + 12,
                    (h, false) => h,
                }
            }
            None => hour,
        };

        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, suffix) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{hour}:{:02} {suffix}", self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ClockTime {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// One `(time, activity)` entry of a tentative itinerary.
///
/// The time is kept as text because schedules proposed by an advisor are
/// accepted as-is; use [`ScheduleBlock::clock_time`] to read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ScheduleBlock {
    /// Clock time such as `9:00 AM`
    pub time: String,
    /// What happens at that time
    pub activity: String,
}

impl ScheduleBlock {
    /// Creates a block at the given clock time.
    pub fn at(time: ClockTime, activity: impl Into<String>) -> Self {
        Self {
            time: time.to_string(),
            activity: activity.into(),
        }
    }

    /// Parses the block's time, if it is a recognizable clock time.
    pub fn clock_time(&self) -> Option<ClockTime> {
        ClockTime::parse(&self.time).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_has_no_leading_zero() {
        assert_eq!(ClockTime::from_hm(9, 0).unwrap().to_string(), "9:00 AM");
        assert_eq!(ClockTime::from_hm(0, 5).unwrap().to_string(), "12:05 AM");
        assert_eq!(ClockTime::from_hm(12, 30).unwrap().to_string(), "12:30 PM");
        assert_eq!(ClockTime::from_hm(17, 45).unwrap().to_string(), "5:45 PM");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(ClockTime::parse("9:00 AM").unwrap().minutes(), 540);
        assert_eq!(ClockTime::parse("9 am").unwrap().minutes(), 540);
        assert_eq!(ClockTime::parse("12:15PM").unwrap().minutes(), 735);
        assert_eq!(ClockTime::parse("12:00 AM").unwrap().minutes(), 0);
        assert_eq!(ClockTime::parse("14:30").unwrap().minutes(), 870);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "noon", "13:00 PM", "10:75", "24:00", "0 AM"] {
            let err = ClockTime::parse(bad).unwrap_err();
            assert!(
                matches!(err, PlannerError::InvalidParameter { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_uses_display_form() {
        let t = ClockTime::from_hm(13, 5).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"1:05 PM\"");
        let back: ClockTime = serde_json::from_str("\"1:05 PM\"").unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_saturating_from_minutes() {
        assert_eq!(ClockTime::saturating_from_minutes(5000), ClockTime::LAST_MINUTE);
    }
}
