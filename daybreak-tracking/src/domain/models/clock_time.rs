use std::fmt;

use serde::{Deserialize, Serialize};
use time::Time;

use crate::domain::TimeTrackingError;

/// A validated wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawClockTime", into = "RawClockTime")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

#[derive(Serialize, Deserialize)]
struct RawClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeTrackingError> {
        if hour > 23 || minute > 59 {
            return Err(TimeTrackingError::InvalidClockTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_time(self) -> Time {
        Time::from_hms(self.hour, self.minute, 0).unwrap_or(Time::MIDNIGHT)
    }
}

impl From<Time> for ClockTime {
    fn from(time: Time) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl TryFrom<RawClockTime> for ClockTime {
    type Error = TimeTrackingError;

    fn try_from(raw: RawClockTime) -> Result<Self, Self::Error> {
        ClockTime::new(raw.hour, raw.minute)
    }
}

impl From<ClockTime> for RawClockTime {
    fn from(clock: ClockTime) -> Self {
        Self {
            hour: clock.hour,
            minute: clock.minute,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
