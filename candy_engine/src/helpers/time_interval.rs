use std::{fmt::Display, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static INTERVAL_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-2][0-9]):([0-5][0-9])-([0-2][0-9]):([0-5][0-9])$").unwrap());

const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeIntervalError {
    #[error("'{0}' is not a time interval. Expected HH:MM-HH:MM")]
    InvalidFormat(String),
    #[error("'{0}' has an hour outside 00-23")]
    HourOutOfRange(String),
    #[error("'{0}' does not end after it starts")]
    EmptyInterval(String),
}

/// A window within a single day, `HH:MM-HH:MM`, held as minutes since midnight. The start always comes before the
/// end, so windows that wrap past midnight cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeInterval {
    start: u16,
    end: u16,
}

impl TimeInterval {
    pub fn new(start: u16, end: u16) -> Result<Self, TimeIntervalError> {
        if end >= MINUTES_PER_DAY || start >= MINUTES_PER_DAY {
            return Err(TimeIntervalError::HourOutOfRange(format!("{start}-{end}")));
        }
        if start >= end {
            return Err(TimeIntervalError::EmptyInterval(format!("{start}-{end}")));
        }
        Ok(Self { start, end })
    }

    /// Minutes since midnight
    pub fn start(&self) -> u16 {
        self.start
    }

    /// Minutes since midnight
    pub fn end(&self) -> u16 {
        self.end
    }

    /// True when the two windows share at least one instant. Windows that only touch at an endpoint overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl FromStr for TimeInterval {
    type Err = TimeIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = INTERVAL_FORMAT.captures(s).ok_or_else(|| TimeIntervalError::InvalidFormat(s.to_string()))?;
        let part = |i: usize| caps[i].parse::<u16>().map_err(|_| TimeIntervalError::InvalidFormat(s.to_string()));
        let (h1, m1, h2, m2) = (part(1)?, part(2)?, part(3)?, part(4)?);
        if h1 > 23 || h2 > 23 {
            return Err(TimeIntervalError::HourOutOfRange(s.to_string()));
        }
        let (start, end) = (h1 * 60 + m1, h2 * 60 + m2);
        if start >= end {
            return Err(TimeIntervalError::EmptyInterval(s.to_string()));
        }
        Ok(Self { start, end })
    }
}

impl Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}-{:02}:{:02}", self.start / 60, self.start % 60, self.end / 60, self.end % 60)
    }
}

impl TryFrom<String> for TimeInterval {
    type Error = TimeIntervalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeInterval> for String {
    fn from(value: TimeInterval) -> Self {
        value.to_string()
    }
}
