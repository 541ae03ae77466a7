mod time_interval;
mod timestamps;

pub use time_interval::{TimeInterval, TimeIntervalError};
pub use timestamps::{format_timestamp, parse_timestamp, TimestampError, TIMESTAMP_FORMAT};
