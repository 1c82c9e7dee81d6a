use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded record from a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// UNIX timestamp in seconds, with fractional sub-second precision.
    /// Carries no timezone semantics, only ordering and spacing.
    pub timestamp: f64,

    /// Everything after the first colon of the line, verbatim
    pub payload: String,
}

impl Record {
    /// Create a new record
    pub fn new(timestamp: f64, payload: impl Into<String>) -> Self {
        Self {
            timestamp,
            payload: payload.into(),
        }
    }

    /// Parse one trace line of the form `<unix-seconds>: <payload>`.
    ///
    /// The first colon is the sole delimiter; any further colons belong
    /// to the payload. Returns `None` for malformed lines (no colon, or
    /// a timestamp that is not a number) so callers can skip them
    /// without aborting the stream.
    pub fn parse_line(line: &str) -> Option<Record> {
        let (timestamp, payload) = line.split_once(':')?;
        let timestamp = timestamp.trim().parse::<f64>().ok()?;
        Some(Record {
            timestamp,
            payload: payload.to_string(),
        })
    }

    /// Timestamp as a chrono datetime, for display
    pub fn datetime(&self) -> DateTime<Utc> {
        let millis = (self.timestamp * 1000.0) as i64;
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }
}
