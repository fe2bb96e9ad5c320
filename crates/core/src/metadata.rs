use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimestampSource {
    ExifOriginal,
    ExifDigitized,
    ExifDateTime,
    FileCreated,
    FileModified,
}

/// Capture time at second resolution. EXIF values are kept as written,
/// filesystem times are expressed in local time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureTimestamp {
    pub value: NaiveDateTime,
    pub source: TimestampSource,
}

impl CaptureTimestamp {
    pub fn new(value: NaiveDateTime, source: TimestampSource) -> Self {
        Self {
            value: value.with_nanosecond(0).unwrap_or(value),
            source,
        }
    }

    pub fn from_system_time(time: SystemTime, source: TimestampSource) -> Self {
        let local: DateTime<Local> = DateTime::from(time);
        Self::new(local.naive_local(), source)
    }
}
