use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, Utc};
use derive_more::Display;

/// Seconds between 1601-01-01T00:00:00Z and the Unix epoch.
const EPOCH_DIFFERENCE_SECS: u64 = 11_644_473_600;
const NANOS_PER_TICK: u64 = 100;

/// Raw last-write timestamp of a key: 100 ns ticks since 1601-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct FileTime(u64);

impl FileTime {
    pub const TICKS_PER_SECOND: u64 = 10_000_000;

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    pub fn to_utc(self) -> DateTime<Utc> {
        let secs = (self.0 / Self::TICKS_PER_SECOND) as i64 - EPOCH_DIFFERENCE_SECS as i64;
        let nanos = ((self.0 % Self::TICKS_PER_SECOND) * NANOS_PER_TICK) as u32;
        DateTime::from_timestamp(secs, nanos).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Decodes the timestamp into the observer's local zone.
    pub fn to_local(self) -> DateTime<Local> {
        self.to_utc().with_timezone(&Local)
    }
}

pub trait SystemTimeExt {
    fn to_file_time(&self) -> FileTime;
}

impl SystemTimeExt for SystemTime {
    fn to_file_time(&self) -> FileTime {
        let epoch_ticks = EPOCH_DIFFERENCE_SECS * FileTime::TICKS_PER_SECOND;
        let ticks = match self.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => epoch_ticks.saturating_add(duration_to_ticks(after)),
            Err(before) => epoch_ticks.saturating_sub(duration_to_ticks(before.duration())),
        };
        FileTime::from_ticks(ticks)
    }
}

fn duration_to_ticks(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos() / u128::from(NANOS_PER_TICK)).unwrap_or(u64::MAX)
}
