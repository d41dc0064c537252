use core::{fmt, time::Duration};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Epoch = Epoch::from_unix_millis(1_735_689_600_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Epoch = Epoch::from_unix_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Epoch = Epoch::from_unix_millis(1_420_070_400_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: Epoch = Epoch::from_unix_millis(0);

/// The reference instant that every generated timestamp is relative to.
///
/// An epoch can be given either as an absolute point in time
/// ([`SystemTime`]) or as a precomputed millisecond baseline. Both resolve to
/// the same representation: milliseconds since 1970-01-01 UTC, the unit
/// returned by [`TimeSource::current_millis`](crate::TimeSource).
///
/// # Example
///
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use idworker::Epoch;
///
/// let from_instant = Epoch::from_system_time(UNIX_EPOCH + Duration::from_millis(1_500))?;
/// let from_baseline = Epoch::from_unix_millis(1_500);
/// assert_eq!(from_instant, from_baseline);
/// # Ok::<(), idworker::Error>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch {
    millis: u64,
}

impl Epoch {
    /// Creates an epoch from milliseconds since the Unix epoch.
    pub const fn from_unix_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Creates an epoch from a [`Duration`] since the Unix epoch. Sub-millisecond
    /// precision is truncated.
    pub const fn from_duration(since_unix: Duration) -> Self {
        Self::from_unix_millis(since_unix.as_millis() as u64)
    }

    /// Creates an epoch from an absolute point in time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SystemTimeBeforeUnixEpoch`] if `time` precedes
    /// 1970-01-01 UTC.
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let since_unix = time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::SystemTimeBeforeUnixEpoch)?;
        Ok(Self::from_duration(since_unix))
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// The epoch as an absolute point in time.
    pub fn to_system_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.millis)
    }
}

impl Default for Epoch {
    fn default() -> Self {
        CUSTOM_EPOCH
    }
}

impl From<Duration> for Epoch {
    fn from(since_unix: Duration) -> Self {
        Self::from_duration(since_unix)
    }
}

impl TryFrom<SystemTime> for Epoch {
    type Error = Error;

    fn try_from(time: SystemTime) -> Result<Self> {
        Self::from_system_time(time)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}
