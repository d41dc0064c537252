use core::fmt;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Identifies which half of a [`NodeId`] failed validation.
///
/// [`NodeId`]: crate::NodeId
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeField {
    DatacenterId,
    MachineId,
}

impl fmt::Display for NodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatacenterId => f.write_str("datacenter id"),
            Self::MachineId => f.write_str("machine id"),
        }
    }
}

/// All error variants that `idworker` can emit.
///
/// Every timestamp carried by an error is in milliseconds. `ClockRegression`
/// reports values relative to the worker's epoch (a clock below the epoch
/// reads as `now = 0`), `EpochInFuture` reports absolute milliseconds since
/// the Unix epoch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reported a time strictly earlier than the timestamp of the
    /// last issued ID.
    ///
    /// The worker state is untouched. A later call succeeds again once the
    /// clock catches up to `last`.
    #[error("clock moved backwards: last id at {last} ms, clock now at {now} ms")]
    ClockRegression { last: u64, now: u64 },

    /// A datacenter or machine ID does not fit in its 5-bit field.
    #[error("{field} {value} is out of range (max {max})")]
    InvalidNodeId { field: NodeField, value: u8, max: u8 },

    /// The epoch lies ahead of the clock, so no non-negative relative
    /// timestamp exists.
    #[error("epoch {epoch_ms} ms is ahead of the clock ({now_ms} ms)")]
    EpochInFuture { epoch_ms: u64, now_ms: u64 },

    /// The relative timestamp no longer fits in the 41-bit field.
    #[error("timestamp {timestamp} ms exceeds the 41-bit timestamp field")]
    TimestampOverflow { timestamp: u64 },

    /// A [`SystemTime`](std::time::SystemTime) earlier than 1970-01-01 UTC was
    /// used as an epoch.
    #[error("system time is before the Unix epoch")]
    SystemTimeBeforeUnixEpoch,

    /// A raw value or string could not be interpreted as an ID.
    #[error("invalid id: {reason}")]
    InvalidId { reason: &'static str },

    /// A thread panicked while holding the worker lock.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists
    /// without the `parking-lot` feature.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("worker lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
