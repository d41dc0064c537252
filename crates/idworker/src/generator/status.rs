use crate::SnowflakeId;

/// Represents the result of a non-blocking generation attempt.
///
/// This type models the outcome of [`IdWorker::poll_id`]:
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means all 4096 sequence values of the current
///   millisecond are used up, and the caller should retry once the clock
///   reaches `yield_until`.
///
/// [`IdWorker::poll_id`]: crate::IdWorker::poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated because the sequence has been exhausted for the
    /// current millisecond.
    Pending {
        /// The first timestamp (relative to the worker's epoch, inclusive) at
        /// which IDs are available again.
        yield_until: u64,
    },
}
