#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BusyWait, Epoch, Error, IdGenStatus, NodeId, NodeIdProvider, Result, SnowflakeId,
    TimeSource, WaitStrategy,
    generator::{
        mutex::{Mutex, MutexGuard},
        state::{Advance, SequenceState, cold_clock_behind},
    },
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// Each worker owns one mutex around its sequence state. The whole
/// read-clock / decide / update / pack step runs under that lock, so any
/// number of threads can share a worker (e.g. behind an `Arc`) without ever
/// seeing a duplicate ID. Workers never share a lock with each other.
///
/// ## Guarantees
/// - IDs from one worker are unique as long as the clock never moves back past
///   a previously observed millisecond.
/// - IDs from one worker strictly increase in lock-acquisition order.
/// - At most 4096 IDs are issued per millisecond. The 4097th call waits
///   (see [`WaitStrategy`]) until the clock advances.
///
/// ## Clock regression
/// If the clock reports a time earlier than the last issued ID,
/// [`next_id`](Self::next_id) returns [`Error::ClockRegression`] and leaves
/// the state untouched. The worker recovers by itself once the clock catches
/// up.
pub struct IdWorker<T, W = BusyWait>
where
    T: TimeSource,
    W: WaitStrategy,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<SequenceState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<SequenceState>,
    epoch: Epoch,
    node_id: NodeId,
    time: T,
    wait: W,
}

impl<T> IdWorker<T>
where
    T: TimeSource,
{
    /// Creates a worker that busy-waits on sequence exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpochInFuture`] if `time` currently reads earlier than
    /// `epoch`.
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::{IdWorker, NodeId, SystemClock, TWITTER_EPOCH};
    ///
    /// let worker = IdWorker::new(TWITTER_EPOCH, NodeId::new(1, 2)?, SystemClock)?;
    /// let id = worker.next_id()?;
    /// assert_eq!(id.node_id(), NodeId::new(1, 2)?);
    /// # Ok::<(), idworker::Error>(())
    /// ```
    pub fn new(epoch: Epoch, node_id: NodeId, time: T) -> Result<Self> {
        Self::with_wait(epoch, node_id, time, BusyWait)
    }

    /// Creates a worker whose node ID comes from a [`NodeIdProvider`].
    ///
    /// # Errors
    ///
    /// Propagates the provider's error, and fails like [`Self::new`] when the
    /// epoch is ahead of the clock.
    pub fn with_provider(
        epoch: Epoch,
        provider: &impl NodeIdProvider,
        time: T,
    ) -> Result<Self> {
        Self::new(epoch, provider.node_id()?, time)
    }
}

impl<T, W> IdWorker<T, W>
where
    T: TimeSource,
    W: WaitStrategy,
{
    /// Creates a worker with an explicit [`WaitStrategy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpochInFuture`] if `time` currently reads earlier than
    /// `epoch`.
    pub fn with_wait(epoch: Epoch, node_id: NodeId, time: T, wait: W) -> Result<Self> {
        let now_ms = time.current_millis();
        if now_ms < epoch.as_millis() {
            return Err(Error::EpochInFuture {
                epoch_ms: epoch.as_millis(),
                now_ms,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%epoch, %node_id, "created id worker");

        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(SequenceState::default())),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(SequenceState::default()),
            epoch,
            node_id,
            time,
            wait,
        })
    }

    /// The epoch timestamps are measured from.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The node ID packed into every issued ID.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Generates the next ID, waiting if the current millisecond is full.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock is behind the last issued ID,
    ///   including when it has dropped below the epoch.
    /// - [`Error::EpochInFuture`] if the clock reads earlier than the epoch
    ///   before any ID was issued.
    /// - [`Error::TimestampOverflow`] once the epoch is more than 2^41 ms in
    ///   the past.
    /// - [`Error::LockPoisoned`] if another thread panicked inside the lock
    ///   (only without the `parking-lot` feature).
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::{CUSTOM_EPOCH, IdWorker, NodeId, SystemClock};
    ///
    /// let worker = IdWorker::new(CUSTOM_EPOCH, NodeId::new(0, 0)?, SystemClock)?;
    ///
    /// let mut last = worker.next_id()?;
    /// for _ in 0..10_000 {
    ///     let id = worker.next_id()?;
    ///     assert!(id > last);
    ///     last = id;
    /// }
    /// # Ok::<(), idworker::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock_state()?;
        let current = self.relative_millis(state.last_timestamp)?;

        let (timestamp, sequence) = match state.classify(current)? {
            Advance::NewTick => (current, 0),
            Advance::SameTick { sequence } => (current, sequence),
            Advance::Exhausted { last } => (self.wait_past(last)?, 0),
        };

        self.issue(&mut state, timestamp, sequence)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// Behaves like [`Self::next_id`], except that an exhausted millisecond
    /// yields [`IdGenStatus::Pending`] instead of blocking. A pending result
    /// does not change the worker state.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::{CUSTOM_EPOCH, IdGenStatus, IdWorker, NodeId, SystemClock};
    ///
    /// let worker = IdWorker::new(CUSTOM_EPOCH, NodeId::new(0, 0)?, SystemClock)?;
    ///
    /// let id = loop {
    ///     match worker.poll_id()? {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// # let _ = id;
    /// # Ok::<(), idworker::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.lock_state()?;
        let current = self.relative_millis(state.last_timestamp)?;

        let (timestamp, sequence) = match state.classify(current)? {
            Advance::NewTick => (current, 0),
            Advance::SameTick { sequence } => (current, sequence),
            Advance::Exhausted { last } => {
                return Ok(IdGenStatus::Pending {
                    yield_until: last + 1,
                });
            }
        };

        let id = self.issue(&mut state, timestamp, sequence)?;
        Ok(IdGenStatus::Ready { id })
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, SequenceState>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// Milliseconds since the epoch. A clock below the epoch is a regression
    /// once an ID has been issued (reported with `now` clamped to 0), and
    /// [`Error::EpochInFuture`] before that.
    fn relative_millis(&self, last: Option<u64>) -> Result<u64> {
        let now_ms = self.time.current_millis();
        match (now_ms.checked_sub(self.epoch.as_millis()), last) {
            (Some(current), _) => Ok(current),
            (None, Some(last)) => Err(cold_clock_behind(last, 0)),
            (None, None) => Err(Error::EpochInFuture {
                epoch_ms: self.epoch.as_millis(),
                now_ms,
            }),
        }
    }

    /// Polls the clock until it is strictly past `last`.
    #[cold]
    fn wait_past(&self, last: u64) -> Result<u64> {
        #[cfg(feature = "tracing")]
        tracing::trace!(last, "sequence exhausted, waiting for next millisecond");

        loop {
            let current = self.relative_millis(Some(last))?;
            if current > last {
                return Ok(current);
            }
            self.wait.wait();
        }
    }

    fn issue(
        &self,
        state: &mut SequenceState,
        timestamp: u64,
        sequence: u64,
    ) -> Result<SnowflakeId> {
        if timestamp > SnowflakeId::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { timestamp });
        }
        state.commit(timestamp, sequence);
        Ok(SnowflakeId::assemble(timestamp, self.node_id, sequence))
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> SequenceState {
        *self.lock_state().unwrap()
    }
}
