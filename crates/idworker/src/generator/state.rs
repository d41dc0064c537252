use crate::{Error, Result, SnowflakeId};

/// The mutable half of a worker: what was issued last.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SequenceState {
    /// Relative timestamp of the last issued ID, `None` before the first one.
    pub(crate) last_timestamp: Option<u64>,
    pub(crate) last_sequence: u64,
}

/// What the next ID looks like relative to the last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// A fresh millisecond; the sequence restarts at zero.
    NewTick,
    /// Same millisecond, next sequence value.
    SameTick { sequence: u64 },
    /// Same millisecond with all sequence values used.
    Exhausted { last: u64 },
}

impl SequenceState {
    /// Classifies `current` (ms since epoch) against the last issued ID.
    /// Never mutates.
    pub(crate) fn classify(&self, current: u64) -> Result<Advance> {
        let Some(last) = self.last_timestamp else {
            return Ok(Advance::NewTick);
        };

        if current < last {
            return Err(cold_clock_behind(last, current));
        }

        if current > last {
            Ok(Advance::NewTick)
        } else if self.last_sequence < SnowflakeId::MAX_SEQUENCE {
            Ok(Advance::SameTick {
                sequence: self.last_sequence + 1,
            })
        } else {
            Ok(Advance::Exhausted { last })
        }
    }

    pub(crate) fn commit(&mut self, timestamp: u64, sequence: u64) {
        self.last_timestamp = Some(timestamp);
        self.last_sequence = sequence;
    }
}

#[cold]
#[inline(never)]
pub(crate) fn cold_clock_behind(last: u64, now: u64) -> Error {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        last,
        now,
        behind_ms = last - now,
        "clock moved backwards, refusing to issue id"
    );
    Error::ClockRegression { last, now }
}
