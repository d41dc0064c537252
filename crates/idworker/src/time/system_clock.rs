use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// A time source backed by [`SystemTime::now`].
///
/// Wall-clock time can move backwards (NTP steps, VM migration, manual
/// changes). Workers detect this and refuse to issue IDs until the clock has
/// caught up again.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as 0, which any later epoch rejects.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since_unix| since_unix.as_millis() as u64)
    }
}
