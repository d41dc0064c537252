use core::time::Duration;

/// How a worker waits for the next millisecond after exhausting the sequence
/// space of the current one.
///
/// The worker re-reads its clock after every call to [`wait`](Self::wait), so
/// strategies only trade CPU usage against latency. The IDs produced are the
/// same for every strategy.
///
/// The wait happens while the worker lock is held.
pub trait WaitStrategy {
    /// Pauses briefly before the clock is polled again.
    fn wait(&self);
}

impl<W: WaitStrategy + ?Sized> WaitStrategy for &W {
    fn wait(&self) {
        (**self).wait();
    }
}

/// Tight polling with a spin-loop hint. Lowest latency; burns a core for up to
/// a millisecond.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusyWait;

impl WaitStrategy for BusyWait {
    fn wait(&self) {
        core::hint::spin_loop();
    }
}

/// Gives the rest of the time slice back to the OS scheduler between polls.
#[derive(Clone, Copy, Debug, Default)]
pub struct YieldWait;

impl WaitStrategy for YieldWait {
    fn wait(&self) {
        std::thread::yield_now();
    }
}

/// Sleeps for a fixed interval between polls.
///
/// Keep the interval well under a millisecond; the actual sleep is at least
/// the requested duration and often longer.
#[derive(Clone, Copy, Debug)]
pub struct SleepWait(pub Duration);

impl Default for SleepWait {
    fn default() -> Self {
        Self(Duration::from_micros(50))
    }
}

impl WaitStrategy for SleepWait {
    fn wait(&self) {
        std::thread::sleep(self.0);
    }
}
