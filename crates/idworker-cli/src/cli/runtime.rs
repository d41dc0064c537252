//! Runtime-selected clock and wait strategy, so the binary builds a single
//! `IdWorker<Clock, Wait>` type whatever the configuration.

use idworker::{
    BusyWait, MonotonicClock, SleepWait, SystemClock, TimeSource, WaitStrategy, YieldWait,
};

use super::config::{ClockKind, GenerateConfig, WaitKind};

#[derive(Clone, Debug)]
pub enum Clock {
    System(SystemClock),
    Monotonic(MonotonicClock),
}

impl From<ClockKind> for Clock {
    fn from(kind: ClockKind) -> Self {
        match kind {
            ClockKind::System => Self::System(SystemClock),
            ClockKind::Monotonic => Self::Monotonic(MonotonicClock::new()),
        }
    }
}

impl TimeSource for Clock {
    fn current_millis(&self) -> u64 {
        match self {
            Self::System(clock) => clock.current_millis(),
            Self::Monotonic(clock) => clock.current_millis(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Wait {
    Spin(BusyWait),
    Yield(YieldWait),
    Sleep(SleepWait),
}

impl From<&GenerateConfig> for Wait {
    fn from(config: &GenerateConfig) -> Self {
        match config.wait {
            WaitKind::Spin => Self::Spin(BusyWait),
            WaitKind::Yield => Self::Yield(YieldWait),
            WaitKind::Sleep => Self::Sleep(SleepWait(config.sleep)),
        }
    }
}

impl WaitStrategy for Wait {
    fn wait(&self) {
        match self {
            Self::Spin(wait) => wait.wait(),
            Self::Yield(wait) => wait.wait(),
            Self::Sleep(wait) => wait.wait(),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use idworker::NodeId;

    use super::*;
    use crate::cli::config::OutputFormat;

    fn config(wait: WaitKind, sleep_micros: u64) -> GenerateConfig {
        GenerateConfig {
            node_id: NodeId::new(0, 0).unwrap(),
            count: 1,
            threads: 1,
            clock: ClockKind::System,
            wait,
            sleep: Duration::from_micros(sleep_micros),
            format: OutputFormat::Decimal,
        }
    }

    #[test]
    fn clock_kind_selects_clock() {
        assert!(matches!(Clock::from(ClockKind::System), Clock::System(_)));
        assert!(matches!(
            Clock::from(ClockKind::Monotonic),
            Clock::Monotonic(_)
        ));
    }

    #[test]
    fn clocks_read_unix_millis() {
        let system = Clock::from(ClockKind::System).current_millis();
        let monotonic = Clock::from(ClockKind::Monotonic).current_millis();
        assert!(system > 0);
        assert!(monotonic.abs_diff(system) < 1_000);
    }

    #[test]
    fn wait_kind_selects_strategy() {
        assert!(matches!(
            Wait::from(&config(WaitKind::Spin, 50)),
            Wait::Spin(BusyWait)
        ));
        assert!(matches!(
            Wait::from(&config(WaitKind::Yield, 50)),
            Wait::Yield(YieldWait)
        ));
    }

    #[test]
    fn sleep_wait_carries_interval() {
        match Wait::from(&config(WaitKind::Sleep, 250)) {
            Wait::Sleep(SleepWait(interval)) => {
                assert_eq!(interval, Duration::from_micros(250));
            }
            other => panic!("expected sleep wait, got {other:?}"),
        }
    }
}
