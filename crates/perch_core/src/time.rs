//! UI refresh clock
//!
//! Everything that mutates placement state happens on the UI thread, one
//! refresh cycle at a time. The clock counts those cycles so work can be
//! deferred to "the next tick".

use std::time::Duration;

/// Default refresh rate (60 Hz = 16.666ms per tick)
pub const REFRESH_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Tick number of a refresh cycle
pub type Tick = u64;

/// Refresh cycle tracker
pub struct RefreshClock {
    tick_count: Tick,
    tick_duration: Duration,
    accumulated_time: Duration,
}

impl RefreshClock {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            tick_duration: TICK_DURATION,
            accumulated_time: Duration::ZERO,
        }
    }

    /// Clock running at `rate_hz` refreshes per second (clamped to at least 1 Hz)
    pub fn with_rate(rate_hz: u32) -> Self {
        let rate_hz = rate_hz.max(1);
        Self {
            tick_count: 0,
            tick_duration: Duration::from_secs(1) / rate_hz,
            accumulated_time: Duration::ZERO,
        }
    }

    pub fn tick_count(&self) -> Tick {
        self.tick_count
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn advance_tick(&mut self) -> Tick {
        self.tick_count += 1;
        self.accumulated_time += self.tick_duration;
        self.tick_count
    }

    pub fn total_time(&self) -> Duration {
        self.accumulated_time
    }
}

impl Default for RefreshClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_rate_clamps_zero() {
        let clock = RefreshClock::with_rate(0);
        assert_eq!(clock.tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_advance_tick() {
        let mut clock = RefreshClock::with_rate(10);
        assert_eq!(clock.advance_tick(), 1);
        assert_eq!(clock.advance_tick(), 2);
        assert_eq!(clock.total_time(), Duration::from_millis(200));
    }

    #[test]
    fn test_total_time_past_u32_ticks() {
        let mut clock = RefreshClock::with_rate(1);
        clock.tick_count = u64::from(u32::MAX);
        clock.accumulated_time = Duration::from_secs(u64::from(u32::MAX));

        clock.advance_tick();

        assert_eq!(clock.tick_count(), 1u64 << 32);
        assert_eq!(clock.total_time(), Duration::from_secs(1u64 << 32));
    }
}
