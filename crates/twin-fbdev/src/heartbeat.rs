//! Periodic heartbeat.
//!
//! The SysTick interrupt calls [`Heartbeat::tick`] at [`HEARTBEAT_HZ`] and
//! does nothing else. Everything that wants the time reads the counter.
//!
//! ```rust,ignore
//! static HEARTBEAT: Heartbeat = Heartbeat::new();
//!
//! #[exception]
//! fn SysTick() {
//!     HEARTBEAT.tick();
//! }
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// Heartbeat rate.
pub const HEARTBEAT_HZ: u32 = 100;

/// SysTick's reload register is 24 bits wide.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Tick counter shared between the SysTick handler and the main loop.
///
/// Only the interrupt handler calls [`tick`](Self::tick). The counter wraps.
#[derive(Debug, Default)]
pub struct Heartbeat {
    ticks: AtomicU32,
}

impl Heartbeat {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Milliseconds since start, wrapping with the tick counter.
    pub fn millis(&self) -> u32 {
        self.ticks().wrapping_mul(1000 / HEARTBEAT_HZ)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatError {
    /// The core clock is slower than the requested rate.
    ClockTooSlow { core_clock_hz: u32, rate_hz: u32 },
    /// The reload value does not fit SysTick's 24-bit counter.
    ReloadTooLarge { reload: u32 },
}

impl core::fmt::Display for HeartbeatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HeartbeatError::ClockTooSlow {
                core_clock_hz,
                rate_hz,
            } => write!(f, "Core clock {core_clock_hz}Hz too slow for {rate_hz}Hz heartbeat"),
            HeartbeatError::ReloadTooLarge { reload } => {
                write!(f, "SysTick reload {reload:#x} exceeds 24 bits")
            }
        }
    }
}

impl core::error::Error for HeartbeatError {}

/// SysTick settings for the heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystickConfig {
    pub core_clock_hz: u32,
    pub rate_hz: u32,
}

impl SystickConfig {
    pub fn new(core_clock_hz: u32) -> Self {
        Self {
            core_clock_hz,
            rate_hz: HEARTBEAT_HZ,
        }
    }

    /// Value for the SysTick reload register (one less than the period).
    pub fn reload(&self) -> Result<u32, HeartbeatError> {
        let period = match self.core_clock_hz.checked_div(self.rate_hz) {
            Some(period) if period > 0 => period,
            _ => {
                return Err(HeartbeatError::ClockTooSlow {
                    core_clock_hz: self.core_clock_hz,
                    rate_hz: self.rate_hz,
                })
            }
        };

        let reload = period - 1;
        if reload > SYSTICK_MAX_RELOAD {
            return Err(HeartbeatError::ReloadTooLarge { reload });
        }
        Ok(reload)
    }
}

/// Tracks which heartbeat tick the last scheduling pass ran on.
#[derive(Debug, Default)]
pub struct Pacer {
    last: Option<u32>,
}

impl Pacer {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// True once per new tick; the first call is always due.
    pub fn due(&mut self, heartbeat: &Heartbeat) -> bool {
        let now = heartbeat.ticks();
        if self.last == Some(now) {
            return false;
        }
        self.last = Some(now);
        true
    }
}
