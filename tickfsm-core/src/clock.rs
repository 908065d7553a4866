//! Injected monotonic time sources for timed transitions.
//!
//! The kernel never reads a platform clock directly. Timed transitions
//! measure elapsed time through the [`Clock`] trait, so the core stays
//! testable on a host without hardware and portable across targets that
//! disagree about where milliseconds come from (SysTick, a timer
//! peripheral, `std::time::Instant`, a simulation).

use core::cell::Cell;

/// Monotonic millisecond clock supplied by the embedding environment.
///
/// Readings wrap at `u32::MAX`; the kernel compares timestamps with
/// wrapping subtraction, so a single armed timeout stays correct across
/// one wraparound (about 49.7 days of uptime).
pub trait Clock {
    /// Current reading of the clock, in milliseconds.
    fn now_ms(&self) -> u32;
}

/// Manually advanced clock for tests and host-side simulation.
///
/// Borrows a shared [`Cell`] so the owner can advance time while the
/// machine holds a copy of the clock:
///
/// ```
/// use core::cell::Cell;
/// use tickfsm_core::{Clock, ManualClock};
///
/// let now = Cell::new(0);
/// let clock = ManualClock::new(&now);
/// clock.advance_ms(250);
/// assert_eq!(clock.now_ms(), 250);
/// ```
#[derive(Clone, Copy)]
pub struct ManualClock<'a> {
    now: &'a Cell<u32>,
}

impl<'a> ManualClock<'a> {
    /// Wraps a shared millisecond counter.
    #[must_use]
    pub fn new(now: &'a Cell<u32>) -> Self {
        Self { now }
    }

    /// Moves the clock forward by `ms` milliseconds (wrapping).
    pub fn advance_ms(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock<'_> {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

/// Wall clock anchored at construction, for host targets.
#[cfg(feature = "std")]
pub struct StdClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Starts a clock whose reading is zero right now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    // Truncation past u32::MAX matches the kernel's wrapping arithmetic.
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u32 {
        self.epoch.elapsed().as_millis() as u32
    }
}
