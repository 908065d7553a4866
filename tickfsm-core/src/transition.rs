//! Transition variants: event-guarded and time-guarded edges.

use crate::clock::Clock;

/// Guard predicate of an event transition.
///
/// Takes a read-only view of the caller's context and returns `true`
/// when the transition should fire. Re-evaluated every tick the owning
/// state is current, so it must be cheap and non-blocking.
pub type Predicate<C> = fn(&C) -> bool;

/// A guarded edge to another state in the owning machine's state table.
///
/// A transition is either event-guarded (fires when a caller-supplied
/// predicate returns `true`) or time-guarded (fires once a timeout has
/// elapsed since the owning state was last entered). The variant is a
/// tag matched in [`is_triggered`](Transition::is_triggered); there is
/// no dispatch through trait objects.
pub struct Transition<C> {
    target: usize,
    kind: Kind<C>,
}

enum Kind<C> {
    Event {
        predicate: Predicate<C>,
    },
    Timed {
        timeout_ms: u32,
        /// When set, the next guard evaluation captures the current
        /// clock reading as the baseline before comparing elapsed time.
        armed: bool,
        baseline_ms: u32,
    },
}

impl<C> Transition<C> {
    /// Event transition: fires on any tick where `predicate` returns `true`.
    #[must_use]
    pub fn on(predicate: Predicate<C>, target: usize) -> Self {
        Self {
            target,
            kind: Kind::Event { predicate },
        }
    }

    /// Timed transition: fires once `timeout_ms` milliseconds have elapsed
    /// since the owning state was last entered.
    ///
    /// The countdown baseline is captured on the first guard evaluation
    /// after arming, and the machine rearms every timed transition of a
    /// state whenever that state is entered, so in practice the timeout
    /// measures from state entry. Entering the state again (including via
    /// a self-transition) restarts the countdown.
    #[must_use]
    pub fn after_ms(timeout_ms: u32, target: usize) -> Self {
        Self {
            target,
            kind: Kind::Timed {
                timeout_ms,
                armed: true,
                baseline_ms: 0,
            },
        }
    }

    /// Index of the destination state in the machine's state table.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// True if this is a time-guarded transition.
    #[must_use]
    pub fn is_timed(&self) -> bool {
        matches!(self.kind, Kind::Timed { .. })
    }

    /// Evaluates the guard condition for this tick.
    ///
    /// Event guards delegate to the predicate verbatim. Timed guards
    /// capture their baseline on the first call after arming, then report
    /// whether the timeout has elapsed; the comparison uses wrapping
    /// subtraction so it survives clock wraparound.
    pub(crate) fn is_triggered(&mut self, ctx: &C, clock: &impl Clock) -> bool {
        match &mut self.kind {
            Kind::Event { predicate } => predicate(ctx),
            Kind::Timed {
                timeout_ms,
                armed,
                baseline_ms,
            } => {
                let now = clock.now_ms();
                if *armed {
                    *armed = false;
                    *baseline_ms = now;
                }
                now.wrapping_sub(*baseline_ms) >= *timeout_ms
            }
        }
    }

    /// Restarts the timeout countdown; no-op for event transitions.
    pub(crate) fn rearm(&mut self) {
        if let Kind::Timed { armed, .. } = &mut self.kind {
            *armed = true;
        }
    }
}

impl<C> core::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("Transition");
        s.field("target", &self.target);
        match &self.kind {
            Kind::Event { .. } => s.field("kind", &"event"),
            Kind::Timed {
                timeout_ms, armed, ..
            } => s.field("timeout_ms", timeout_ms).field("armed", armed),
        };
        s.finish()
    }
}

// Derived impls would demand `C: Clone`/`C: Copy`, but `C` only appears
// behind a fn pointer here.
impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Transition<C> {}

impl<C> Clone for Kind<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Kind<C> {}
