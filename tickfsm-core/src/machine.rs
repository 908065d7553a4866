//! The machine driver: per-tick transition scan and action dispatch.

use heapless::Vec;

use crate::clock::Clock;
use crate::error::BuildError;
use crate::state::State;

/// A polled finite-state machine.
///
/// The machine owns its state table by value and is driven by calling
/// [`tick`](Machine::tick) from the embedding main loop. Each enabled
/// tick performs one scan of the current state's transitions (first
/// guard that holds wins, at most one state change per tick) and then
/// runs the current state's action exactly once.
///
/// `N` is the state-table capacity and `T` the per-state transition
/// capacity; both are compile-time constants so the whole machine lives
/// in a fixed-size allocation. The clock `K` is injected at construction
/// and is the only time source timed transitions ever see.
///
/// The machine performs no locking: drive a given instance from a single
/// caller. Independent instances are fully independent.
pub struct Machine<C, K, const N: usize, const T: usize> {
    states: Vec<State<C, T>, N>,
    current: usize,
    enabled: bool,
    state_changed: bool,
    first_tick: bool,
    clock: K,
}

impl<C, K: Clock, const N: usize, const T: usize> Machine<C, K, N, T> {
    /// Builds a machine from its state table, initial state and clock.
    ///
    /// The whole configuration is validated here, once, so the per-tick
    /// path can index the table unchecked-by-construction: every
    /// transition target is known to be in range and the table is known
    /// to be non-empty. The initial state is activated (its timed
    /// transitions armed) and the state-changed flag starts set, so the
    /// first tick's action observes `just_entered == true`.
    ///
    /// # Errors
    /// - [`BuildError::EmptyStateTable`] if `states` is empty.
    /// - [`BuildError::TooManyStates`] if `states` holds more than `N` entries.
    /// - [`BuildError::InitialStateOutOfRange`] if `initial >= states.len()`.
    /// - [`BuildError::TargetOutOfRange`] if any transition targets an
    ///   index at or past `states.len()`.
    pub fn new(states: &[State<C, T>], initial: usize, clock: K) -> Result<Self, BuildError> {
        if states.is_empty() {
            return Err(BuildError::EmptyStateTable);
        }
        if initial >= states.len() {
            return Err(BuildError::InitialStateOutOfRange);
        }
        for state in states {
            for transition in state.transitions() {
                if transition.target() >= states.len() {
                    return Err(BuildError::TargetOutOfRange);
                }
            }
        }

        let mut states: Vec<State<C, T>, N> =
            Vec::from_slice(states).map_err(|()| BuildError::TooManyStates)?;
        states[initial].activate();

        #[cfg(feature = "debug-log")]
        log::debug!(
            "machine built: {} states, initial state {initial}",
            states.len()
        );

        Ok(Self {
            states,
            current: initial,
            enabled: true,
            state_changed: true,
            first_tick: true,
            clock,
        })
    }

    /// Advances the machine by one tick.
    ///
    /// While enabled: scans the current state's transitions in
    /// declaration order, applies the first one whose guard holds (switch
    /// current state, activate it, stop scanning), then runs the possibly
    /// new current state's action exactly once. The action receives
    /// `just_entered`, which is also readable afterwards as
    /// [`is_state_changed`](Machine::is_state_changed).
    ///
    /// While disabled this is a no-op: no guards are evaluated (so timed
    /// transitions do not capture baselines) and no action runs.
    pub fn tick(&mut self, ctx: &mut C) {
        if !self.enabled {
            return;
        }
        let fired = self.update_state(ctx);
        self.state_changed = fired || self.first_tick;
        self.first_tick = false;

        let just_entered = self.state_changed;
        self.states[self.current].run_action(ctx, just_entered);
    }

    /// One ordered scan over the current state's transitions.
    ///
    /// First match wins; the remaining transitions are not evaluated this
    /// tick. Self-transitions re-activate the current state, which is the
    /// mechanism for restarting its own timeouts.
    fn update_state(&mut self, ctx: &C) -> bool {
        let clock = &self.clock;
        let mut next = None;
        for transition in self.states[self.current].transitions_mut() {
            if transition.is_triggered(ctx, clock) {
                next = Some(transition.target());
                break;
            }
        }
        let Some(next) = next else {
            return false;
        };

        #[cfg(feature = "debug-log")]
        log::trace!("transition fired: state {} -> {next}", self.current);

        self.current = next;
        self.states[next].activate();
        true
    }

    /// Index of the current state in the state table.
    #[must_use]
    pub fn current_state(&self) -> usize {
        self.current
    }

    /// True during and immediately after the tick in which a transition
    /// fired (or the machine's first tick); false again after the next
    /// tick without a change.
    #[must_use]
    pub fn is_state_changed(&self) -> bool {
        self.state_changed
    }

    /// True unless [`disable`](Machine::disable) was called last.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Lets [`tick`](Machine::tick) run again.
    pub fn enable(&mut self) {
        #[cfg(feature = "debug-log")]
        log::debug!("machine enabled in state {}", self.current);
        self.enabled = true;
    }

    /// Freezes the machine: subsequent ticks are no-ops until
    /// [`enable`](Machine::enable).
    pub fn disable(&mut self) {
        #[cfg(feature = "debug-log")]
        log::debug!("machine disabled in state {}", self.current);
        self.enabled = false;
    }
}

impl<C, K, const N: usize, const T: usize> core::fmt::Debug for Machine<C, K, N, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Machine")
            .field("states", &self.states.len())
            .field("current", &self.current)
            .field("enabled", &self.enabled)
            .field("state_changed", &self.state_changed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::transition::Transition;
    use core::cell::Cell;

    #[derive(Default)]
    struct Ctx {
        go: bool,
        also_go: bool,
        runs: [u32; 4],
        entries: [u32; 4],
    }

    fn act0(ctx: &mut Ctx, entered: bool) {
        ctx.runs[0] += 1;
        if entered {
            ctx.entries[0] += 1;
        }
    }

    fn act1(ctx: &mut Ctx, entered: bool) {
        ctx.runs[1] += 1;
        if entered {
            ctx.entries[1] += 1;
        }
    }

    fn act2(ctx: &mut Ctx, entered: bool) {
        ctx.runs[2] += 1;
        if entered {
            ctx.entries[2] += 1;
        }
    }

    fn go(ctx: &Ctx) -> bool {
        ctx.go
    }

    fn also_go(ctx: &Ctx) -> bool {
        ctx.also_go
    }

    fn always(_ctx: &Ctx) -> bool {
        true
    }

    type TestMachine<'a> = Machine<Ctx, ManualClock<'a>, 4, 2>;

    #[test]
    fn rejects_empty_state_table() {
        let now = Cell::new(0);
        let err = TestMachine::new(&[], 0, ManualClock::new(&now));
        assert_eq!(err.unwrap_err(), BuildError::EmptyStateTable);
    }

    #[test]
    fn rejects_initial_state_out_of_range() {
        let now = Cell::new(0);
        let states = [State::terminal(act0)];
        let err = TestMachine::new(&states, 1, ManualClock::new(&now));
        assert_eq!(err.unwrap_err(), BuildError::InitialStateOutOfRange);
    }

    #[test]
    fn rejects_transition_target_out_of_range() {
        let now = Cell::new(0);
        let states = [State::new(act0, &[Transition::on(go, 7)]).unwrap()];
        let err = TestMachine::new(&states, 0, ManualClock::new(&now));
        assert_eq!(err.unwrap_err(), BuildError::TargetOutOfRange);
    }

    #[test]
    fn rejects_overfull_state_table() {
        let now = Cell::new(0);
        let states = [
            State::terminal(act0),
            State::terminal(act1),
            State::terminal(act2),
        ];
        let err = Machine::<Ctx, _, 2, 2>::new(&states, 0, ManualClock::new(&now));
        assert_eq!(err.unwrap_err(), BuildError::TooManyStates);
    }

    #[test]
    fn action_runs_every_tick_without_a_transition() {
        let now = Cell::new(0);
        let states = [State::terminal(act0)];
        let mut fsm = TestMachine::new(&states, 0, ManualClock::new(&now)).unwrap();
        let mut ctx = Ctx::default();

        for _ in 0..5 {
            fsm.tick(&mut ctx);
        }
        assert_eq!(ctx.runs[0], 5);
        assert_eq!(fsm.current_state(), 0);
    }

    #[test]
    fn first_tick_reports_entry_into_the_initial_state() {
        let now = Cell::new(0);
        let states = [State::terminal(act0)];
        let mut fsm = TestMachine::new(&states, 0, ManualClock::new(&now)).unwrap();
        let mut ctx = Ctx::default();

        assert!(fsm.is_state_changed());
        fsm.tick(&mut ctx);
        assert_eq!(ctx.entries[0], 1);
        assert!(fsm.is_state_changed());

        fsm.tick(&mut ctx);
        assert_eq!(ctx.entries[0], 1);
        assert!(!fsm.is_state_changed());
    }

    #[test]
    fn event_transition_switches_and_runs_the_new_action_same_tick() {
        let now = Cell::new(0);
        let states = [
            State::new(act0, &[Transition::on(go, 1)]).unwrap(),
            State::terminal(act1),
        ];
        let mut fsm = TestMachine::new(&states, 0, ManualClock::new(&now)).unwrap();
        let mut ctx = Ctx::default();

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 0);

        ctx.go = true;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);
        // The entered state's action ran in the same tick, the old one did not.
        assert_eq!(ctx.runs[0], 1);
        assert_eq!(ctx.runs[1], 1);
        assert_eq!(ctx.entries[1], 1);
    }

    #[test]
    fn first_match_wins_over_later_transitions() {
        let now = Cell::new(0);
        let states = [
            State::new(act0, &[Transition::on(go, 1), Transition::on(also_go, 2)]).unwrap(),
            State::terminal(act1),
            State::terminal(act2),
        ];
        let mut fsm = TestMachine::new(&states, 0, ManualClock::new(&now)).unwrap();
        let mut ctx = Ctx {
            go: true,
            also_go: true,
            ..Ctx::default()
        };

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);
    }

    #[test]
    fn at_most_one_transition_per_tick() {
        let now = Cell::new(0);
        let states = [
            State::new(act0, &[Transition::on(always, 1)]).unwrap(),
            State::new(act1, &[Transition::on(always, 2)]).unwrap(),
            State::terminal(act2),
        ];
        let mut fsm = TestMachine::new(&states, 0, ManualClock::new(&now)).unwrap();
        let mut ctx = Ctx::default();

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);

        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 2);
    }

    #[test]
    fn state_changed_flag_lifecycle() {
        let now = Cell::new(0);
        let states = [
            State::new(act0, &[Transition::on(go, 1)]).unwrap(),
            State::terminal(act1),
        ];
        let mut fsm = TestMachine::new(&states, 0, ManualClock::new(&now)).unwrap();
        let mut ctx = Ctx::default();

        fsm.tick(&mut ctx); // first tick: initial entry
        fsm.tick(&mut ctx);
        assert!(!fsm.is_state_changed());

        ctx.go = true;
        fsm.tick(&mut ctx);
        assert!(fsm.is_state_changed());

        fsm.tick(&mut ctx);
        assert!(!fsm.is_state_changed());
    }

    #[test]
    fn timed_transition_fires_only_after_the_timeout() {
        let now = Cell::new(0);
        let clock = ManualClock::new(&now);
        let states = [
            State::new(act0, &[Transition::after_ms(100, 1)]).unwrap(),
            State::terminal(act1),
        ];
        let mut fsm = TestMachine::new(&states, 0, clock).unwrap();
        let mut ctx = Ctx::default();

        fsm.tick(&mut ctx); // baseline captured here
        clock.advance_ms(99);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 0);

        clock.advance_ms(1);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);
    }

    #[test]
    fn timer_rearms_on_state_entry() {
        let now = Cell::new(0);
        let clock = ManualClock::new(&now);
        let states = [
            State::new(act0, &[Transition::on(go, 1)]).unwrap(),
            State::new(act1, &[Transition::after_ms(100, 0)]).unwrap(),
        ];
        let mut fsm = TestMachine::new(&states, 0, clock).unwrap();
        let mut ctx = Ctx::default();

        // First visit: let the timeout expire and bounce back to state 0.
        ctx.go = true;
        fsm.tick(&mut ctx);
        ctx.go = false;
        assert_eq!(fsm.current_state(), 1);
        fsm.tick(&mut ctx); // baseline
        clock.advance_ms(100);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 0);

        // Second visit, much later: the old baseline must not leak through.
        clock.advance_ms(10_000);
        ctx.go = true;
        fsm.tick(&mut ctx);
        ctx.go = false;
        assert_eq!(fsm.current_state(), 1);
        fsm.tick(&mut ctx); // fresh baseline
        clock.advance_ms(99);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);
        clock.advance_ms(1);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 0);
    }

    #[test]
    fn self_transition_restarts_the_timer() {
        let now = Cell::new(0);
        let clock = ManualClock::new(&now);
        let states = [State::new(
            act0,
            &[Transition::on(go, 0), Transition::after_ms(100, 0)],
        )
        .unwrap()];
        let mut fsm = Machine::<Ctx, _, 1, 2>::new(&states, 0, clock).unwrap();
        let mut ctx = Ctx::default();

        fsm.tick(&mut ctx); // timer baseline at t=0
        clock.advance_ms(90);

        // Self-transition via the event guard rearms the timer.
        ctx.go = true;
        fsm.tick(&mut ctx);
        ctx.go = false;
        assert!(fsm.is_state_changed());

        fsm.tick(&mut ctx); // fresh baseline at t=90
        clock.advance_ms(99);
        fsm.tick(&mut ctx);
        assert!(!fsm.is_state_changed());
        clock.advance_ms(1);
        fsm.tick(&mut ctx);
        assert!(fsm.is_state_changed());
    }

    #[test]
    fn disabled_machine_is_frozen() {
        let now = Cell::new(0);
        let clock = ManualClock::new(&now);
        let states = [
            State::new(act0, &[Transition::on(always, 1)]).unwrap(),
            State::terminal(act1),
        ];
        let mut fsm = TestMachine::new(&states, 0, clock).unwrap();
        let mut ctx = Ctx::default();

        fsm.disable();
        assert!(!fsm.is_enabled());
        for _ in 0..3 {
            fsm.tick(&mut ctx);
        }
        assert_eq!(ctx.runs[0], 0);
        assert_eq!(fsm.current_state(), 0);

        fsm.enable();
        assert!(fsm.is_enabled());
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);
    }

    #[test]
    fn disable_before_first_evaluation_does_not_bank_elapsed_time() {
        let now = Cell::new(0);
        let clock = ManualClock::new(&now);
        let states = [
            State::new(act0, &[Transition::after_ms(100, 1)]).unwrap(),
            State::terminal(act1),
        ];
        let mut fsm = TestMachine::new(&states, 0, clock).unwrap();
        let mut ctx = Ctx::default();

        // The timer is armed but no guard has run, so no baseline exists.
        fsm.disable();
        clock.advance_ms(10_000);
        fsm.enable();

        // The first evaluation after re-enabling captures the baseline now.
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 0);
        clock.advance_ms(99);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 0);
        clock.advance_ms(1);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);
    }

    #[test]
    fn terminal_state_runs_forever() {
        let now = Cell::new(0);
        let clock = ManualClock::new(&now);
        let states = [
            State::new(act0, &[Transition::after_ms(10, 1)]).unwrap(),
            State::terminal(act1),
        ];
        let mut fsm = TestMachine::new(&states, 0, clock).unwrap();
        let mut ctx = Ctx::default();

        fsm.tick(&mut ctx);
        clock.advance_ms(10);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), 1);

        for _ in 0..10 {
            clock.advance_ms(1_000);
            fsm.tick(&mut ctx);
        }
        assert_eq!(fsm.current_state(), 1);
        assert_eq!(ctx.runs[1], 11);
    }
}
