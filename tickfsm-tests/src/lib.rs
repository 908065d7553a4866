//! Integration and property tests for tickfsm
//!
//! Scenario-level tests that drive whole machines on simulated time, plus
//! property tests whose dependencies shouldn't be part of the core
//! `no_std` build.

#![cfg(test)]

pub mod integration;

/// Common fixtures shared by the test modules.
pub mod common {
    use tickfsm_core::{Machine, ManualClock, State, Transition};

    pub const IDLE: usize = 0;
    pub const ACTIVE: usize = 1;
    pub const DONE: usize = 2;

    /// Context for the three-state fixture machine.
    #[derive(Default)]
    pub struct Ctx {
        pub start: bool,
        pub abort: bool,
        pub visits: [u32; 3],
        pub entries: [u32; 3],
    }

    fn visit(ctx: &mut Ctx, state: usize, just_entered: bool) {
        ctx.visits[state] += 1;
        if just_entered {
            ctx.entries[state] += 1;
        }
    }

    pub fn idle_action(ctx: &mut Ctx, just_entered: bool) {
        visit(ctx, IDLE, just_entered);
    }

    pub fn active_action(ctx: &mut Ctx, just_entered: bool) {
        visit(ctx, ACTIVE, just_entered);
    }

    pub fn done_action(ctx: &mut Ctx, just_entered: bool) {
        visit(ctx, DONE, just_entered);
    }

    pub fn start_requested(ctx: &Ctx) -> bool {
        ctx.start
    }

    pub fn abort_requested(ctx: &Ctx) -> bool {
        ctx.abort
    }

    pub type FixtureMachine<'a> = Machine<Ctx, ManualClock<'a>, 3, 2>;

    /// IDLE --start--> ACTIVE --abort--> IDLE
    ///                 ACTIVE --200ms--> DONE (terminal)
    ///
    /// The abort guard is declared before the timeout, so a simultaneous
    /// abort wins over an expired timer.
    pub fn fixture(clock: ManualClock<'_>) -> FixtureMachine<'_> {
        let states = [
            State::new(idle_action, &[Transition::on(start_requested, ACTIVE)]).unwrap(),
            State::new(
                active_action,
                &[
                    Transition::on(abort_requested, IDLE),
                    Transition::after_ms(200, DONE),
                ],
            )
            .unwrap(),
            State::terminal(done_action),
        ];
        Machine::new(&states, IDLE, clock).unwrap()
    }
}
