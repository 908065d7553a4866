//! Scenario tests driving whole machines on simulated time.

use core::cell::Cell;

use tickfsm_core::ManualClock;

use crate::common::*;

#[test]
fn happy_path_idle_active_done() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);
    let mut fsm = fixture(clock);
    let mut ctx = Ctx::default();

    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), IDLE);
    assert_eq!(ctx.entries[IDLE], 1);

    ctx.start = true;
    fsm.tick(&mut ctx);
    ctx.start = false;
    assert_eq!(fsm.current_state(), ACTIVE);

    fsm.tick(&mut ctx); // timeout baseline captured here
    clock.advance_ms(200);
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), DONE);
    assert_eq!(ctx.entries[DONE], 1);

    // DONE is terminal: its action keeps running, the state never changes.
    for _ in 0..5 {
        clock.advance_ms(1_000);
        fsm.tick(&mut ctx);
    }
    assert_eq!(fsm.current_state(), DONE);
    assert_eq!(ctx.visits[DONE], 6);
    assert!(!fsm.is_state_changed());
}

#[test]
fn abort_beats_an_expired_timer() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);
    let mut fsm = fixture(clock);
    let mut ctx = Ctx::default();

    ctx.start = true;
    fsm.tick(&mut ctx);
    ctx.start = false;
    fsm.tick(&mut ctx); // baseline
    clock.advance_ms(500); // well past the 200ms timeout

    // Both guards hold on this tick; the abort is declared first.
    ctx.abort = true;
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), IDLE);
}

#[test]
fn abandoning_a_state_cancels_its_pending_timeout() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);
    let mut fsm = fixture(clock);
    let mut ctx = Ctx::default();

    // Into ACTIVE, run most of the countdown, abort back to IDLE.
    ctx.start = true;
    fsm.tick(&mut ctx);
    ctx.start = false;
    fsm.tick(&mut ctx);
    clock.advance_ms(190);
    ctx.abort = true;
    fsm.tick(&mut ctx);
    ctx.abort = false;
    assert_eq!(fsm.current_state(), IDLE);

    // Re-enter ACTIVE: the countdown starts over, the old 190ms are gone.
    ctx.start = true;
    fsm.tick(&mut ctx);
    ctx.start = false;
    fsm.tick(&mut ctx);
    clock.advance_ms(199);
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), ACTIVE);
    clock.advance_ms(1);
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), DONE);
}

#[test]
fn disable_freezes_actions_and_timers() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);
    let mut fsm = fixture(clock);
    let mut ctx = Ctx::default();

    ctx.start = true;
    fsm.tick(&mut ctx);
    ctx.start = false;
    assert_eq!(fsm.current_state(), ACTIVE);

    // Freeze before the timer's first guard evaluation. Wall time passes,
    // but no guard runs, so no baseline is captured while disabled.
    fsm.disable();
    let visits_before = ctx.visits;
    clock.advance_ms(10_000);
    for _ in 0..4 {
        fsm.tick(&mut ctx);
    }
    assert_eq!(ctx.visits, visits_before);
    assert_eq!(fsm.current_state(), ACTIVE);

    // Resumes as if no time had passed for eligibility purposes.
    fsm.enable();
    fsm.tick(&mut ctx); // baseline captured now
    assert_eq!(fsm.current_state(), ACTIVE);
    clock.advance_ms(200);
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), DONE);
}

#[test]
fn state_changed_is_observable_between_ticks() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);
    let mut fsm = fixture(clock);
    let mut ctx = Ctx::default();

    fsm.tick(&mut ctx); // initial entry
    assert!(fsm.is_state_changed());
    fsm.tick(&mut ctx);
    assert!(!fsm.is_state_changed());

    ctx.start = true;
    fsm.tick(&mut ctx);
    assert!(fsm.is_state_changed());
    ctx.start = false;
    fsm.tick(&mut ctx);
    assert!(!fsm.is_state_changed());
}

#[test]
fn one_tick_advances_at_most_one_state() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);
    let mut fsm = fixture(clock);
    let mut ctx = Ctx::default();

    // start stays true and the ACTIVE timeout is already expired once its
    // baseline exists; still, every state change costs one tick.
    ctx.start = true;
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), ACTIVE);

    fsm.tick(&mut ctx); // ACTIVE's baseline tick
    clock.advance_ms(200);
    fsm.tick(&mut ctx);
    assert_eq!(fsm.current_state(), DONE);
}
