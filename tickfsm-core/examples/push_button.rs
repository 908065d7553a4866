//! Momentary push button turning a lamp on for one second.
//!
//! Drives the machine on simulated time with a scripted button, so the
//! run is fully deterministic. Run with:
//! `cargo run --example push_button`

use core::cell::Cell;

use tickfsm_core::{Machine, ManualClock, State, Transition};

const IDLE: usize = 0;
const LAMP_ON: usize = 1;

#[derive(Default)]
struct Panel {
    button: bool,
    lamp: bool,
}

fn idle(ctx: &mut Panel, just_entered: bool) {
    if just_entered {
        ctx.lamp = false;
    }
}

fn lamp_on(ctx: &mut Panel, just_entered: bool) {
    if just_entered {
        ctx.lamp = true;
    }
}

fn button_pressed(ctx: &Panel) -> bool {
    ctx.button
}

fn main() {
    let now = Cell::new(0);
    let clock = ManualClock::new(&now);

    let states = [
        State::new(idle, &[Transition::on(button_pressed, LAMP_ON)]).unwrap(),
        State::new(lamp_on, &[Transition::after_ms(1_000, IDLE)]).unwrap(),
    ];
    let mut fsm: Machine<Panel, _, 2, 1> = Machine::new(&states, IDLE, clock).unwrap();

    let mut ctx = Panel::default();

    // Tick every 50ms of simulated time; press the button briefly at 200ms.
    for step in 0..40u32 {
        let t = step * 50;
        ctx.button = t == 200;
        fsm.tick(&mut ctx);
        if fsm.is_state_changed() {
            println!(
                "t={t:>4}ms  -> state {} (lamp {})",
                fsm.current_state(),
                if ctx.lamp { "on" } else { "off" }
            );
        }
        clock.advance_ms(50);
    }
}
