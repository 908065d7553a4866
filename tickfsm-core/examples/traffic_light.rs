//! Three-way traffic light cycled by timed transitions.
//!
//! Run with: `cargo run --example traffic_light --features std`

use tickfsm_core::{Machine, State, StdClock, Transition};

const RED: usize = 0;
const GREEN: usize = 1;
const YELLOW: usize = 2;

#[derive(Default)]
struct Intersection {
    cycles: u32,
}

fn red(ctx: &mut Intersection, just_entered: bool) {
    if just_entered {
        ctx.cycles += 1;
        println!("RED    (cycle {})", ctx.cycles);
    }
}

fn green(_ctx: &mut Intersection, just_entered: bool) {
    if just_entered {
        println!("GREEN");
    }
}

fn yellow(_ctx: &mut Intersection, just_entered: bool) {
    if just_entered {
        println!("YELLOW");
    }
}

fn main() {
    let states = [
        State::new(red, &[Transition::after_ms(800, GREEN)]).unwrap(),
        State::new(green, &[Transition::after_ms(600, YELLOW)]).unwrap(),
        State::new(yellow, &[Transition::after_ms(300, RED)]).unwrap(),
    ];
    let mut fsm: Machine<Intersection, _, 3, 1> =
        Machine::new(&states, RED, StdClock::new()).unwrap();

    let mut ctx = Intersection::default();
    while ctx.cycles <= 3 {
        fsm.tick(&mut ctx);
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
