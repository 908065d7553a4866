#![cfg_attr(not(feature = "std"), no_std)]

//! # tickfsm
//!
//! A minimal polled finite-state-machine kernel for resource-constrained
//! embedded controllers. Declare a fixed set of states, each pairing an
//! action with an ordered list of outgoing transitions (event-guarded or
//! time-guarded), then call [`Machine::tick`] from your main loop: each
//! tick applies at most the first matching transition, then runs the
//! current state's action.
//!
//! The kernel is `no_std` by default, allocation-free (capacities are
//! const generics backed by `heapless`), and takes its notion of time
//! from an injected [`Clock`], so machines are fully deterministic under
//! test.
//!
//! ```
//! use core::cell::Cell;
//! use tickfsm_core::{Machine, ManualClock, State, Transition};
//!
//! const IDLE: usize = 0;
//! const LIT: usize = 1;
//!
//! #[derive(Default)]
//! struct Ctx {
//!     button: bool,
//!     led: bool,
//! }
//!
//! fn idle(ctx: &mut Ctx, _just_entered: bool) {
//!     ctx.led = false;
//! }
//!
//! fn lit(ctx: &mut Ctx, just_entered: bool) {
//!     if just_entered {
//!         ctx.led = true;
//!     }
//! }
//!
//! fn button_pressed(ctx: &Ctx) -> bool {
//!     ctx.button
//! }
//!
//! let now = Cell::new(0);
//! let clock = ManualClock::new(&now);
//!
//! let states = [
//!     State::new(idle, &[Transition::on(button_pressed, LIT)]).unwrap(),
//!     // Light up for half a second, then fall back to idle.
//!     State::new(lit, &[Transition::after_ms(500, IDLE)]).unwrap(),
//! ];
//! let mut fsm: Machine<Ctx, _, 2, 1> = Machine::new(&states, IDLE, clock).unwrap();
//!
//! let mut ctx = Ctx::default();
//! fsm.tick(&mut ctx);
//! assert!(!ctx.led);
//!
//! ctx.button = true;
//! fsm.tick(&mut ctx); // enters LIT and runs its action in the same tick
//! assert!(ctx.led);
//!
//! ctx.button = false;
//! fsm.tick(&mut ctx); // the countdown baseline is captured on this tick
//! clock.advance_ms(500);
//! fsm.tick(&mut ctx); // timeout elapsed, back to IDLE
//! assert!(!ctx.led);
//! ```

pub mod clock;
pub mod error;
pub mod machine;
pub mod state;
pub mod transition;

#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{Clock, ManualClock};
pub use error::BuildError;
pub use machine::Machine;
pub use state::{Action, State};
pub use transition::{Predicate, Transition};
