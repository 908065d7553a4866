//! A state pairs one action with its ordered outgoing transitions.

use heapless::Vec;

use crate::error::BuildError;
use crate::transition::Transition;

/// Action run on every tick its state is current.
///
/// `just_entered` is `true` only on the tick in which the state was
/// entered (including the machine's first tick), so one-time entry work
/// can sit at the top of the action without extra bookkeeping in the
/// caller's context.
pub type Action<C> = fn(ctx: &mut C, just_entered: bool);

/// One state of a machine: an action plus an ordered transition list.
///
/// The transition order is semantically significant: the machine scans
/// the list front to back each tick and the first transition whose guard
/// holds wins. `T` is the per-state transition capacity.
pub struct State<C, const T: usize> {
    action: Action<C>,
    transitions: Vec<Transition<C>, T>,
}

impl<C, const T: usize> State<C, T> {
    /// Builds a state from its action and outgoing transitions.
    ///
    /// # Errors
    /// Returns [`BuildError::TooManyTransitions`] if `transitions` holds
    /// more than `T` entries.
    pub fn new(action: Action<C>, transitions: &[Transition<C>]) -> Result<Self, BuildError> {
        let transitions =
            Vec::from_slice(transitions).map_err(|()| BuildError::TooManyTransitions)?;
        Ok(Self {
            action,
            transitions,
        })
    }

    /// A state with no outgoing transitions.
    ///
    /// Terminal states are legal: the action still runs every tick and
    /// the machine simply never leaves.
    #[must_use]
    pub fn terminal(action: Action<C>) -> Self {
        Self {
            action,
            transitions: Vec::new(),
        }
    }

    /// The outgoing transitions in evaluation order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition<C>] {
        &self.transitions
    }

    /// Number of outgoing transitions.
    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Marks this state as having just become current.
    ///
    /// Rearms every timed transition so their timeouts measure from this
    /// entry, not from program start or a previous visit. The machine
    /// calls this exactly once per entry, before any of this state's
    /// guards are evaluated.
    pub(crate) fn activate(&mut self) {
        for transition in &mut self.transitions {
            transition.rearm();
        }
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut [Transition<C>] {
        &mut self.transitions
    }

    pub(crate) fn run_action(&self, ctx: &mut C, just_entered: bool) {
        (self.action)(ctx, just_entered);
    }
}

impl<C, const T: usize> core::fmt::Debug for State<C, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("State")
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

impl<C, const T: usize> Clone for State<C, T> {
    fn clone(&self) -> Self {
        Self {
            action: self.action,
            transitions: self.transitions.clone(),
        }
    }
}
