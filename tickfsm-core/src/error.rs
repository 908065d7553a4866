//! Setup-time validation errors.
//!
//! The per-tick path has no error channel at all: a guard that never
//! fires is normal operation, not a failure. Everything that can go
//! wrong is a configuration mistake, caught once while the state table
//! is assembled.

/// Error raised while assembling a state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The machine was given no states at all.
    EmptyStateTable,
    /// More states than the machine's `N` capacity.
    TooManyStates,
    /// More transitions than the state's `T` capacity.
    TooManyTransitions,
    /// The initial state index points past the end of the state table.
    InitialStateOutOfRange,
    /// A transition targets a state index past the end of the state table.
    TargetOutOfRange,
}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuildError::EmptyStateTable => write!(f, "state table is empty"),
            BuildError::TooManyStates => write!(f, "state table exceeds the machine's capacity"),
            BuildError::TooManyTransitions => {
                write!(f, "transition list exceeds the state's capacity")
            }
            BuildError::InitialStateOutOfRange => {
                write!(f, "initial state index is out of range")
            }
            BuildError::TargetOutOfRange => {
                write!(f, "transition target index is out of range")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}
