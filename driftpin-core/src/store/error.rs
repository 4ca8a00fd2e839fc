use std::fmt;

use thiserror::Error;

use crate::PinId;

/// Why a dispatch left the pin collection untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoOpReason {
    /// The action needs a pending pin and none exists.
    NoPendingPin,
    /// No finalised pin carries the requested id.
    UnknownPin(PinId),
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPendingPin => f.write_str("no pending pin"),
            Self::UnknownPin(id) => write!(f, "no pin with id {id}"),
        }
    }
}

/// Errors reported by pin dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The action kind is unknown or its payload does not fit the kind.
    #[error("invalid {kind} dispatch: {reason}")]
    InvalidDispatch {
        /// Kind named by the action.
        kind: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The action is a no-op by invariant; state and log are unchanged.
    #[error("{kind} had no effect: {reason}")]
    NoOpDispatch {
        /// Kind of the ignored action.
        kind: &'static str,
        /// Why nothing changed.
        reason: NoOpReason,
    },
    /// The store's reducer task is no longer running.
    #[error("pin store is closed")]
    StoreClosed,
}

impl StateError {
    /// Whether this outcome is a benign no-op rather than a failure.
    #[must_use]
    pub const fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOpDispatch { .. })
    }
}
