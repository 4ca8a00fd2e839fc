//! Action-sourced pin collection.
//!
//! [`PinState`] is the pure reducer: it owns the finalised pins, the single
//! pending-pin slot and the append-only action log. [`PinStore`] wraps it in a
//! reducer task so that concurrent triggers (map taps, sheet dismissals,
//! observers reacting to state) are serialised in arrival order.
//!
//! Reduction rules:
//!
//! - `SET_PENDING_PIN` replaces the pending slot; at most one pending pin
//!   exists.
//! - `UPDATE_PENDING_PIN` merges a patch into the pending pin.
//! - `FINALIZE_PENDING_PIN` merges a patch, mints a fresh id and moves the
//!   pin into the finalised collection.
//! - `CLEAR_PENDING_PIN` empties the pending slot.
//! - `DELETE_PIN` removes a finalised pin by id.
//!
//! Actions that cannot change anything are reported as
//! [`StateError::NoOpDispatch`] and are not logged.

mod error;
mod handle;
mod state;

pub use error::{NoOpReason, StateError};
pub use handle::PinStore;
pub use state::{Applied, PinExport, PinState};
