//! Action builders and a runtime helper shared by unit and behaviour tests.

use std::future::Future;

use crate::{Coordinates, PinAction, PinActionKind, PinId, PinPatch};

/// `SET_PENDING_PIN` at (`longitude`, `latitude`).
#[must_use]
pub const fn tap(longitude: f64, latitude: f64, timestamp: i64) -> PinAction {
    PinAction::new(
        PinActionKind::SetPendingPin(Coordinates::new(longitude, latitude)),
        timestamp,
    )
}

/// `UPDATE_PENDING_PIN` carrying `patch`.
#[must_use]
pub const fn update(patch: PinPatch, timestamp: i64) -> PinAction {
    PinAction::new(PinActionKind::UpdatePendingPin(patch), timestamp)
}

/// `FINALIZE_PENDING_PIN` carrying `patch`.
#[must_use]
pub const fn finalize(patch: PinPatch, timestamp: i64) -> PinAction {
    PinAction::new(PinActionKind::FinalizePendingPin(patch), timestamp)
}

/// `CLEAR_PENDING_PIN`.
#[must_use]
pub const fn clear(timestamp: i64) -> PinAction {
    PinAction::new(PinActionKind::ClearPendingPin, timestamp)
}

/// `DELETE_PIN` targeting `id`.
#[must_use]
pub fn delete(id: &str, timestamp: i64) -> PinAction {
    PinAction::new(PinActionKind::DeletePin(PinId::from(id)), timestamp)
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
#[expect(
    clippy::expect_used,
    reason = "test helper should fail loudly when the runtime cannot start"
)]
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build current-thread runtime")
        .block_on(future)
}
