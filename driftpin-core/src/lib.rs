//! Core domain types for driftpin.
//!
//! This crate holds the parts of the system that never touch the
//! filesystem: coordinates, pins and the actions that mutate them, the
//! action-sourced [`PinStore`], and the [`ModeController`] deciding whether
//! the map draws the bundled default style or one derived from an extracted
//! drift package.
//!
//! # Examples
//!
//! ```
//! use driftpin_core::{Coordinates, PinPatch, PinStore};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # runtime.block_on(async {
//! let store = PinStore::spawn();
//! store.set_pending_pin(Coordinates::new(2.35, 48.85)).await?;
//! store
//!     .finalize_pending_pin(PinPatch::with_content("🥐", "breakfast"))
//!     .await?;
//! assert_eq!(store.snapshot().pins().len(), 1);
//! # Ok::<(), driftpin_core::StateError>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod action;
pub mod camera;
pub mod coords;
pub mod mode;
pub mod pin;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use action::{PinAction, PinActionKind, RawPinAction, now_millis};
pub use camera::{CameraAnimation, CameraPreset};
pub use coords::{CenterCoordinate, Coordinates, DEFAULT_CENTER};
pub use mode::{
    DefaultStyle, MapMode, ModeController, ModeError, PackageStyle, StyleReference, StyleSource,
};
pub use pin::{DEFAULT_PIN_EMOJI, PENDING_PIN_ID, PendingPin, Pin, PinId, PinPatch};
pub use store::{Applied, NoOpReason, PinExport, PinState, PinStore, StateError};
