//! Facade crate for the driftpin map engine.
//!
//! This crate re-exports the pin store and mode types and, behind the
//! `packages` feature, drift package ingestion and the tile manager.

#![forbid(unsafe_code)]

pub use driftpin_core::{
    Applied, CameraAnimation, CameraPreset, CenterCoordinate, Coordinates, DEFAULT_CENTER,
    DEFAULT_PIN_EMOJI, DefaultStyle, MapMode, ModeController, ModeError, NoOpReason, PENDING_PIN_ID,
    PackageStyle, PendingPin, Pin, PinAction, PinActionKind, PinExport, PinId, PinPatch, PinState, PinStore,
    RawPinAction, StateError, StyleReference, StyleSource, now_millis,
};

#[cfg(feature = "packages")]
pub use driftpin_data::{
    ArchiveIngestor, BUILTIN_STREAMING_STYLE, DefaultStyleError, DefaultStyleSource, IngestOutcome,
    IngestReport, IngestionError, InitializationError, PACKAGE_EXTENSION, Package, StyleArtifact,
    StyleArtifactBuilder, TileManager, TileManagerConfig, is_drift_location, package_path,
};
