//! Drift package ingestion and the tile manager facade.
//!
//! Responsibilities:
//! - Unpack drift packages into a fixed extraction root.
//! - Rewrite the packaged style descriptor to read the extracted tiles.
//! - Drive the mode controller from ingestion results and publish state.
//!
//! Boundaries:
//! - Mode and pin rules live in `driftpin-core`.
//! - Blocking zip and filesystem work runs on Tokio's blocking pool.
//!
//! Invariants:
//! - Only the newest ingestion may change published state.
//! - No global mutable state; hosts own their [`TileManager`].

pub mod manager;
pub mod package;
pub mod style;
pub mod test_support;

pub use manager::{
    BUILTIN_STREAMING_STYLE, DefaultStyleError, DefaultStyleSource, IngestOutcome, IngestReport,
    InitializationError, TileManager, TileManagerConfig,
};
pub use package::{
    ArchiveIngestor, IngestionError, PACKAGE_EXTENSION, Package, is_drift_location, package_path,
};
pub use style::{StyleArtifact, StyleArtifactBuilder};
