//! Drift package ingestion.
//!
//! A drift package is a zip archive laid out as:
//!
//! ```text
//! tiles/
//!   style.json
//!   data/{z}/{x}/{y}.pbf
//! ```
//!
//! [`ArchiveIngestor`] unpacks it into a fixed extraction root and returns
//! the [`Package`] paths for the style builder.

mod error;
mod extract;
mod layout;
mod location;

pub use error::IngestionError;
pub use extract::ArchiveIngestor;
pub use layout::{DATA_DIR, Package, STYLE_FILE, TILES_DIR};
pub use location::{PACKAGE_EXTENSION, is_drift_location, package_path};

#[cfg(test)]
mod tests;
