//! Incoming package locations.
//!
//! Deep links hand over either a plain path or a `file://`/`content://` URI.
//! Both are reduced to a local path before extraction.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use super::IngestionError;

/// File extension identifying drift packages.
pub const PACKAGE_EXTENSION: &str = "drift";

const URI_SCHEMES: [&str; 2] = ["file://", "content://"];

/// Reduce a URI or path to the local archive path.
///
/// # Errors
///
/// Returns [`IngestionError::Unreadable`] when nothing remains once
/// whitespace and the scheme are removed.
///
/// # Examples
///
/// ```
/// use driftpin_data::package_path;
///
/// # fn main() -> Result<(), driftpin_data::IngestionError> {
/// assert_eq!(package_path("file:///sdcard/trip.drift")?, "/sdcard/trip.drift");
/// assert_eq!(package_path("/sdcard/trip.drift")?, "/sdcard/trip.drift");
/// # Ok(())
/// # }
/// ```
pub fn package_path(location: &str) -> Result<Utf8PathBuf, IngestionError> {
    let trimmed = location.trim();
    let path = URI_SCHEMES
        .iter()
        .find_map(|scheme| trimmed.strip_prefix(scheme))
        .unwrap_or(trimmed);
    if path.is_empty() {
        return Err(IngestionError::unreadable(
            location,
            io::Error::new(io::ErrorKind::InvalidInput, "empty package location"),
        ));
    }
    Ok(Utf8PathBuf::from(path))
}

/// Whether `location` names a drift package, ignoring case.
#[must_use]
pub fn is_drift_location(location: &str) -> bool {
    Utf8Path::new(location.trim())
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(PACKAGE_EXTENSION))
}
