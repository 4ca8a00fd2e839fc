use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Errors raised while turning a drift package into an active style.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestionError {
    /// The package location could not be opened.
    #[error("cannot open drift package {location:?}: {source}")]
    Unreadable {
        /// Location as supplied by the caller.
        location: String,
        /// Underlying failure.
        source: io::Error,
    },
    /// Resetting the extraction root or unpacking the archive failed.
    #[error("failed to extract drift package into {root}: {source}")]
    ExtractionFailed {
        /// Extraction root being written.
        root: Utf8PathBuf,
        /// Underlying archive or storage failure.
        source: ZipError,
    },
    /// The package carried no style descriptor.
    #[error("drift package has no style descriptor at {path}")]
    MissingStyle {
        /// Expected descriptor location.
        path: Utf8PathBuf,
    },
    /// The style descriptor exists but could not be read.
    #[error("failed to read style descriptor {path}: {source}")]
    ReadStyle {
        /// Descriptor location.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// The style descriptor is not a JSON object.
    #[error("style descriptor {path} is malformed: {source}")]
    MalformedStyle {
        /// Descriptor location.
        path: Utf8PathBuf,
        /// Parse failure.
        source: serde_json::Error,
    },
    /// Writing the rewritten descriptor failed.
    #[error("failed to write style descriptor {path}: {source}")]
    WriteStyle {
        /// Descriptor location.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
}

impl IngestionError {
    pub(crate) fn extraction(root: &camino::Utf8Path, source: impl Into<ZipError>) -> Self {
        Self::ExtractionFailed {
            root: root.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn unreadable(location: &str, source: io::Error) -> Self {
        Self::Unreadable {
            location: location.to_owned(),
            source,
        }
    }
}
