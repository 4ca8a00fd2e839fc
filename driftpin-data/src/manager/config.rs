use camino::{Utf8Path, Utf8PathBuf};
use driftpin_core::DefaultStyle;
use serde::{Deserialize, Serialize};

use crate::style::{descriptor_center, parse_descriptor};

/// Streaming style used when no default style is configured.
pub const BUILTIN_STREAMING_STYLE: &str = r#"{"version":8,"name":"driftpin streaming","sources":{"osm":{"type":"raster","tiles":["https://tile.openstreetmap.org/{z}/{x}/{y}.png"],"tileSize":256,"attribution":"© OpenStreetMap contributors"}},"layers":[{"id":"osm","type":"raster","source":"osm"}]}"#;

/// Where the streaming-mode style comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultStyleSource {
    /// Inline style descriptor.
    Inline(String),
    /// Style descriptor read from disk at initialisation.
    File(Utf8PathBuf),
}

impl Default for DefaultStyleSource {
    fn default() -> Self {
        Self::Inline(BUILTIN_STREAMING_STYLE.to_owned())
    }
}

/// Errors raised while loading the default style.
#[derive(Debug, thiserror::Error)]
pub enum DefaultStyleError {
    /// The style file could not be read.
    #[error("failed to read default style {path}: {source}")]
    Read {
        /// Style file location.
        path: Utf8PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },
    /// The style is not a JSON object.
    #[error("default style is malformed: {source}")]
    Malformed {
        /// Parse failure.
        source: serde_json::Error,
    },
}

impl DefaultStyleSource {
    /// Load and validate the style.
    ///
    /// The camera centre is read from `metadata.centerCoordinate` like a
    /// package style, falling back to the default centre.
    ///
    /// # Errors
    ///
    /// Returns [`DefaultStyleError`] when the file cannot be read or the
    /// document is not a JSON object.
    pub fn load(&self) -> Result<DefaultStyle, DefaultStyleError> {
        let json = match self {
            Self::Inline(json) => json.clone(),
            Self::File(path) => read_style(path)?,
        };
        let descriptor =
            parse_descriptor(&json).map_err(|source| DefaultStyleError::Malformed { source })?;
        Ok(DefaultStyle {
            center: descriptor_center(&descriptor).unwrap_or_default(),
            json,
        })
    }
}

fn read_style(path: &Utf8Path) -> Result<String, DefaultStyleError> {
    driftpin_fs::read_utf8(path).map_err(|source| DefaultStyleError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings for a [`TileManager`](crate::TileManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileManagerConfig {
    /// Directory every package is extracted into. Wiped on each ingestion.
    pub extraction_root: Utf8PathBuf,
    /// Style used in streaming mode.
    #[serde(default)]
    pub default_style: DefaultStyleSource,
    /// Package ingested once by `initialize`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundled_package: Option<Utf8PathBuf>,
}

impl TileManagerConfig {
    /// Configuration extracting into `extraction_root` with the built-in
    /// streaming style and no bundled package.
    #[must_use]
    pub fn new(extraction_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            extraction_root: extraction_root.into(),
            default_style: DefaultStyleSource::default(),
            bundled_package: None,
        }
    }

    /// Use `source` as the streaming style.
    #[must_use]
    pub fn with_default_style(mut self, source: DefaultStyleSource) -> Self {
        self.default_style = source;
        self
    }

    /// Ingest `package` during initialisation.
    #[must_use]
    pub fn with_bundled_package(mut self, package: impl Into<Utf8PathBuf>) -> Self {
        self.bundled_package = Some(package.into());
        self
    }
}
