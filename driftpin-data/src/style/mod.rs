//! Style descriptor rewriting.
//!
//! A package's `style.json` points at whatever tile sources it was authored
//! against. [`StyleArtifactBuilder`] replaces them with a single
//! `custom-tiles` vector source reading the extracted tiles from disk, and
//! reports the camera centre recorded in `metadata.centerCoordinate`.

use camino::{Utf8Path, Utf8PathBuf};
use driftpin_core::{CenterCoordinate, PackageStyle};
use log::debug;
use serde::de::Error as _;
use serde_json::{Map, Value, json};

use crate::{IngestionError, Package};

/// Name of the synthesised tile source.
pub const CUSTOM_TILES_SOURCE: &str = "custom-tiles";
/// Lowest zoom served from the package.
pub const MIN_ZOOM: u8 = 5;
/// Highest zoom served from the package.
pub const MAX_ZOOM: u8 = 14;
/// Zoom hint carried alongside the bounds.
pub const ZOOM_HINT: u8 = 9;

/// Result of rewriting a package's style descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleArtifact {
    /// Location of the rewritten descriptor.
    pub style_path: Utf8PathBuf,
    /// Directory the synthesised source reads tiles from.
    pub tiles_path: Utf8PathBuf,
    /// Camera centre from the descriptor, or the fallback.
    pub center: CenterCoordinate,
}

impl StyleArtifact {
    /// `file://` URL of the descriptor.
    #[must_use]
    pub fn style_url(&self) -> String {
        format!("file://{}", self.style_path)
    }

    /// The artifact as the mode controller commits it.
    #[must_use]
    pub fn into_package_style(self) -> PackageStyle {
        PackageStyle {
            style_url: self.style_url(),
            tiles_path: self.tiles_path,
            center: self.center,
        }
    }
}

/// Rewrites an extracted package's style descriptor in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleArtifactBuilder;

impl StyleArtifactBuilder {
    /// Construct a builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rewrite `package`'s descriptor and return its location and centre.
    ///
    /// Running the builder twice on the same package yields the same
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::MissingStyle`] when the descriptor is
    /// absent, [`IngestionError::MalformedStyle`] when it is not a JSON
    /// object, and [`IngestionError::ReadStyle`] or
    /// [`IngestionError::WriteStyle`] on I/O failure.
    pub async fn build(&self, package: &Package) -> Result<StyleArtifact, IngestionError> {
        let style_path = package.style_path().to_path_buf();
        let tiles_path = package.tiles_path().to_path_buf();
        tokio::task::spawn_blocking(move || build_blocking(style_path, tiles_path))
            .await
            .map_err(|err| IngestionError::ReadStyle {
                path: package.style_path().to_path_buf(),
                source: std::io::Error::other(err),
            })?
    }
}

fn build_blocking(
    style_path: Utf8PathBuf,
    tiles_path: Utf8PathBuf,
) -> Result<StyleArtifact, IngestionError> {
    let present = driftpin_fs::file_is_file(&style_path).map_err(|source| {
        IngestionError::ReadStyle {
            path: style_path.clone(),
            source,
        }
    })?;
    if !present {
        return Err(IngestionError::MissingStyle { path: style_path });
    }
    let text = driftpin_fs::read_utf8(&style_path).map_err(|source| IngestionError::ReadStyle {
        path: style_path.clone(),
        source,
    })?;
    let mut descriptor = parse_descriptor(&text).map_err(|source| {
        IngestionError::MalformedStyle {
            path: style_path.clone(),
            source,
        }
    })?;

    let center = rewrite_descriptor(&mut descriptor, &tiles_path);
    let rendered = serde_json::to_string_pretty(&Value::Object(descriptor)).map_err(|err| {
        IngestionError::WriteStyle {
            path: style_path.clone(),
            source: std::io::Error::other(err),
        }
    })?;
    driftpin_fs::write_utf8(&style_path, &rendered).map_err(|source| {
        IngestionError::WriteStyle {
            path: style_path.clone(),
            source,
        }
    })?;
    debug!("rewrote {style_path} to read tiles from {tiles_path}");

    Ok(StyleArtifact {
        style_path,
        tiles_path,
        center,
    })
}

/// Parse a style descriptor, requiring a top-level JSON object.
///
/// # Errors
///
/// Returns the parse failure, or a custom error when the document is valid
/// JSON of another type.
pub fn parse_descriptor(text: &str) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::from_str(text)? {
        Value::Object(descriptor) => Ok(descriptor),
        _ => Err(serde_json::Error::custom(
            "style descriptor must be a JSON object",
        )),
    }
}

/// Centre recorded in `metadata.centerCoordinate`, if well formed.
#[must_use]
pub fn descriptor_center(descriptor: &Map<String, Value>) -> Option<CenterCoordinate> {
    descriptor
        .get("metadata")
        .and_then(|metadata| metadata.get("centerCoordinate"))
        .and_then(CenterCoordinate::from_json)
}

/// Replace `sources` with the `custom-tiles` block and return the centre.
///
/// Every other top-level key is left untouched.
pub fn rewrite_descriptor(
    descriptor: &mut Map<String, Value>,
    tiles_path: &Utf8Path,
) -> CenterCoordinate {
    let center = descriptor_center(descriptor).unwrap_or_default();
    let mut sources = Map::new();
    sources.insert(CUSTOM_TILES_SOURCE.to_owned(), tile_source(tiles_path));
    descriptor.insert("sources".to_owned(), Value::Object(sources));
    center
}

/// The synthesised vector source reading `{z}/{x}/{y}.pbf` under
/// `tiles_path`.
#[must_use]
pub fn tile_source(tiles_path: &Utf8Path) -> Value {
    json!({
        "type": "vector",
        "tiles": [format!("file://{tiles_path}/{{z}}/{{x}}/{{y}}.pbf")],
        "zoomlevel": ZOOM_HINT,
        "maxzoom": MAX_ZOOM,
        "minzoom": MIN_ZOOM,
    })
}

#[cfg(test)]
mod tests;
