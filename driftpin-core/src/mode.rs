//! Streaming/reading mode state machine.
//!
//! The controller owns the answer to "which style is the map drawing right
//! now". In [`MapMode::Streaming`] that is the bundled default style; in
//! [`MapMode::Reading`] it is the style derived from the most recently
//! ingested package. Every visible transition bumps a version token so that
//! renderers reload even when the style location string is unchanged.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CenterCoordinate;

/// Which style source backs the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    /// Bundled default style streamed from remote tile servers.
    #[default]
    Streaming,
    /// Style derived from a locally extracted drift package.
    Reading,
}

impl MapMode {
    /// Lower-case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Reading => "reading",
        }
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a renderer should load its style from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StyleSource {
    /// A `file://` URL to a style descriptor on disk.
    Url(String),
    /// An inline style descriptor.
    Json(String),
}

impl StyleSource {
    /// The URL or inline document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(value) | Self::Json(value) => value,
        }
    }
}

/// Style source tagged with the controller's version token.
///
/// Two references with equal sources but different versions must be treated
/// as different styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleReference {
    /// Where the style lives.
    pub source: StyleSource,
    /// Monotonic token bumped on every visible transition.
    pub version: u64,
}

impl StyleReference {
    /// The URL or inline document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }
}

/// Style produced by a successful package ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageStyle {
    /// `file://` URL of the rewritten style descriptor.
    pub style_url: String,
    /// Directory holding the extracted `{z}/{x}/{y}.pbf` tiles.
    pub tiles_path: Utf8PathBuf,
    /// Camera centre read from the descriptor.
    pub center: CenterCoordinate,
}

/// The bundled style used in streaming mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultStyle {
    /// Inline style descriptor.
    pub json: String,
    /// Camera centre for the default style.
    pub center: CenterCoordinate,
}

impl DefaultStyle {
    /// Wrap an inline descriptor, centred on the fallback coordinate.
    #[must_use]
    pub fn inline(json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            center: CenterCoordinate::default(),
        }
    }
}

impl Default for DefaultStyle {
    fn default() -> Self {
        Self::inline("{}")
    }
}

/// Errors raised by explicit mode overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    /// Reading mode was requested but no package has been ingested.
    #[error("cannot enter reading mode without an active package")]
    NoActivePackage,
}

/// Two-state controller holding the active style, tile path and centre.
///
/// Mutators return `true` when the visible state changed, letting callers
/// publish only real transitions.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use driftpin_core::{CenterCoordinate, DefaultStyle, MapMode, ModeController, PackageStyle};
///
/// let mut controller = ModeController::new(DefaultStyle::inline("{}"));
/// assert_eq!(controller.mode(), MapMode::Streaming);
///
/// controller.commit(PackageStyle {
///     style_url: "file:///data/tiles/style.json".into(),
///     tiles_path: Utf8PathBuf::from("/data/tiles/data"),
///     center: CenterCoordinate::new(2.35, 48.85),
/// });
/// assert_eq!(controller.mode(), MapMode::Reading);
/// assert_eq!(controller.style_reference().version, 1);
///
/// assert!(controller.revert());
/// assert_eq!(controller.tile_path(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModeController {
    default: DefaultStyle,
    active: Option<PackageStyle>,
    version: u64,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(DefaultStyle::default())
    }
}

impl ModeController {
    /// Start in streaming mode on `default`.
    #[must_use]
    pub const fn new(default: DefaultStyle) -> Self {
        Self {
            default,
            active: None,
            version: 0,
        }
    }

    /// Current mode, derived from whether a package is active.
    #[must_use]
    pub const fn mode(&self) -> MapMode {
        if self.active.is_some() {
            MapMode::Reading
        } else {
            MapMode::Streaming
        }
    }

    /// The active package style, if any.
    #[must_use]
    pub const fn active_package(&self) -> Option<&PackageStyle> {
        self.active.as_ref()
    }

    /// The bundled default style.
    #[must_use]
    pub const fn default_style(&self) -> &DefaultStyle {
        &self.default
    }

    /// Current version token.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Style the renderer should load.
    #[must_use]
    pub fn style_reference(&self) -> StyleReference {
        let source = self.active.as_ref().map_or_else(
            || StyleSource::Json(self.default.json.clone()),
            |package| StyleSource::Url(package.style_url.clone()),
        );
        StyleReference {
            source,
            version: self.version,
        }
    }

    /// Extracted tile directory; `None` in streaming mode.
    #[must_use]
    pub fn tile_path(&self) -> Option<&Utf8Path> {
        self.active
            .as_ref()
            .map(|package| package.tiles_path.as_path())
    }

    /// Camera centre for the active style.
    #[must_use]
    pub fn center(&self) -> CenterCoordinate {
        self.active
            .as_ref()
            .map_or(self.default.center, |package| package.center)
    }

    /// Enter (or stay in) reading mode on `package`.
    ///
    /// Style, tile path and centre change together. Always a visible
    /// transition, even when re-committing an identical package, so that
    /// renderers reload freshly rewritten files.
    pub fn commit(&mut self, package: PackageStyle) -> bool {
        self.active = Some(package);
        self.bump();
        true
    }

    /// Fall back to the bundled default style.
    ///
    /// Returns `false` without bumping the version when already streaming.
    pub fn revert(&mut self) -> bool {
        if self.active.take().is_some() {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Apply an explicit mode override.
    ///
    /// `Streaming` behaves like [`ModeController::revert`]. `Reading` is a
    /// no-op when a package is already active.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::NoActivePackage`] when `Reading` is requested
    /// with no package ingested.
    pub fn set_mode(&mut self, mode: MapMode) -> Result<bool, ModeError> {
        match mode {
            MapMode::Streaming => Ok(self.revert()),
            MapMode::Reading if self.active.is_some() => Ok(false),
            MapMode::Reading => Err(ModeError::NoActivePackage),
        }
    }

    /// Swap the bundled default style.
    ///
    /// Visible, and therefore versioned, only while streaming.
    pub fn replace_default(&mut self, default: DefaultStyle) -> bool {
        if self.default == default {
            return false;
        }
        self.default = default;
        if self.active.is_some() {
            false
        } else {
            self.bump();
            true
        }
    }

    const fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
