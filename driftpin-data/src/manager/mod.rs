//! Tile manager facade.
//!
//! [`TileManager`] composes extraction, style rewriting and the mode
//! controller behind the query surface the map UI consumes. Published state
//! lives in a `watch` channel so readers always see one complete
//! [`ModeController`] and every transition is broadcast exactly once.
//!
//! Concurrent ingestions are ordered by a request token taken when each
//! call starts. Only the newest call may change state; older calls that
//! finish later have their results discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use driftpin_core::{
    CameraPreset, CenterCoordinate, DefaultStyle, MapMode, ModeController, ModeError,
    StyleReference,
};
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::{Mutex, watch};

mod config;

pub use config::{
    BUILTIN_STREAMING_STYLE, DefaultStyleError, DefaultStyleSource, TileManagerConfig,
};

use crate::{
    ArchiveIngestor, IngestionError, StyleArtifact, StyleArtifactBuilder, is_drift_location,
    package_path,
};

/// What became of an ingestion that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The package is now the active style.
    Committed(IngestReport),
    /// A newer ingestion started first; this result was discarded.
    Superseded,
}

/// State committed by a successful ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Style reference now published.
    pub style: StyleReference,
    /// Directory holding the extracted tiles.
    pub tiles_path: Utf8PathBuf,
    /// Camera centre read from the package.
    pub center: CenterCoordinate,
    /// Number of archive entries unpacked.
    pub entries: usize,
}

/// Errors raised by [`TileManager::initialize`].
#[derive(Debug, Error)]
pub enum InitializationError {
    /// The configured default style could not be loaded.
    #[error(transparent)]
    DefaultStyle(#[from] DefaultStyleError),
    /// The bundled package failed to ingest.
    #[error("failed to ingest bundled package: {0}")]
    BundledPackage(#[from] IngestionError),
    /// The blocking task loading the default style did not complete.
    #[error("default style loader stopped: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// Owned facade over package ingestion and mode state.
///
/// Share it behind an `Arc` when several tasks deliver packages.
#[derive(Debug)]
pub struct TileManager {
    default_style: DefaultStyleSource,
    bundled_package: Option<Utf8PathBuf>,
    ingestor: ArchiveIngestor,
    builder: StyleArtifactBuilder,
    latest: AtomicU64,
    ingest_lock: Mutex<()>,
    init_lock: Mutex<()>,
    initialized: AtomicBool,
    state: watch::Sender<ModeController>,
}

impl TileManager {
    /// Build a manager in streaming mode on the built-in style.
    ///
    /// Call [`TileManager::initialize`] to load the configured default style
    /// and bundled package.
    #[must_use]
    pub fn new(config: TileManagerConfig) -> Self {
        let TileManagerConfig {
            extraction_root,
            default_style,
            bundled_package,
        } = config;
        let (state, _) = watch::channel(ModeController::new(DefaultStyle::inline(
            BUILTIN_STREAMING_STYLE,
        )));
        Self {
            default_style,
            bundled_package,
            ingestor: ArchiveIngestor::new(extraction_root),
            builder: StyleArtifactBuilder::new(),
            latest: AtomicU64::new(0),
            ingest_lock: Mutex::new(()),
            init_lock: Mutex::new(()),
            initialized: AtomicBool::new(false),
            state,
        }
    }

    /// Load the default style and ingest the bundled package, once.
    ///
    /// Later calls after a success return `Ok(None)` without doing anything.
    /// Concurrent calls are serialised, so only one of them does the work.
    /// The manager stays queryable whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::DefaultStyle`] when the default style
    /// cannot be loaded (the built-in style stays active) and
    /// [`InitializationError::BundledPackage`] when the bundled package fails
    /// to ingest (the manager is left streaming).
    pub async fn initialize(&self) -> Result<Option<IngestOutcome>, InitializationError> {
        let _guard = self.init_lock.lock().await;
        if self.initialized.load(Ordering::Acquire) {
            debug!("tile manager already initialised");
            return Ok(None);
        }
        let source = self.default_style.clone();
        let default = tokio::task::spawn_blocking(move || source.load()).await??;
        self.state
            .send_if_modified(|controller| controller.replace_default(default));

        let outcome = match &self.bundled_package {
            Some(package) => Some(self.handle_incoming_package(package.as_str()).await?),
            None => None,
        };
        self.initialized.store(true, Ordering::Release);
        info!("tile manager initialised in {} mode", self.mode());
        Ok(outcome)
    }

    /// Ingest a package delivered as a path or `file://`/`content://` URI.
    ///
    /// Extraction, style rewriting and the mode transition run as one unit.
    /// On failure the manager falls back to streaming before returning,
    /// unless a newer call has started in the meantime.
    ///
    /// # Errors
    ///
    /// Returns the [`IngestionError`] that stopped the ingestion.
    pub async fn handle_incoming_package(
        &self,
        location: &str,
    ) -> Result<IngestOutcome, IngestionError> {
        let token = self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        let _guard = self.ingest_lock.lock().await;
        if !self.is_latest(token) {
            warn!("skipping superseded package {location}");
            return Ok(IngestOutcome::Superseded);
        }
        match self.ingest(location).await {
            Ok((artifact, entries)) => Ok(self.commit(token, artifact, entries)),
            Err(err) => {
                self.revert(token, &err);
                Err(err)
            }
        }
    }

    /// Ingest a launch URI when it names a drift package and the manager is
    /// still streaming.
    ///
    /// Returns `None` when the URI is ignored.
    pub async fn handle_initial_uri(
        &self,
        uri: &str,
    ) -> Option<Result<IngestOutcome, IngestionError>> {
        if self.mode() != MapMode::Streaming {
            debug!("ignoring launch uri {uri}: a package is already open");
            return None;
        }
        if !is_drift_location(uri) {
            debug!("ignoring launch uri {uri}: not a drift package");
            return None;
        }
        Some(self.handle_incoming_package(uri).await)
    }

    /// Apply an explicit mode override.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::NoActivePackage`] when reading mode is requested
    /// before any package has been ingested.
    pub fn set_mode(&self, mode: MapMode) -> Result<(), ModeError> {
        let mut outcome = Ok(false);
        self.state.send_if_modified(|controller| {
            outcome = controller.set_mode(mode);
            matches!(outcome, Ok(true))
        });
        if outcome? {
            info!("switched to {mode} mode");
        }
        Ok(())
    }

    /// Style the renderer should load.
    #[must_use]
    pub fn style_reference(&self) -> StyleReference {
        self.state.borrow().style_reference()
    }

    /// Extracted tile directory; `None` while streaming.
    #[must_use]
    pub fn tile_path(&self) -> Option<Utf8PathBuf> {
        self.state.borrow().tile_path().map(Utf8Path::to_path_buf)
    }

    /// Camera centre for the active style.
    #[must_use]
    pub fn center(&self) -> CenterCoordinate {
        self.state.borrow().center()
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> MapMode {
        self.state.borrow().mode()
    }

    /// Camera framing for the current mode and centre.
    #[must_use]
    pub fn camera(&self) -> CameraPreset {
        let state = self.state.borrow();
        CameraPreset::for_mode(state.mode(), state.center())
    }

    /// Copy of the published state.
    #[must_use]
    pub fn snapshot(&self) -> ModeController {
        self.state.borrow().clone()
    }

    /// Receive every published transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ModeController> {
        self.state.subscribe()
    }

    /// Directory packages are extracted into.
    #[must_use]
    pub fn extraction_root(&self) -> &Utf8Path {
        self.ingestor.root()
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest.load(Ordering::Acquire) == token
    }

    async fn ingest(&self, location: &str) -> Result<(StyleArtifact, usize), IngestionError> {
        let archive = package_path(location)?;
        debug!("ingesting drift package {archive}");
        let package = self.ingestor.extract(&archive).await?;
        let artifact = self.builder.build(&package).await?;
        Ok((artifact, package.entries()))
    }

    fn commit(&self, token: u64, artifact: StyleArtifact, entries: usize) -> IngestOutcome {
        let mut report = None;
        self.state.send_if_modified(|controller| {
            if !self.is_latest(token) {
                return false;
            }
            let tiles_path = artifact.tiles_path.clone();
            let center = artifact.center;
            controller.commit(artifact.into_package_style());
            report = Some(IngestReport {
                style: controller.style_reference(),
                tiles_path,
                center,
                entries,
            });
            true
        });
        match report {
            Some(committed) => {
                info!(
                    "entered reading mode on {} (style version {})",
                    committed.tiles_path, committed.style.version
                );
                IngestOutcome::Committed(committed)
            }
            None => {
                warn!("discarding superseded package result");
                IngestOutcome::Superseded
            }
        }
    }

    fn revert(&self, token: u64, err: &IngestionError) {
        let mut current = false;
        let reverted = self.state.send_if_modified(|controller| {
            current = self.is_latest(token);
            current && controller.revert()
        });
        if reverted {
            warn!("reverted to streaming mode: {err}");
        } else if current {
            warn!("package ingestion failed: {err}");
        } else {
            warn!("superseded package ingestion failed: {err}");
        }
    }
}
