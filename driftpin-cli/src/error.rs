//! Error types emitted by the driftpin CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use driftpin_core::StateError;
use driftpin_data::{IngestionError, InitializationError};
use thiserror::Error;

/// Errors emitted by the driftpin CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Loading the default style or the bundled package failed.
    #[error(transparent)]
    Initialization(#[from] InitializationError),
    /// The requested package could not be ingested.
    #[error("failed to load package: {0}")]
    Ingestion(#[from] IngestionError),
    /// The pin store stopped while replaying.
    #[error("failed to replay pin actions: {0}")]
    Dispatch(#[from] StateError),
    /// Reading the recorded actions failed.
    #[error("failed to read actions from {path:?}: {source}")]
    ReadActions {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The recorded actions are not a JSON array of pin actions.
    #[error("failed to parse actions in {path:?}: {source}")]
    ParseActions {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Rendering the command result as JSON failed.
    #[error("failed to render output: {0}")]
    RenderOutput(#[source] serde_json::Error),
    /// Writing the command result failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
