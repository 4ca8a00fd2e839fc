//! Load command implementation for the driftpin CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use driftpin_core::{CameraPreset, CenterCoordinate, MapMode, StyleReference};
use driftpin_data::{
    DefaultStyleSource, IngestOutcome, TileManager, TileManagerConfig, package_path,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_LOAD_DEFAULT_STYLE, ARG_LOAD_EXTRACTION_ROOT, ARG_LOAD_PACKAGE, CliError,
    ENV_LOAD_EXTRACTION_ROOT, ENV_LOAD_PACKAGE, require_existing,
};

/// CLI arguments for the `load` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Extract a drift package into the extraction root, rewrite \
                 its style to read the local tiles and print the resulting \
                 map state as JSON. Paths can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Load a drift package"
)]
#[ortho_config(prefix = "DRIFTPIN")]
pub(crate) struct LoadArgs {
    /// Path, `file://` or `content://` URI of the `.drift` package.
    #[arg(long = ARG_LOAD_PACKAGE, value_name = "path")]
    #[serde(default)]
    pub(crate) package: Option<Utf8PathBuf>,
    /// Directory the package is extracted into. Its contents are replaced.
    #[arg(long = ARG_LOAD_EXTRACTION_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) extraction_root: Option<Utf8PathBuf>,
    /// Style descriptor used in streaming mode.
    #[arg(long = ARG_LOAD_DEFAULT_STYLE, value_name = "path")]
    #[serde(default)]
    pub(crate) default_style: Option<Utf8PathBuf>,
}

impl LoadArgs {
    pub(crate) fn into_config(self) -> Result<LoadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LoadConfig::try_from(merged)
    }
}

/// Resolved `load` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadConfig {
    pub(crate) package: Utf8PathBuf,
    pub(crate) extraction_root: Utf8PathBuf,
    pub(crate) default_style: Option<Utf8PathBuf>,
}

impl LoadConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let package = package_path(self.package.as_str())?;
        require_existing(&package, ARG_LOAD_PACKAGE)?;
        if let Some(style) = &self.default_style {
            require_existing(style, ARG_LOAD_DEFAULT_STYLE)?;
        }
        Ok(())
    }

    fn manager_config(&self) -> TileManagerConfig {
        let config = TileManagerConfig::new(self.extraction_root.clone());
        match &self.default_style {
            Some(style) => config.with_default_style(DefaultStyleSource::File(style.clone())),
            None => config,
        }
    }
}

impl TryFrom<LoadArgs> for LoadConfig {
    type Error = CliError;

    fn try_from(args: LoadArgs) -> Result<Self, Self::Error> {
        let package = args.package.ok_or(CliError::MissingArgument {
            field: ARG_LOAD_PACKAGE,
            env: ENV_LOAD_PACKAGE,
        })?;
        let extraction_root = args.extraction_root.ok_or(CliError::MissingArgument {
            field: ARG_LOAD_EXTRACTION_ROOT,
            env: ENV_LOAD_EXTRACTION_ROOT,
        })?;
        Ok(Self {
            package,
            extraction_root,
            default_style: args.default_style,
        })
    }
}

/// Map state printed after a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoadSummary {
    pub(crate) mode: MapMode,
    pub(crate) style: StyleReference,
    pub(crate) tile_path: Option<Utf8PathBuf>,
    pub(crate) center: CenterCoordinate,
    pub(crate) camera: CameraPreset,
    pub(crate) entries: Option<usize>,
}

impl LoadSummary {
    fn capture(manager: &TileManager, entries: Option<usize>) -> Self {
        Self {
            mode: manager.mode(),
            style: manager.style_reference(),
            tile_path: manager.tile_path(),
            center: manager.center(),
            camera: manager.camera(),
            entries,
        }
    }
}

/// Initialise a tile manager and ingest the configured package.
pub(crate) async fn load(config: LoadConfig) -> Result<LoadSummary, CliError> {
    let manager = TileManager::new(config.manager_config());
    manager.initialize().await?;
    let entries = match manager
        .handle_incoming_package(config.package.as_str())
        .await?
    {
        IngestOutcome::Committed(report) => Some(report.entries),
        IngestOutcome::Superseded => None,
    };
    info!(
        "loaded {} into {}",
        config.package,
        manager.extraction_root()
    );
    Ok(LoadSummary::capture(&manager, entries))
}
