//! Replay command implementation for the driftpin CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use driftpin_core::{PinExport, PinStore, RawPinAction, StateError};
use log::{debug, info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_REPLAY_ACTIONS, CliError, ENV_REPLAY_ACTIONS};

/// CLI arguments for the `replay` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Dispatch a JSON array of recorded pin actions \
                 ({type, payload, timestamp}) in order against an empty pin \
                 store and print the resulting export. Actions that are \
                 rejected or change nothing are reported and skipped.",
    about = "Replay recorded pin actions"
)]
#[ortho_config(prefix = "DRIFTPIN")]
pub(crate) struct ReplayArgs {
    /// Path to a JSON file holding an array of pin actions.
    #[arg(long = ARG_REPLAY_ACTIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) actions: Option<Utf8PathBuf>,
}

impl ReplayArgs {
    pub(crate) fn into_config(self) -> Result<ReplayConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReplayConfig::try_from(merged)
    }
}

/// Resolved `replay` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplayConfig {
    pub(crate) actions: Utf8PathBuf,
}

impl TryFrom<ReplayArgs> for ReplayConfig {
    type Error = CliError;

    fn try_from(args: ReplayArgs) -> Result<Self, Self::Error> {
        let actions = args.actions.ok_or(CliError::MissingArgument {
            field: ARG_REPLAY_ACTIONS,
            env: ENV_REPLAY_ACTIONS,
        })?;
        Ok(Self { actions })
    }
}

fn read_actions(config: &ReplayConfig) -> Result<Vec<RawPinAction>, CliError> {
    let path = &config.actions;
    let contents = driftpin_fs::read_utf8(path).map_err(|source| CliError::ReadActions {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseActions {
        path: path.clone(),
        source,
    })
}

/// Dispatch every recorded action in order and export the result.
///
/// Rejected and no-op actions are logged and skipped; only a stopped store
/// aborts the replay.
pub(crate) async fn replay(config: &ReplayConfig) -> Result<PinExport, CliError> {
    let actions = read_actions(config)?;
    let total = actions.len();
    let store = PinStore::spawn();
    let mut skipped = 0_usize;
    for (position, raw) in actions.into_iter().enumerate() {
        match store.dispatch_raw(raw).await {
            Ok(applied) => debug!("replayed {} as #{}", applied.kind, applied.sequence),
            Err(err @ (StateError::InvalidDispatch { .. } | StateError::NoOpDispatch { .. })) => {
                warn!("skipping action {position}: {err}");
                skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    info!(
        "replayed {} of {total} actions from {}",
        total - skipped,
        config.actions
    );
    Ok(store.export())
}
