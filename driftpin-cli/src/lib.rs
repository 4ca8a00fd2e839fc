//! Command-line interface for loading drift packages and replaying pins.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod load;
mod replay;

pub use error::CliError;
use load::{LoadArgs, LoadConfig};
use replay::{ReplayArgs, ReplayConfig};

const ARG_LOAD_PACKAGE: &str = "package";
const ARG_LOAD_EXTRACTION_ROOT: &str = "extraction-root";
const ARG_LOAD_DEFAULT_STYLE: &str = "default-style";
const ENV_LOAD_PACKAGE: &str = "DRIFTPIN_CMDS_LOAD_PACKAGE";
const ENV_LOAD_EXTRACTION_ROOT: &str = "DRIFTPIN_CMDS_LOAD_EXTRACTION_ROOT";
const ARG_REPLAY_ACTIONS: &str = "actions";
const ENV_REPLAY_ACTIONS: &str = "DRIFTPIN_CMDS_REPLAY_ACTIONS";

/// Run the driftpin CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, or when
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let stdout = std::io::stdout();
    match cli.command {
        Command::Load(args) => {
            let config = resolve_load_config(args)?;
            let summary = runtime.block_on(load::load(config))?;
            write_json(&mut stdout.lock(), &summary)
        }
        Command::Replay(args) => {
            let config = resolve_replay_config(args)?;
            let export = runtime.block_on(replay::replay(&config))?;
            write_json(&mut stdout.lock(), &export)
        }
    }
}

fn resolve_load_config(args: LoadArgs) -> Result<LoadConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn resolve_replay_config(args: ReplayArgs) -> Result<ReplayConfig, CliError> {
    let config = args.into_config()?;
    require_existing(&config.actions, ARG_REPLAY_ACTIONS)?;
    Ok(config)
}

#[derive(Debug, Parser)]
#[command(
    name = "driftpin",
    about = "Load offline drift packages and replay pin actions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract a drift package and report the resulting map state.
    Load(LoadArgs),
    /// Replay recorded pin actions and print the resulting export.
    Replay(ReplayArgs),
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    let probed = driftpin_fs::file_is_file(path).and_then(|is_file| {
        if is_file {
            Ok(None)
        } else {
            driftpin_fs::dir_is_dir(path).map(Some)
        }
    });
    match probed {
        Ok(None) => Ok(()),
        Ok(Some(true)) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(Some(false)) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).map_err(CliError::RenderOutput)?;
    writeln!(out, "{rendered}").map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
