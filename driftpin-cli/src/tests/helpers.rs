//! Test helpers for composing load inputs and layered overrides.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use driftpin_data::test_support::DriftPackageBuilder;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) package: Option<Utf8PathBuf>,
    pub(super) extraction_root: Option<Utf8PathBuf>,
}

/// Scratch directory holding drift packages and extraction roots.
pub(super) struct LoadFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
    package: Utf8PathBuf,
}

impl LoadFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("non-UTF-8 temp dir {path:?}"));
        let package = DriftPackageBuilder::sample()
            .write_to(&root.join("atlanta.drift"))
            .unwrap_or_else(|err| panic!("write package: {err}"));
        Self {
            _dir: dir,
            root,
            package,
        }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn package(&self) -> &Utf8Path {
        &self.package
    }

    pub(super) fn cli_extraction_root(&self) -> Utf8PathBuf {
        self.root.join("cli-extract")
    }

    pub(super) fn config_extraction_root(&self) -> Utf8PathBuf {
        self.root.join("config-extract")
    }

    pub(super) fn env_extraction_root(&self) -> Utf8PathBuf {
        self.root.join("env-extract")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        driftpin_fs::write_utf8(&path, contents)
            .unwrap_or_else(|err| panic!("write {path}: {err}"));
        path
    }
}

pub(super) fn merge_layers(
    mut cli_args: LoadArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<LoadConfig, CliError> {
    merge_field(
        &mut cli_args.package,
        extract_field(env_layer.as_ref(), |layer| &layer.package),
        extract_field(file_layer.as_ref(), |layer| &layer.package),
    );
    merge_field(
        &mut cli_args.extraction_root,
        extract_field(env_layer.as_ref(), |layer| &layer.extraction_root),
        extract_field(file_layer.as_ref(), |layer| &layer.extraction_root),
    );
    LoadConfig::try_from(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: Option<&LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.and_then(|entry| accessor(entry).clone())
}
