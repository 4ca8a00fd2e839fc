//! Behaviour-driven step definitions driving the load CLI scenarios.

use super::helpers::{LayerOverrides, LoadFiles, merge_layers};
use super::*;
use crate::load::LoadSummary;
use driftpin_core::MapMode;
use driftpin_core::test_support::block_on_for_tests;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Aggregates load CLI scenario state so each step only needs a single world
/// argument.
struct LoadWorld {
    files: LoadFiles,
    cli_args: RefCell<Vec<String>>,
    cli_result: RefCell<Option<Result<LoadConfig, CliError>>>,
    summary: RefCell<Option<Result<LoadSummary, CliError>>>,
    config_layer: RefCell<Option<LayerOverrides>>,
    env_layer: RefCell<Option<LayerOverrides>>,
}

impl LoadWorld {
    fn new() -> Self {
        Self {
            files: LoadFiles::new(),
            cli_args: RefCell::new(Vec::new()),
            cli_result: RefCell::new(None),
            summary: RefCell::new(None),
            config_layer: RefCell::new(None),
            env_layer: RefCell::new(None),
        }
    }

    fn parse_load_args(&self) -> Result<LoadArgs, CliError> {
        let mut invocation = vec!["driftpin".to_owned(), "load".to_owned()];
        invocation.extend(self.cli_args.borrow().iter().cloned());
        let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
        match cli.command {
            Command::Load(args) => Ok(args),
            Command::Replay(_) => panic!("expected the load command"),
        }
    }

    fn resolved_config(&self) -> std::cell::Ref<'_, Result<LoadConfig, CliError>> {
        std::cell::Ref::map(self.cli_result.borrow(), |result| {
            result
                .as_ref()
                .unwrap_or_else(|| panic!("result recorded"))
        })
    }
}

#[fixture]
fn world() -> LoadWorld {
    LoadWorld::new()
}

#[given("a drift package exists on disk")]
fn package_exists(#[from(world)] world: &LoadWorld) {
    assert!(
        world.files.package().is_file(),
        "expected the drift package to exist on disk"
    );
}

#[given("I pass the package and extraction root with CLI flags")]
fn cli_provides_paths(#[from(world)] world: &LoadWorld) {
    let mut guard = world.cli_args.borrow_mut();
    guard.extend([
        format!("--{ARG_LOAD_PACKAGE}"),
        world.files.package().to_string(),
        format!("--{ARG_LOAD_EXTRACTION_ROOT}"),
        world.files.cli_extraction_root().into_string(),
    ]);
}

#[given("I omit all load configuration")]
fn omit_configuration(#[from(world)] world: &LoadWorld) {
    world.cli_args.borrow_mut().clear();
    world.config_layer.replace(None);
    world.env_layer.replace(None);
}

#[given("the package and extraction root are provided via a config file")]
fn provided_via_config(#[from(world)] world: &LoadWorld) {
    world.config_layer.replace(Some(LayerOverrides {
        package: Some(world.files.root().join("config.drift")),
        extraction_root: Some(world.files.config_extraction_root()),
    }));
}

#[given("the extraction root is overridden via environment variables")]
fn extraction_root_overridden_by_env(#[from(world)] world: &LoadWorld) {
    world.env_layer.replace(Some(LayerOverrides {
        extraction_root: Some(world.files.env_extraction_root()),
        ..LayerOverrides::default()
    }));
}

#[given("I pass only the package CLI flag")]
fn cli_only_package(#[from(world)] world: &LoadWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_LOAD_PACKAGE}"),
        world.files.package().to_string(),
    ]);
}

#[when("I configure the load command")]
fn configure_load(#[from(world)] world: &LoadWorld) {
    let file_layer = world.config_layer.borrow().clone();
    let env_layer = world.env_layer.borrow().clone();
    let outcome = world.parse_load_args().and_then(|args| {
        if file_layer.is_some() || env_layer.is_some() {
            merge_layers(args, file_layer, env_layer)
        } else {
            resolve_load_config(args)
        }
    });
    world.cli_result.replace(Some(outcome));
}

#[when("I run the load command")]
fn run_load(#[from(world)] world: &LoadWorld) {
    let outcome = world
        .parse_load_args()
        .and_then(resolve_load_config)
        .and_then(|config| block_on_for_tests(load::load(config)));
    world.summary.replace(Some(outcome));
}

#[then("the load plan uses the CLI-provided paths")]
fn plan_uses_cli_paths(#[from(world)] world: &LoadWorld) {
    let result = world.resolved_config();
    let config = result
        .as_ref()
        .unwrap_or_else(|err| panic!("expected success, got {err}"));
    assert_eq!(config.package, world.files.package().to_path_buf());
    assert_eq!(config.extraction_root, world.files.cli_extraction_root());
    assert_eq!(config.default_style, None);
}

#[then("the CLI reports that the \"package\" flag is missing")]
fn reports_missing_package(#[from(world)] world: &LoadWorld) {
    let result = world.resolved_config();
    match result.as_ref() {
        Err(CliError::MissingArgument { field, .. }) => assert_eq!(*field, ARG_LOAD_PACKAGE),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[then("CLI and environment layers override configuration defaults")]
fn precedence_holds(#[from(world)] world: &LoadWorld) {
    let result = world.resolved_config();
    let config = result
        .as_ref()
        .unwrap_or_else(|err| panic!("expected success, got {err}"));
    assert_eq!(config.package, world.files.package().to_path_buf());
    assert_eq!(config.extraction_root, world.files.env_extraction_root());
}

#[then("the summary reports reading mode with {count} extracted entries")]
fn summary_reports_reading(#[from(world)] world: &LoadWorld, count: usize) {
    let borrowed = world.summary.borrow();
    let summary = borrowed
        .as_ref()
        .unwrap_or_else(|| panic!("summary recorded"))
        .as_ref()
        .unwrap_or_else(|err| panic!("expected a loaded package, got {err}"));
    assert_eq!(summary.mode, MapMode::Reading);
    assert_eq!(summary.entries, Some(count));
    assert_eq!(
        summary.tile_path,
        Some(world.files.cli_extraction_root().join("tiles/data"))
    );
}

macro_rules! register_load_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/load_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: LoadWorld) {
            let _ = world;
        }
    };
}

register_load_scenario!(cli_flag_selection, "selecting the package via CLI flags");
register_load_scenario!(rejecting_missing_args, "rejecting missing arguments");
register_load_scenario!(
    layering_cli_config_env,
    "layering CLI, config file, and environment values"
);
register_load_scenario!(loading_enters_reading, "loading a package enters reading mode");
