//! Behavioural coverage for streaming/reading transitions.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use driftpin_core::{
    CenterCoordinate, DefaultStyle, MapMode, ModeController, ModeError, PackageStyle, StyleSource,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const DEFAULT_STYLE: &str = r#"{"version":8,"sources":{}}"#;

#[derive(Default)]
struct ModeWorld {
    controller: RefCell<ModeController>,
    override_result: RefCell<Option<Result<bool, ModeError>>>,
}

#[fixture]
fn world() -> ModeWorld {
    ModeWorld::default()
}

#[given("a controller on the default style")]
fn default_controller(world: &ModeWorld) {
    world
        .controller
        .replace(ModeController::new(DefaultStyle::inline(DEFAULT_STYLE)));
}

#[when("a package centred at {lon} {lat} is committed")]
fn commit_package(world: &ModeWorld, lon: f64, lat: f64) {
    world.controller.borrow_mut().commit(PackageStyle {
        style_url: "file:///extract/tiles/style.json".to_owned(),
        tiles_path: Utf8PathBuf::from("/extract/tiles/data"),
        center: CenterCoordinate::new(lon, lat),
    });
}

#[when("the controller reverts")]
fn revert(world: &ModeWorld) {
    assert!(world.controller.borrow_mut().revert());
}

#[when("reading mode is requested")]
fn request_reading(world: &ModeWorld) {
    let result = world.controller.borrow_mut().set_mode(MapMode::Reading);
    world.override_result.replace(Some(result));
}

#[then("the mode is reading")]
fn mode_reading(world: &ModeWorld) {
    assert_eq!(world.controller.borrow().mode(), MapMode::Reading);
}

#[then("the mode is streaming")]
fn mode_streaming(world: &ModeWorld) {
    assert_eq!(world.controller.borrow().mode(), MapMode::Streaming);
}

#[then("the tile path is {path}")]
fn tile_path_is(world: &ModeWorld, path: String) {
    let expected = Utf8Path::new(path.trim_matches('"'));
    assert_eq!(world.controller.borrow().tile_path(), Some(expected));
}

#[then("there is no tile path")]
fn no_tile_path(world: &ModeWorld) {
    assert_eq!(world.controller.borrow().tile_path(), None);
}

#[then("the centre is {lon} {lat}")]
fn centre_is(world: &ModeWorld, lon: f64, lat: f64) {
    assert_eq!(
        world.controller.borrow().center(),
        CenterCoordinate::new(lon, lat)
    );
}

#[then("the style is the inline default")]
fn style_is_default(world: &ModeWorld) {
    assert_eq!(
        world.controller.borrow().style_reference().source,
        StyleSource::Json(DEFAULT_STYLE.to_owned())
    );
}

#[then("the override is refused for lack of a package")]
fn override_refused(world: &ModeWorld) {
    assert_eq!(
        *world.override_result.borrow(),
        Some(Err(ModeError::NoActivePackage))
    );
}

#[scenario(path = "tests/features/mode_controller.feature", index = 0)]
fn committing_enters_reading(world: ModeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/mode_controller.feature", index = 1)]
fn reverting_restores_default(world: ModeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/mode_controller.feature", index = 2)]
fn reading_override_refused(world: ModeWorld) {
    let _ = world;
}
