//! Descriptor rewrite coverage.

use camino::Utf8PathBuf;
use driftpin_core::test_support::block_on_for_tests;
use driftpin_core::{CenterCoordinate, DEFAULT_CENTER};
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::ArchiveIngestor;
use crate::test_support::{DriftPackageBuilder, SAMPLE_STYLE};

const TILES: &str = "/srv/extract/tiles/data";

fn descriptor(value: &Value) -> Map<String, Value> {
    value
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("fixture must be an object"))
}

#[rstest]
fn replaces_sources_wholesale() {
    let mut style = descriptor(&json!({
        "version": 8,
        "sources": { "a": {}, "b": {} },
        "layers": [{ "id": "land" }]
    }));

    rewrite_descriptor(&mut style, Utf8Path::new(TILES));

    assert_eq!(
        style.get("sources"),
        Some(&json!({
            "custom-tiles": {
                "type": "vector",
                "tiles": ["file:///srv/extract/tiles/data/{z}/{x}/{y}.pbf"],
                "zoomlevel": 9,
                "maxzoom": 14,
                "minzoom": 5
            }
        }))
    );
    assert_eq!(style.get("layers"), Some(&json!([{ "id": "land" }])));
    assert_eq!(style.get("version"), Some(&json!(8)));
}

#[rstest]
fn adds_sources_when_absent() {
    let mut style = descriptor(&json!({ "version": 8 }));
    rewrite_descriptor(&mut style, Utf8Path::new(TILES));
    assert!(style.contains_key("sources"));
}

#[rstest]
#[case::present(json!({ "metadata": { "centerCoordinate": [2.5, 48.5] } }), CenterCoordinate::new(2.5, 48.5))]
#[case::absent(json!({}), DEFAULT_CENTER)]
#[case::no_metadata_key(json!({ "metadata": {} }), DEFAULT_CENTER)]
#[case::wrong_arity(json!({ "metadata": { "centerCoordinate": [1.0] } }), DEFAULT_CENTER)]
#[case::not_numbers(json!({ "metadata": { "centerCoordinate": ["1", "2"] } }), DEFAULT_CENTER)]
fn reads_center_or_falls_back(#[case] style: Value, #[case] expected: CenterCoordinate) {
    let mut map = descriptor(&style);
    assert_eq!(rewrite_descriptor(&mut map, Utf8Path::new(TILES)), expected);
}

#[rstest]
#[case("[1, 2]")]
#[case("\"style\"")]
#[case("{ not json")]
fn rejects_non_object_documents(#[case] text: &str) {
    assert!(parse_descriptor(text).is_err());
}

struct Extracted {
    _dir: TempDir,
    package: Package,
}

#[fixture]
fn extracted() -> Extracted {
    extract(DriftPackageBuilder::sample())
}

fn extract(builder: DriftPackageBuilder) -> Extracted {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("create temp dir: {err}"));
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non-UTF-8 temp dir {path:?}"));
    let archive = builder
        .write_to(&root.join("trip.drift"))
        .unwrap_or_else(|err| panic!("write fixture: {err}"));
    let package = block_on_for_tests(ArchiveIngestor::new(root.join("extract")).extract(&archive))
        .unwrap_or_else(|err| panic!("extract: {err}"));
    Extracted { _dir: dir, package }
}

#[rstest]
fn build_rewrites_descriptor_on_disk(extracted: Extracted) {
    let artifact = block_on_for_tests(StyleArtifactBuilder::new().build(&extracted.package))
        .unwrap_or_else(|err| panic!("build: {err}"));

    assert_eq!(artifact.style_path, extracted.package.style_path());
    assert_eq!(artifact.center, CenterCoordinate::new(-84.383_777_3, 33.752_152_1));
    assert_eq!(
        artifact.style_url(),
        format!("file://{}", extracted.package.style_path())
    );

    let written = driftpin_fs::read_utf8(&artifact.style_path)
        .unwrap_or_else(|err| panic!("read back: {err}"));
    let rewritten = parse_descriptor(&written).unwrap_or_else(|err| panic!("parse: {err}"));
    assert_eq!(
        rewritten.get("sources"),
        Some(&json!({ CUSTOM_TILES_SOURCE: tile_source(extracted.package.tiles_path()) }))
    );
    assert!(written.contains("\n  \"layers\""), "expected two-space indentation");
    assert_ne!(written, SAMPLE_STYLE);
}

#[rstest]
fn rebuilding_is_idempotent(extracted: Extracted) {
    let builder = StyleArtifactBuilder::new();
    let first = block_on_for_tests(builder.build(&extracted.package))
        .unwrap_or_else(|err| panic!("first build: {err}"));
    let once = driftpin_fs::read_utf8(&first.style_path).unwrap_or_default();
    let second = block_on_for_tests(builder.build(&extracted.package))
        .unwrap_or_else(|err| panic!("second build: {err}"));
    let twice = driftpin_fs::read_utf8(&second.style_path).unwrap_or_default();

    assert_eq!(once, twice);
    assert_eq!(first, second);
}

#[rstest]
fn missing_descriptor_is_reported() {
    let extracted = extract(DriftPackageBuilder::new().tile(5, 1, 1, b"tile"));
    let result = block_on_for_tests(StyleArtifactBuilder::new().build(&extracted.package));
    assert!(
        matches!(result, Err(IngestionError::MissingStyle { .. })),
        "unexpected {result:?}"
    );
}

#[rstest]
#[case("{ \"version\": ")]
#[case("[]")]
fn malformed_descriptor_is_reported(#[case] body: &str) {
    let extracted = extract(DriftPackageBuilder::new().style(body));
    let result = block_on_for_tests(StyleArtifactBuilder::new().build(&extracted.package));
    assert!(
        matches!(result, Err(IngestionError::MalformedStyle { .. })),
        "unexpected {result:?}"
    );
}
