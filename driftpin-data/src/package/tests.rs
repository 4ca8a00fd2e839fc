//! Extraction coverage against zip fixtures built in a scratch directory.

use camino::Utf8PathBuf;
use driftpin_core::test_support::block_on_for_tests;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::test_support::{DriftPackageBuilder, write_corrupt_package};

struct Scratch {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Scratch {
    fn extraction_root(&self) -> Utf8PathBuf {
        self.root.join("extract")
    }

    fn archive(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

#[fixture]
fn scratch() -> Scratch {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("create temp dir: {err}"));
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non-UTF-8 temp dir {path:?}"));
    Scratch { _dir: dir, root }
}

#[rstest]
fn extracts_style_and_tiles(scratch: Scratch) {
    let archive = DriftPackageBuilder::sample()
        .write_to(&scratch.archive("trip.drift"))
        .unwrap_or_else(|err| panic!("write fixture: {err}"));
    let ingestor = ArchiveIngestor::new(scratch.extraction_root());

    let package = block_on_for_tests(ingestor.extract(&archive))
        .unwrap_or_else(|err| panic!("extract: {err}"));

    assert_eq!(package.archive_path(), archive);
    assert_eq!(package.extraction_root(), scratch.extraction_root());
    assert_eq!(package.entries(), 2);
    assert!(package.style_path().is_file());
    assert!(package.tiles_path().join("5/9/11.pbf").is_file());
}

#[rstest]
fn reextraction_discards_previous_package(scratch: Scratch) {
    let first = DriftPackageBuilder::sample()
        .file("tiles/data/stale.txt", b"old")
        .write_to(&scratch.archive("first.drift"))
        .unwrap_or_else(|err| panic!("write fixture: {err}"));
    let second = DriftPackageBuilder::sample()
        .write_to(&scratch.archive("second.drift"))
        .unwrap_or_else(|err| panic!("write fixture: {err}"));
    let ingestor = ArchiveIngestor::new(scratch.extraction_root());

    block_on_for_tests(ingestor.extract(&first)).unwrap_or_else(|err| panic!("first: {err}"));
    let package =
        block_on_for_tests(ingestor.extract(&second)).unwrap_or_else(|err| panic!("second: {err}"));

    assert!(!package.tiles_path().join("stale.txt").exists());
}

#[rstest]
fn missing_archive_is_unreadable(scratch: Scratch) {
    let ingestor = ArchiveIngestor::new(scratch.extraction_root());
    let result = block_on_for_tests(ingestor.extract(&scratch.archive("absent.drift")));
    assert!(
        matches!(result, Err(IngestionError::Unreadable { .. })),
        "unexpected {result:?}"
    );
}

#[rstest]
fn corrupt_archive_fails_extraction(scratch: Scratch) {
    let archive = write_corrupt_package(&scratch.archive("broken.drift"))
        .unwrap_or_else(|err| panic!("write fixture: {err}"));
    let ingestor = ArchiveIngestor::new(scratch.extraction_root());

    let result = block_on_for_tests(ingestor.extract(&archive));

    assert!(
        matches!(result, Err(IngestionError::ExtractionFailed { .. })),
        "unexpected {result:?}"
    );
}

#[rstest]
fn entries_escaping_the_root_are_refused(scratch: Scratch) {
    let archive = DriftPackageBuilder::new()
        .file("../escape.txt", b"nope")
        .write_to(&scratch.archive("evil.drift"))
        .unwrap_or_else(|err| panic!("write fixture: {err}"));
    let ingestor = ArchiveIngestor::new(scratch.extraction_root());

    let result = block_on_for_tests(ingestor.extract(&archive));

    assert!(matches!(
        result,
        Err(IngestionError::ExtractionFailed { .. })
    ));
    assert!(!scratch.root.join("escape.txt").exists());
}
