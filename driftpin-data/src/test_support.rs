//! Drift package fixtures built on the fly for unit and behaviour tests.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Minimal style descriptor with a centre coordinate and a remote source that
/// ingestion is expected to replace.
pub const SAMPLE_STYLE: &str = r#"{
  "version": 8,
  "name": "sample",
  "metadata": { "centerCoordinate": [-84.3837773, 33.7521521] },
  "sources": { "openmaptiles": { "type": "vector", "url": "https://example.org/tiles.json" } },
  "layers": [ { "id": "water", "type": "fill", "source": "openmaptiles", "source-layer": "water" } ]
}"#;

/// In-memory description of a drift package to be zipped.
#[derive(Debug, Clone, Default)]
pub struct DriftPackageBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl DriftPackageBuilder {
    /// An empty package.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A package with [`SAMPLE_STYLE`] and a single tile.
    #[must_use]
    pub fn sample() -> Self {
        Self::new()
            .style(SAMPLE_STYLE)
            .tile(5, 9, 11, b"\x1a\x00")
    }

    /// Add `tiles/style.json`.
    #[must_use]
    pub fn style(self, body: &str) -> Self {
        self.file("tiles/style.json", body.as_bytes())
    }

    /// Add `tiles/data/{z}/{x}/{y}.pbf`.
    #[must_use]
    pub fn tile(self, z: u8, x: u32, y: u32, body: &[u8]) -> Self {
        self.file(&format!("tiles/data/{z}/{x}/{y}.pbf"), body)
    }

    /// Add an arbitrary entry.
    #[must_use]
    pub fn file(mut self, name: &str, body: &[u8]) -> Self {
        self.entries.push((name.to_owned(), body.to_vec()));
        self
    }

    /// Write the package to `path` as a deflated zip archive.
    ///
    /// # Errors
    ///
    /// Returns any I/O or zip encoding failure.
    pub fn write_to(&self, path: &Utf8Path) -> io::Result<Utf8PathBuf> {
        let file = std::fs::File::create(path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, body) in &self.entries {
            writer.start_file(name.as_str(), options).map_err(io::Error::other)?;
            writer.write_all(body)?;
        }
        writer.finish().map_err(io::Error::other)?;
        Ok(path.to_path_buf())
    }
}

/// Write bytes that are not a zip archive to `path`.
///
/// # Errors
///
/// Returns any I/O failure.
pub fn write_corrupt_package(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    std::fs::write(path, b"definitely not a zip archive")?;
    Ok(path.to_path_buf())
}
