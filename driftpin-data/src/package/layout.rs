use camino::{Utf8Path, Utf8PathBuf};

/// Top-level directory inside a drift package.
pub const TILES_DIR: &str = "tiles";
/// Directory under [`TILES_DIR`] holding `{z}/{x}/{y}.pbf` tiles.
pub const DATA_DIR: &str = "data";
/// Style descriptor under [`TILES_DIR`].
pub const STYLE_FILE: &str = "style.json";

/// Paths of one extracted drift package.
///
/// Every path is derived from the extraction root, so two packages extracted
/// into the same root share the same layout.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use driftpin_data::Package;
///
/// let package = Package::new(Utf8Path::new("/in/trip.drift"), Utf8Path::new("/srv/extract"));
/// assert_eq!(package.tiles_path(), Utf8Path::new("/srv/extract/tiles/data"));
/// assert_eq!(package.style_path(), Utf8Path::new("/srv/extract/tiles/style.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    archive_path: Utf8PathBuf,
    extraction_root: Utf8PathBuf,
    data_path: Utf8PathBuf,
    tiles_path: Utf8PathBuf,
    style_path: Utf8PathBuf,
    entries: usize,
}

impl Package {
    /// Lay out a package extracted from `archive` into `root`.
    #[must_use]
    pub fn new(archive: &Utf8Path, root: &Utf8Path) -> Self {
        let data_path = root.join(TILES_DIR);
        Self {
            archive_path: archive.to_path_buf(),
            extraction_root: root.to_path_buf(),
            tiles_path: data_path.join(DATA_DIR),
            style_path: data_path.join(STYLE_FILE),
            data_path,
            entries: 0,
        }
    }

    #[must_use]
    pub(crate) fn with_entries(mut self, entries: usize) -> Self {
        self.entries = entries;
        self
    }

    /// Archive the package was extracted from.
    #[must_use]
    pub fn archive_path(&self) -> &Utf8Path {
        &self.archive_path
    }

    /// Directory the archive was unpacked into.
    #[must_use]
    pub fn extraction_root(&self) -> &Utf8Path {
        &self.extraction_root
    }

    /// `root/tiles`.
    #[must_use]
    pub fn data_path(&self) -> &Utf8Path {
        &self.data_path
    }

    /// `root/tiles/data`.
    #[must_use]
    pub fn tiles_path(&self) -> &Utf8Path {
        &self.tiles_path
    }

    /// `root/tiles/style.json`.
    #[must_use]
    pub fn style_path(&self) -> &Utf8Path {
        &self.style_path
    }

    /// Number of archive entries unpacked.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }
}
