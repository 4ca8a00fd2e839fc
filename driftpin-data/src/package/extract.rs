use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use log::debug;
use zip::ZipArchive;

use super::{IngestionError, Package};

/// Unpacks drift packages into a fixed extraction root.
///
/// Extraction is destructive: the root is wiped before every attempt, so a
/// failed extraction never leaves a mix of old and new files behind. Callers
/// sharing a root must serialise their extractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveIngestor {
    root: Utf8PathBuf,
}

impl ArchiveIngestor {
    /// Extract into `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory every package is unpacked into.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Replace the extraction root with the contents of `archive`.
    ///
    /// The zip work runs on Tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Unreadable`] when `archive` cannot be
    /// opened and [`IngestionError::ExtractionFailed`] when the root cannot
    /// be reset or the archive is corrupt.
    pub async fn extract(&self, archive: &Utf8Path) -> Result<Package, IngestionError> {
        let archive_path = archive.to_path_buf();
        let root = self.root.clone();
        let entries = tokio::task::spawn_blocking(move || extract_blocking(&archive_path, &root))
            .await
            .map_err(|err| IngestionError::extraction(&self.root, io::Error::other(err)))??;
        debug!("unpacked {entries} entries from {archive} into {}", self.root);
        Ok(Package::new(archive, &self.root).with_entries(entries))
    }
}

fn extract_blocking(archive: &Utf8Path, root: &Utf8Path) -> Result<usize, IngestionError> {
    let file = driftpin_fs::open_file(archive)
        .map_err(|err| IngestionError::unreadable(archive.as_str(), err))?;
    driftpin_fs::reset_dir(root).map_err(|err| IngestionError::extraction(root, err))?;
    let mut zip = ZipArchive::new(file.into_std())
        .map_err(|err| IngestionError::extraction(root, err))?;
    let target = driftpin_fs::open_dir(root).map_err(|err| IngestionError::extraction(root, err))?;
    unpack(&mut zip, &target).map_err(|err| IngestionError::extraction(root, err))
}

fn unpack<R: io::Read + io::Seek>(
    zip: &mut ZipArchive<R>,
    target: &Dir,
) -> Result<usize, zip::result::ZipError> {
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let relative = entry
            .enclosed_name()
            .and_then(|name| Utf8PathBuf::from_path_buf(name).ok())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unsafe entry name {:?}", entry.name()),
                )
            })?;
        if entry.is_dir() {
            target.create_dir_all(&relative)?;
            continue;
        }
        if let Some(parent) = relative.parent().filter(|parent| !parent.as_str().is_empty()) {
            target.create_dir_all(parent)?;
        }
        let mut output = target.create(&relative)?.into_std();
        io::copy(&mut entry, &mut output)?;
    }
    Ok(zip.len())
}
