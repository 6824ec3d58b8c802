use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::cleanup::ScratchFile;
use crate::manifest::{MANIFEST_NAME, Manifest};
use crate::runtime::Runtime;

/// An add-on package archive loaded into memory.
pub struct ZipPackage {
    path: PathBuf,
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipPackage {
    #[tracing::instrument(skip(runtime))]
    pub fn open<R: Runtime>(runtime: &R, archive_path: &Path) -> Result<Self> {
        let mut reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // zip needs Read + Seek, the runtime only hands out Read
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        let archive = ZipArchive::new(Cursor::new(buffer))
            .with_context(|| format!("Failed to parse ZIP archive {:?}", archive_path))?;

        Ok(Self {
            path: archive_path.to_path_buf(),
            archive,
        })
    }

    /// Entry names in central directory order.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Copy a single entry to `dest`.
    pub fn extract_entry<R: Runtime>(&mut self, runtime: &R, name: &str, dest: &Path) -> Result<()> {
        let mut entry = self
            .archive
            .by_name(name)
            .with_context(|| format!("Entry {} not found in {:?}", name, self.path))?;
        let mut out = runtime.create_file(dest)?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to extract {} to {:?}", name, dest))?;
        Ok(())
    }

    /// Read the package manifest through a scratch copy in the temp directory.
    ///
    /// Returns `None` if the archive has no `install.inf` at its root. The
    /// scratch copy is removed whether or not parsing succeeds.
    #[tracing::instrument(skip(self, runtime))]
    pub fn read_manifest<R: Runtime>(&mut self, runtime: &R) -> Result<Option<Manifest>> {
        if !self.has_entry(MANIFEST_NAME) {
            debug!("{:?} has no {}", self.path, MANIFEST_NAME);
            return Ok(None);
        }

        let scratch = ScratchFile::in_temp_dir(runtime, "addonman", MANIFEST_NAME);
        self.extract_entry(runtime, MANIFEST_NAME, scratch.path())?;
        let manifest = Manifest::load(runtime, scratch.path())
            .with_context(|| format!("Malformed {} in {:?}", MANIFEST_NAME, self.path))?;

        Ok(Some(manifest))
    }

    /// Extract every entry into `dest`, skipping entries named in `skip`.
    ///
    /// Entry paths are kept as they are in the archive. Returns the number
    /// of files written.
    #[tracing::instrument(skip(self, runtime, skip))]
    pub fn extract_into<R: Runtime>(
        &mut self,
        runtime: &R,
        dest: &Path,
        skip: &[&str],
    ) -> Result<usize> {
        debug!("Extracting {:?} to {:?}...", self.path, dest);
        runtime.create_dir_all(dest)?;

        let mut written = 0;
        for i in 0..self.archive.len() {
            let mut entry = self
                .archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;

            if skip.contains(&entry.name()) {
                continue;
            }

            let entry_path = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    debug!("Skipping entry with invalid path: {}", entry.name());
                    continue;
                }
            };

            let full_path = dest.join(&entry_path);

            if entry.is_dir() {
                runtime.create_dir_all(&full_path)?;
                continue;
            }

            if let Some(parent) = full_path.parent() {
                runtime.create_dir_all(parent)?;
            }
            let mut out = runtime.create_file(&full_path)?;
            std::io::copy(&mut entry, &mut out)
                .with_context(|| format!("Failed to extract file {:?}", full_path))?;
            written += 1;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode()
                && let Err(e) = runtime.set_permissions(&full_path, mode)
            {
                debug!("Failed to set permissions on {:?}: {}", full_path, e);
            }
        }

        info!("Extracted {} file(s) to {}", written, dest.display());
        Ok(written)
    }
}
