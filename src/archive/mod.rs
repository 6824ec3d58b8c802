mod zip;

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::manifest::{Classification, classify};
use crate::runtime::Runtime;

pub use self::zip::ZipPackage;

/// Classify a package archive on disk.
///
/// Returns `Ok(None)` when the archive has no root-level `install.inf`.
#[tracing::instrument(skip(runtime))]
pub fn classify_archive<R: Runtime>(
    runtime: &R,
    archive_path: &Path,
) -> Result<Option<Classification>> {
    let mut package = ZipPackage::open(runtime, archive_path)?;
    let entries = package.entry_names();

    let Some(manifest) = package.read_manifest(runtime)? else {
        debug!("{:?} is not an installable package", archive_path);
        return Ok(None);
    };

    Ok(classify(entries.as_slice(), &manifest))
}

#[cfg(test)]
pub(crate) use self::zip::tests::create_test_archive;
