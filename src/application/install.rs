//! Install action - unpacks a package archive and records it.

use std::path::Path;

use anyhow::{Result, bail};
use log::{debug, info, warn};

use crate::archive::ZipPackage;
use crate::error::AddonError;
use crate::layout::{Layout, is_contained};
use crate::manifest::{AddonKind, Classification, MANIFEST_NAME, classify};
use crate::registry::Registry;
use crate::runtime::Runtime;

pub struct InstallAction<'a, R: Runtime> {
    runtime: &'a R,
    layout: &'a Layout,
    registry: Registry<'a, R>,
}

impl<'a, R: Runtime> InstallAction<'a, R> {
    pub fn new(runtime: &'a R, layout: &'a Layout) -> Self {
        Self {
            runtime,
            layout,
            registry: Registry::new(runtime, layout.registry_path()),
        }
    }

    /// Install the archive downloaded from `url` and record `version`.
    ///
    /// Plugins are unpacked whole (manifest included) into `py/<subdir>/`;
    /// other kinds are unpacked into their destination without the
    /// manifest.
    #[tracing::instrument(skip(self))]
    pub fn install(&self, url: &str, archive_path: &Path, version: &str) -> Result<Classification> {
        let missing = || AddonError::ManifestMissing {
            archive: archive_path.to_path_buf(),
        };

        let mut package = ZipPackage::open(self.runtime, archive_path)?;
        let entries = package.entry_names();
        let manifest = package.read_manifest(self.runtime)?.ok_or_else(missing)?;
        let classification = classify(entries.as_slice(), &manifest).ok_or_else(missing)?;

        let uses_subdir = matches!(classification.kind, AddonKind::Plugin | AddonKind::Data);
        if uses_subdir && !is_contained(&manifest.subdir) {
            warn!(
                "Refusing to install {:?}: subdir {:?} is not a plain relative path",
                archive_path, manifest.subdir
            );
            return Err(AddonError::UnsafeSubdir {
                subdir: manifest.subdir,
            }
            .into());
        }

        let (target, skip): (_, &[&str]) = match classification.kind {
            AddonKind::Unknown => {
                return Err(AddonError::UnknownType {
                    kind: manifest.type_name,
                }
                .into());
            }
            AddonKind::Plugin => {
                if manifest.subdir.is_empty() {
                    bail!(
                        "Plugin package {:?} does not declare a subdir in {}",
                        archive_path,
                        MANIFEST_NAME
                    );
                }
                (self.layout.module_dir(&manifest.subdir), &[])
            }
            _ => (
                self.layout.resolve(&classification.destination),
                &[MANIFEST_NAME],
            ),
        };

        debug!(
            "Installing {} package {:?} into {:?}",
            classification.kind, archive_path, target
        );
        package.extract_into(self.runtime, &target, skip)?;
        self.registry
            .save_classification(url, &classification, version)?;

        info!(
            "Installed {} ({}) into {}",
            url,
            classification.kind,
            target.display()
        );
        Ok(classification)
    }
}
