//! Installed add-on registry (`packages.ini`).
//!
//! One section per package identifier, with keys:
//! - `d` - destination fragment (e.g. `py`, `data/lexlib`)
//! - `f` - `;`-joined list of installed root items
//! - `v` - version string
//!
//! The whole file is rewritten on every change; a single writer is assumed.

use anyhow::{Result, bail};
use ::ini::Ini;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::archive::classify_archive;
use crate::error::AddonError;
use crate::inifile;
use crate::layout::PLUGIN_ROOT;
use crate::manifest::Classification;
use crate::runtime::Runtime;

const KEY_DESTINATION: &str = "d";
const KEY_FILES: &str = "f";
const KEY_VERSION: &str = "v";
const FILE_SEPARATOR: char = ';';

/// Package identifier: the final `/`-separated segment of a source URL.
pub fn package_id(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Identifiers become section headers, so they must be non-empty single-line
/// names without brackets or surrounding whitespace.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.trim() == id && !id.contains(['[', ']', '\n', '\r'])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub destination: String,
    pub files: Vec<String>,
    pub version: String,
}

impl RegistryEntry {
    fn from_section(doc: &Ini, id: &str) -> Option<Self> {
        let section = doc.section(Some(id))?;
        let files = section.get(KEY_FILES).unwrap_or_default();
        Some(Self {
            destination: section.get(KEY_DESTINATION).unwrap_or_default().to_string(),
            files: files
                .split(FILE_SEPARATOR)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
            version: section.get(KEY_VERSION).unwrap_or_default().to_string(),
        })
    }
}

pub struct Registry<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> Registry<'a, R> {
    pub fn new(runtime: &'a R, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            path: path.into(),
        }
    }

    fn load(&self) -> Result<Ini> {
        inifile::load(self.runtime, &self.path)
    }

    fn store(&self, doc: &Ini) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }
        inifile::store(self.runtime, &self.path, doc)
    }

    /// Write (or overwrite) the record for `id`.
    #[tracing::instrument(skip(self, files))]
    pub fn save(&self, id: &str, destination: &str, files: &[String], version: &str) -> Result<()> {
        if !is_valid_id(id) {
            return Err(AddonError::InvalidIdentifier { id: id.to_string() }.into());
        }
        let joined = files.join(&FILE_SEPARATOR.to_string());
        for value in [destination, joined.as_str(), version] {
            if value.contains(['\n', '\r']) {
                bail!("Cannot record {}: value {:?} spans several lines", id, value);
            }
        }

        let mut doc = self.load()?;
        doc.with_section(Some(id))
            .set(KEY_DESTINATION, destination)
            .set(KEY_FILES, joined)
            .set(KEY_VERSION, version);
        self.store(&doc)?;
        debug!("Recorded {} version '{}' in {:?}", id, version, self.path);
        Ok(())
    }

    /// Record a classified package under the identifier derived from `url`.
    pub fn save_classification(
        &self,
        url: &str,
        classification: &Classification,
        version: &str,
    ) -> Result<()> {
        self.save(
            package_id(url),
            &classification.destination,
            &classification.files,
            version,
        )
    }

    /// Classify `archive_path` and record it under `url`'s identifier.
    ///
    /// Does nothing and returns `None` when the archive has no manifest.
    #[tracing::instrument(skip(self))]
    pub fn save_from_archive(
        &self,
        url: &str,
        archive_path: &Path,
        version: &str,
    ) -> Result<Option<Classification>> {
        let Some(classification) = classify_archive(self.runtime, archive_path)? else {
            return Ok(None);
        };
        self.save_classification(url, &classification, version)?;
        Ok(Some(classification))
    }

    /// Recorded version of `id`, or an empty string.
    pub fn version(&self, id: &str) -> String {
        match self.load() {
            Ok(doc) => inifile::read_or(&doc, id, KEY_VERSION, "").to_string(),
            Err(e) => {
                warn!("Cannot read package registry {:?}: {:#}", self.path, e);
                String::new()
            }
        }
    }

    /// Recorded version of the package downloaded from `url`, or an empty string.
    pub fn version_of_url(&self, url: &str) -> String {
        self.version(package_id(url))
    }

    pub fn entry(&self, id: &str) -> Result<Option<RegistryEntry>> {
        let doc = self.load()?;
        Ok(RegistryEntry::from_section(&doc, id))
    }

    /// Like [`Registry::entry`], but a missing record is an error.
    pub fn require(&self, id: &str) -> Result<RegistryEntry> {
        self.entry(id)?.ok_or_else(|| {
            AddonError::RegistryEntryNotFound { id: id.to_string() }.into()
        })
    }

    /// All records in file order.
    pub fn entries(&self) -> Result<Vec<(String, RegistryEntry)>> {
        let doc = self.load()?;
        Ok(doc
            .sections()
            .flatten()
            .filter_map(|id| RegistryEntry::from_section(&doc, id).map(|e| (id.to_string(), e)))
            .collect())
    }

    /// Drop the record of an uninstalled plugin.
    ///
    /// Only sections with `d == "py"` and `f == "<module>/"` match, whatever
    /// their name. Returns whether anything was removed; the file is left
    /// untouched otherwise.
    #[tracing::instrument(skip(self))]
    pub fn remove_plugin(&self, module: &str) -> Result<bool> {
        let mut doc = self.load()?;
        let marker = format!("{}/", module);

        let matching: Vec<String> = doc
            .iter()
            .filter_map(|(name, props)| {
                let name = name?;
                let is_plugin = props.get(KEY_DESTINATION) == Some(PLUGIN_ROOT);
                let is_module = props.get(KEY_FILES) == Some(marker.as_str());
                (is_plugin && is_module).then(|| name.to_string())
            })
            .collect();

        if matching.is_empty() {
            debug!("No registry record for plugin {}", module);
            return Ok(false);
        }

        for name in &matching {
            doc.delete(Some(name.as_str()));
        }
        self.store(&doc)?;
        info!("Removed registry record(s) {:?} for plugin {}", matching, module);
        Ok(true)
    }
}
