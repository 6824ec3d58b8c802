//! Package manifests (`install.inf`) and add-on classification.

mod classify;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::inifile;
use crate::layout::{DATA_ROOT, LEXLIB_DIR, LEXLIBLITE_DIR, PLUGIN_ROOT};
use crate::runtime::Runtime;

pub use classify::{Classification, classify, is_root_item, root_items};

/// Name of the manifest entry at the root of every package archive.
pub const MANIFEST_NAME: &str = "install.inf";

const INFO_SECTION: &str = "info";

/// Kind of an installable package, as declared by the manifest `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddonKind {
    Plugin,
    Data,
    Lexer,
    LexerLite,
    Unknown,
}

impl AddonKind {
    /// Parses the manifest `type` value. Unrecognised values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "cudatext-plugin" | "plugin" => Self::Plugin,
            "cudatext-data" | "data" => Self::Data,
            "lexer" => Self::Lexer,
            "lexer-lite" => Self::LexerLite,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::Data => "data",
            Self::Lexer => "lexer",
            Self::LexerLite => "lexer-lite",
            Self::Unknown => "unknown",
        }
    }

    /// Root-relative destination of a package of this kind.
    ///
    /// | kind      | destination        |
    /// |-----------|--------------------|
    /// | Plugin    | `py`               |
    /// | Data      | `data/<subdir>`    |
    /// | Lexer     | `data/lexlib`      |
    /// | LexerLite | `data/lexliblite`  |
    /// | Unknown   | empty              |
    pub fn destination(&self, subdir: &str) -> String {
        match self {
            Self::Plugin => PLUGIN_ROOT.to_string(),
            Self::Data => format!("{}/{}", DATA_ROOT, subdir),
            Self::Lexer => format!("{}/{}", DATA_ROOT, LEXLIB_DIR),
            Self::LexerLite => format!("{}/{}", DATA_ROOT, LEXLIBLITE_DIR),
            Self::Unknown => String::new(),
        }
    }
}

impl std::fmt::Display for AddonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `[info]` section of an `install.inf` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub kind: AddonKind,
    /// Raw `type` value, kept for error messages about unknown kinds.
    pub type_name: String,
    pub subdir: String,
    pub title: Option<String>,
    pub homepage: Option<String>,
}

impl Manifest {
    #[cfg(test)]
    pub(crate) fn new(kind: AddonKind, subdir: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: kind.as_str().to_string(),
            subdir: subdir.into(),
            title: None,
            homepage: None,
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc = inifile::parse(content)?;
        let type_name = inifile::read_or(&doc, INFO_SECTION, "type", "").to_string();
        let non_empty = |key: &str| {
            doc.get_from(Some(INFO_SECTION), key)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Ok(Self {
            kind: AddonKind::parse(&type_name),
            subdir: inifile::read_or(&doc, INFO_SECTION, "subdir", "").to_string(),
            title: non_empty("title"),
            homepage: non_empty("homepage"),
            type_name,
        })
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content)
    }
}
