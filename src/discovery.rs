//! Discovery of installed add-ons.
//!
//! Plugins are directories under `py/` carrying an `install.inf`; every
//! other kind is recognised by file extension in its data directory. All
//! listings are sorted and free of duplicates, and a missing directory
//! simply contributes nothing.

use anyhow::Result;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::inifile;
use crate::layout::{
    AUTOCOMPLETE_DIR, LANG_DIR, LEXLIB_DIR, LEXLIBLITE_DIR, Layout, SNIPPETS_DIR, THEMES_DIR,
};
use crate::manifest::MANIFEST_NAME;
use crate::runtime::Runtime;

pub const LEXER_EXT: &str = ".lcf";
pub const LEXMAP_EXT: &str = ".cuda-lexmap";
pub const ACP_EXT: &str = ".acp";
pub const LITE_LEXER_EXT: &str = ".cuda-litelexer";
pub const TRANSLATION_EXT: &str = ".ini";
pub const THEME_SYNTAX_EXT: &str = ".cuda-theme-syntax";
pub const THEME_UI_EXT: &str = ".cuda-theme-ui";

const README_NAMES: &[&str] = &[
    "readme.txt",
    "readme.html",
    "readme.htm",
    "readme.md",
    "README.md",
    "readme.rst",
    "README.rst",
];

const HISTORY_NAMES: &[&str] = &["history.txt", "history.md", "history.rst", "history"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Plugin,
    Lexer,
    Snippets,
    Theme,
    Translation,
}

/// An installed add-on together with the files that make it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledItem {
    pub kind: ItemKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Absolute paths; directories end with `/`.
    pub files: Vec<String>,
}

/// Names to leave out of [`Discovery::installed_items`], per kind.
#[derive(Debug, Default, Clone)]
pub struct Exclusions {
    pub modules: HashSet<String>,
    pub lexers: HashSet<String>,
    pub lexers_lite: HashSet<String>,
    pub themes: HashSet<String>,
    pub translations: HashSet<String>,
    pub snippets: HashSet<String>,
}

/// Text before the first `.` of a file name.
fn stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn file_path(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

fn dir_path(path: PathBuf) -> String {
    format!("{}/", path.to_string_lossy())
}

pub struct Discovery<'a, R: Runtime> {
    runtime: &'a R,
    layout: &'a Layout,
}

impl<'a, R: Runtime> Discovery<'a, R> {
    pub fn new(runtime: &'a R, layout: &'a Layout) -> Self {
        Self { runtime, layout }
    }

    /// File names directly inside `dir`; empty if the directory is missing.
    fn names_in(&self, dir: &Path) -> Result<Vec<String>> {
        if !self.runtime.is_dir(dir) {
            debug!("{:?} does not exist, nothing installed there", dir);
            return Ok(vec![]);
        }
        Ok(self
            .runtime
            .read_dir(dir)?
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    /// Sorted, de-duplicated stems of files in `dir` ending with any of `exts`.
    fn stems_with_ext(&self, dir: &Path, exts: &[&str]) -> Result<Vec<String>> {
        let stems: BTreeSet<String> = self
            .names_in(dir)?
            .iter()
            .filter(|n| exts.iter().any(|ext| n.ends_with(ext)))
            .map(|n| stem(n).to_string())
            .collect();
        Ok(stems.into_iter().collect())
    }

    /// Plugin modules: directories under `py/` not starting with `__` that
    /// contain an `install.inf`.
    #[tracing::instrument(skip(self))]
    pub fn installed_modules(&self) -> Result<Vec<String>> {
        let plugins = self.layout.plugins_dir();
        let mut modules: Vec<String> = self
            .names_in(&plugins)?
            .into_iter()
            .filter(|n| !n.starts_with("__"))
            .filter(|n| self.runtime.is_file(&plugins.join(n).join(MANIFEST_NAME)))
            .collect();
        modules.sort();
        modules.dedup();
        Ok(modules)
    }

    /// Lexer names from `lexlib` and `lexliblite`, spaces replaced by `_`.
    #[tracing::instrument(skip(self))]
    pub fn installed_lexers(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .names_in(&self.layout.data_subdir(LEXLIB_DIR))?
            .into_iter()
            .filter(|n| n.ends_with(LEXER_EXT))
            .chain(
                self.names_in(&self.layout.data_subdir(LEXLIBLITE_DIR))?
                    .into_iter()
                    .filter(|n| n.ends_with(LITE_LEXER_EXT)),
            )
            .map(|n| stem(&n.replace(' ', "_")).to_string())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Every installed add-on, grouped by kind: plugins, lexers, lite
    /// lexers, snippets, themes, translations.
    #[tracing::instrument(skip(self, exclude))]
    pub fn installed_items(&self, exclude: &Exclusions) -> Result<Vec<InstalledItem>> {
        let mut items = Vec::new();

        let plugins = self.layout.plugins_dir();
        for module in self.installed_modules()? {
            if exclude.modules.contains(&module) {
                continue;
            }
            items.push(InstalledItem {
                kind: ItemKind::Plugin,
                name: self.module_title(&module),
                files: vec![dir_path(plugins.join(&module))],
                module: Some(module),
            });
        }

        let lexlib = self.layout.data_subdir(LEXLIB_DIR);
        let acp = self.layout.data_subdir(AUTOCOMPLETE_DIR);
        for name in self.stems_with_ext(&lexlib, &[LEXER_EXT])? {
            if exclude.lexers.contains(&name) {
                continue;
            }
            items.push(InstalledItem {
                kind: ItemKind::Lexer,
                files: vec![
                    file_path(lexlib.join(format!("{}{}", name, LEXER_EXT))),
                    file_path(lexlib.join(format!("{}{}", name, LEXMAP_EXT))),
                    file_path(acp.join(format!("{}{}", name, ACP_EXT))),
                ],
                name,
                module: None,
            });
        }

        let lexliblite = self.layout.data_subdir(LEXLIBLITE_DIR);
        for name in self.stems_with_ext(&lexliblite, &[LITE_LEXER_EXT])? {
            if exclude.lexers_lite.contains(&name) {
                continue;
            }
            items.push(InstalledItem {
                kind: ItemKind::Lexer,
                files: vec![file_path(
                    lexliblite.join(format!("{}{}", name, LITE_LEXER_EXT)),
                )],
                name: format!("{} ^", name),
                module: None,
            });
        }

        let snippets = self.layout.data_subdir(SNIPPETS_DIR);
        let mut snippet_dirs = self.names_in(&snippets)?;
        snippet_dirs.sort();
        for name in snippet_dirs {
            if exclude.snippets.contains(&name) {
                continue;
            }
            items.push(InstalledItem {
                kind: ItemKind::Snippets,
                files: vec![dir_path(snippets.join(&name))],
                name,
                module: None,
            });
        }

        let themes = self.layout.data_subdir(THEMES_DIR);
        for name in self.stems_with_ext(&themes, &[THEME_SYNTAX_EXT, THEME_UI_EXT])? {
            if exclude.themes.contains(&name) {
                continue;
            }
            items.push(InstalledItem {
                kind: ItemKind::Theme,
                files: vec![
                    file_path(themes.join(format!("{}{}", name, THEME_SYNTAX_EXT))),
                    file_path(themes.join(format!("{}{}", name, THEME_UI_EXT))),
                ],
                name,
                module: None,
            });
        }

        let lang = self.layout.data_subdir(LANG_DIR);
        for name in self.stems_with_ext(&lang, &[TRANSLATION_EXT])? {
            if exclude.translations.contains(&name) {
                continue;
            }
            items.push(InstalledItem {
                kind: ItemKind::Translation,
                files: vec![file_path(lang.join(format!("{}{}", name, TRANSLATION_EXT)))],
                name,
                module: None,
            });
        }

        debug!("Found {} installed item(s)", items.len());
        Ok(items)
    }

    /// `<py>/<module>/install.inf`
    pub fn module_manifest(&self, module: &str) -> PathBuf {
        self.layout.module_dir(module).join(MANIFEST_NAME)
    }

    fn module_info(&self, module: &str, key: &str) -> Option<String> {
        let path = self.module_manifest(module);
        match inifile::load(self.runtime, &path) {
            Ok(doc) => doc
                .get_from(Some("info"), key)
                .filter(|v| !v.is_empty())
                .map(String::from),
            Err(e) => {
                warn!("Cannot read {:?}: {:#}", path, e);
                None
            }
        }
    }

    /// Display title of a plugin, falling back to the module name.
    pub fn module_title(&self, module: &str) -> String {
        self.module_info(module, "title")
            .unwrap_or_else(|| module.to_string())
    }

    pub fn module_homepage(&self, module: &str) -> String {
        self.module_info(module, "homepage").unwrap_or_default()
    }

    /// First existing file among `names`, trying `<module>/readme/<name>`
    /// before `<module>/<name>` for each name.
    fn find_doc(&self, module: &str, names: &[&str]) -> Option<PathBuf> {
        let dir = self.layout.module_dir(module);
        names
            .iter()
            .flat_map(|name| [dir.join("readme").join(name), dir.join(name)])
            .find(|path| self.runtime.is_file(path))
    }

    pub fn module_readme(&self, module: &str) -> Option<PathBuf> {
        self.find_doc(module, README_NAMES)
    }

    pub fn module_history(&self, module: &str) -> Option<PathBuf> {
        self.find_doc(module, HISTORY_NAMES)
    }

    /// Let the user pick an installed plugin (shown by title).
    ///
    /// Returns the module name, or `None` if the user cancelled.
    pub fn choose_installed(&self, caption: &str, exclude: &[String]) -> Result<Option<String>> {
        let modules: Vec<String> = self
            .installed_modules()?
            .into_iter()
            .filter(|m| !exclude.contains(m))
            .collect();
        let titles: Vec<String> = modules.iter().map(|m| self.module_title(m)).collect();

        let picked = self.runtime.choose(caption, &titles)?;
        Ok(picked.and_then(|i| modules.get(i).cloned()))
    }
}
