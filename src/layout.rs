//! Directory layout of an editor installation.
//!
//! A [`Layout`] is built once from the application root and passed to every
//! component; nothing resolves paths from global state.

use anyhow::{Context, Result};
use log::info;
use std::path::{Component, Path, PathBuf};

use crate::runtime::Runtime;

/// Root-relative directory holding Python plugins.
pub const PLUGIN_ROOT: &str = "py";
/// Root-relative directory holding data packages.
pub const DATA_ROOT: &str = "data";
pub const SETTINGS_DIR: &str = "settings";
pub const TRASH_DIR: &str = "__trash";
pub const REGISTRY_FILE: &str = "packages.ini";

pub const LEXLIB_DIR: &str = "lexlib";
pub const LEXLIBLITE_DIR: &str = "lexliblite";
pub const AUTOCOMPLETE_DIR: &str = "autocomplete";
pub const LANG_DIR: &str = "lang";
pub const SNIPPETS_DIR: &str = "snippets";
pub const THEMES_DIR: &str = "themes";

/// Well-known application directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
    Plugins,
    Data,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    trash: PathBuf,
}

impl Layout {
    /// Layout rooted at `root` with the trash inside the plugin directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let trash = root.join(PLUGIN_ROOT).join(TRASH_DIR);
        Self { root, trash }
    }

    pub fn with_trash(mut self, trash: impl Into<PathBuf>) -> Self {
        self.trash = trash.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash
    }

    pub fn resolve_dir(&self, dir: AppDir) -> PathBuf {
        match dir {
            AppDir::Plugins => self.root.join(PLUGIN_ROOT),
            AppDir::Data => self.root.join(DATA_ROOT),
            AppDir::Settings => self.root.join(SETTINGS_DIR),
        }
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.resolve_dir(AppDir::Plugins)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.resolve_dir(AppDir::Data)
    }

    /// `<data>/<name>`, e.g. `data/lexlib`.
    pub fn data_subdir(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }

    /// `<py>/<module>`
    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.plugins_dir().join(module)
    }

    /// `<settings>/packages.ini`
    pub fn registry_path(&self) -> PathBuf {
        self.resolve_dir(AppDir::Settings).join(REGISTRY_FILE)
    }

    /// Turn a `/`-separated destination fragment into an absolute path.
    ///
    /// An empty fragment resolves to the root itself.
    pub fn resolve(&self, fragment: &str) -> PathBuf {
        fragment
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

/// True when `fragment` stays below the directory it is joined to: relative
/// and made only of plain names (no `..`, `.`, root or drive prefix).
pub fn is_contained(fragment: &str) -> bool {
    Path::new(fragment)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// Default application root: `<config_dir>/cudatext`.
#[tracing::instrument(skip(runtime))]
pub fn default_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let config_dir = runtime
        .config_dir()
        .context("Could not find the user config directory")?;
    let root = config_dir.join("cudatext");
    info!("Using application root: {}", root.display());
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_well_known_dirs() {
        let layout = Layout::new("/app");

        assert_eq!(layout.plugins_dir(), PathBuf::from("/app/py"));
        assert_eq!(layout.data_dir(), PathBuf::from("/app/data"));
        assert_eq!(
            layout.resolve_dir(AppDir::Settings),
            PathBuf::from("/app/settings")
        );
        assert_eq!(
            layout.registry_path(),
            PathBuf::from("/app/settings/packages.ini")
        );
        assert_eq!(layout.trash_dir(), Path::new("/app/py/__trash"));
        assert_eq!(
            layout.module_dir("cuda_foo"),
            PathBuf::from("/app/py/cuda_foo")
        );
        assert_eq!(
            layout.data_subdir(LEXLIB_DIR),
            PathBuf::from("/app/data/lexlib")
        );
    }

    #[test]
    fn test_custom_trash() {
        let layout = Layout::new("/app").with_trash("/var/trash");
        assert_eq!(layout.trash_dir(), Path::new("/var/trash"));
    }

    #[test]
    fn test_resolve_fragment() {
        let layout = Layout::new("/app");

        assert_eq!(layout.resolve("py"), PathBuf::from("/app/py"));
        assert_eq!(
            layout.resolve("data/lexliblite"),
            PathBuf::from("/app/data/lexliblite")
        );
        assert_eq!(layout.resolve("data/"), PathBuf::from("/app/data"));
        assert_eq!(layout.resolve(""), PathBuf::from("/app"));
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained("cuda_spell"));
        assert!(is_contained("snippets/html"));
        assert!(is_contained(""));

        assert!(!is_contained("/tmp/outside"));
        assert!(!is_contained("../../escaped"));
        assert!(!is_contained("themes/../../x"));
        assert!(!is_contained("./themes"));
    }

    #[test]
    fn test_default_root() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_config_dir()
            .returning(|| Some(PathBuf::from("/home/user/.config")));

        let root = default_root(&runtime).unwrap();
        assert_eq!(root, PathBuf::from("/home/user/.config/cudatext"));
    }

    #[test]
    fn test_default_root_without_config_dir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_config_dir().returning(|| None);

        let err = default_root(&runtime).unwrap_err();
        assert!(err.to_string().contains("config directory"));
    }
}
