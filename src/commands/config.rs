use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::layout::{Layout, default_root};
use crate::runtime::Runtime;

/// Settings shared by every command.
pub struct Config {
    pub layout: Layout,
}

impl Config {
    /// Build the configuration from the global CLI options.
    ///
    /// Without `root` the per-user default is used; without `trash` the
    /// trash lives under the plugin directory.
    pub fn new<R: Runtime>(runtime: &R, root: Option<PathBuf>, trash: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(path) => path,
            None => default_root(runtime)?,
        };
        let layout = match trash {
            Some(trash) => Layout::new(root).with_trash(trash),
            None => Layout::new(root),
        };
        debug!(
            "Using root {:?}, trash {:?}",
            layout.root(),
            layout.trash_dir()
        );
        Ok(Self { layout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::path::Path;

    #[test]
    fn test_explicit_root() {
        let runtime = MockRuntime::new();
        let config = Config::new(&runtime, Some(PathBuf::from("/opt/editor")), None).unwrap();

        assert_eq!(config.layout.root(), Path::new("/opt/editor"));
        assert_eq!(
            config.layout.trash_dir(),
            Path::new("/opt/editor/py/__trash")
        );
    }

    #[test]
    fn test_default_root_from_config_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_config_dir()
            .returning(|| Some(PathBuf::from("/home/user/.config")));

        let config = Config::new(&runtime, None, Some(PathBuf::from("/tmp/trash"))).unwrap();

        assert_eq!(
            config.layout.root(),
            Path::new("/home/user/.config/cudatext")
        );
        assert_eq!(config.layout.trash_dir(), Path::new("/tmp/trash"));
    }

    #[test]
    fn test_no_config_dir_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_config_dir().returning(|| None);

        assert!(Config::new(&runtime, None, None).is_err());
    }
}
