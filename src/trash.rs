use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::error::AddonError;
use crate::runtime::Runtime;

/// Moves removed add-on directories into a trash directory instead of
/// deleting them.
pub struct Trash<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> Trash<'a, R> {
    pub fn new(runtime: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            root: root.into(),
        }
    }

    /// Trash path for `dir`: `<root>/<basename>`, with `_` appended until
    /// the name is free.
    fn target_for(&self, dir: &Path) -> PathBuf {
        let mut name = dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let mut target = self.root.join(&name);
        while self.runtime.exists(&target) {
            name.push("_");
            target = self.root.join(&name);
        }
        target
    }

    /// Move `dir` into the trash.
    ///
    /// Returns `Ok(None)` when `dir` is not a directory, and the new location
    /// otherwise. A failed rename yields [`AddonError::RenameFailure`] and
    /// leaves `dir` where it was.
    #[tracing::instrument(skip(self))]
    pub fn remove_dir(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if !self.runtime.is_dir(dir) {
            debug!("{:?} is not a directory, nothing to remove", dir);
            return Ok(None);
        }

        let target = self.target_for(dir);

        if !self.runtime.exists(&self.root) {
            self.runtime.create_dir_all(&self.root)?;
        }

        if let Err(e) = self.runtime.rename(dir, &target) {
            warn!("Cannot move {:?} to {:?}: {:#}", dir, target, e);
            return Err(AddonError::RenameFailure {
                dir: dir.to_path_buf(),
                reason: format!("{:#}", e),
            }
            .into());
        }

        info!("Moved {} to {}", dir.display(), target.display());
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_remove_dir_moves_into_trash() -> Result<()> {
        let dir = tempdir()?;
        let module = dir.path().join("py/cuda_foo");
        fs::create_dir_all(&module)?;
        fs::write(module.join("__init__.py"), "")?;
        let trash_root = dir.path().join("py/__trash");

        let trash = Trash::new(&RealRuntime, &trash_root);
        let moved = trash.remove_dir(&module)?.unwrap();

        assert_eq!(moved, trash_root.join("cuda_foo"));
        assert!(!module.exists());
        assert!(moved.join("__init__.py").exists());
        Ok(())
    }

    #[test]
    fn test_remove_dir_appends_suffix_on_collision() -> Result<()> {
        let dir = tempdir()?;
        let trash_root = dir.path().join("trash");
        fs::create_dir_all(trash_root.join("cuda_foo"))?;
        fs::create_dir_all(trash_root.join("cuda_foo_"))?;
        let module = dir.path().join("py/cuda_foo");
        fs::create_dir_all(&module)?;

        let trash = Trash::new(&RealRuntime, &trash_root);
        let moved = trash.remove_dir(&module)?.unwrap();

        assert_eq!(moved, trash_root.join("cuda_foo__"));
        assert!(trash_root.join("cuda_foo").is_dir());
        assert!(trash_root.join("cuda_foo_").is_dir());
        Ok(())
    }

    #[test]
    fn test_remove_missing_dir_is_noop() -> Result<()> {
        let dir = tempdir()?;
        let trash_root = dir.path().join("trash");

        let trash = Trash::new(&RealRuntime, &trash_root);
        assert_eq!(trash.remove_dir(&dir.path().join("py/absent"))?, None);
        assert!(!trash_root.exists());
        Ok(())
    }

    #[test]
    fn test_rename_failure_is_reported() {
        let mut runtime = MockRuntime::new();
        let module = PathBuf::from("/app/py/cuda_locked");
        let trash_root = PathBuf::from("/app/py/__trash");

        runtime
            .expect_is_dir()
            .with(eq(module.clone()))
            .returning(|_| true);
        runtime
            .expect_exists()
            .with(eq(trash_root.join("cuda_locked")))
            .returning(|_| false);
        runtime
            .expect_exists()
            .with(eq(trash_root.clone()))
            .returning(|_| true);
        runtime
            .expect_rename()
            .with(eq(module.clone()), eq(trash_root.join("cuda_locked")))
            .returning(|_, _| Err(anyhow::anyhow!("Permission denied")));

        let trash = Trash::new(&runtime, &trash_root);
        let err = trash.remove_dir(&module).unwrap_err();

        match err.downcast_ref::<AddonError>() {
            Some(AddonError::RenameFailure { dir, reason }) => {
                assert_eq!(dir, &module);
                assert!(reason.contains("Permission denied"));
            }
            other => panic!("expected RenameFailure, got {:?}", other),
        }
        assert_eq!(err.to_string(), "Cannot remove folder:\n/app/py/cuda_locked");
    }

    #[test]
    fn test_trash_root_created_on_demand() {
        let mut runtime = MockRuntime::new();
        let module = PathBuf::from("/app/py/cuda_foo");
        let trash_root = PathBuf::from("/app/py/__trash");

        runtime.expect_is_dir().returning(|_| true);
        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(trash_root.clone()))
            .times(1)
            .returning(|_| Ok(()));
        runtime.expect_rename().returning(|_, _| Ok(()));

        let trash = Trash::new(&runtime, &trash_root);
        assert_eq!(
            trash.remove_dir(&module).unwrap(),
            Some(trash_root.join("cuda_foo"))
        );
    }
}
