//! Remove action - moves add-ons out of the installation and forgets them.

use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::discovery::InstalledItem;
use crate::layout::Layout;
use crate::registry::Registry;
use crate::runtime::Runtime;
use crate::trash::Trash;

pub struct RemoveAction<'a, R: Runtime> {
    runtime: &'a R,
    layout: &'a Layout,
    trash: Trash<'a, R>,
    registry: Registry<'a, R>,
}

impl<'a, R: Runtime> RemoveAction<'a, R> {
    pub fn new(runtime: &'a R, layout: &'a Layout) -> Self {
        Self {
            runtime,
            layout,
            trash: Trash::new(runtime, layout.trash_dir()),
            registry: Registry::new(runtime, layout.registry_path()),
        }
    }

    /// Trash a plugin directory and drop its registry record.
    ///
    /// Returns the trash location, or `None` if the plugin directory did not
    /// exist (the registry is left alone in that case).
    #[tracing::instrument(skip(self))]
    pub fn remove_plugin(&self, module: &str) -> Result<Option<PathBuf>> {
        let Some(moved) = self.trash.remove_dir(&self.layout.module_dir(module))? else {
            return Ok(None);
        };
        self.registry.remove_plugin(module)?;
        Ok(Some(moved))
    }

    /// Remove every file of an installed item.
    ///
    /// Directories (paths ending with `/`) go to the trash, plain files are
    /// deleted, missing files are skipped. Returns the paths that were
    /// removed.
    #[tracing::instrument(skip(self, item), fields(name = %item.name))]
    pub fn remove_item(&self, item: &InstalledItem) -> Result<Vec<PathBuf>> {
        if let Some(module) = &item.module {
            return Ok(self
                .remove_plugin(module)?
                .map(|_| self.layout.module_dir(module))
                .into_iter()
                .collect());
        }

        let mut removed = Vec::new();
        for file in &item.files {
            if let Some(dir) = file.strip_suffix('/') {
                let dir = PathBuf::from(dir);
                if self.trash.remove_dir(&dir)?.is_some() {
                    removed.push(dir);
                }
                continue;
            }

            let path = PathBuf::from(file);
            if !self.runtime.is_file(&path) {
                debug!("{:?} not present, skipping", path);
                continue;
            }
            self.runtime.remove_file(&path)?;
            removed.push(path);
        }
        Ok(removed)
    }
}
