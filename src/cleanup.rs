use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::runtime::Runtime;

/// RAII guard for a scratch file.
///
/// The file is removed when the guard drops, on both the success and the
/// error path of whatever used it.
pub struct ScratchFile<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> ScratchFile<'a, R> {
    /// Register `path` for removal. The file need not exist yet.
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        debug!("Registered scratch file {:?}", path);
        Self { runtime, path }
    }

    /// Scratch path `<temp_dir>/<prefix>-<pid>-<seq>-<name>`, unique within the process.
    pub fn in_temp_dir(runtime: &'a R, prefix: &str, name: &str) -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let seq = NEXT.fetch_add(1, Ordering::Relaxed);
        let file_name = format!("{}-{}-{}-{}", prefix, std::process::id(), seq, name);
        let path = runtime.temp_dir().join(file_name);
        Self::new(runtime, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Runtime> Drop for ScratchFile<'_, R> {
    fn drop(&mut self) {
        if !self.runtime.exists(&self.path) {
            return;
        }
        debug!("Cleaning up: {:?}", self.path);
        if let Err(e) = self.runtime.remove_file(&self.path) {
            warn!("Failed to remove scratch file {:?}: {}", self.path, e);
        }
    }
}
