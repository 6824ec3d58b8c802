//! Domain errors of the add-on manager.
//!
//! Operations return `anyhow::Result`; these variants are the failures a
//! caller may want to tell apart, recoverable with `downcast_ref`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddonError {
    /// The archive has no `install.inf` at its root.
    #[error("Package {} has no install.inf, cannot install it", archive.display())]
    ManifestMissing { archive: PathBuf },

    /// The manifest `type` is not one of the known add-on kinds.
    #[error("Unsupported add-on type '{kind}'")]
    UnknownType { kind: String },

    /// Moving a directory into the trash failed; nothing was changed.
    #[error("Cannot remove folder:\n{}", dir.display())]
    RenameFailure { dir: PathBuf, reason: String },

    /// No registry record exists for the identifier.
    #[error("No record for '{id}' in the package registry")]
    RegistryEntryNotFound { id: String },

    /// The manifest `subdir` would place files outside its parent directory.
    #[error("Package declares subdir '{subdir}', which leaves the install directory")]
    UnsafeSubdir { subdir: String },

    /// The identifier cannot be stored as a registry section name.
    #[error("Invalid package identifier '{id}'")]
    InvalidIdentifier { id: String },
}
