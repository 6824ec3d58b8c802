//! Application layer - Use cases that coordinate the archive, registry and
//! trash services.

mod install;
mod remove;

pub use install::InstallAction;
pub use remove::RemoveAction;
