//! CLI command handlers. Each takes the runtime and a [`Config`] and prints
//! its result to stdout.

pub mod config;
mod install;
mod list;
mod registry;
mod remove;
mod show;

pub use config::Config;
pub use install::{inspect, install, register};
pub use list::{lexers, list, modules};
pub use registry::{record, version};
pub use remove::remove;
pub use show::show;
