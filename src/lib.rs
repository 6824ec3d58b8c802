pub mod application;
pub mod archive;
pub mod cleanup;
pub mod commands;
pub mod discovery;
pub mod error;
pub mod inifile;
pub mod layout;
pub mod manifest;
pub mod registry;
pub mod runtime;
pub mod trash;
