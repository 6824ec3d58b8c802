use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::application::InstallAction;
use crate::archive::classify_archive;
use crate::manifest::{AddonKind, Classification};
use crate::registry::{Registry, package_id};
use crate::runtime::Runtime;

use super::config::Config;

fn print_classification(classification: &Classification) {
    println!("Type: {}", classification.kind);
    println!("Destination: {}", classification.destination);
    if !classification.subdir.is_empty() {
        println!("Subdir: {}", classification.subdir);
    }
    println!("Files:");
    for file in &classification.files {
        println!("  {}", file);
    }
}

/// Show how a package archive would be installed
#[tracing::instrument(skip(runtime))]
pub fn inspect<R: Runtime>(runtime: R, archive: &Path) -> Result<()> {
    match classify_archive(&runtime, archive)? {
        Some(classification) => print_classification(&classification),
        None => println!("{} is not an add-on package.", archive.display()),
    }
    Ok(())
}

/// Install a downloaded package archive and record its version
#[tracing::instrument(skip(runtime, config))]
pub fn install<R: Runtime>(
    runtime: R,
    url: &str,
    archive: &Path,
    version: &str,
    config: Config,
) -> Result<()> {
    debug!("Installing {:?} from {}", archive, url);
    let action = InstallAction::new(&runtime, &config.layout);
    let classification = action.install(url, archive, version)?;

    let target = match classification.kind {
        AddonKind::Plugin => config.layout.module_dir(&classification.subdir),
        _ => config.layout.resolve(&classification.destination),
    };
    println!(
        "Installed {} ({}) into {}",
        package_id(url),
        classification.kind,
        target.display()
    );
    Ok(())
}

/// Record a package as installed without unpacking it
#[tracing::instrument(skip(runtime, config))]
pub fn register<R: Runtime>(
    runtime: R,
    url: &str,
    archive: &Path,
    version: &str,
    config: Config,
) -> Result<()> {
    let registry = Registry::new(&runtime, config.layout.registry_path());
    match registry.save_from_archive(url, archive, version)? {
        Some(classification) => println!(
            "Recorded {} ({}) version '{}'",
            package_id(url),
            classification.kind,
            version
        ),
        None => println!(
            "{} is not an add-on package, nothing recorded.",
            archive.display()
        ),
    }
    Ok(())
}
