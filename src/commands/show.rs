use anyhow::{Result, bail};
use log::debug;

use crate::discovery::Discovery;
use crate::layout::PLUGIN_ROOT;
use crate::registry::Registry;
use crate::runtime::Runtime;

use super::config::Config;

/// Show detailed information about an installed plugin
#[tracing::instrument(skip(runtime, config))]
pub fn show<R: Runtime>(runtime: R, module: &str, config: Config) -> Result<()> {
    let discovery = Discovery::new(&runtime, &config.layout);
    let manifest = discovery.module_manifest(module);
    debug!("Reading plugin info from {:?}", manifest);

    if !runtime.is_file(&manifest) {
        bail!("Plugin {} is not installed.", module);
    }

    println!("Plugin: {}", discovery.module_title(module));
    println!("Module: {}", module);
    println!("Directory: {}", config.layout.module_dir(module).display());

    let homepage = discovery.module_homepage(module);
    if !homepage.is_empty() {
        println!("Homepage: {}", homepage);
    }
    if let Some(readme) = discovery.module_readme(module) {
        println!("Readme: {}", readme.display());
    }
    if let Some(history) = discovery.module_history(module) {
        println!("History: {}", history.display());
    }

    let registry = Registry::new(&runtime, config.layout.registry_path());
    let marker = format!("{}/", module);
    let recorded = registry.entries()?.into_iter().find(|(_, entry)| {
        entry.destination == PLUGIN_ROOT && entry.files == [marker.as_str()]
    });
    match recorded {
        Some((id, entry)) => println!("Package: {} (version '{}')", id, entry.version),
        None => println!("Package: (not recorded)"),
    }
    Ok(())
}
