use anyhow::{Result, anyhow};
use log::debug;

use crate::application::RemoveAction;
use crate::discovery::{Discovery, Exclusions, InstalledItem};
use crate::runtime::Runtime;

use super::config::Config;

/// Installed item whose plugin module or display name equals `name`.
fn find_item<R: Runtime>(discovery: &Discovery<'_, R>, name: &str) -> Result<InstalledItem> {
    discovery
        .installed_items(&Exclusions::default())?
        .into_iter()
        .find(|item| item.module.as_deref() == Some(name) || item.name == name)
        .ok_or_else(|| anyhow!("{} is not installed.", name))
}

fn show_removal_plan(item: &InstalledItem) {
    println!("The following will be removed:");
    for file in &item.files {
        println!("  {}", file);
    }
}

/// Remove an installed add-on, or a plugin picked from a menu
#[tracing::instrument(skip(runtime, config))]
pub fn remove<R: Runtime>(runtime: R, name: Option<&str>, yes: bool, config: Config) -> Result<()> {
    let discovery = Discovery::new(&runtime, &config.layout);

    let item = match name {
        Some(name) => find_item(&discovery, name)?,
        None => match discovery.choose_installed("Remove plugin:", &[])? {
            Some(module) => find_item(&discovery, &module)?,
            None => {
                println!("Removal cancelled.");
                return Ok(());
            }
        },
    };
    debug!("Removing {:?}", item);

    if !yes {
        show_removal_plan(&item);
        if !runtime.confirm("Proceed with removal?")? {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    let action = RemoveAction::new(&runtime, &config.layout);
    let removed = action.remove_item(&item)?;
    if removed.is_empty() {
        println!("Nothing to remove for {}.", item.name);
    } else {
        println!("Removed {}", item.name);
    }
    Ok(())
}
