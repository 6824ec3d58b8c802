use anyhow::Result;
use log::debug;

use crate::discovery::{Discovery, Exclusions, InstalledItem, ItemKind};
use crate::runtime::Runtime;

use super::config::Config;

fn heading(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Plugin => "Plugins",
        ItemKind::Lexer => "Lexers",
        ItemKind::Snippets => "Snippets",
        ItemKind::Theme => "Themes",
        ItemKind::Translation => "Translations",
    }
}

/// Render installed items grouped by kind, in discovery order.
pub(crate) fn render_items(items: &[InstalledItem]) -> String {
    let mut out = String::new();
    let mut current = None;
    for item in items {
        if current != Some(item.kind) {
            out.push_str(heading(item.kind));
            out.push_str(":\n");
            current = Some(item.kind);
        }
        match &item.module {
            Some(module) if module != &item.name => {
                out.push_str(&format!("  {} ({})\n", item.name, module));
            }
            _ => out.push_str(&format!("  {}\n", item.name)),
        }
    }
    out
}

/// List every installed add-on
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: R, config: Config, json: bool) -> Result<()> {
    debug!("Listing add-ons under {:?}", config.layout.root());
    let discovery = Discovery::new(&runtime, &config.layout);
    let items = discovery.installed_items(&Exclusions::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No add-ons installed.");
        return Ok(());
    }
    print!("{}", render_items(&items));
    Ok(())
}

/// Print installed plugin module names, one per line
#[tracing::instrument(skip(runtime, config))]
pub fn modules<R: Runtime>(runtime: R, config: Config) -> Result<()> {
    let discovery = Discovery::new(&runtime, &config.layout);
    for module in discovery.installed_modules()? {
        println!("{}", module);
    }
    Ok(())
}

/// Print installed lexer names, one per line
#[tracing::instrument(skip(runtime, config))]
pub fn lexers<R: Runtime>(runtime: R, config: Config) -> Result<()> {
    let discovery = Discovery::new(&runtime, &config.layout);
    for lexer in discovery.installed_lexers()? {
        println!("{}", lexer);
    }
    Ok(())
}
