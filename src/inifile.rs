//! INI file access on top of the runtime.
//!
//! Both `install.inf` manifests and the `packages.ini` registry are flat
//! INI documents. Reads go through [`Runtime`] so they can be mocked.
//!
//! Values are stored verbatim: quotes and backslashes are neither
//! interpreted on read nor escaped on write, so a value always reads back
//! exactly as it was set.

use anyhow::{Context, Result};
use ::ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use std::path::Path;

use crate::runtime::Runtime;

/// Parse INI text.
pub fn parse(content: &str) -> Result<Ini> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };
    Ini::load_from_str_opt(content, options).context("Failed to parse INI content")
}

/// Load an INI file, treating a missing file as an empty document.
#[tracing::instrument(skip(runtime))]
pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Ini> {
    if !runtime.exists(path) {
        return Ok(Ini::new());
    }
    let content = runtime
        .read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    parse(&content).with_context(|| format!("Malformed INI file {:?}", path))
}

/// Serialize the whole document and write it to `path`.
#[tracing::instrument(skip(runtime, doc))]
pub fn store<R: Runtime>(runtime: &R, path: &Path, doc: &Ini) -> Result<()> {
    let mut buf = Vec::new();
    let options = WriteOption {
        escape_policy: EscapePolicy::Nothing,
        ..Default::default()
    };
    doc.write_to_opt(&mut buf, options)
        .context("Failed to serialize INI document")?;
    runtime
        .write(path, &buf)
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Read `key` from `section`, or `default` when either is absent.
pub fn read_or<'a>(doc: &'a Ini, section: &str, key: &str, default: &'a str) -> &'a str {
    doc.get_from(Some(section), key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_read_or_defaults() {
        let doc = parse("[info]\ntype=lexer\n").unwrap();
        assert_eq!(read_or(&doc, "info", "type", ""), "lexer");
        assert_eq!(read_or(&doc, "info", "subdir", ""), "");
        assert_eq!(read_or(&doc, "other", "type", "none"), "none");
    }

    #[test]
    fn test_semicolons_are_not_comments_inside_values() {
        let doc = parse("[p.zip]\nf=a.lcf;b.cuda-lexmap\n").unwrap();
        assert_eq!(read_or(&doc, "p.zip", "f", ""), "a.lcf;b.cuda-lexmap");
    }

    #[test]
    fn test_quotes_and_backslashes_are_literal() {
        let doc = parse("[a.zip]\nv=\"1.0\"\nw='q'\nf=C:\\addons\\x\n").unwrap();
        assert_eq!(read_or(&doc, "a.zip", "v", ""), "\"1.0\"");
        assert_eq!(read_or(&doc, "a.zip", "w", ""), "'q'");
        assert_eq!(read_or(&doc, "a.zip", "f", ""), "C:\\addons\\x");
    }

    #[test]
    fn test_store_writes_values_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("packages.ini");

        let mut doc = Ini::new();
        doc.with_section(Some("a.zip"))
            .set("v", "\"1.0\"")
            .set("f", "dir\\file");
        store(&RealRuntime, &path, &doc).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("v=\"1.0\""));
        assert!(text.contains("f=dir\\file"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/app/settings/packages.ini");

        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| false);

        let doc = load(&runtime, &path).unwrap();
        assert_eq!(doc.sections().flatten().count(), 0);
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("packages.ini");

        let mut doc = Ini::new();
        doc.with_section(Some("plugin.zip"))
            .set("d", "py")
            .set("f", "cuda_plugin/")
            .set("v", "2024.01.02");
        store(&RealRuntime, &path, &doc).unwrap();

        let loaded = load(&RealRuntime, &path).unwrap();
        assert_eq!(read_or(&loaded, "plugin.zip", "f", ""), "cuda_plugin/");
        assert_eq!(read_or(&loaded, "plugin.zip", "v", ""), "2024.01.02");
    }
}
