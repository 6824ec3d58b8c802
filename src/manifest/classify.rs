use log::debug;
use serde::Serialize;

use super::{AddonKind, MANIFEST_NAME, Manifest};

/// Where a package goes and which root items it leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: AddonKind,
    /// Root-relative directory fragment, empty for unknown kinds.
    pub destination: String,
    /// Root items of the archive (manifest excluded), or `[subdir/]` for plugins.
    pub files: Vec<String>,
    pub subdir: String,
}

/// True for direct children of the archive root: names without `/`, or
/// whose only `/` is the trailing directory marker.
pub fn is_root_item(name: &str) -> bool {
    match name.rfind('/') {
        None => true,
        Some(n) => n == name.len() - 1 && !name[..n].contains('/'),
    }
}

/// Keep only root items, preserving order.
pub fn root_items<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.as_ref())
        .filter(|name| is_root_item(name))
        .map(String::from)
        .collect()
}

/// Classify an archive from its entry names and manifest.
///
/// Returns `None` when the manifest entry is not among `entries`.
pub fn classify<S: AsRef<str>>(entries: &[S], manifest: &Manifest) -> Option<Classification> {
    if !entries.iter().any(|e| e.as_ref() == MANIFEST_NAME) {
        debug!("No {} among {} archive entries", MANIFEST_NAME, entries.len());
        return None;
    }

    let candidates: Vec<&str> = entries
        .iter()
        .map(|e| e.as_ref())
        .filter(|name| *name != MANIFEST_NAME)
        .collect();

    let files = match manifest.kind {
        // A plugin installs as one whole directory
        AddonKind::Plugin => vec![format!("{}/", manifest.subdir)],
        _ => root_items(candidates.as_slice()),
    };

    Some(Classification {
        kind: manifest.kind,
        destination: manifest.kind.destination(&manifest.subdir),
        files,
        subdir: manifest.subdir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(subdir: &str) -> Manifest {
        Manifest::new(AddonKind::Lexer, subdir)
    }

    #[test]
    fn test_is_root_item() {
        assert!(is_root_item("readme.txt"));
        assert!(is_root_item("myplugin/"));
        assert!(!is_root_item("myplugin/main.py"));
        assert!(!is_root_item("a/b/"));
        assert!(!is_root_item("a/b/c.txt"));
    }

    #[test]
    fn test_lexer_archive_example() {
        let entries = ["install.inf", "myplugin/", "myplugin/main.py"];
        let result = classify(&entries, &lexer("x")).unwrap();

        assert_eq!(result.kind, AddonKind::Lexer);
        assert_eq!(result.destination, "data/lexlib");
        assert_eq!(result.files, vec!["myplugin/"]);
    }

    #[test]
    fn test_missing_manifest_is_absent() {
        let entries = ["Python.lcf", "Python.cuda-lexmap"];
        assert_eq!(classify(&entries, &lexer("")), None);

        let nested = ["sub/install.inf", "Python.lcf"];
        assert_eq!(classify(&nested, &lexer("")), None);
    }

    #[test]
    fn test_plugin_files_are_overridden() {
        let entries = [
            "install.inf",
            "__init__.py",
            "readme/",
            "readme/readme.txt",
            "history.txt",
        ];
        let manifest = Manifest::new(AddonKind::Plugin, "cuda_spell");
        let result = classify(&entries, &manifest).unwrap();

        assert_eq!(result.destination, "py");
        assert_eq!(result.files, vec!["cuda_spell/"]);
        assert_eq!(result.subdir, "cuda_spell");
    }

    #[test]
    fn test_destination_independent_of_entry_order() {
        let forward = ["install.inf", "Go.lcf", "Go.cuda-lexmap"];
        let backward = ["Go.cuda-lexmap", "Go.lcf", "install.inf"];

        for kind in [
            AddonKind::Plugin,
            AddonKind::Data,
            AddonKind::Lexer,
            AddonKind::LexerLite,
        ] {
            let manifest = Manifest::new(kind, "sub");
            let a = classify(&forward, &manifest).unwrap();
            let b = classify(&backward, &manifest).unwrap();
            assert_eq!(a.destination, b.destination);
            assert_eq!(a.destination, kind.destination("sub"));
        }
    }

    #[test]
    fn test_data_package_keeps_root_files_in_order() {
        let entries = [
            "install.inf",
            "Monokai.cuda-theme-syntax",
            "Monokai.cuda-theme-ui",
            "extras/",
            "extras/preview.png",
        ];
        let manifest = Manifest::new(AddonKind::Data, "themes");
        let result = classify(&entries, &manifest).unwrap();

        assert_eq!(result.destination, "data/themes");
        assert_eq!(
            result.files,
            vec!["Monokai.cuda-theme-syntax", "Monokai.cuda-theme-ui", "extras/"]
        );
    }

    #[test]
    fn test_unknown_kind_has_empty_destination() {
        let entries = ["install.inf", "file.txt"];
        let manifest = Manifest::parse("[info]\ntype=cudatext-widget\n").unwrap();
        let result = classify(&entries, &manifest).unwrap();

        assert_eq!(result.kind, AddonKind::Unknown);
        assert_eq!(result.destination, "");
        assert_eq!(result.files, vec!["file.txt"]);
    }

    #[test]
    fn test_root_filter_is_idempotent() {
        let entries = ["a.lcf", "b/", "b/c.lcf", "d/e/", "f"];
        let once = root_items(&entries);
        let twice = root_items(once.as_slice());

        assert_eq!(once, vec!["a.lcf", "b/", "f"]);
        assert_eq!(once, twice);
    }
}
