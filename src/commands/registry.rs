use anyhow::Result;

use crate::registry::{Registry, package_id};
use crate::runtime::Runtime;

use super::config::Config;

/// Print the recorded version of the package downloaded from `url`
#[tracing::instrument(skip(runtime, config))]
pub fn version<R: Runtime>(runtime: R, url: &str, config: Config) -> Result<()> {
    let registry = Registry::new(&runtime, config.layout.registry_path());
    println!("{}", registry.version_of_url(url));
    Ok(())
}

/// Print the full registry record of the package downloaded from `url`
#[tracing::instrument(skip(runtime, config))]
pub fn record<R: Runtime>(runtime: R, url: &str, config: Config) -> Result<()> {
    let id = package_id(url);
    let registry = Registry::new(&runtime, config.layout.registry_path());
    let entry = registry.require(id)?;

    println!("Package: {}", id);
    println!("Destination: {}", entry.destination);
    println!("Version: {}", entry.version);
    println!("Files:");
    for file in &entry.files {
        println!("  {}", file);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AddonError;
    use crate::layout::Layout;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_record_missing_entry() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let config = Config {
            layout: Layout::new("/app"),
        };
        let err = record(runtime, "https://host/plugin.Foo.zip", config).unwrap_err();

        match err.downcast_ref::<AddonError>() {
            Some(AddonError::RegistryEntryNotFound { id }) => assert_eq!(id, "plugin.Foo.zip"),
            other => panic!("expected RegistryEntryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_version_of_unreadable_registry_succeeds() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("Permission denied")));

        let config = Config {
            layout: Layout::new("/app"),
        };
        version(runtime, "https://host/plugin.Foo.zip", config).unwrap();
    }
}
