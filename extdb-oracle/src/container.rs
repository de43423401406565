use std::time::Duration;

use extdb_core::{
    config::ContainerConfig,
    database::{ExternalDatabase, ProvidedDatabase},
    err::{Context, Result},
};
use extdb_locator::{DatabaseProvider, Memoized};
use extdb_logging::info;
use extdb_util_docker::{docker_available, poll_until, start_container, Container, ContainerSpec};
use once_cell::sync::OnceCell;

use crate::connection::{create_connection, HELLO_QUERY};

/// The listener port inside the container
pub const ORACLE_PORT: u16 = 1521;
/// Logged by the image once the pluggable databases are open
pub const READY_LOG: &str = "DATABASE IS READY TO USE!";

/// The database every lookup in this process shares
static SHARED_CONTAINER: OnceCell<Memoized<OracleContainerProvider>> = OnceCell::new();

/// Gets the process-wide container provider.
///
/// The container is started at most once per process, using the config
/// supplied by the first caller.
pub fn shared_container(conf: &ContainerConfig) -> &'static Memoized<OracleContainerProvider> {
    SHARED_CONTAINER.get_or_init(|| Memoized::new(OracleContainerProvider::new(conf.clone())))
}

/// Provides an Oracle instance running in docker.
///
/// This is expensive, use [`shared_container`] rather than evaluating it directly.
pub struct OracleContainerProvider {
    conf: ContainerConfig,
    /// Container started without reuse, removed along with the provider
    /// or when the process exits
    container: OnceCell<Container>,
}

impl OracleContainerProvider {
    pub fn new(conf: ContainerConfig) -> Self {
        Self {
            conf,
            container: OnceCell::new(),
        }
    }

    pub fn spec(&self) -> ContainerSpec {
        let mut spec = ContainerSpec::new(&self.conf.image)
            .with_port(ORACLE_PORT)
            .with_env("ORACLE_PASSWORD", &self.conf.password)
            .with_env("APP_USER", &self.conf.username)
            .with_env("APP_USER_PASSWORD", &self.conf.password)
            .with_reuse(self.conf.reuse)
            .with_ready_log(READY_LOG)
            .with_startup_timeout(self.conf.startup_timeout());

        // the image creates FREEPDB1 by default
        if !self.conf.database.eq_ignore_ascii_case("FREEPDB1") {
            spec = spec.with_env("ORACLE_DATABASE", &self.conf.database);
        }

        if let Some(name) = self.conf.name.as_ref() {
            spec = spec.with_name(name);
        }

        spec
    }
}

impl DatabaseProvider for OracleContainerProvider {
    fn name(&self) -> &str {
        "oracle-container"
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        if !docker_available() {
            info!("Docker is not available, cannot start Oracle container");
            return Ok(ExternalDatabase::Unavailable);
        }

        let spec = self.spec();
        spec.validate()
            .context("Invalid Oracle container config, reuse requires a container name")?;
        let container = start_container(spec)?;

        let db: ExternalDatabase = ProvidedDatabase::builder()
            .hostname(container.host().to_string())
            .port(container.host_port(ORACLE_PORT)?)
            .database(&self.conf.database)
            .username(&self.conf.username)
            .password(&self.conf.password)
            .verified()
            .build()?
            .into();

        poll_until(Duration::from_secs(10), Duration::from_millis(100), || {
            let conn = create_connection(&db)?;
            conn.query_row_as::<String>(HELLO_QUERY, &[])?;
            Ok(())
        })
        .context("Oracle container did not answer queries")?;

        if self.conf.reuse {
            // picked up again by the next run
            let id = container.detach();
            info!("Oracle container {id} ready at {db}, left running for reuse");
        } else {
            container.remove_on_exit()?;
            info!("Oracle container {} ready at {db}", container.id());
            // on a second start the extra container is dropped and removed
            let _ = self.container.set(container);
        }

        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, ffi::OsString, path::Path};

    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    /// Replaces `PATH` until dropped
    struct PathOverride(Option<OsString>);

    impl PathOverride {
        fn new(dir: &Path) -> Self {
            let old = env::var_os("PATH");
            env::set_var("PATH", dir);
            Self(old)
        }
    }

    impl Drop for PathOverride {
        fn drop(&mut self) {
            match self.0.take() {
                Some(path) => env::set_var("PATH", path),
                None => env::remove_var("PATH"),
            }
        }
    }

    #[test]
    fn test_container_spec_defaults() {
        let spec = OracleContainerProvider::new(ContainerConfig::default()).spec();

        assert_eq!(spec.image, "gvenzl/oracle-free:23.3-slim");
        assert_eq!(spec.name, Some("extdb-oracle".to_string()));
        assert_eq!(spec.ports, vec![ORACLE_PORT]);
        assert_eq!(spec.reuse, true);
        assert_eq!(spec.ready_log, Some(READY_LOG.to_string()));
        assert_eq!(spec.startup_timeout, Duration::from_secs(200));
        assert_eq!(
            spec.env,
            vec![
                ("ORACLE_PASSWORD".to_string(), "test".to_string()),
                ("APP_USER".to_string(), "test".to_string()),
                ("APP_USER_PASSWORD".to_string(), "test".to_string()),
            ]
        );
    }

    #[test]
    fn test_container_spec_custom_database() {
        let spec = OracleContainerProvider::new(ContainerConfig {
            database: "TESTPDB".into(),
            name: None,
            reuse: false,
            ..ContainerConfig::default()
        })
        .spec();

        assert_eq!(spec.name, None);
        assert_eq!(spec.reuse, false);
        assert!(spec.validate().is_ok());
        assert!(spec
            .env
            .contains(&("ORACLE_DATABASE".to_string(), "TESTPDB".to_string())));
    }

    #[test]
    fn test_shared_container_is_singleton() {
        let first = shared_container(&ContainerConfig::default());
        let second = shared_container(&ContainerConfig {
            image: "other".into(),
            ..ContainerConfig::default()
        });

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.name(), "oracle-container");
    }

    #[test]
    fn test_unnamed_reuse_is_invalid() {
        let spec = OracleContainerProvider::new(ContainerConfig {
            name: None,
            ..ContainerConfig::default()
        })
        .spec();

        assert!(spec.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_provide_without_docker_is_cached() {
        let empty = tempfile::tempdir().unwrap();
        let provider = Memoized::new(OracleContainerProvider::new(ContainerConfig::default()));

        {
            let _path = PathOverride::new(empty.path());
            assert_eq!(docker_available(), false);
            assert_eq!(provider.provide().unwrap(), ExternalDatabase::Unavailable);
        }

        assert_eq!(provider.get(), Some(&ExternalDatabase::Unavailable));
        assert_eq!(provider.provide().unwrap(), ExternalDatabase::Unavailable);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_provide_rejects_unnamed_reuse() {
        use std::{fs, os::unix::fs::PermissionsExt};

        // a docker which reports success for every command
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("docker");
        fs::write(&bin, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
        let _path = PathOverride::new(dir.path());

        let provider = OracleContainerProvider::new(ContainerConfig {
            name: None,
            ..ContainerConfig::default()
        });

        assert_eq!(
            provider.provide().unwrap_err().to_string(),
            "Invalid Oracle container config, reuse requires a container name"
        );
    }
}
