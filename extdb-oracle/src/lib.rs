//! Locates an Oracle database for integration tests, either a local
//! install or a container started through docker.

use extdb_core::{config::TestSupportConfig, database::ExternalDatabase};
use extdb_locator::{guarded, DatabaseProvider, Guard};
use extdb_logging::warn;

mod connection;
pub use connection::*;
mod container;
pub use container::*;
pub mod ddl;
mod local;
pub use local::*;

/// Driver name used for the connection options
pub const DRIVER: &str = "oracle";

/// There are no Oracle images for these architectures
const UNSUPPORTED_ARCHS: &[&str] = &["aarch64"];

/// Returns a database either hosted locally or running inside docker.
///
/// The configuration is loaded with [`TestSupportConfig::load`]. If no
/// database can be found the unavailable sentinel is returned.
pub fn database() -> ExternalDatabase {
    match TestSupportConfig::load() {
        Ok(conf) => database_with(&conf),
        Err(err) => {
            warn!("Failed to load test support config, Oracle is unavailable: {:?}", err);
            ExternalDatabase::Unavailable
        }
    }
}

/// Returns the first available Oracle database using the supplied config
pub fn database_with(conf: &TestSupportConfig) -> ExternalDatabase {
    locate(conf, &oracle_guards())
}

/// Conditions under which no Oracle database can be used at all
fn oracle_guards() -> [Guard<'static>; 2] {
    [
        Guard::unsupported_arch(UNSUPPORTED_ARCHS),
        Guard::new("Oracle client library not found", || !client_available()),
    ]
}

fn locate(conf: &TestSupportConfig, guards: &[Guard]) -> ExternalDatabase {
    let local = LocalProvider::new(conf.oracle.local.clone());
    let container = shared_container(&conf.oracle.container);

    guarded(
        guards,
        provider_order(conf.prefer_local_database, &local, container),
    )
}

/// Orders the providers according to the local preference
fn provider_order<'a>(
    prefer_local: bool,
    local: &'a dyn DatabaseProvider,
    container: &'a dyn DatabaseProvider,
) -> [&'a dyn DatabaseProvider; 2] {
    if prefer_local {
        [local, container]
    } else {
        [container, local]
    }
}
