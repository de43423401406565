use std::time::Duration;

use extdb_core::{
    database::ExternalDatabase,
    err::{Context, Result},
    options::ConnectionOptions,
};
use extdb_logging::debug;
use extdb_util_r2d2::{ConnectionManager, PoolManager};
use oracle::{ConnStatus, Connection, Version};
use r2d2::PooledConnection;

use crate::DRIVER;

/// Trivial query used to check an instance answers
pub const HELLO_QUERY: &str = "SELECT 'Hello, Oracle' FROM sys.dual";

/// Whether the Oracle client library can be loaded
pub fn client_available() -> bool {
    match Version::client() {
        Ok(version) => {
            debug!("Found Oracle client library {version}");
            true
        }
        Err(err) => {
            debug!("Oracle client library not available: {err}");
            false
        }
    }
}

/// Opens a connection to the supplied database
pub fn create_connection(database: &ExternalDatabase) -> Result<Connection> {
    let options = ConnectionOptions::from_database(DRIVER, database)?;

    connect(&options)
}

fn connect(options: &ConnectionOptions) -> Result<Connection> {
    Connection::connect(&options.user, &options.password, options.connect_string())
        .with_context(|| format!("Failed to connect to Oracle at {}", options.connect_string()))
}

/// Opens pooled Oracle connections
#[derive(Debug)]
pub struct OracleConnectionManager {
    options: ConnectionOptions,
}

impl OracleConnectionManager {
    pub fn new(options: ConnectionOptions) -> Self {
        Self { options }
    }
}

impl ConnectionManager for OracleConnectionManager {
    type Connection = Connection;

    fn connect(&self) -> Result<Self::Connection> {
        connect(&self.options)
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<()> {
        conn.ping().context("Oracle connection failed ping")
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        !matches!(conn.status(), Ok(ConnStatus::Normal))
    }
}

/// A pooled source of connections to a database
#[derive(Clone)]
pub struct OracleDataSource {
    pool: r2d2::Pool<PoolManager<OracleConnectionManager>>,
}

impl OracleDataSource {
    /// Checks out a connection from the pool
    pub fn get(&self) -> Result<PooledConnection<PoolManager<OracleConnectionManager>>> {
        self.pool
            .get()
            .context("Failed to acquire Oracle connection from pool")
    }

    pub fn max_size(&self) -> u32 {
        self.pool.max_size()
    }
}

/// Creates a pooled data source for the supplied database.
///
/// Connections are opened lazily on checkout.
pub fn create_data_source(database: &ExternalDatabase) -> Result<OracleDataSource> {
    let options = ConnectionOptions::from_database(DRIVER, database)?;

    let pool = r2d2::Builder::new()
        .min_idle(Some(0))
        .max_size(10)
        .connection_timeout(Duration::from_secs(30))
        .build(OracleConnectionManager::new(options).into_pool_manager())
        .context("Failed to build connection pool")?;

    Ok(OracleDataSource { pool })
}

#[cfg(test)]
mod tests {
    use extdb_core::database::ProvidedDatabase;

    use super::*;

    fn mock_database() -> ExternalDatabase {
        ProvidedDatabase::builder()
            .hostname("localhost")
            .port(1521)
            .database("XEPDB1")
            .username("system")
            .password("oracle")
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_create_connection_unavailable() {
        assert_eq!(
            create_connection(&ExternalDatabase::Unavailable)
                .unwrap_err()
                .to_string(),
            "Cannot create oracle connection options, database is unavailable"
        );
    }

    #[test]
    fn test_create_data_source_unavailable() {
        assert!(create_data_source(&ExternalDatabase::Unavailable).is_err());
    }

    #[test]
    fn test_create_data_source_is_lazy() {
        let data_source = create_data_source(&mock_database()).unwrap();

        assert_eq!(data_source.max_size(), 10);
    }
}
