use std::fmt;

use crate::{
    database::ExternalDatabase,
    err::{Context, Result},
};

/// Driver-neutral options used to open connections to an [`ExternalDatabase`]
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionOptions {
    /// Creates the connection options for the supplied database.
    ///
    /// Fails if the database is unavailable.
    pub fn from_database(driver: impl Into<String>, database: &ExternalDatabase) -> Result<Self> {
        let driver = driver.into();
        let db = database
            .as_provided()
            .with_context(|| format!("Cannot create {driver} connection options, database is unavailable"))?;

        Ok(Self {
            driver,
            host: db.hostname().to_string(),
            port: db.port(),
            database: db.database().to_string(),
            user: db.username().to_string(),
            password: db.password().to_string(),
        })
    }

    /// Gets the EZConnect string, in the format //host:port/database
    pub fn connect_string(&self) -> String {
        format!("//{}:{}/{}", self.host, self.port, self.database)
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
