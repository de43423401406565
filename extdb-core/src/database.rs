use std::{
    fmt,
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use enum_as_inner::EnumAsInner;

use crate::err::{bail, Context, Error, Result};

/// The default timeout used when probing an endpoint for reachability
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Describes a database endpoint which tests can run against.
///
/// Lookups never fail with an error when no database can be found,
/// instead they answer with the [`ExternalDatabase::Unavailable`] sentinel
/// so that callers can skip their tests.
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum ExternalDatabase {
    /// A database which was located or provisioned
    Provided(ProvidedDatabase),
    /// No usable database was found
    Unavailable,
}

impl ExternalDatabase {
    /// Returns the unavailable sentinel
    pub fn unavailable() -> Self {
        Self::Unavailable
    }

    /// Checks whether this database can be used.
    ///
    /// Depending on the [`Validation`] of a provided database this may
    /// open a TCP connection to the endpoint.
    pub fn check_validity(&self) -> bool {
        match self {
            Self::Provided(db) => db.check_validity(),
            Self::Unavailable => false,
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        self.as_provided().map(|db| db.hostname())
    }

    pub fn port(&self) -> Option<u16> {
        self.as_provided().map(|db| db.port())
    }

    pub fn database(&self) -> Option<&str> {
        self.as_provided().map(|db| db.database())
    }

    pub fn username(&self) -> Option<&str> {
        self.as_provided().map(|db| db.username())
    }

    pub fn password(&self) -> Option<&str> {
        self.as_provided().map(|db| db.password())
    }

    pub fn url(&self) -> Option<&str> {
        self.as_provided().map(|db| db.url())
    }
}

impl fmt::Display for ExternalDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provided(db) => write!(f, "{}", db.url()),
            Self::Unavailable => write!(f, "<unavailable>"),
        }
    }
}

impl From<ProvidedDatabase> for ExternalDatabase {
    fn from(db: ProvidedDatabase) -> Self {
        Self::Provided(db)
    }
}

/// How the validity of a provided database is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// The provider already proved the endpoint is reachable
    Verified,
    /// The endpoint is valid if a TCP connection succeeds within the timeout
    Probe(Duration),
}

impl Default for Validation {
    fn default() -> Self {
        Self::Probe(DEFAULT_PROBE_TIMEOUT)
    }
}

/// A located database endpoint and its credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ProvidedDatabase {
    hostname: String,
    port: u16,
    database: String,
    username: String,
    password: String,
    url: String,
    validation: Validation,
}

impl ProvidedDatabase {
    pub fn builder() -> ProvidedDatabaseBuilder {
        ProvidedDatabaseBuilder::default()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn check_validity(&self) -> bool {
        match self.validation {
            Validation::Verified => true,
            Validation::Probe(timeout) => self.probe(timeout).is_ok(),
        }
    }

    /// Attempts to open a TCP connection to the endpoint
    pub fn probe(&self, timeout: Duration) -> Result<()> {
        let addrs = (self.hostname.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("Failed to resolve {}:{}", self.hostname, self.port))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(_) => return Ok(()),
                Err(err) => last_err = Some(err),
            }
        }

        match last_err {
            Some(err) => Err(Error::new(err)
                .context(format!("Failed to connect to {}:{}", self.hostname, self.port))),
            None => bail!("No addresses found for {}:{}", self.hostname, self.port),
        }
    }
}

impl fmt::Debug for ProvidedDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvidedDatabase")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("validation", &self.validation)
            .finish()
    }
}

/// Builds a [`ProvidedDatabase`]
#[derive(Clone, Default)]
pub struct ProvidedDatabaseBuilder {
    hostname: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    url: Option<String>,
    validation: Validation,
}

impl ProvidedDatabaseBuilder {
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Overrides the connection url, otherwise it is derived from the endpoint
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Marks the endpoint as already proven to be reachable
    pub fn verified(self) -> Self {
        self.validation(Validation::Verified)
    }

    pub fn build(self) -> Result<ProvidedDatabase> {
        let hostname = self.hostname.context("Database hostname is required")?;
        let port = self.port.context("Database port is required")?;
        let database = self.database.context("Database name is required")?;
        let username = self.username.context("Database username is required")?;

        let url = self
            .url
            .unwrap_or_else(|| format!("oracle://{username}@{hostname}:{port}/{database}"));

        Ok(ProvidedDatabase {
            hostname,
            port,
            database,
            username,
            password: self.password.unwrap_or_default(),
            url,
            validation: self.validation,
        })
    }
}
