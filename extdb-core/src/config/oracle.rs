use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options for locating an Oracle database
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// The locally installed instance
    pub local: LocalDatabaseConfig,
    /// The container started when no local instance is preferred
    pub container: ContainerConfig,
}

/// A database instance running at a fixed address
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalDatabaseConfig {
    pub hostname: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for LocalDatabaseConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".into(),
            port: 1521,
            database: "XEPDB1".into(),
            username: "system".into(),
            password: "oracle".into(),
        }
    }
}

/// A database instance provisioned through docker
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// The image to run
    pub image: String,
    /// The container name, used to find a running instance when reusing
    pub name: Option<String>,
    /// Whether a running container should be reused and left running afterwards
    pub reuse: bool,
    /// How long to wait for the container to boot, the image is large
    /// so this needs to be generous
    pub startup_timeout_secs: u64,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl ContainerConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            image: "gvenzl/oracle-free:23.3-slim".into(),
            name: Some("extdb-oracle".into()),
            reuse: true,
            startup_timeout_secs: 200,
            database: "FREEPDB1".into(),
            username: "test".into(),
            password: "test".into(),
        }
    }
}
