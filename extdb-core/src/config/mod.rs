use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use serde_yaml::{from_value, Mapping, Value};

mod oracle;
pub use oracle::*;
mod util;
pub use util::*;

/// Path of an optional yaml file containing the [`TestSupportConfig`]
pub const CONFIG_PATH_ENV: &str = "EXTDB_TEST_CONFIG";
/// Overrides [`TestSupportConfig::prefer_local_database`]
pub const PREFER_LOCAL_ENV: &str = "EXTDB_TEST_PREFER_LOCAL_DATABASE";

/// Configures how tests locate their databases
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TestSupportConfig {
    /// Try the locally installed database before provisioning a container
    pub prefer_local_database: bool,
    /// Oracle options
    pub oracle: OracleConfig,
}

impl TestSupportConfig {
    /// Loads the config from the file named by `EXTDB_TEST_CONFIG`, falling
    /// back to the defaults, then applies any environment overrides
    pub fn load() -> Result<Self> {
        let mut conf = match env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Ok(prefer_local) = env::var(PREFER_LOCAL_ENV) {
            conf.prefer_local_database = is_truthy(&prefer_local);
        }

        Ok(conf)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from file {}", path.display()))?;

        Self::parse(data.as_str())
            .with_context(|| format!("Failed to load config from file {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        match parse_config(data)? {
            Value::Null => Ok(Self::default()),
            value => from_value(value).context("Failed to parse test support configuration"),
        }
    }
}
