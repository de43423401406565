use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Deserializer, Value};

/// Parses the supplied string as a yaml config value
pub fn parse_config<'a>(conf_str: impl Into<&'a str>) -> Result<Value> {
    let conf_str = conf_str.into();

    if conf_str.trim().is_empty() {
        return Ok(Value::Null);
    }

    Value::deserialize(Deserializer::from_str(conf_str))
        .context("Failed to parse configuration yaml")
}

/// Interprets an environment flag, accepting "1", "true" or "yes"
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
