//! Bring an older configuration file up to date with the current fields.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("failed to parse {}: {}", path.display(), e)))?;

    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

fn default_mapping() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(_) => Err(AppError::Config("default configuration is not a mapping".into())),
        Err(e) => Err(AppError::Config(format!("failed to serialize defaults: {e}"))),
    }
}

/// Names of the configuration fields missing from the file at `path`.
pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;
    let defaults = default_mapping()?;

    Ok(defaults
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing field with its default value, keeping the values
/// already present. Returns the names of the added fields.
pub fn migrate_config(path: &Path) -> AppResult<Vec<String>> {
    let mut current = read_mapping(path)?;
    let defaults = default_mapping()?;

    let mut added = Vec::new();
    for (key, value) in defaults {
        if !current.contains_key(&key) {
            if let Some(name) = key.as_str() {
                added.push(name.to_string());
            }
            current.insert(key, value);
        }
    }

    if !added.is_empty() {
        let serialized = serde_yaml::to_string(&Value::Mapping(current)).map_err(|e| {
            AppError::Config(format!("failed to serialize {}: {}", path.display(), e))
        })?;
        fs::write(path, serialized)?;
    }

    Ok(added)
}
