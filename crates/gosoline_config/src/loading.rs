//! Loading a config from its dumped defaults, config files and `path=value` overrides.
//!
//! Values are applied in order: defaults, then each config file in the given order, then the
//! overrides. The result is unflattened into a nested JSON value, deserialized and validated.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};
use validator::Validate;

use crate::{ConfigError, ConfigMap, ParamPath, SerializationType, SerializedContent, FIELD_SEPARATOR};

/// Loads a typed config. `defaults` is the dump of the config's default instance.
pub fn load_and_process_config<T: DeserializeOwned + Validate>(
    defaults: ConfigMap,
    config_files: &[PathBuf],
    overrides: &[String],
) -> Result<T, ConfigError> {
    let mut values = default_values(&defaults);

    for config_file in config_files {
        info!("Loading config file {}.", config_file.display());
        let file = File::open(config_file)?;
        let file_values: Value = serde_json::from_reader(BufReader::new(file))?;
        apply_config_file(&defaults, &mut values, file_values)?;
    }

    for raw in overrides {
        let (param_path, value) = parse_override(&defaults, raw)?;
        debug!("Overriding {param_path}.");
        values.insert(param_path, value);
    }

    for (param_path, serialized_param) in &defaults {
        if serialized_param.is_required() && !values.contains_key(param_path) {
            return Err(ConfigError::MissingParam { param_path: param_path.clone() });
        }
    }

    let config: T = serde_json::from_value(unflatten(values))
        .map_err(|error| ConfigError::DeserializationError { error })?;
    config.validate()?;
    Ok(config)
}

fn default_values(defaults: &ConfigMap) -> Map<ParamPath, Value> {
    defaults
        .iter()
        .filter_map(|(param_path, serialized_param)| match &serialized_param.content {
            SerializedContent::DefaultValue(value) => Some((param_path.clone(), value.clone())),
            SerializedContent::ParamType(_) => None,
        })
        .collect()
}

// A config file is either a flat `{"a.b": value}` map, a dump `{"a.b": {"value": value, ..}}`, or
// a nested object. Nested objects are flattened down to the known param paths.
fn apply_config_file(
    defaults: &ConfigMap,
    values: &mut Map<ParamPath, Value>,
    file_values: Value,
) -> Result<(), ConfigError> {
    let mut flat = Map::new();
    flatten_into(defaults, "", file_values, &mut flat);

    for (param_path, value) in flat {
        if !defaults.contains_key(&param_path) {
            return Err(ConfigError::ParamNotFound { param_path });
        }
        let value = match value {
            Value::Object(mut dumped) if dumped.contains_key("value") => {
                dumped.remove("value").unwrap_or(Value::Null)
            }
            other => other,
        };
        values.insert(param_path, value);
    }
    Ok(())
}

fn flatten_into(defaults: &ConfigMap, prefix: &str, value: Value, flat: &mut Map<String, Value>) {
    match value {
        Value::Object(object) if prefix.is_empty() || !defaults.contains_key(prefix) => {
            for (key, inner) in object {
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}{FIELD_SEPARATOR}{key}")
                };
                flatten_into(defaults, &path, inner, flat);
            }
        }
        other => {
            flat.insert(prefix.to_owned(), other);
        }
    }
}

fn parse_override(defaults: &ConfigMap, raw: &str) -> Result<(ParamPath, Value), ConfigError> {
    let Some((param_path, raw_value)) = raw.split_once('=') else {
        return Err(ConfigError::InvalidOverride { raw: raw.to_owned() });
    };
    let param_path = param_path.trim().to_owned();
    let serialized_param = defaults
        .get(&param_path)
        .ok_or_else(|| ConfigError::ParamNotFound { param_path: param_path.clone() })?;

    let value = match serialized_param.content.get_serialization_type() {
        Some(serialization_type) => parse_value(&param_path, raw_value, serialization_type)?,
        None => serde_json::from_str(raw_value).map_err(|_| ConfigError::InvalidParamValue {
            param_path: param_path.clone(),
            value: raw_value.to_owned(),
            expected: SerializationType::String,
        })?,
    };
    Ok((param_path, value))
}

fn parse_value(
    param_path: &str,
    raw_value: &str,
    serialization_type: SerializationType,
) -> Result<Value, ConfigError> {
    let invalid = || ConfigError::InvalidParamValue {
        param_path: param_path.to_owned(),
        value: raw_value.to_owned(),
        expected: serialization_type,
    };
    let value = match serialization_type {
        SerializationType::Boolean => Value::from(raw_value.parse::<bool>().map_err(|_| invalid())?),
        SerializationType::Float => Value::from(raw_value.parse::<f64>().map_err(|_| invalid())?),
        SerializationType::NegativeInteger => {
            Value::from(raw_value.parse::<i64>().map_err(|_| invalid())?)
        }
        SerializationType::PositiveInteger => {
            Value::from(raw_value.parse::<u64>().map_err(|_| invalid())?)
        }
        SerializationType::String => Value::from(raw_value),
    };
    Ok(value)
}

// Turns {"a.b": 1, "a.c": 2} into {"a": {"b": 1, "c": 2}}.
fn unflatten(values: Map<ParamPath, Value>) -> Value {
    let mut root = Map::new();
    for (param_path, value) in values {
        let mut segments: Vec<&str> = param_path.split(FIELD_SEPARATOR).collect();
        let Some(leaf) = segments.pop() else {
            continue;
        };
        let mut node = &mut root;
        for segment in segments {
            let entry =
                node.entry(segment.to_owned()).or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            node = match entry {
                Value::Object(inner) => inner,
                _ => unreachable!("entry was replaced by an object"),
            };
        }
        node.insert(leaf.to_owned(), value);
    }
    Value::Object(root)
}
