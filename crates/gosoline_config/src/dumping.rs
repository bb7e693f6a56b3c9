//! Utils for serializing config objects into a flat map and a json file.
//! The elements structure is:
//!
//! ```json
//! "conf1.conf2.param_name": {
//!     "description": "Param description.",
//!     "privacy": "Public",
//!     "value": json_value
//! }
//! ```
//!
//! Supports required params. A required param has no default value, but the type of value that the
//! user must set:
//! ```json
//! "conf1.conf2.param_name": {
//!     "description": "A required param! Param description.",
//!     "privacy": "Public",
//!     "required_type": "String"
//! }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    ConfigError,
    ConfigMap,
    ParamPrivacy,
    ParamPrivacyInput,
    SerializationType,
    SerializedContent,
    SerializedParam,
    FIELD_SEPARATOR,
};

/// Prefix for required params description.
pub(crate) const REQUIRED_PARAM_DESCRIPTION_PREFIX: &str = "A required param!";

/// Serialization for configs.
pub trait SerializeConfig {
    /// Conversion of a configuration to a mapping of flattened parameters to their descriptions and
    /// values.
    fn dump(&self) -> ConfigMap;

    /// Serialization of a configuration into a pretty printed JSON file.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    ///
    /// # use gosoline_config::dumping::{ser_param, SerializeConfig};
    /// # use gosoline_config::{ConfigMap, ParamPrivacyInput};
    /// # use serde::{Deserialize, Serialize};
    /// # use tempfile::TempDir;
    ///
    /// #[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
    /// struct ConfigExample {
    ///     key: usize,
    /// }
    ///
    /// impl SerializeConfig for ConfigExample {
    ///     fn dump(&self) -> ConfigMap {
    ///         BTreeMap::from([ser_param(
    ///             "key",
    ///             &self.key,
    ///             "This is key description.",
    ///             ParamPrivacyInput::Public,
    ///         )])
    ///     }
    /// }
    ///
    /// let dir = TempDir::new().unwrap();
    /// let file_path = dir.path().join("config.json");
    /// ConfigExample { key: 42 }.dump_to_file(file_path.to_str().unwrap()).unwrap();
    /// ```
    fn dump_to_file(&self, file_path: &str) -> Result<(), ConfigError> {
        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &json!(self.dump()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("Dumped the config to {file_path}.");
        Ok(())
    }
}

/// Prepends `sub_config_name` to the ParamPath for each entry in `sub_config_dump`.
/// In order to load from a dump properly, `sub_config_name` must match the field's name for the
/// struct this function is called from.
pub fn prepend_sub_config_name(sub_config_dump: ConfigMap, sub_config_name: &str) -> ConfigMap {
    ConfigMap::from_iter(
        sub_config_dump.into_iter().map(|(field_name, val)| {
            (format!("{sub_config_name}{FIELD_SEPARATOR}{field_name}"), val)
        }),
    )
}

// Serializes a parameter of a config.
fn common_ser_param(
    name: &str,
    content: SerializedContent,
    description: &str,
    privacy: ParamPrivacy,
) -> (String, SerializedParam) {
    (name.to_owned(), SerializedParam { description: description.to_owned(), content, privacy })
}

/// Serializes a single param of a config.
/// The returned pair is designed to be an input to a dumped config map.
pub fn ser_param<T: Serialize>(
    name: &str,
    value: &T,
    description: &str,
    privacy: ParamPrivacyInput,
) -> (String, SerializedParam) {
    common_ser_param(
        name,
        SerializedContent::DefaultValue(json!(value)),
        description,
        privacy.into(),
    )
}

/// Serializes expected type for a single required param of a config.
/// The returned pair is designed to be an input to a dumped config map.
pub fn ser_required_param(
    name: &str,
    serialization_type: SerializationType,
    description: &str,
    privacy: ParamPrivacyInput,
) -> (String, SerializedParam) {
    common_ser_param(
        name,
        SerializedContent::ParamType(serialization_type),
        required_param_description(description).as_str(),
        privacy.into(),
    )
}

pub(crate) fn required_param_description(description: &str) -> String {
    format!("{REQUIRED_PARAM_DESCRIPTION_PREFIX} {description}")
}
