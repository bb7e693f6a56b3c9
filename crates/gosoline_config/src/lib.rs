//! Configuration utilities for the dashboard provider.
//!
//! A config struct is represented as a flat map from a dotted parameter path to a
//! [`SerializedParam`]. The flat map is what gets dumped to a file, what command-line overrides
//! address, and what [`loading::load_and_process_config`] turns back into the nested typed
//! struct.
//!
//! ```json
//! "metadata.retry.initial_interval_millis": {
//!     "description": "Delay before the first retry of a metadata request.",
//!     "privacy": "Public",
//!     "value": 10000
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

pub mod converters;
pub mod dumping;
pub mod loading;


/// Separates the names of nested config fields in a parameter path.
pub const FIELD_SEPARATOR: &str = ".";

/// A dotted path of a single config parameter, e.g. `metadata.retry.max_interval_millis`.
pub type ParamPath = String;

/// The flattened representation of a whole config.
pub type ConfigMap = BTreeMap<ParamPath, SerializedParam>;

/// The type of a required param, used to parse string overrides into typed JSON values.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SerializationType {
    Boolean,
    Float,
    NegativeInteger,
    PositiveInteger,
    String,
}

/// The content of a dumped param: either its default value, or the type of a value the user
/// must provide.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SerializedContent {
    #[serde(rename = "value")]
    DefaultValue(Value),
    #[serde(rename = "required_type")]
    ParamType(SerializationType),
}

impl SerializedContent {
    /// The type a user supplied value must be parsed to.
    pub fn get_serialization_type(&self) -> Option<SerializationType> {
        match self {
            SerializedContent::DefaultValue(value) => match value {
                Value::Bool(_) => Some(SerializationType::Boolean),
                Value::Number(number) if number.is_f64() => Some(SerializationType::Float),
                Value::Number(number) if number.is_u64() => {
                    Some(SerializationType::PositiveInteger)
                }
                Value::Number(_) => Some(SerializationType::NegativeInteger),
                Value::String(_) => Some(SerializationType::String),
                Value::Null | Value::Array(_) | Value::Object(_) => None,
            },
            SerializedContent::ParamType(serialization_type) => Some(*serialization_type),
        }
    }
}

/// Whether a param may be shown in logs and dumps as is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParamPrivacy {
    Private,
    Public,
}

/// The privacy a config author assigns to a param.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamPrivacyInput {
    Private,
    Public,
}

impl From<ParamPrivacyInput> for ParamPrivacy {
    fn from(user_param_privacy: ParamPrivacyInput) -> Self {
        match user_param_privacy {
            ParamPrivacyInput::Private => ParamPrivacy::Private,
            ParamPrivacyInput::Public => ParamPrivacy::Public,
        }
    }
}

/// A dumped config parameter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SerializedParam {
    pub description: String,
    #[serde(flatten)]
    pub content: SerializedContent,
    pub privacy: ParamPrivacy,
}

impl SerializedParam {
    /// Whether the param has no default value and must be provided by the user.
    pub fn is_required(&self) -> bool {
        matches!(self.content, SerializedContent::ParamType(_))
    }
}

/// Errors at the configuration dumping and loading process.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Received an unexpected parameter: {param_path}.")]
    ParamNotFound { param_path: ParamPath },
    #[error("{param_path} is required but was not provided.")]
    MissingParam { param_path: ParamPath },
    #[error("Failed to parse '{value}' of {param_path} as {expected:?}.")]
    InvalidParamValue { param_path: ParamPath, value: String, expected: SerializationType },
    #[error("Invalid override '{raw}', the expected format is param.path=value.")]
    InvalidOverride { raw: String },
    #[error("Failed to deserialize the loaded config: {error}")]
    DeserializationError { error: serde_json::Error },
    #[error(transparent)]
    ConfigValidationError(#[from] ValidationErrors),
}
