//! Utils for serialization and deserialization of nested config fields into simple types.
//! These conversions let the command line overrides (which support only numbers, strings and
//! booleans) handle these fields.
//!
//! # example
//!
//! ```
//! use std::time::Duration;
//!
//! use gosoline_config::converters::{
//!     deserialize_milliseconds_to_duration,
//!     serialize_duration_as_millis,
//! };
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
//! struct DurationConfig {
//!     #[serde(
//!         serialize_with = "serialize_duration_as_millis",
//!         deserialize_with = "deserialize_milliseconds_to_duration"
//!     )]
//!     dur: Duration,
//! }
//!
//! let loaded_config: DurationConfig = serde_json::from_value(json!({"dur": 1000})).unwrap();
//! assert_eq!(loaded_config.dur.as_secs(), 1);
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

/// Deserializes milliseconds to duration object.
pub fn deserialize_milliseconds_to_duration<'de, D>(de: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis: u64 = Deserialize::deserialize(de)?;
    Ok(Duration::from_millis(millis))
}

/// Serializes a duration as whole milliseconds, the inverse of
/// [`deserialize_milliseconds_to_duration`].
pub fn serialize_duration_as_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis())
        .map_err(|_| serde::ser::Error::custom("duration in milliseconds exceeds u64"))?;
    serializer.serialize_u64(millis)
}

/// Serializes a map to "k1:v1 k2:v2" string structure.
pub fn serialize_map(map: &BTreeMap<String, String>) -> String {
    map.iter().map(|(k, v)| format!("{k}:{v}")).collect::<Vec<String>>().join(" ")
}

/// Serializes a map field to "k1:v1 k2:v2" string structure, for `serialize_with`.
pub fn serialize_map_as_string<S>(
    map: &BTreeMap<String, String>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&serialize_map(map))
}

/// Deserializes a map from "k1:v1 k2:v2" string structure.
pub fn deserialize_map<'de, D>(de: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw_str: String = Deserialize::deserialize(de)?;
    let mut map = BTreeMap::new();
    for raw_pair in raw_str.split_whitespace() {
        let split: Vec<&str> = raw_pair.splitn(2, ':').collect();
        match split.as_slice() {
            [name, value] if !name.is_empty() => {
                map.insert((*name).to_string(), (*value).to_string());
            }
            _ => {
                return Err(D::Error::custom(format!(
                    "pair \"{raw_pair}\" is not valid. The Expected format is name:value"
                )));
            }
        }
    }
    Ok(map)
}
