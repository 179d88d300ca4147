use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::response::HeaderEntry;

/// Check request dispatched by the scheduler. Only `assertions` is consumed
/// by the engine; the rest passes through to the verdict envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerRequest {
    pub workspace_id: String,
    pub monitor_id: String,
    pub url: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub cron_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderEntry>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_raw_assertions")]
    pub assertions: Vec<Value>,
}

/// Accepts an array, a JSON-encoded string holding an array, or null.
pub(crate) fn deserialize_raw_assertions<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(Value::String(encoded)) => {
            if encoded.trim().is_empty() {
                return Ok(Vec::new());
            }
            match serde_json::from_str::<Value>(&encoded) {
                Ok(Value::Array(items)) => Ok(items),
                Ok(Value::Null) => Ok(Vec::new()),
                Ok(_) => Err(serde::de::Error::custom(
                    "encoded assertions must be a JSON array",
                )),
                Err(error) => Err(serde::de::Error::custom(format!(
                    "encoded assertions are not valid JSON: {error}"
                ))),
            }
        }
        Some(_) => Err(serde::de::Error::custom(
            "assertions must be an array, an encoded array string, or null",
        )),
    }
}
