use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One `key`/`value` header entry as the configuration collaborator stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

/// Response snapshot produced by the HTTP transport. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(rename = "status", alias = "statusCode")]
    pub status_code: u16,
    #[serde(default, deserialize_with = "deserialize_headers")]
    pub headers: Vec<HeaderEntry>,
    #[serde(default)]
    pub body: String,
}

impl CheckResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup. Repeated names are joined with `, `
    /// in declaration order; no match yields `""`.
    pub fn header(&self, name: &str) -> String {
        let values: Vec<&str> = self
            .headers
            .iter()
            .filter(|entry| entry.key.eq_ignore_ascii_case(name))
            .map(|entry| entry.value.as_str())
            .collect();
        values.join(", ")
    }
}

/// What the transport handed back for one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeOutcome {
    Response(CheckResponse),
    Unreachable { error: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeadersWire {
    Map(serde_json::Map<String, Value>),
    List(Vec<HeaderEntry>),
}

fn deserialize_headers<'de, D>(deserializer: D) -> Result<Vec<HeaderEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<HeadersWire>::deserialize(deserializer)?;
    let map = match wire {
        None => return Ok(Vec::new()),
        Some(HeadersWire::List(entries)) => return Ok(entries),
        Some(HeadersWire::Map(map)) => map,
    };

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            // Repeated header values become repeated entries so lookup joins them.
            Value::Array(values) => {
                for value in values {
                    let value = scalar_header_value(&key, value).map_err(D::Error::custom)?;
                    entries.push(HeaderEntry {
                        key: key.clone(),
                        value,
                    });
                }
            }
            other => {
                let value = scalar_header_value(&key, other).map_err(D::Error::custom)?;
                entries.push(HeaderEntry { key, value });
            }
        }
    }
    Ok(entries)
}

fn scalar_header_value(key: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!(
            "header `{key}` must be a string, number, bool, or an array of those, got {other}"
        )),
    }
}
