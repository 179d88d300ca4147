use std::cell::OnceCell;

use serde_json::Value;

use crate::domain::assertion::Assertion;
use crate::domain::error::ExtractError;
use crate::domain::json_path::JsonPath;
use crate::domain::response::CheckResponse;
use crate::util::number::{format_number, parse_finite};

/// Actual value located in a response, typed for its comparator family.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValue {
    Number(f64),
    Text(String),
}

impl ExtractedValue {
    /// Diagnostic rendering used as the result's `actual`.
    pub fn display(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Read-only view over a response that parses the JSON body at most once.
pub struct ResponseView<'a> {
    response: &'a CheckResponse,
    json_body: OnceCell<Result<Value, ExtractError>>,
}

impl<'a> ResponseView<'a> {
    pub fn new(response: &'a CheckResponse) -> Self {
        Self {
            response,
            json_body: OnceCell::new(),
        }
    }

    pub fn extract(&self, assertion: &Assertion) -> Result<ExtractedValue, ExtractError> {
        match assertion {
            Assertion::Status { .. } => Ok(ExtractedValue::Number(f64::from(
                self.response.status_code,
            ))),
            Assertion::Header { key, .. } => Ok(ExtractedValue::Text(self.response.header(key))),
            Assertion::TextBody { .. } => Ok(ExtractedValue::Text(self.response.body.clone())),
            Assertion::JsonBody { path, .. } => {
                let leaf = self.json_leaf(path)?;
                if assertion.is_numeric() {
                    numeric_leaf(path, leaf).map(ExtractedValue::Number)
                } else {
                    Ok(ExtractedValue::Text(stringify_leaf(leaf)))
                }
            }
        }
    }

    fn json_leaf(&self, path: &JsonPath) -> Result<&Value, ExtractError> {
        let body = self
            .json_body
            .get_or_init(|| {
                serde_json::from_str(&self.response.body).map_err(|error| {
                    ExtractError::InvalidJson {
                        reason: error.to_string(),
                    }
                })
            })
            .as_ref()
            .map_err(Clone::clone)?;
        path.resolve(body)
            .map_err(|segment| ExtractError::PathNotFound {
                path: path.to_string(),
                segment,
            })
    }
}

/// Extracts the actual value for `assertion` from `response`.
pub fn extract(
    response: &CheckResponse,
    assertion: &Assertion,
) -> Result<ExtractedValue, ExtractError> {
    ResponseView::new(response).extract(assertion)
}

fn numeric_leaf(path: &JsonPath, leaf: &Value) -> Result<f64, ExtractError> {
    let parsed = match leaf {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_finite(text),
        _ => None,
    };
    parsed.ok_or_else(|| ExtractError::NotNumeric {
        path: path.to_string(),
        found: stringify_leaf(leaf),
    })
}

fn stringify_leaf(leaf: &Value) -> String {
    match leaf {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
