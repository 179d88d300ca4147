use serde_json::{Map, Value};

use crate::domain::assertion::{
    Assertion, AssertionKind, JsonCheck, NumberComparator, StringCheck, StringComparator,
};
use crate::domain::error::DecodeError;
use crate::domain::json_path::JsonPath;
use crate::util::number::parse_finite;

/// Decodes one raw assertion record, dispatching on its `type` field.
pub fn decode_assertion(raw: &Value) -> Result<Assertion, DecodeError> {
    let record = raw.as_object().ok_or(DecodeError::NotAnObject)?;
    let kind_token = required_str(record, "type")?;
    let kind = AssertionKind::from_token(kind_token).ok_or_else(|| DecodeError::UnknownKind {
        kind: kind_token.to_string(),
    })?;
    let compare = required_str(record, "compare")?;
    let target = record.get("target").filter(|value| !value.is_null());

    match kind {
        AssertionKind::Status => {
            let comparator = NumberComparator::from_token(compare).ok_or_else(|| {
                DecodeError::UnknownComparator {
                    kind: kind.as_str(),
                    token: compare.to_string(),
                }
            })?;
            let target = target.ok_or(DecodeError::MissingField { field: "target" })?;
            Ok(Assertion::Status {
                comparator,
                target: number_target(target).ok_or_else(|| DecodeError::InvalidTarget {
                    reason: format!("status target must be a number, got {target}"),
                })?,
            })
        }
        AssertionKind::Header => {
            let key = required_str(record, "key")?;
            if key.is_empty() {
                return Err(DecodeError::InvalidFieldType {
                    field: "key",
                    expected: "a non-empty string",
                });
            }
            Ok(Assertion::Header {
                key: key.to_string(),
                check: string_check(kind, compare, target, false)?,
            })
        }
        AssertionKind::TextBody => Ok(Assertion::TextBody {
            check: string_check(kind, compare, target, false)?,
        }),
        AssertionKind::JsonBody => {
            let path = JsonPath::parse(required_str(record, "path")?)?;
            Ok(Assertion::JsonBody {
                path,
                check: json_check(compare, target)?,
            })
        }
    }
}

/// Decodes every record independently, preserving order.
pub fn decode_assertions(raw: &[Value]) -> Vec<Result<Assertion, DecodeError>> {
    raw.iter().map(decode_assertion).collect()
}

/// Kind token of a raw record when it names a known kind, even if the rest of
/// the record fails to decode.
pub fn kind_hint(raw: &Value) -> Option<String> {
    raw.get("type")
        .and_then(Value::as_str)
        .and_then(AssertionKind::from_token)
        .map(|kind| kind.as_str().to_string())
}

fn required_str<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { field }),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(DecodeError::InvalidFieldType {
            field,
            expected: "a string",
        }),
    }
}

fn number_target(target: &Value) -> Option<f64> {
    match target {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_finite(text),
        _ => None,
    }
}

/// Builds a string-family check. `scalar_targets` lets numbers and booleans
/// stand in for their JSON text.
fn string_check(
    kind: AssertionKind,
    compare: &str,
    target: Option<&Value>,
    scalar_targets: bool,
) -> Result<StringCheck, DecodeError> {
    let comparator =
        StringComparator::from_token(compare).ok_or_else(|| DecodeError::UnknownComparator {
            kind: kind.as_str(),
            token: compare.to_string(),
        })?;
    if !comparator.takes_target() {
        return Ok(StringCheck {
            comparator,
            target: String::new(),
        });
    }

    let target = match target {
        None => return Err(DecodeError::MissingField { field: "target" }),
        Some(Value::String(text)) => text.clone(),
        Some(value @ (Value::Number(_) | Value::Bool(_))) if scalar_targets => value.to_string(),
        Some(other) => {
            return Err(DecodeError::InvalidTarget {
                reason: format!("{kind} target must be a string, got {other}"),
            });
        }
    };
    Ok(StringCheck { comparator, target })
}

/// Numeric when the token is a number comparator and the target reads as a
/// number; string family otherwise.
fn json_check(compare: &str, target: Option<&Value>) -> Result<JsonCheck, DecodeError> {
    if let (Some(comparator), Some(target)) = (
        NumberComparator::from_token(compare),
        target.and_then(number_target),
    ) {
        return Ok(JsonCheck::Number { comparator, target });
    }
    string_check(AssertionKind::JsonBody, compare, target, true).map(JsonCheck::String)
}
