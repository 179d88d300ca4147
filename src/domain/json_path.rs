use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Single step into a parsed JSON body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parsed JSON body path (`data.items[0]["a.b"]`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses dotted keys and bracket segments.
    ///
    /// Accepted forms: `data.count`, `items[0].name`, `$.data`, `["a.b"]`,
    /// `[0]` and a bare `$` for the document root.
    pub fn parse(input: &str) -> Result<Self, JsonPathError> {
        if input.is_empty() {
            return Err(JsonPathError::new(input, "path must not be empty"));
        }

        let bytes = input.as_bytes();
        let mut cursor = 0;
        let mut segments = Vec::new();

        if bytes[0] == b'$' && matches!(bytes.get(1), None | Some(b'.') | Some(b'[')) {
            cursor = 1;
            if cursor < bytes.len() && bytes[cursor] == b'.' {
                cursor += 1;
                if cursor >= bytes.len() {
                    return Err(JsonPathError::new(input, "path cannot end with `.`"));
                }
            }
        }

        let mut expect_key = cursor < bytes.len() && bytes[cursor] != b'[';
        while cursor < bytes.len() {
            if expect_key {
                let key_start = cursor;
                while cursor < bytes.len() && bytes[cursor] != b'.' && bytes[cursor] != b'[' {
                    if bytes[cursor] == b']' {
                        return Err(JsonPathError::new(
                            input,
                            format!("unexpected `]` at byte {cursor}"),
                        ));
                    }
                    cursor += 1;
                }
                if key_start == cursor {
                    return Err(JsonPathError::new(
                        input,
                        format!("empty key segment at byte {cursor}"),
                    ));
                }
                segments.push(PathSegment::Key(input[key_start..cursor].to_string()));
                expect_key = false;
                continue;
            }

            match bytes[cursor] {
                b'.' => {
                    cursor += 1;
                    if cursor >= bytes.len() {
                        return Err(JsonPathError::new(input, "path cannot end with `.`"));
                    }
                    expect_key = true;
                }
                b'[' => {
                    let (segment, next) = parse_bracket(input, cursor)?;
                    segments.push(segment);
                    cursor = next;
                }
                other => {
                    return Err(JsonPathError::new(
                        input,
                        format!("unexpected `{}` at byte {cursor}", other as char),
                    ));
                }
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walks `root` segment by segment. On a miss, returns the index of the
    /// first segment that could not be resolved.
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Value, usize> {
        let mut current = root;
        for (position, segment) in self.segments.iter().enumerate() {
            let next = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            };
            current = next.ok_or(position)?;
        }
        Ok(current)
    }
}

fn parse_bracket(input: &str, open: usize) -> Result<(PathSegment, usize), JsonPathError> {
    let bytes = input.as_bytes();
    let mut cursor = open + 1;
    if cursor >= bytes.len() {
        return Err(JsonPathError::new(input, "path cannot end inside `[`"));
    }

    if bytes[cursor] == b'"' {
        let string_start = cursor;
        cursor += 1;
        let mut escaped = false;
        while cursor < bytes.len() {
            let byte = bytes[cursor];
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                break;
            }
            cursor += 1;
        }
        if cursor >= bytes.len() {
            return Err(JsonPathError::new(input, "unterminated quoted key"));
        }

        let string_end = cursor;
        cursor += 1;
        if cursor >= bytes.len() || bytes[cursor] != b']' {
            return Err(JsonPathError::new(
                input,
                format!("expected `]` at byte {cursor}"),
            ));
        }

        let key = serde_json::from_str(&input[string_start..=string_end]).map_err(|error| {
            JsonPathError::new(input, format!("invalid quoted key: {error}"))
        })?;
        return Ok((PathSegment::Key(key), cursor + 1));
    }

    let index_start = cursor;
    while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
        cursor += 1;
    }
    if index_start == cursor {
        return Err(JsonPathError::new(
            input,
            format!("expected quoted key or numeric index at byte {cursor}"),
        ));
    }
    if cursor >= bytes.len() || bytes[cursor] != b']' {
        return Err(JsonPathError::new(
            input,
            format!("expected `]` at byte {cursor}"),
        ));
    }

    let index = input[index_start..cursor]
        .parse::<usize>()
        .map_err(|error| JsonPathError::new(input, format!("invalid index: {error}")))?;
    Ok((PathSegment::Index(index), cursor + 1))
}

fn is_simple_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for JsonPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return formatter.write_str("$");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_simple_key(key) => {
                    if position > 0 {
                        formatter.write_str(".")?;
                    }
                    formatter.write_str(key)?;
                }
                PathSegment::Key(key) => {
                    let encoded = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                    write!(formatter, "[{encoded}]")?;
                }
                PathSegment::Index(index) => write!(formatter, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid json path `{input}`: {reason}")]
pub struct JsonPathError {
    input: String,
    reason: String,
}

impl JsonPathError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
