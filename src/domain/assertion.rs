use std::fmt;

use crate::domain::json_path::JsonPath;

/// Part of the probe response an assertion inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionKind {
    Header,
    TextBody,
    Status,
    JsonBody,
}

impl AssertionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::TextBody => "textBody",
            Self::Status => "status",
            Self::JsonBody => "jsonBody",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "header" => Some(Self::Header),
            "textBody" => Some(Self::TextBody),
            "status" => Some(Self::Status),
            "jsonBody" => Some(Self::JsonBody),
            _ => None,
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparators available to text-valued checks. Ordering comparators are
/// byte-wise lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringComparator {
    Contains,
    NotContains,
    Eq,
    NotEq,
    Empty,
    NotEmpty,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl StringComparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Eq => "eq",
            Self::NotEq => "not_eq",
            Self::Empty => "empty",
            Self::NotEmpty => "not_empty",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "contains" => Some(Self::Contains),
            "not_contains" => Some(Self::NotContains),
            "eq" => Some(Self::Eq),
            "not_eq" => Some(Self::NotEq),
            "empty" => Some(Self::Empty),
            "not_empty" => Some(Self::NotEmpty),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    /// `empty` and `not_empty` ignore the target.
    pub fn takes_target(self) -> bool {
        !matches!(self, Self::Empty | Self::NotEmpty)
    }
}

/// Comparators available to numeric checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberComparator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl NumberComparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::NotEq => "not_eq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "not_eq" => Some(Self::NotEq),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }
}

/// String-family comparator with its target. The target is empty for
/// `empty`/`not_empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct StringCheck {
    pub comparator: StringComparator,
    pub target: String,
}

/// Resolved comparison for a JSON body leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonCheck {
    Number {
        comparator: NumberComparator,
        target: f64,
    },
    String(StringCheck),
}

/// Decoded assertion. Each variant carries only the fields its kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    Status {
        comparator: NumberComparator,
        target: f64,
    },
    Header {
        key: String,
        check: StringCheck,
    },
    TextBody {
        check: StringCheck,
    },
    JsonBody {
        path: JsonPath,
        check: JsonCheck,
    },
}

impl Assertion {
    pub fn kind(&self) -> AssertionKind {
        match self {
            Self::Status { .. } => AssertionKind::Status,
            Self::Header { .. } => AssertionKind::Header,
            Self::TextBody { .. } => AssertionKind::TextBody,
            Self::JsonBody { .. } => AssertionKind::JsonBody,
        }
    }

    /// Human-readable name of the inspected value, used in messages.
    pub fn subject(&self) -> String {
        match self {
            Self::Status { .. } => "status".to_string(),
            Self::Header { key, .. } => format!("header `{key}`"),
            Self::TextBody { .. } => "text body".to_string(),
            Self::JsonBody { path, .. } => format!("json body at `{path}`"),
        }
    }

    /// True when extraction must yield a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Status { .. }
                | Self::JsonBody {
                    check: JsonCheck::Number { .. },
                    ..
                }
        )
    }
}
