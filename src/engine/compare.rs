use serde_json::Value;

use crate::domain::assertion::{
    Assertion, JsonCheck, NumberComparator, StringCheck, StringComparator,
};
use crate::engine::extract::ExtractedValue;
use crate::util::number::{format_number, parse_finite};

/// Default number of characters of the actual value kept in messages.
pub const DEFAULT_PREVIEW_CHARS: usize = 120;

/// Boolean outcome plus a deterministic explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub passed: bool,
    pub message: String,
}

/// Compares an extracted value against the assertion's target.
pub fn compare(assertion: &Assertion, actual: &ExtractedValue, preview_chars: usize) -> Comparison {
    let subject = assertion.subject();
    match assertion {
        Assertion::Status { comparator, target }
        | Assertion::JsonBody {
            check:
                JsonCheck::Number {
                    comparator,
                    target,
                },
            ..
        } => match numeric_actual(actual) {
            Some(actual) => compare_numbers(&subject, actual, *comparator, *target),
            None => Comparison {
                passed: false,
                message: format!(
                    "expected {subject} to {} {}, got non-numeric {}",
                    number_verb(*comparator),
                    format_number(*target),
                    quote(&preview(&actual.display(), preview_chars)),
                ),
            },
        },
        Assertion::Header { check, .. }
        | Assertion::TextBody { check }
        | Assertion::JsonBody {
            check: JsonCheck::String(check),
            ..
        } => compare_strings(&subject, &actual.display(), check, preview_chars),
    }
}

/// String family: substring, exact equality, exact emptiness and byte-wise
/// lexicographic ordering.
pub fn compare_strings(
    subject: &str,
    actual: &str,
    check: &StringCheck,
    preview_chars: usize,
) -> Comparison {
    let target = check.target.as_str();
    let passed = match check.comparator {
        StringComparator::Contains => actual.contains(target),
        StringComparator::NotContains => !actual.contains(target),
        StringComparator::Eq => actual == target,
        StringComparator::NotEq => actual != target,
        StringComparator::Empty => actual.is_empty(),
        StringComparator::NotEmpty => !actual.is_empty(),
        StringComparator::Gt => actual.as_bytes() > target.as_bytes(),
        StringComparator::Gte => actual.as_bytes() >= target.as_bytes(),
        StringComparator::Lt => actual.as_bytes() < target.as_bytes(),
        StringComparator::Lte => actual.as_bytes() <= target.as_bytes(),
    };

    let shown = quote(&preview(actual, preview_chars));
    let message = if check.comparator.takes_target() {
        format!(
            "expected {subject} to {} {}, got {shown}",
            string_verb(check.comparator),
            quote(target)
        )
    } else {
        format!(
            "expected {subject} to {}, got {shown}",
            string_verb(check.comparator)
        )
    };
    Comparison { passed, message }
}

/// Number family with floating-point semantics.
pub fn compare_numbers(
    subject: &str,
    actual: f64,
    comparator: NumberComparator,
    target: f64,
) -> Comparison {
    let passed = match comparator {
        NumberComparator::Eq => actual == target,
        NumberComparator::NotEq => actual != target,
        NumberComparator::Gt => actual > target,
        NumberComparator::Gte => actual >= target,
        NumberComparator::Lt => actual < target,
        NumberComparator::Lte => actual <= target,
    };
    Comparison {
        passed,
        message: format!(
            "expected {subject} to {} {}, got {}",
            number_verb(comparator),
            format_number(target),
            format_number(actual)
        ),
    }
}

fn numeric_actual(actual: &ExtractedValue) -> Option<f64> {
    match actual {
        ExtractedValue::Number(value) => Some(*value),
        ExtractedValue::Text(text) => parse_finite(text),
    }
}

fn string_verb(comparator: StringComparator) -> &'static str {
    match comparator {
        StringComparator::Contains => "contain",
        StringComparator::NotContains => "not contain",
        StringComparator::Eq => "equal",
        StringComparator::NotEq => "not equal",
        StringComparator::Empty => "be empty",
        StringComparator::NotEmpty => "not be empty",
        StringComparator::Gt => "sort after",
        StringComparator::Gte => "sort after or equal",
        StringComparator::Lt => "sort before",
        StringComparator::Lte => "sort before or equal",
    }
}

fn number_verb(comparator: NumberComparator) -> &'static str {
    match comparator {
        NumberComparator::Eq => "equal",
        NumberComparator::NotEq => "not equal",
        NumberComparator::Gt => "be greater than",
        NumberComparator::Gte => "be greater than or equal to",
        NumberComparator::Lt => "be less than",
        NumberComparator::Lte => "be less than or equal to",
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn quote(text: &str) -> String {
    Value::from(text).to_string()
}
