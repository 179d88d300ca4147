use serde_json::Value;
use tracing::debug;

use crate::domain::report::{AssertionResult, CheckVerdict};
use crate::domain::response::CheckResponse;
use crate::engine::compare::{DEFAULT_PREVIEW_CHARS, compare};
use crate::engine::decode::{decode_assertion, kind_hint};
use crate::engine::extract::ResponseView;

/// Tunables for result rendering. Verdicts do not depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluateOptions {
    pub preview_chars: usize,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Evaluates every raw assertion against `response` with default options.
pub fn evaluate(response: &CheckResponse, raw_assertions: &[Value]) -> CheckVerdict {
    evaluate_with(response, raw_assertions, &EvaluateOptions::default())
}

/// Evaluates assertions in declaration order. A decode or extract failure
/// fails that assertion only; the rest are still evaluated.
pub fn evaluate_with(
    response: &CheckResponse,
    raw_assertions: &[Value],
    options: &EvaluateOptions,
) -> CheckVerdict {
    let view = ResponseView::new(response);
    let results: Vec<AssertionResult> = raw_assertions
        .iter()
        .enumerate()
        .map(|(index, raw)| evaluate_one(&view, index, raw, options))
        .collect();

    let verdict = CheckVerdict::from_results(results);
    debug!(
        passed = verdict.passed,
        assertions = verdict.assertion_count,
        failures = verdict.failure_count,
        "check evaluated"
    );
    verdict
}

fn evaluate_one(
    view: &ResponseView<'_>,
    index: usize,
    raw: &Value,
    options: &EvaluateOptions,
) -> AssertionResult {
    let assertion = match decode_assertion(raw) {
        Ok(assertion) => assertion,
        Err(error) => {
            debug!(index, %error, "assertion rejected");
            return AssertionResult::failed(
                index,
                kind_hint(raw),
                "decode_error",
                format!("invalid assertion: {error}"),
            );
        }
    };
    let kind = assertion.kind().as_str();

    let actual = match view.extract(&assertion) {
        Ok(actual) => actual,
        Err(error) => {
            debug!(index, kind, %error, "extraction failed");
            return AssertionResult::failed(
                index,
                Some(kind.to_string()),
                error.kind(),
                format!("{}: {error}", assertion.subject()),
            );
        }
    };

    let outcome = compare(&assertion, &actual, options.preview_chars);
    debug!(index, kind, passed = outcome.passed, "assertion evaluated");
    AssertionResult {
        index,
        kind: Some(kind.to_string()),
        passed: outcome.passed,
        actual: Some(actual.display()),
        message: outcome.message,
        error: None,
    }
}
