use serde::{Deserialize, Serialize};

/// Outcome of one assertion. Decode and extract failures are reported here as
/// failed entries carrying an `error` token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssertionResult {
    pub fn failed(index: usize, kind: Option<String>, error: &str, message: String) -> Self {
        Self {
            index,
            kind,
            passed: false,
            actual: None,
            message,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate verdict for one check run. `results` follows declaration order.
///
/// `passed` equals `failure_count == 0`, except for an unreachable probe with
/// no assertions: that verdict fails with zero failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckVerdict {
    pub passed: bool,
    pub assertion_count: usize,
    pub failure_count: usize,
    pub results: Vec<AssertionResult>,
}

impl CheckVerdict {
    pub fn from_results(results: Vec<AssertionResult>) -> Self {
        let failure_count = results.iter().filter(|result| !result.passed).count();
        Self {
            passed: failure_count == 0,
            assertion_count: results.len(),
            failure_count,
            results,
        }
    }

    /// Verdict for a probe that never produced a response. Every declared
    /// assertion fails with the transport reason; with none declared the
    /// verdict still fails.
    pub fn unreachable(assertion_count: usize, reason: &str) -> Self {
        let message = format!("probe did not complete: {reason}");
        if assertion_count == 0 {
            return Self {
                passed: false,
                assertion_count: 0,
                failure_count: 0,
                results: Vec::new(),
            };
        }
        let results = (0..assertion_count)
            .map(|index| AssertionResult::failed(index, None, "unreachable", message.clone()))
            .collect();
        Self::from_results(results)
    }
}

/// `check` command envelope: monitor metadata plus the verdict.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckEnvelope {
    pub workspace_id: String,
    pub monitor_id: String,
    pub url: String,
    pub cron_timestamp: i64,
    pub verdict: CheckVerdict,
}

/// Single entry in a `lint` report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LintEntry {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Decode-only report for a list of raw assertions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LintReport {
    pub valid: bool,
    pub assertion_count: usize,
    pub invalid_count: usize,
    pub entries: Vec<LintEntry>,
}

/// Diagnostics report emitted when `--emit-pipeline` is enabled.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineReport {
    pub command: String,
    pub input: PipelineInput,
    pub steps: Vec<String>,
    pub deterministic_guards: Vec<String>,
}

impl PipelineReport {
    pub fn new(
        command: impl Into<String>,
        input: PipelineInput,
        steps: Vec<String>,
        deterministic_guards: Vec<String>,
    ) -> Self {
        Self {
            command: command.into(),
            input,
            steps,
            deterministic_guards,
        }
    }
}

/// Input-source descriptors used in pipeline diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineInput {
    pub sources: Vec<PipelineInputSource>,
}

impl PipelineInput {
    pub fn new(sources: Vec<PipelineInputSource>) -> Self {
        Self { sources }
    }
}

/// Single input source descriptor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineInputSource {
    pub label: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl PipelineInputSource {
    pub fn stdin(label: impl Into<String>, format: Option<&str>) -> Self {
        Self {
            label: label.into(),
            source: "stdin".to_string(),
            path: None,
            format: format.map(ToOwned::to_owned),
        }
    }

    pub fn path(label: impl Into<String>, path: impl Into<String>, format: Option<&str>) -> Self {
        Self {
            label: label.into(),
            source: "path".to_string(),
            path: Some(path.into()),
            format: format.map(ToOwned::to_owned),
        }
    }
}
