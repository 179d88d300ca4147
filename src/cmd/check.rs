use std::io::Read;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::report::{CheckEnvelope, CheckVerdict};
use crate::domain::request::CheckerRequest;
use crate::domain::response::{CheckResponse, ProbeOutcome};
use crate::engine::{EvaluateOptions, evaluate_with};
use crate::io::{self, Format, IoError};

/// Input arguments for check command execution API.
#[derive(Debug, Clone)]
pub struct CheckCommandArgs {
    pub request: PathBuf,
    pub response: Option<PathBuf>,
    pub options: EvaluateOptions,
}

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

pub fn run_with_stdin<R: Read>(args: &CheckCommandArgs, stdin: R) -> CheckCommandResponse {
    match execute(args, stdin) {
        Ok(envelope) => envelope_response(envelope),
        Err(CommandError::InputUsage(message)) => CheckCommandResponse {
            exit_code: 3,
            payload: json!({
                "error": "input_usage_error",
                "message": message,
            }),
        },
    }
}

pub fn pipeline_steps() -> Vec<String> {
    vec![
        "load_checker_request".to_string(),
        "load_probe_outcome".to_string(),
        "decode_assertions".to_string(),
        "extract_actual_values".to_string(),
        "compare_targets".to_string(),
        "aggregate_verdict".to_string(),
    ]
}

pub fn deterministic_guards() -> Vec<String> {
    vec![
        "results_in_declaration_order".to_string(),
        "assertion_failures_isolated".to_string(),
        "rust_native_execution".to_string(),
    ]
}

fn envelope_response(envelope: CheckEnvelope) -> CheckCommandResponse {
    let exit_code = if envelope.verdict.passed { 0 } else { 2 };
    match serde_json::to_value(&envelope) {
        Ok(payload) => CheckCommandResponse { exit_code, payload },
        Err(_) => CheckCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": "failed to serialize check verdict"
            }),
        },
    }
}

fn execute<R: Read>(args: &CheckCommandArgs, stdin: R) -> Result<CheckEnvelope, CommandError> {
    let request = load_request(args)?;
    let outcome = load_outcome(args, stdin)?;

    let verdict = match outcome {
        ProbeOutcome::Response(response) => {
            evaluate_with(&response, &request.assertions, &args.options)
        }
        ProbeOutcome::Unreachable { error } => {
            warn!(monitor_id = %request.monitor_id, %error, "probe did not complete");
            CheckVerdict::unreachable(request.assertions.len(), &error)
        }
    };
    info!(
        monitor_id = %request.monitor_id,
        passed = verdict.passed,
        failures = verdict.failure_count,
        "check finished"
    );

    Ok(CheckEnvelope {
        workspace_id: request.workspace_id,
        monitor_id: request.monitor_id,
        url: request.url,
        cron_timestamp: request.cron_timestamp,
        verdict,
    })
}

fn load_request(args: &CheckCommandArgs) -> Result<CheckerRequest, CommandError> {
    let value = io::reader::read_document_from_path(&args.request).map_err(|err| {
        CommandError::InputUsage(format!(
            "failed to read request `{}`: {err}",
            args.request.display()
        ))
    })?;
    serde_json::from_value(value)
        .map_err(|err| CommandError::InputUsage(format!("invalid checker request: {err}")))
}

fn load_outcome<R: Read>(args: &CheckCommandArgs, stdin: R) -> Result<ProbeOutcome, CommandError> {
    let value = match &args.response {
        Some(path) => io::reader::read_document_from_path(path).map_err(|err| {
            CommandError::InputUsage(format!(
                "failed to read response `{}`: {err}",
                path.display()
            ))
        })?,
        None => io::reader::read_document(stdin, Format::Json).map_err(map_io_as_input_usage)?,
    };
    parse_outcome(value).map_err(|err| {
        CommandError::InputUsage(format!(
            "response must be {{status, headers, body}} or {{error}}: {err}"
        ))
    })
}

/// A bare `{error}` object is a transport failure; anything else must be a
/// full response, so its field errors surface directly.
fn parse_outcome(value: Value) -> Result<ProbeOutcome, serde_json::Error> {
    let is_failure = value.get("error").is_some()
        && value.get("status").is_none()
        && value.get("statusCode").is_none();
    if is_failure {
        serde_json::from_value(value)
    } else {
        serde_json::from_value::<CheckResponse>(value).map(ProbeOutcome::Response)
    }
}

fn map_io_as_input_usage(error: IoError) -> CommandError {
    CommandError::InputUsage(format!("failed to read response from stdin: {error}"))
}

enum CommandError {
    InputUsage(String),
}
