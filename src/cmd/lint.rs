use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::report::{LintEntry, LintReport};
use crate::engine::{decode_assertions, kind_hint};
use crate::io::{self, Format};

/// Input arguments for lint command execution API.
#[derive(Debug, Clone)]
pub struct LintCommandArgs {
    pub input: Option<PathBuf>,
}

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LintCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

#[derive(Deserialize)]
struct AssertionList {
    #[serde(
        default,
        deserialize_with = "crate::domain::request::deserialize_raw_assertions"
    )]
    assertions: Vec<Value>,
}

pub fn run_with_stdin<R: Read>(args: &LintCommandArgs, stdin: R) -> LintCommandResponse {
    let raw = match load_assertions(args, stdin) {
        Ok(raw) => raw,
        Err(message) => {
            return LintCommandResponse {
                exit_code: 3,
                payload: json!({
                    "error": "input_usage_error",
                    "message": message,
                }),
            };
        }
    };

    let report = lint(&raw);
    let exit_code = if report.valid { 0 } else { 2 };
    match serde_json::to_value(&report) {
        Ok(payload) => LintCommandResponse { exit_code, payload },
        Err(_) => LintCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": "failed to serialize lint report"
            }),
        },
    }
}

/// Decodes every assertion without a response and reports which ones are
/// malformed.
pub fn lint(raw: &[Value]) -> LintReport {
    let entries: Vec<LintEntry> = decode_assertions(raw)
        .into_iter()
        .zip(raw)
        .enumerate()
        .map(|(index, (decoded, raw))| match decoded {
            Ok(assertion) => LintEntry {
                index,
                kind: Some(assertion.kind().as_str().to_string()),
                valid: true,
                message: None,
            },
            Err(error) => LintEntry {
                index,
                kind: kind_hint(raw),
                valid: false,
                message: Some(error.to_string()),
            },
        })
        .collect();

    let invalid_count = entries.iter().filter(|entry| !entry.valid).count();
    LintReport {
        valid: invalid_count == 0,
        assertion_count: entries.len(),
        invalid_count,
        entries,
    }
}

pub fn pipeline_steps() -> Vec<String> {
    vec![
        "load_assertions".to_string(),
        "decode_assertions".to_string(),
    ]
}

pub fn deterministic_guards() -> Vec<String> {
    vec![
        "entries_in_declaration_order".to_string(),
        "rust_native_execution".to_string(),
    ]
}

/// Accepts a bare array, a checker request, or any object with `assertions`.
fn load_assertions<R: Read>(args: &LintCommandArgs, stdin: R) -> Result<Vec<Value>, String> {
    let document = match &args.input {
        Some(path) => io::reader::read_document_from_path(path)
            .map_err(|err| format!("failed to read input `{}`: {err}", path.display()))?,
        None => io::reader::read_document(stdin, Format::Json)
            .map_err(|err| format!("failed to read input from stdin: {err}"))?,
    };

    match document {
        Value::Array(items) => Ok(items),
        Value::Object(_) => serde_json::from_value::<AssertionList>(document)
            .map(|list| list.assertions)
            .map_err(|err| format!("invalid assertions: {err}")),
        _ => Err("input must be an assertion array or an object with `assertions`".to_string()),
    }
}
