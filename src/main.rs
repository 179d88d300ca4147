use std::io;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use probeq::cmd::{check, lint};
use probeq::config::Config;
use probeq::domain::report::{PipelineInput, PipelineInputSource, PipelineReport};
use probeq::io::{self as probeq_io, Format};
use probeq::logging;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Parser)]
#[command(
    name = "probeq",
    version,
    about = "Deterministic assertion evaluation for HTTP uptime probes"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    emit_pipeline: bool,

    /// Optional TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate a checker request's assertions against a probe response.
    Check(CheckArgs),
    /// Decode assertions without a response and report malformed entries.
    Lint(LintArgs),
}

#[derive(Debug, clap::Args)]
struct CheckArgs {
    #[arg(long)]
    request: PathBuf,

    /// Probe response file; stdin (JSON) when omitted.
    #[arg(long)]
    response: Option<PathBuf>,

    /// Characters of the actual value kept in result messages.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    preview_chars: Option<u64>,
}

#[derive(Debug, clap::Args)]
struct LintArgs {
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(error) => {
                emit_error(
                    "input_usage_error",
                    error.to_string(),
                    json!({"config": path}),
                    3,
                );
                return 3;
            }
        },
        None => Config::default(),
    };
    logging::init(&config.log);

    let emit_pipeline = cli.emit_pipeline;
    match cli.command {
        Commands::Check(args) => run_check(args, &config, emit_pipeline),
        Commands::Lint(args) => run_lint(args, emit_pipeline),
    }
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn run_check(args: CheckArgs, config: &Config, emit_pipeline: bool) -> i32 {
    let mut options = config.evaluate_options();
    if let Some(preview_chars) = args.preview_chars {
        options.preview_chars = usize::try_from(preview_chars).unwrap_or(usize::MAX);
    }
    let pipeline_report = build_check_pipeline_report(&args);
    let command_args = check::CheckCommandArgs {
        request: args.request,
        response: args.response,
        options,
    };

    let stdin = io::stdin();
    let response = check::run_with_stdin(&command_args, stdin.lock());
    let exit_code = emit_response("check", response.exit_code, &response.payload);

    if emit_pipeline {
        emit_pipeline_report(&pipeline_report);
    }
    exit_code
}

fn run_lint(args: LintArgs, emit_pipeline: bool) -> i32 {
    let pipeline_report = build_lint_pipeline_report(&args);
    let command_args = lint::LintCommandArgs { input: args.input };

    let stdin = io::stdin();
    let response = lint::run_with_stdin(&command_args, stdin.lock());
    let exit_code = emit_response("lint", response.exit_code, &response.payload);

    if emit_pipeline {
        emit_pipeline_report(&pipeline_report);
    }
    exit_code
}

/// Reports go to stdout (exit 0/2); error payloads go to stderr (exit 1/3).
fn emit_response(command: &str, exit_code: i32, payload: &Value) -> i32 {
    let emitted = match exit_code {
        0 | 2 => emit_json_stdout(payload),
        1 | 3 => emit_json_stderr(payload),
        other => {
            emit_error(
                "internal_error",
                format!("unexpected {command} exit code: {other}"),
                json!({"command": command}),
                1,
            );
            return 1;
        }
    };
    if emitted {
        exit_code
    } else {
        emit_error(
            "internal_error",
            format!("failed to serialize {command} response"),
            json!({"command": command}),
            1,
        );
        1
    }
}

fn build_check_pipeline_report(args: &CheckArgs) -> PipelineReport {
    let request_format = probeq_io::resolve_input_format(&args.request).ok();
    let mut sources = Vec::with_capacity(2);
    sources.push(PipelineInputSource::path(
        "request",
        args.request.display().to_string(),
        format_label(request_format),
    ));
    if let Some(path) = &args.response {
        let response_format = probeq_io::resolve_input_format(path).ok();
        sources.push(PipelineInputSource::path(
            "response",
            path.display().to_string(),
            format_label(response_format),
        ));
    } else {
        sources.push(PipelineInputSource::stdin(
            "response",
            Some(Format::Json.as_str()),
        ));
    }

    PipelineReport::new(
        "check",
        PipelineInput::new(sources),
        check::pipeline_steps(),
        check::deterministic_guards(),
    )
}

fn build_lint_pipeline_report(args: &LintArgs) -> PipelineReport {
    let source = if let Some(path) = &args.input {
        let format = probeq_io::resolve_input_format(path).ok();
        PipelineInputSource::path("input", path.display().to_string(), format_label(format))
    } else {
        PipelineInputSource::stdin("input", Some(Format::Json.as_str()))
    };

    PipelineReport::new(
        "lint",
        PipelineInput::new(vec![source]),
        lint::pipeline_steps(),
        lint::deterministic_guards(),
    )
}

fn format_label(format: Option<Format>) -> Option<&'static str> {
    format.map(Format::as_str)
}

fn emit_json_stdout(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            println!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_pipeline_report(report: &PipelineReport) {
    match serde_json::to_string(report) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(error) => emit_error(
            "internal_error",
            format!("failed to serialize pipeline report: {error}"),
            json!({"command": "emit_pipeline"}),
            1,
        ),
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
