pub mod error;
pub mod format;
pub mod reader;

use std::path::Path;

pub use error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Resolves a document format from the path extension (`json`, `yaml`, `yml`).
pub fn resolve_input_format(path: &Path) -> Result<Format, IoError> {
    format_from_path(path).ok_or_else(|| IoError::UnsupportedPathExtension {
        kind: "input",
        path: path.to_string_lossy().into_owned(),
    })
}

fn format_from_path(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        _ => None,
    }
}
