use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::io::format::{json, yaml};
use crate::io::{Format, IoError};

/// Reads exactly one document in `format`.
pub fn read_document<R: Read>(reader: R, format: Format) -> Result<Value, IoError> {
    match format {
        Format::Json => json::read_json(reader),
        Format::Yaml => yaml::read_yaml(reader),
    }
}

/// Opens `path` and reads one document, resolving the format from the
/// extension.
pub fn read_document_from_path(path: &Path) -> Result<Value, IoError> {
    let format = crate::io::resolve_input_format(path)?;
    let file = File::open(path)?;
    read_document(file, format)
}
