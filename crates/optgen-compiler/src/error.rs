/// Error types for the generator
///
/// Every variant is fatal: a failed run leaves no generated output behind.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: optgen_spec::ParseError,
    },

    #[error("Unknown JSON field type: {0}")]
    UnknownType(String),

    #[error("Cannot map fields: {} for command: {command}", .fields.join(", "))]
    UnresolvedFields { command: String, fields: Vec<String> },

    #[error("Unused options: {} for command: {command}", .options.join(", "))]
    UnusedOptions { command: String, options: Vec<String> },

    #[error("Unsupported argument handling for command {command}: {reason}")]
    UnsupportedArgs { command: String, reason: String },

    #[error("Required resource {path} is unavailable: {reason}")]
    ResourceMissing { path: PathBuf, reason: String },

    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Command {0} is listed more than once in the manifest")]
    DuplicateCommand(String),
}

impl CompileError {
    pub fn parse(origin: impl Into<String>, source: optgen_spec::ParseError) -> Self {
        CompileError::Parse {
            origin: origin.into(),
            source,
        }
    }

    pub fn resource_missing(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CompileError::ResourceMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
