/// Errors raised while reading option and field specifications

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: unexpected text outside an option block: {text:?}")]
    UnexpectedLine { line: usize, text: String },

    #[error("line {line}: invalid option alias {alias:?}")]
    InvalidAlias { line: usize, alias: String },

    #[error("line {line}: unknown option type {name:?}")]
    UnknownOptionType { line: usize, name: String },

    #[error("line {line}: unknown option metadata key {key:?}")]
    UnknownKey { line: usize, key: String },

    #[error("invalid completion hint {spec:?}: {reason}")]
    InvalidCompletion { spec: String, reason: String },

    #[error("option {dest:?} is of type choices but lists no choices")]
    MissingChoices { dest: String },

    #[error("option {dest:?} has invalid default {value:?}: {reason}")]
    InvalidDefault { dest: String, value: String, reason: String },

    #[error("option {dest:?} is declared more than once")]
    DuplicateOption { dest: String },

    #[error("line {line}: malformed field definition {text:?}")]
    MalformedField { line: usize, text: String },

    #[error("field {name:?} is declared more than once")]
    DuplicateField { name: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;
