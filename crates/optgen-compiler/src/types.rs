/// JSON field types and their Go representation
///
/// Field types are written as dotted tokens (`str`, `list.str`,
/// `dict.list.int`, `choices.yes.no`). A token is parsed once into a
/// `FieldType` and then rendered as a Go type expression.

use crate::error::{CompileError, Result};
use std::fmt;

/// A payload field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    /// String that is escaped before crossing the wire
    Str,
    Int,
    Float,
    /// Value passed through as `any` (`scroll_amount`, `spacing`, `colors`)
    Opaque(String),
    /// Plain string restricted to a set of words (not enforced in Go)
    Choices(Vec<String>),
    List(Box<FieldType>),
    Dict(Box<FieldType>),
}

/// Types that carry structured data the generated code does not inspect
const OPAQUE_TYPES: &[&str] = &["scroll_amount", "spacing", "colors"];

impl FieldType {
    /// Parse a dotted type token
    pub fn parse(token: &str) -> Result<FieldType> {
        match token {
            "bool" => return Ok(FieldType::Bool),
            "str" => return Ok(FieldType::Str),
            "int" => return Ok(FieldType::Int),
            "float" => return Ok(FieldType::Float),
            t if OPAQUE_TYPES.contains(&t) => return Ok(FieldType::Opaque(t.to_string())),
            _ => {}
        }

        if let Some(words) = token.strip_prefix("choices.") {
            return Ok(FieldType::Choices(words.split('.').map(str::to_string).collect()));
        }

        match token.split_once('.') {
            Some(("list", rest)) => Ok(FieldType::List(Box::new(FieldType::parse(rest)?))),
            Some(("dict", rest)) => Ok(FieldType::Dict(Box::new(FieldType::parse(rest)?))),
            _ => Err(CompileError::UnknownType(token.to_string())),
        }
    }

    /// Go type expression for this field type
    pub fn go_type(&self) -> String {
        match self {
            FieldType::Bool => "bool".to_string(),
            FieldType::Str => "escaped_string".to_string(),
            FieldType::Int => "int".to_string(),
            FieldType::Float => "float64".to_string(),
            FieldType::Opaque(_) => "any".to_string(),
            FieldType::Choices(_) => "string".to_string(),
            FieldType::List(inner) => format!("[]{}", inner.go_type()),
            // A map of strings escapes its keys too
            FieldType::Dict(inner) if **inner == FieldType::Str => "map[escaped_string]escaped_string".to_string(),
            FieldType::Dict(inner) => format!("map[string]{}", inner.go_type()),
        }
    }

    /// Whether this is a list of escaped strings
    pub fn is_string_list(&self) -> bool {
        matches!(self, FieldType::List(inner) if **inner == FieldType::Str)
    }

    /// Whether this is a map of escaped strings
    pub fn is_string_dict(&self) -> bool {
        matches!(self, FieldType::Dict(inner) if **inner == FieldType::Str)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Str => f.write_str("str"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Opaque(name) => f.write_str(name),
            FieldType::Choices(words) => write!(f, "choices.{}", words.join(".")),
            FieldType::List(inner) => write!(f, "list.{}", inner),
            FieldType::Dict(inner) => write!(f, "dict.{}", inner),
        }
    }
}

/// Resolve a dotted type token straight to its Go type
pub fn go_field_type(token: &str) -> Result<String> {
    FieldType::parse(token).map(|t| t.go_type())
}
