/// Protocol field specifications
///
/// Each line of a protocol spec describes one field of a command's JSON
/// payload: `name[+]/type[: free text]`. A trailing `+` marks the field
/// required. Lines without a `:` separate groups and are skipped.

use crate::error::{ParseError, Result};
use std::collections::HashSet;

/// One field of a JSON payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonField {
    /// Field name as it appears on the wire
    pub name: String,
    pub required: bool,
    /// Dotted type token, e.g. `list.str` or `choices.yes.no`
    pub field_type: String,
    /// Struct field identifier: the name with its first letter upper-cased
    pub struct_field: String,
}

impl JsonField {
    /// Parse a single field line; `line` is the 1-based position for errors
    pub fn parse(line: usize, text: &str) -> Result<Self> {
        let malformed = || ParseError::MalformedField { line, text: text.to_string() };

        let definition = text.split_once(':').map_or(text, |(def, _)| def).trim();
        let (name, field_type) = definition.split_once('/').ok_or_else(malformed)?;
        let (name, required) = match name.strip_suffix('+') {
            Some(name) => (name, true),
            None => (name, false),
        };
        if name.is_empty() || field_type.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            name: name.to_string(),
            required,
            field_type: field_type.to_string(),
            struct_field: upper_first(name),
        })
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a protocol spec block into its fields, in declaration order
pub fn parse_fields(input: &str) -> Result<Vec<JsonField>> {
    let mut fields = Vec::new();
    let mut seen = HashSet::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if !line.contains(':') {
            continue;
        }
        let field = JsonField::parse(idx + 1, line)?;
        if !seen.insert(field.name.clone()) {
            return Err(ParseError::DuplicateField { name: field.name });
        }
        fields.push(field);
    }

    Ok(fields)
}
