/// Parsed option specifications
///
/// An option block in the text grammar becomes one `OptionSpec`. The kind of
/// value the option carries is a closed set, so it is modeled as a sum type
/// rather than a free-form type string.

use crate::completion::CompletionSpec;

/// A parsed option-spec document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionSpecs {
    pub items: Vec<SpecItem>,
}

/// Top-level item in an option-spec document
#[derive(Debug, Clone, PartialEq)]
pub enum SpecItem {
    /// Group heading: `# Title`
    Group(String),
    /// A single option block
    Option(OptionSpec),
}

impl OptionSpecs {
    /// Iterate over the options, skipping group headings
    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.items.iter().filter_map(|item| match item {
            SpecItem::Option(opt) => Some(opt),
            SpecItem::Group(_) => None,
        })
    }

    /// Consume the document, keeping only the options
    pub fn into_options(self) -> Vec<OptionSpec> {
        self.items
            .into_iter()
            .filter_map(|item| match item {
                SpecItem::Option(opt) => Some(opt),
                SpecItem::Group(_) => None,
            })
            .collect()
    }
}

/// One command-line option
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Destination name (snake_case)
    pub dest: String,
    /// All spellings, long form first: `--place`, `-p`
    pub aliases: Vec<String>,
    pub kind: OptionKind,
    /// Default value as written in the spec
    pub default: Option<String>,
    pub help: String,
    /// Shell completion hint
    pub completion: Option<CompletionSpec>,
    /// Platform condition, documentation only
    pub condition: Option<String>,
}

impl OptionSpec {
    /// Identifier of this option in generated code (`scale_up` -> `ScaleUp`)
    pub fn ident(&self) -> String {
        camel_case(&self.dest)
    }
}

/// The kind of value an option carries
#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    /// Boolean flag; `bool-set` defaults to false, `bool-reset` to true
    Flag { default: bool },
    Str,
    Int,
    Float,
    /// One of a fixed set of words
    Choices(Vec<String>),
    /// Repeatable option collecting strings
    List,
    /// Repeatable `key=value` option
    Dict,
}

impl OptionKind {
    /// Parse a `type=` value; `choices` is filled in later
    pub fn from_type_name(name: &str) -> Option<OptionKind> {
        match name {
            "bool-set" => Some(OptionKind::Flag { default: false }),
            "bool-reset" => Some(OptionKind::Flag { default: true }),
            "" | "str" => Some(OptionKind::Str),
            "int" => Some(OptionKind::Int),
            "float" => Some(OptionKind::Float),
            "choices" | "choice" => Some(OptionKind::Choices(Vec::new())),
            "list" => Some(OptionKind::List),
            "dict" => Some(OptionKind::Dict),
            _ => None,
        }
    }

    /// Type name as understood by the runtime flag parser
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionKind::Flag { default: false } => "bool-set",
            OptionKind::Flag { default: true } => "bool-reset",
            OptionKind::Str => "",
            OptionKind::Int => "int",
            OptionKind::Float => "float",
            OptionKind::Choices(_) => "choices",
            OptionKind::List => "list",
            OptionKind::Dict => "dict",
        }
    }
}

/// Convert a snake_case name to CamelCase.
///
/// Each `_`-separated word gets an upper-case first letter and a lower-case
/// remainder, so `match_window` and `MATCH_WINDOW` both become `MatchWindow`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}
