/// Option and protocol field specification parsing
///
/// This is the only crate that touches the textual grammars. Everything
/// downstream works on `OptionSpec` and `JsonField` values.

pub mod ast;
pub mod completion;
pub mod dump;
pub mod error;
pub mod fields;
pub mod options;

pub use ast::{camel_case, OptionKind, OptionSpec, OptionSpecs, SpecItem};
pub use completion::{CompletionKind, CompletionSpec, RelativeTo};
pub use error::{ParseError, Result};
pub use fields::{parse_fields, JsonField};
pub use options::parse_options;
