/// optgen compiler
///
/// Compiles option specifications and protocol field specifications into
/// Go source: option structs, flag registrations, JSON payload structs, and
/// the statements wiring options into payloads.

pub mod args;
pub mod cache;
pub mod codegen;
pub mod driver;
pub mod enums;
pub mod error;
pub mod globals;
pub mod golang;
pub mod kittens;
pub mod manifest;
pub mod template;
pub mod types;
pub mod writer;

pub use args::ArgsSpec;
pub use cache::OptionCache;
pub use codegen::{Binding, CommandCompiler, CommandFragments, CommandSpec, CompileRules, FieldAlias};
pub use driver::{GenerateOptions, GenerateOutput, Generator};
pub use error::{CompileError, Result};
pub use manifest::{Manifest, TextSource};
pub use template::{Substitutions, Template};
pub use types::{go_field_type, FieldType};
pub use writer::{GeneratedUnit, OutputWriter};
