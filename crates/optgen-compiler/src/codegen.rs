/// Remote command compilation
///
/// Joins a command's options with its protocol fields and produces the Go
/// fragments for one generated command file: option struct fields, option
/// registrations, payload struct fields, and the statements that copy option
/// values into the payload.
///
/// Two closure checks run on every command. Each payload field must be bound
/// to an option, a positional argument, or a configured alias; and each
/// option must feed some field. Either failure aborts generation.

use crate::args::ArgsSpec;
use crate::error::{CompileError, Result};
use crate::golang::{escape_string, struct_declaration, Registration};
use crate::template::{Substitutions, Template};
use crate::types::FieldType;
use optgen_spec::{camel_case, parse_fields, JsonField, OptionSpec};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use tracing::debug;

/// Everything needed to generate one remote command
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub options: Rc<[OptionSpec]>,
    /// Protocol field specification text
    pub protocol_spec: String,
    /// Field name -> option destination, for fields named unlike their option
    pub field_to_option: BTreeMap<String, String>,
    pub args: ArgsSpec,
    pub short_desc: String,
    pub desc: String,
    pub is_asynchronous: bool,
    /// Seconds to wait for a response
    pub response_timeout: f64,
    /// A string response from the peer is an error message
    pub string_return_is_error: bool,
    pub reads_streaming_data: bool,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, options: impl Into<Rc<[OptionSpec]>>, protocol_spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: options.into(),
            protocol_spec: protocol_spec.into(),
            field_to_option: BTreeMap::new(),
            args: ArgsSpec::default(),
            short_desc: String::new(),
            desc: String::new(),
            is_asynchronous: false,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            string_return_is_error: false,
            reads_streaming_data: false,
        }
    }

    /// Name as typed on the command line
    pub fn cli_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

pub const DEFAULT_RESPONSE_TIMEOUT: f64 = 10.0;

/// A payload field that may bind to an option it is not named after
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldAlias {
    pub field: String,
    /// Option identifier (CamelCase)
    pub option: String,
}

/// Exceptions to the binding checks, kept as data
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileRules {
    /// Options controlling response handling; never bound, never declared
    pub reserved_options: Vec<String>,
    /// Commands allowed to declare options no field consumes
    pub unused_option_exemptions: Vec<String>,
    /// Fallback bindings tried for otherwise unresolved fields
    pub field_aliases: Vec<FieldAlias>,
}

impl Default for CompileRules {
    fn default() -> Self {
        Self {
            reserved_options: vec!["NoResponse".into(), "ResponseTimeout".into()],
            unused_option_exemptions: vec!["send_text".into()],
            field_aliases: vec![FieldAlias {
                field: "match_window".into(),
                option: "Match".into(),
            }],
        }
    }
}

impl CompileRules {
    fn is_reserved(&self, ident: &str) -> bool {
        self.reserved_options.iter().any(|r| r == ident)
    }

    fn is_exempt(&self, command: &str) -> bool {
        self.unused_option_exemptions.iter().any(|c| c == command)
    }
}

/// A payload field bound to an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub field: String,
    /// Option identifier
    pub option: String,
}

/// Generated Go fragments for one command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandFragments {
    /// Option registration statements
    pub add_flags: String,
    /// Options struct fields
    pub options_declaration: String,
    /// Payload struct fields
    pub json_declaration: String,
    /// Statements filling the payload
    pub json_init: String,
    /// Field-to-option bindings, in field order
    pub bindings: Vec<Binding>,
}

/// Compiles remote commands against a set of rules
pub struct CommandCompiler<'r> {
    rules: &'r CompileRules,
    /// Name written into the `__FILE__` marker
    generator: String,
}

impl<'r> CommandCompiler<'r> {
    pub fn new(rules: &'r CompileRules) -> Self {
        Self {
            rules,
            generator: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    pub fn generator(mut self, name: impl Into<String>) -> Self {
        self.generator = name.into();
        self
    }

    /// Compile a command into its fragments
    pub fn compile(&self, cmd: &CommandSpec) -> Result<CommandFragments> {
        let name = cmd.name.as_str();
        let mut add_flags = Vec::new();
        let mut options_declaration = Vec::new();
        let mut declared: HashSet<String> = HashSet::new();

        for opt in cmd.options.iter() {
            let ident = opt.ident();
            add_flags.push(Registration::on("ans").render(opt));
            if !self.rules.is_reserved(&ident) {
                options_declaration.push(struct_declaration(opt));
            }
            declared.insert(ident);
        }

        let json_fields = parse_fields(&cmd.protocol_spec)
            .map_err(|e| CompileError::parse(format!("protocol spec of {}", name), e))?;
        let mut json_declaration = Vec::with_capacity(json_fields.len());
        let mut field_types = HashMap::with_capacity(json_fields.len());
        let mut typed_fields = Vec::with_capacity(json_fields.len());
        for field in &json_fields {
            let field_type = FieldType::parse(&field.field_type)?;
            json_declaration.push(format!(
                "{} {}`json:\"{},omitempty\"`",
                field.struct_field,
                field_type.go_type(),
                field.name
            ));
            field_types.insert(field.name.clone(), (field.struct_field.clone(), field_type.clone()));
            typed_fields.push((field, field_type));
        }

        let mut handled = HashSet::new();
        let mut json_init = cmd.args.binding_code(name, &field_types, &mut handled)?;

        let mut used: HashSet<String> = HashSet::new();
        let mut bindings = Vec::new();
        let mut unresolved: Vec<(&JsonField, &FieldType)> = Vec::new();

        for (field, field_type) in &typed_fields {
            let key = cmd.field_to_option.get(&field.name).unwrap_or(&field.name);
            let ident = camel_case(key);
            // An option feeds at most one field
            if declared.contains(&ident) && !used.contains(&ident) {
                json_init.push(binding_statement(name, field, field_type, &ident));
                bindings.push(Binding {
                    field: field.name.clone(),
                    option: ident.clone(),
                });
                used.insert(ident);
            } else if !handled.contains(&field.name) {
                unresolved.push((*field, field_type));
            }
        }

        unresolved.retain(|(field, field_type)| {
            let alias = self.rules.field_aliases.iter().find(|a| {
                a.field == field.name && declared.contains(&a.option) && !used.contains(&a.option)
            });
            match alias {
                Some(alias) => {
                    debug!(command = name, field = %field.name, option = %alias.option, "binding field through alias");
                    json_init.push(binding_statement(name, field, field_type, &alias.option));
                    bindings.push(Binding {
                        field: field.name.clone(),
                        option: alias.option.clone(),
                    });
                    used.insert(alias.option.clone());
                    false
                }
                None => true,
            }
        });

        if !unresolved.is_empty() {
            return Err(CompileError::UnresolvedFields {
                command: name.to_string(),
                fields: unresolved.iter().map(|(f, _)| f.name.clone()).collect(),
            });
        }

        if !self.rules.is_exempt(name) {
            let unused: Vec<String> = cmd
                .options
                .iter()
                .map(OptionSpec::ident)
                .filter(|ident| !used.contains(ident) && !self.rules.is_reserved(ident))
                .collect();
            if !unused.is_empty() {
                return Err(CompileError::UnusedOptions {
                    command: name.to_string(),
                    options: unused,
                });
            }
        }

        Ok(CommandFragments {
            add_flags: add_flags.join("\n"),
            options_declaration: options_declaration.join("\n"),
            json_declaration: json_declaration.join("\n"),
            json_init: json_init.join("\n"),
            bindings,
        })
    }

    /// Substitute a command's metadata and fragments into its template
    pub fn render(&self, cmd: &CommandSpec, fragments: &CommandFragments, template: &Template) -> String {
        let argspec = if cmd.args.spec.is_empty() {
            String::new()
        } else {
            format!(" {}", cmd.args.spec)
        };
        // Go accepts a float literal wherever the timeout is used
        let timeout = format!("{:?}", cmd.response_timeout);

        let subs = Substitutions::new()
            .set("CMD_NAME", cmd.name.as_str())
            .set("__FILE__", self.generator.as_str())
            .set("CLI_NAME", cmd.cli_name())
            .set("SHORT_DESC", escape_string(&cmd.short_desc))
            .set("LONG_DESC", escape_string(cmd.desc.trim()))
            .set_bool("IS_ASYNC", cmd.is_asynchronous)
            .set_bool("NO_RESPONSE_BASE", false)
            .set("ADD_FLAGS_CODE", fragments.add_flags.as_str())
            .set("WAIT_TIMEOUT", timeout)
            .set("OPTIONS_DECLARATION_CODE", fragments.options_declaration.as_str())
            .set("JSON_DECLARATION_CODE", fragments.json_declaration.as_str())
            .set("JSON_INIT_CODE", fragments.json_init.as_str())
            .set("ARGSPEC", argspec)
            .set_bool("STRING_RESPONSE_IS_ERROR", cmd.string_return_is_error)
            .set_bool("STREAM_WANTED", cmd.reads_streaming_data);

        template.render(&subs)
    }

    /// Compile and render in one step
    pub fn generate(&self, cmd: &CommandSpec, template: &Template) -> Result<String> {
        let fragments = self.compile(cmd)?;
        debug!(
            command = %cmd.name,
            bindings = fragments.bindings.len(),
            "compiled remote command"
        );
        Ok(self.render(cmd, &fragments, template))
    }
}

/// `payload.Field = <expr>` copying an option value into the payload
fn binding_statement(command: &str, field: &JsonField, field_type: &FieldType, option: &str) -> String {
    let source = format!("options_{}.{}", command, option);
    let value = match field_type {
        FieldType::Str => format!("escaped_string({})", source),
        t if t.is_string_list() => format!("escape_list_of_strings({})", source),
        t if t.is_string_dict() => format!("escape_dict_of_strings({})", source),
        _ => source,
    };
    format!("payload.{} = {}", field.struct_field, value)
}
