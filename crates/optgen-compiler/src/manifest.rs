/// Generation manifest
///
/// The manifest is a JSON file listing every unit a run produces, together
/// with the rules the command compiler applies. Text inputs (option specs,
/// protocol specs, templates) are either inline strings or
/// `{ "file": "path" }` references resolved against the manifest directory.

use crate::args::ArgsSpec;
use crate::codegen::{CommandSpec, CompileRules, DEFAULT_RESPONSE_TIMEOUT};
use crate::enums::EnumSpec;
use crate::error::{CompileError, Result};
use optgen_spec::OptionSpec;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Inline text or a file reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextSource {
    Inline(String),
    File { file: PathBuf },
}

impl Default for TextSource {
    fn default() -> Self {
        TextSource::Inline(String::new())
    }
}

impl TextSource {
    /// Load the text, resolving file references against `base`
    pub fn load(&self, base: &Path) -> Result<String> {
        match self {
            TextSource::Inline(text) => Ok(text.clone()),
            TextSource::File { file } => read_resource(&base.join(file)),
        }
    }
}

/// Read a file the run cannot proceed without
pub fn read_resource(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CompileError::resource_missing(path, "file not found"),
        _ => CompileError::Io(e),
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Name shown in the generated-file banner
    #[serde(default = "default_generator")]
    pub generator: String,
    /// Root for all output paths, relative to the manifest directory
    #[serde(default)]
    pub output_root: Option<PathBuf>,
    /// Go import path of the command-line package
    #[serde(default = "default_cli_import")]
    pub cli_import: String,
    #[serde(default)]
    pub rules: CompileRules,
    #[serde(default)]
    pub command_template: Option<TextSource>,
    /// Output path pattern for remote commands; `{name}` is the command name
    #[serde(default = "default_command_output")]
    pub command_output: String,
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
    #[serde(default)]
    pub global_options: Option<GlobalOptionsEntry>,
    #[serde(default)]
    pub kittens: Option<KittensEntry>,
    #[serde(default)]
    pub enums: Vec<EnumSpec>,
}

fn default_generator() -> String {
    "optgenc".to_string()
}

fn default_cli_import() -> String {
    "kitty/tools/cli".to_string()
}

fn default_command_output() -> String {
    "tools/cmd/at/cmd_{name}_generated.go".to_string()
}

fn default_global_output() -> String {
    "tools/cmd/at/global_opts_generated.go".to_string()
}

fn default_global_package() -> String {
    "at".to_string()
}

fn default_kitten_output() -> String {
    "tools/cmd/{name}/cli_generated.go".to_string()
}

fn default_response_timeout() -> f64 {
    DEFAULT_RESPONSE_TIMEOUT
}

/// A remote command as described in the manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    pub name: String,
    #[serde(default)]
    pub options: TextSource,
    #[serde(default)]
    pub protocol_spec: TextSource,
    #[serde(default)]
    pub field_to_option: BTreeMap<String, String>,
    #[serde(default)]
    pub args: ArgsSpec,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub is_asynchronous: bool,
    #[serde(default = "default_response_timeout")]
    pub response_timeout: f64,
    #[serde(default)]
    pub string_return_is_error: bool,
    #[serde(default)]
    pub reads_streaming_data: bool,
}

impl CommandEntry {
    /// Build the compiler's view of this command
    pub fn to_spec(&self, options: Rc<[OptionSpec]>, protocol_spec: String) -> CommandSpec {
        CommandSpec {
            name: self.name.clone(),
            options,
            protocol_spec,
            field_to_option: self.field_to_option.clone(),
            args: self.args.clone(),
            short_desc: self.short_desc.clone(),
            desc: self.desc.clone(),
            is_asynchronous: self.is_asynchronous,
            response_timeout: self.response_timeout,
            string_return_is_error: self.string_return_is_error,
            reads_streaming_data: self.reads_streaming_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalOptionsEntry {
    pub options: TextSource,
    #[serde(default = "default_global_output")]
    pub output: String,
    #[serde(default = "default_global_package")]
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KittensEntry {
    /// Shell wrapper script listing the wrapped kittens
    pub wrapper_script: PathBuf,
    /// Output path pattern; `{name}` is the kitten name
    #[serde(default = "default_kitten_output")]
    pub output: String,
    /// CLI documentation for each kitten
    #[serde(default)]
    pub docs: BTreeMap<String, KittenDocs>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KittenDocs {
    pub short_desc: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub options: TextSource,
    /// Completion hint for positional arguments
    #[serde(default)]
    pub args_completion: Option<String>,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Manifest> {
        let text = read_resource(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Manifest> {
        let manifest: Manifest = serde_json::from_str(text)?;
        let mut names = HashSet::new();
        for entry in &manifest.commands {
            if !names.insert(entry.name.as_str()) {
                return Err(CompileError::DuplicateCommand(entry.name.clone()));
            }
        }
        Ok(manifest)
    }
}

/// Expand the `{name}` placeholder of an output path pattern
pub fn output_path(pattern: &str, name: &str) -> String {
    pattern.replace("{name}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert_eq!(manifest.generator, "optgenc");
        assert_eq!(manifest.rules, CompileRules::default());
        assert!(manifest.commands.is_empty());
        assert_eq!(output_path(&manifest.command_output, "ls"), "tools/cmd/at/cmd_ls_generated.go");
    }

    #[test]
    fn test_command_entry() {
        let manifest = Manifest::from_json(
            r#"{
                "command_template": {"file": "template.go"},
                "commands": [{
                    "name": "set_tab_title",
                    "options": "--match -m\nWhich tab.\n",
                    "protocol_spec": {"file": "specs/set_tab_title.txt"},
                    "field_to_option": {"match": "match"},
                    "args": {"spec": "TITLE ...", "json_field": "title"},
                    "short_desc": "Set the tab title",
                    "response_timeout": 5
                }]
            }"#,
        )
        .unwrap();
        let cmd = &manifest.commands[0];
        assert_eq!(cmd.options, TextSource::Inline("--match -m\nWhich tab.\n".into()));
        assert_eq!(cmd.protocol_spec, TextSource::File { file: "specs/set_tab_title.txt".into() });
        assert_eq!(cmd.args.json_field, "title");
        assert_eq!(cmd.response_timeout, 5.0);
        assert!(!cmd.is_asynchronous);
    }

    #[test]
    fn test_rules_override() {
        let manifest = Manifest::from_json(
            r#"{"rules": {"unused_option_exemptions": [], "field_aliases": [{"field": "w", "option": "Match"}]}}"#,
        )
        .unwrap();
        assert!(manifest.rules.unused_option_exemptions.is_empty());
        assert_eq!(manifest.rules.reserved_options, vec!["NoResponse", "ResponseTimeout"]);
        assert_eq!(manifest.rules.field_aliases[0].field, "w");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            Manifest::from_json(r#"{"comands": []}"#),
            Err(CompileError::Manifest(_))
        ));
    }

    #[test]
    fn test_duplicate_command_names_rejected() {
        let err = Manifest::from_json(r#"{"commands": [{"name": "ls"}, {"name": "close_tab"}, {"name": "ls"}]}"#)
            .unwrap_err();
        assert!(matches!(err, CompileError::DuplicateCommand(ref name) if name == "ls"));
    }

    #[test]
    fn test_text_source_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("spec.txt"), "a/str: x").unwrap();
        let source = TextSource::File { file: "spec.txt".into() };
        assert_eq!(source.load(dir.path()).unwrap(), "a/str: x");

        let missing = TextSource::File { file: "nope.txt".into() };
        assert!(matches!(
            missing.load(dir.path()),
            Err(CompileError::ResourceMissing { .. })
        ));
    }
}
