/// Command-line definitions for wrapped kittens
///
/// The ssh shell wrapper lists the kittens it forwards in a
/// `wrapped_kittens="..."` assignment. Each of them gets a generated Go file
/// that registers its sub-command, its options, and an `Options` struct.

use crate::error::{CompileError, Result};
use crate::golang::{completer, escape_string, struct_declaration, Registration};
use crate::manifest::{read_resource, KittenDocs};
use optgen_spec::{CompletionSpec, OptionSpec};
use std::path::Path;

const WRAPPED_KITTENS_PREFIX: &str = "    wrapped_kittens=\"";

/// Kitten names listed by the wrapper script, sorted
pub fn wrapped_kittens(script: &Path) -> Result<Vec<String>> {
    let text = read_resource(script)?;
    parse_wrapped_kittens(&text)
        .ok_or_else(|| CompileError::resource_missing(script, "no wrapped_kittens assignment in wrapper script"))
}

fn parse_wrapped_kittens(script: &str) -> Option<Vec<String>> {
    let line = script.lines().find(|l| l.starts_with(WRAPPED_KITTENS_PREFIX))?;
    let value = line[WRAPPED_KITTENS_PREFIX.len()..].trim_end();
    let value = value.strip_suffix('"').unwrap_or(value);
    let mut names: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    names.sort();
    Some(names)
}

/// Go source declaring the CLI of one kitten
pub fn kitten_cli(
    kitten: &str,
    docs: &KittenDocs,
    options: &[OptionSpec],
    args_completion: Option<&CompletionSpec>,
    cli_import: &str,
) -> String {
    let has_underscore = kitten.contains('_');
    let mut out = Vec::new();

    out.push(format!("package {}", kitten));
    out.push(format!("import \"{}\"", cli_import));
    out.push(
        "func create_cmd(root *cli.Command, run_func func(*cli.Command, *Options, []string)(int, error)) {".to_string(),
    );
    out.push("ans := root.AddSubCommand(&cli.Command{".to_string());
    out.push(format!("Name: \"{}\",", kitten));
    out.push(format!("ShortDescription: \"{}\",", escape_string(&docs.short_desc)));
    if !docs.usage.is_empty() {
        out.push(format!("Usage: \"[options] {}\",", escape_string(&docs.usage)));
    }
    out.push(format!("HelpText: \"{}\",", escape_string(&docs.help_text)));
    out.push("Run: func(cmd *cli.Command, args []string) (int, error) {".to_string());
    out.push("opts := Options{}".to_string());
    out.push("err := cmd.GetOptionValues(&opts)".to_string());
    out.push("if err != nil { return 1, err }".to_string());
    out.push("return run_func(cmd, &opts, args)},".to_string());
    if has_underscore {
        out.push("Hidden: true,".to_string());
    }
    out.push("})".to_string());

    let registration = Registration::on("ans");
    for opt in options {
        out.push(registration.render(opt));
    }
    if let Some(code) = args_completion.and_then(completer) {
        out.push(format!("ans.ArgCompleter = {}", code));
    }
    if has_underscore {
        out.push("clone := root.AddClone(ans.Group, ans)".to_string());
        out.push("clone.Hidden = false".to_string());
        out.push(format!("clone.Name = \"{}\"", escape_string(&kitten.replace('_', "-"))));
    }
    out.push("}".to_string());

    out.push("type Options struct {".to_string());
    out.push(options.iter().map(struct_declaration).collect::<Vec<_>>().join("\n"));
    out.push("}".to_string());

    let mut text = out.join("\n");
    text.push('\n');
    text
}
