/// Human-readable dumps of parsed option specs, for debugging

use crate::ast::*;
use std::fmt::Write as FmtWrite;

/// Dump an option-spec document as an indented tree
pub fn dump_options(specs: &OptionSpecs) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_specs(&mut out, specs);
    out
}

fn write_specs(out: &mut String, specs: &OptionSpecs) -> std::fmt::Result {
    writeln!(out, "OptionSpecs:")?;
    for item in &specs.items {
        match item {
            SpecItem::Group(title) => writeln!(out, "  Group: {}", title)?,
            SpecItem::Option(opt) => write_option(out, opt)?,
        }
    }
    Ok(())
}

fn write_option(out: &mut String, opt: &OptionSpec) -> std::fmt::Result {
    writeln!(out, "  Option: {} ({})", opt.dest, opt.ident())?;
    writeln!(out, "    aliases: {}", opt.aliases.join(" "))?;
    match &opt.kind {
        OptionKind::Choices(choices) => writeln!(out, "    kind: choices [{}]", choices.join(", "))?,
        kind => writeln!(out, "    kind: {:?}", kind)?,
    }
    if let Some(default) = &opt.default {
        writeln!(out, "    default: {:?}", default)?;
    }
    if let Some(completion) = &opt.completion {
        writeln!(out, "    completion: {:?}", completion)?;
    }
    if let Some(condition) = &opt.condition {
        writeln!(out, "    condition: {}", condition)?;
    }
    if !opt.help.is_empty() {
        writeln!(out, "    help: {:?}", opt.help)?;
    }
    Ok(())
}
