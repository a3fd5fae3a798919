/// Positional argument handling for remote commands
///
/// Some payload fields are filled from positional arguments rather than
/// options. `ArgsSpec` describes how, and emits the Go statements that
/// validate `args` and copy them into the payload. Fields it binds are
/// reported back so the option matcher skips them.

use crate::error::{CompileError, Result};
use crate::golang::quote;
use crate::types::FieldType;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgsSpec {
    /// Usage text shown after the command name; empty means no arguments
    pub spec: String,
    /// Payload field receiving the arguments
    pub json_field: String,
    /// Exact number of arguments required
    pub count: Option<usize>,
    pub minimum_count: Option<usize>,
    /// Arguments assumed when none are given
    pub value_if_unspecified: Vec<String>,
    /// Fields receiving the first argument and the remaining ones
    pub first_rest: Option<(String, String)>,
    /// Go expression producing the field value; a leading `!` makes it
    /// produce a multiple-payload generator instead
    pub special_parse: Option<String>,
    /// Allowed argument values
    pub choices: Vec<String>,
}

impl ArgsSpec {
    /// Number of arguments required, if fixed
    pub fn args_count(&self) -> Option<usize> {
        if self.spec.is_empty() { Some(0) } else { self.count }
    }

    /// Emit the argument binding statements for `command`.
    ///
    /// `fields` maps every payload field name to its parsed type. Fields bound
    /// here are added to `handled`.
    pub fn binding_code(
        &self,
        command: &str,
        fields: &HashMap<String, (String, FieldType)>,
        handled: &mut HashSet<String>,
    ) -> Result<Vec<String>> {
        let mut code = Vec::new();
        let count = self.args_count();

        if count == Some(0) {
            code.push(format!(
                "if len(args) != 0 {{ return fmt.Errorf(\"%s\", {}) }}",
                quote(&format!("Unknown extra argument(s) supplied to {}", command))
            ));
            return Ok(code);
        }
        if let Some(c) = count {
            code.push(format!(
                "if len(args) != {} {{ return fmt.Errorf(\"%s\", {}) }}",
                c,
                quote(&format!("Must specify exactly {} argument(s) for {}", c, command))
            ));
        }
        if !self.value_if_unspecified.is_empty() {
            code.push("if len(args) == 0 {".to_string());
            for value in &self.value_if_unspecified {
                code.push(format!("args = append(args, {})", quote(value)));
            }
            code.push("}".to_string());
        }
        if let Some(minimum) = self.minimum_count {
            code.push(format!(
                "if len(args) < {} {{ return fmt.Errorf(\"%s\", {}) }}",
                minimum,
                quote(&format!("Must specify at least {} arguments to {}", minimum, command))
            ));
        }
        if !self.choices.is_empty() {
            let entries: Vec<String> = self.choices.iter().map(|c| format!("{}: true,", quote(c))).collect();
            code.push(format!("achoices := map[string]bool{{{}}}", entries.join(" ")));
            code.push("for _, a := range args {".to_string());
            code.push(format!(
                "if !achoices[a] {{ return fmt.Errorf(\"Not a valid choice: %s. Allowed values are: %s\", a, {}) }}",
                quote(&self.choices.join(", "))
            ));
            code.push("}".to_string());
        }

        if let Some((first, rest)) = &self.first_rest {
            let first_field = self.field(command, fields, first)?;
            let rest_field = self.field(command, fields, rest)?;
            code.push(format!("payload.{} = {}", first_field, bind_single(&fields[first].1)));
            code.push(format!("payload.{} = {}", rest_field, bind_rest(&fields[rest].1)));
            handled.insert(first.clone());
            handled.insert(rest.clone());
            return Ok(code);
        }

        let struct_field = self.field(command, fields, &self.json_field)?;
        handled.insert(self.json_field.clone());
        let dest = format!("payload.{}", struct_field);

        if let Some(parse) = &self.special_parse {
            match parse.strip_prefix('!') {
                Some(generator) => code.push(format!("io_data.multiple_payload_generator, err = {}", generator)),
                None => code.push(format!("{}, err = {}", dest, parse)),
            }
            code.push("if err != nil { return err }".to_string());
            return Ok(code);
        }

        let field_type = &fields[&self.json_field].1;
        match field_type {
            t if t.is_string_list() => code.push(format!("{} = escape_list_of_strings(args)", dest)),
            FieldType::Str if count == Some(1) => code.push(format!("{} = escaped_string(args[0])", dest)),
            FieldType::Str => code.push(format!("{} = escaped_string(strings.Join(args, \" \"))", dest)),
            FieldType::Choices(words) => {
                let allowed: Vec<String> = words.iter().map(|w| quote(w)).collect();
                let allowed = allowed.join(", ");
                code.push(format!(
                    "if len(args) != 1 {{ return fmt.Errorf(\"%s\", {}) }}",
                    quote(&format!("Must specify exactly 1 argument for {}", command))
                ));
                code.push("switch(args[0]) {".to_string());
                code.push(format!("case {}:\n\t{} = args[0]", allowed, dest));
                code.push(format!(
                    "default: return fmt.Errorf(\"%s is not a valid choice. Allowed values: %s\", args[0], `{}`)",
                    allowed
                ));
                code.push("}".to_string());
            }
            t if t.is_string_dict() => code.push(format!("{} = parse_key_val_args(args)", dest)),
            other => {
                return Err(CompileError::UnsupportedArgs {
                    command: command.to_string(),
                    reason: format!("field {} has type {}", self.json_field, other),
                });
            }
        }

        Ok(code)
    }

    fn field<'f>(
        &self,
        command: &str,
        fields: &'f HashMap<String, (String, FieldType)>,
        name: &str,
    ) -> Result<&'f str> {
        fields.get(name).map(|(ident, _)| ident.as_str()).ok_or_else(|| CompileError::UnsupportedArgs {
            command: command.to_string(),
            reason: format!("arguments are bound to unknown field {:?}", name),
        })
    }
}

fn bind_single(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Str => "escaped_string(args[0])",
        _ => "args[0]",
    }
}

fn bind_rest(field_type: &FieldType) -> &'static str {
    if field_type.is_string_list() { "escape_list_of_strings(args[1:])" } else { "args[1:]" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(list: &[(&str, &str)]) -> HashMap<String, (String, FieldType)> {
        list.iter()
            .map(|(name, ty)| {
                let ident = format!("{}{}", name[..1].to_uppercase(), &name[1..]);
                (name.to_string(), (ident, FieldType::parse(ty).unwrap()))
            })
            .collect()
    }

    #[test]
    fn test_no_arguments() {
        let mut handled = HashSet::new();
        let code = ArgsSpec::default().binding_code("ls", &fields(&[]), &mut handled).unwrap();
        assert_eq!(code.len(), 1);
        assert!(code[0].contains("Unknown extra argument(s) supplied to ls"));
        assert!(handled.is_empty());
    }

    #[test]
    fn test_string_arguments_joined() {
        let spec = ArgsSpec {
            spec: "TITLE ...".into(),
            json_field: "title".into(),
            ..Default::default()
        };
        let mut handled = HashSet::new();
        let code = spec.binding_code("set_tab_title", &fields(&[("title", "str")]), &mut handled).unwrap();
        assert_eq!(code, vec!["payload.Title = escaped_string(strings.Join(args, \" \"))"]);
        assert!(handled.contains("title"));
    }

    #[test]
    fn test_single_string_argument() {
        let spec = ArgsSpec {
            spec: "PATH".into(),
            json_field: "path".into(),
            count: Some(1),
            ..Default::default()
        };
        let mut handled = HashSet::new();
        let code = spec.binding_code("load", &fields(&[("path", "str")]), &mut handled).unwrap();
        assert!(code[0].starts_with("if len(args) != 1 {"));
        assert_eq!(code[1], "payload.Path = escaped_string(args[0])");
    }

    #[test]
    fn test_first_rest() {
        let spec = ArgsSpec {
            spec: "ACTION [ARGS...]".into(),
            first_rest: Some(("action".into(), "args".into())),
            ..Default::default()
        };
        let mut handled = HashSet::new();
        let code = spec
            .binding_code("run", &fields(&[("action", "str"), ("args", "list.str")]), &mut handled)
            .unwrap();
        assert_eq!(
            code,
            vec![
                "payload.Action = escaped_string(args[0])",
                "payload.Args = escape_list_of_strings(args[1:])",
            ]
        );
        assert_eq!(handled.len(), 2);
    }

    #[test]
    fn test_choice_argument() {
        let spec = ArgsSpec {
            spec: "STATE".into(),
            json_field: "state".into(),
            ..Default::default()
        };
        let mut handled = HashSet::new();
        let code = spec.binding_code("toggle", &fields(&[("state", "choices.on.off")]), &mut handled).unwrap();
        let joined = code.join("\n");
        assert!(joined.contains("case \"on\", \"off\":\n\tpayload.State = args[0]"));
        assert!(joined.contains("Must specify exactly 1 argument for toggle"));
    }

    #[test]
    fn test_defaults_minimum_and_choices() {
        let spec = ArgsSpec {
            spec: "LAYOUTS ...".into(),
            json_field: "layouts".into(),
            minimum_count: Some(1),
            value_if_unspecified: vec!["tall".into()],
            choices: vec!["tall".into(), "fat".into()],
            ..Default::default()
        };
        let mut handled = HashSet::new();
        let code = spec.binding_code("goto_layout", &fields(&[("layouts", "list.str")]), &mut handled).unwrap();
        assert_eq!(code[0], "if len(args) == 0 {");
        assert_eq!(code[1], "args = append(args, \"tall\")");
        assert!(code[3].contains("Must specify at least 1 arguments to goto_layout"));
        assert_eq!(code[4], "achoices := map[string]bool{\"tall\": true, \"fat\": true,}");
        assert_eq!(code.last().unwrap(), "payload.Layouts = escape_list_of_strings(args)");
    }

    #[test]
    fn test_special_parse() {
        let spec = ArgsSpec {
            spec: "COLORS...".into(),
            json_field: "colors".into(),
            special_parse: Some("parse_colors(args)".into()),
            ..Default::default()
        };
        let mut handled = HashSet::new();
        let code = spec.binding_code("set_colors", &fields(&[("colors", "colors")]), &mut handled).unwrap();
        assert_eq!(code, vec!["payload.Colors, err = parse_colors(args)", "if err != nil { return err }"]);

        let spec = ArgsSpec {
            special_parse: Some("!read_window_logo(args[0])".into()),
            ..spec
        };
        let code = spec.binding_code("set_colors", &fields(&[("colors", "colors")]), &mut handled).unwrap();
        assert_eq!(code[0], "io_data.multiple_payload_generator, err = read_window_logo(args[0])");
    }

    #[test]
    fn test_unsupported_bindings() {
        let spec = ArgsSpec {
            spec: "N".into(),
            json_field: "n".into(),
            ..Default::default()
        };
        let mut handled = HashSet::new();
        assert!(matches!(
            spec.binding_code("resize", &fields(&[("n", "int")]), &mut handled),
            Err(CompileError::UnsupportedArgs { .. })
        ));
        assert!(matches!(
            spec.binding_code("resize", &fields(&[]), &mut handled),
            Err(CompileError::UnsupportedArgs { .. })
        ));
    }
}
