/// Command compilation through the public API

use optgen_compiler::{ArgsSpec, CommandCompiler, CommandSpec, CompileError, CompileRules, FieldAlias, Template};
use optgen_spec::parse_options;

const OPTS: &str = "\
--match -m
Which window.


--title
type=str
Window title.


--no-response
type=bool-set
default=false
Do not wait.
";

fn command(protocol: &str) -> CommandSpec {
    let options = parse_options(OPTS).unwrap().into_options();
    CommandSpec::new("set_window_title", options, protocol)
}

#[test]
fn test_every_field_bound_exactly_once() {
    let rules = CompileRules::default();
    let fragments = CommandCompiler::new(&rules)
        .compile(&command("title/str: new title\nmatch/str: window"))
        .unwrap();

    let fields: Vec<&str> = fragments.bindings.iter().map(|b| b.field.as_str()).collect();
    assert_eq!(fields, vec!["title", "match"]);
    assert_eq!(fragments.json_init.matches("payload.Title = ").count(), 1);
    assert_eq!(fragments.json_init.matches("payload.Match = ").count(), 1);
    // The response option is registered but never declared or bound
    assert!(fragments.add_flags.contains("Name: \"--no-response\","));
    assert!(!fragments.options_declaration.contains("NoResponse"));
    assert!(!fragments.json_init.contains("NoResponse"));
}

#[test]
fn test_closure_failures() {
    let rules = CompileRules::default();
    let compiler = CommandCompiler::new(&rules);

    let err = compiler.compile(&command("title/str: t\nmatch/str: m\nlayout/str: l")).unwrap_err();
    assert_eq!(err.to_string(), "Cannot map fields: layout for command: set_window_title");

    let err = compiler.compile(&command("match/str: m")).unwrap_err();
    assert!(matches!(err, CompileError::UnusedOptions { ref options, .. } if options == &["Title"]));
}

#[test]
fn test_custom_rules() {
    let rules = CompileRules {
        reserved_options: vec![],
        unused_option_exemptions: vec!["set_window_title".into()],
        field_aliases: vec![FieldAlias {
            field: "name".into(),
            option: "Title".into(),
        }],
    };
    let fragments = CommandCompiler::new(&rules)
        .compile(&command("name/str: title\nmatch/str: window"))
        .unwrap();
    assert!(fragments.json_init.contains("payload.Name = escaped_string(options_set_window_title.Title)"));
    // Nothing is reserved now, so the flag gets a struct field
    assert!(fragments.options_declaration.contains("NoResponse bool"));
}

#[test]
fn test_positional_args_bind_field() {
    let rules = CompileRules::default();
    let mut cmd = command("title/str: t\nmatch/str: m\ntext+/str: body");
    cmd.args = ArgsSpec {
        spec: "TEXT ...".into(),
        json_field: "text".into(),
        ..ArgsSpec::default()
    };
    let fragments = CommandCompiler::new(&rules).compile(&cmd).unwrap();
    assert!(fragments.json_init.contains("payload.Text = escaped_string(strings.Join(args, \" \"))"));
    assert!(fragments.bindings.iter().all(|b| b.field != "text"));
}

#[test]
fn test_generate_fills_template() {
    let rules = CompileRules::default();
    let template = Template::new("//go:build exclude\nfunc CMD_NAME() { ASYNC_MARK }\nUsage: \"[options]ARGSPEC\"\nJSON_INIT_CODE\n");
    let cmd = command("title/str: t\nmatch/str: m");
    let code = CommandCompiler::new(&rules).generator("gen").generate(&cmd, &template).unwrap();

    assert!(code.starts_with("\n\nfunc set_window_title() { ASYNC_MARK }\n"));
    assert!(code.contains("Usage: \"[options]\"\n"));
    assert!(code.contains("if len(args) != 0 {"));
    assert!(code.contains("payload.Title = escaped_string(options_set_window_title.Title)"));
}

#[test]
fn test_unknown_field_type() {
    let rules = CompileRules::default();
    let err = CommandCompiler::new(&rules)
        .compile(&command("title/str: t\nmatch/str: m\nsize/vec3: x"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown JSON field type: vec3");
}
