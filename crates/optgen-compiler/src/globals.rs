/// Global remote-control options
///
/// These options apply to every remote command, so they are registered one
/// level deep on the parent command and collected in a package-level struct.

use crate::golang::{struct_declaration, Registration};
use optgen_spec::OptionSpec;

pub const GLOBAL_OPTIONS_GROUP: &str = "Global options";

/// Go source holding the global options struct and its registration function
pub fn global_options_file(package: &str, cli_import: &str, options: &[OptionSpec]) -> String {
    let registration = Registration::on("cmd").depth(1).group(GLOBAL_OPTIONS_GROUP);
    let struct_def: Vec<String> = options.iter().map(struct_declaration).collect();
    let opt_def: Vec<String> = options.iter().map(|opt| registration.render(opt)).collect();

    format!(
        "
package {package}
import \"{cli_import}\"
type rc_global_options struct {{
{}
}}
var rc_global_opts rc_global_options

func add_rc_global_opts(cmd *cli.Command) {{
{}
}}
",
        struct_def.join("\n"),
        opt_def.join("\n"),
    )
}
