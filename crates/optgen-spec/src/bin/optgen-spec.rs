use optgen_spec::{dump::dump_options, parse_options};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <options.spec>", args[0]);
        eprintln!();
        eprintln!("Parse an option specification and dump its structure");
        process::exit(1);
    }

    let filename = &args[1];

    let input = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    };

    let specs = match parse_options(&input) {
        Ok(specs) => specs,
        Err(e) => {
            eprintln!("Parse error in '{}': {}", filename, e);
            process::exit(1);
        }
    };

    println!("{}", dump_options(&specs));
}
