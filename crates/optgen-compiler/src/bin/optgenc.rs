/// optgen compiler CLI

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use optgen_compiler::{GenerateOptions, Generator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "optgenc")]
#[command(about = "Generates Go option and remote-command code from option specifications")]
#[command(version)]
struct Args {
    /// Generation manifest (JSON)
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Output root, overriding the manifest's
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Report which files would change without writing them
    #[arg(long)]
    dry_run: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut options = GenerateOptions::new(&args.manifest).dry_run(args.dry_run);
    if let Some(output) = args.output {
        options = options.output_root(output);
    }

    let mut generator = Generator::new(options);
    let output = generator
        .run()
        .with_context(|| format!("generation from {} failed", args.manifest.display()))?;

    // Stdout carries only the changed paths, for build tooling
    let changed: Vec<String> = output.changed.iter().map(|p| p.display().to_string()).collect();
    println!("{}", serde_json::to_string_pretty(&changed)?);
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}
