use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{LevelFilter, debug};
use parcela::{BundleOrchestrator, Config};

/// Bundle an ES module and everything it imports into one script
#[derive(Parser, Debug)]
#[command(name = "parcela", version, about, long_about = None)]
struct Cli {
    /// Entry module of the program
    #[arg(short, long, default_value = "example/entry.js")]
    entry: PathBuf,

    /// Write the bundle to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Explicit configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ECMAScript target of the syntax lowering pass (e.g. es2015, es2020)
    #[arg(long)]
    target: Option<String>,

    /// Build every resolved path once and share it between importers
    #[arg(long)]
    dedupe_modules: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    match level {
        Some(level) => {
            builder.filter_level(level);
        }
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(LevelFilter::Warn);
        }
        None => {}
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(target) = cli.target {
        config.target = target;
    }
    if cli.dedupe_modules {
        config.dedupe_modules = true;
    }
    debug!("Bundling {} with {config:?}", cli.entry.display());

    let orchestrator = BundleOrchestrator::new(config);
    match cli.output {
        Some(output) => orchestrator.bundle_to_file(&cli.entry, &output),
        None => {
            let bundle = orchestrator.bundle(&cli.entry)?;
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(bundle.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write bundle to stdout")
        }
    }
}
