//! Gantry CLI - build, package and publish CMake-based C/C++ libraries

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gantry::util::diagnostic::{emit, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        emit(&Diagnostic::from_error(&e), std::io::stderr().is_terminal());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gantry=debug")
    } else {
        EnvFilter::new("gantry=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = commands::GlobalArgs {
        verbose: cli.verbose,
        manifest_path: cli.manifest_path,
    };

    // Execute command
    match cli.command {
        Commands::Inspect(args) => commands::inspect::execute(args, &global),
        Commands::Build(args) => commands::build::execute(args, &global),
        Commands::Package(args) => commands::package::execute(args, &global),
        Commands::Info(args) => commands::info::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
