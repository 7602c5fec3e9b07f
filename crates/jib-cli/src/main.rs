//! # jib CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; registry state persists in a JSON state
//! file between invocations.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jib_cli::bind::{run_bind, BindArgs};
use jib_cli::enforce::{run_enforce, EnforceArgs};
use jib_cli::register::{run_register, RegisterArgs};
use jib_cli::root::{run_root, RootArgs};
use jib_cli::EXIT_INTERNAL;

/// JIB Stack CLI
///
/// Jurisdictional boundary enforcement: register jurisdictions, domains,
/// and boundary rules, bind artifacts cryptographically, enforce
/// cross-domain transitions, and audit the decision log root.
#[derive(Parser, Debug)]
#[command(name = "jib", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the JSON state file.
    #[arg(long, global = true, default_value = "jib-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register jurisdictions, execution domains, and boundary rules.
    Register(RegisterArgs),

    /// Bind an artifact to a jurisdiction with an Ed25519 signature.
    Bind(BindArgs),

    /// Enforce an artifact transition between two execution domains.
    Enforce(EnforceArgs),

    /// Print the current audit Merkle root.
    Root(RootArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(state = %cli.state.display(), "jib CLI starting");

    let result = match cli.command {
        Commands::Register(args) => run_register(&args, &cli.state),
        Commands::Bind(args) => run_bind(&args, &cli.state),
        Commands::Enforce(args) => run_enforce(&args, &cli.state),
        Commands::Root(args) => run_root(&args, &cli.state),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_INTERNAL)
        }
    }
}
