//! # pod CLI entry point
//!
//! Parses command-line arguments, loads environment configuration, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pod_cli::config::CliConfig;
use pod_cli::proof::{
    run_inspect, run_prove, run_verify_proof, InspectArgs, ProveArgs, VerifyProofArgs,
};
use pod_cli::signing::{run_keygen, run_sign, run_verify, KeygenArgs, SignArgs, VerifyArgs};

/// Provable Object Datastructures: sign typed key-value records and prove
/// individual entries against their Merkle root.
#[derive(Parser, Debug)]
#[command(name = "pod", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an EdDSA-Poseidon key pair.
    Keygen(KeygenArgs),

    /// Sign an entries file into a POD.
    Sign(SignArgs),

    /// Verify a POD's signature.
    Verify(VerifyArgs),

    /// Produce a Merkle proof or circuit signals for one entry.
    Prove(ProveArgs),

    /// Check a Merkle proof or circuit signals file.
    VerifyProof(VerifyProofArgs),

    /// Summarize a POD or entries file.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::from_env();

    let filter = match &config.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "pod CLI starting");

    let result = match &cli.command {
        Commands::Keygen(args) => run_keygen(args, &config),
        Commands::Sign(args) => run_sign(args, &config),
        Commands::Verify(args) => run_verify(args),
        Commands::Prove(args) => run_prove(args),
        Commands::VerifyProof(args) => run_verify_proof(args),
        Commands::Inspect(args) => run_inspect(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
