//! `leia` command-line binary.
//!
//! Composes persona, behaviour, and problem documents (JSON or YAML) into a
//! LEIA and prints it.
//!
//! # Environment Variables
//!
//! - `LEIA_STRICT` — fail when any diagnostic is recorded (default: false)
//! - `LEIA_OUTPUT` — `json` (default) or `yaml`
//! - `LEIA_PRETTY` — pretty-print JSON output (default: true)
//! - `RUST_LOG` — Tracing filter (default: "warn,leia=info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin leia -- compose persona.json behaviour.json problem.yaml
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use leia::cli::{run, Cli};

fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,leia=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match try_main(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> anyhow::Result<String> {
    tracing::debug!("Running `{}`", cli.command.name());
    run(cli).with_context(|| format!("`leia {}` failed", cli.command.name()))
}
