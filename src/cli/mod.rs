//! Command-line interface for the `leia` binary.
//!
//! ```text
//! leia compose <persona> <behaviour> <problem> [--config <file>] [--strict] [--yaml] [--compact]
//! leia check   <persona> <behaviour> <problem> [--config <file>]
//! leia version
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::resolver::composer::LeiaComposer;
use crate::resolver::document::{Behaviour, Persona, Problem};
use crate::resolver::error::LeiaError;
use crate::utilities::config::{ComposerConfig, OutputFormat};

/// Compose LEIA agents from persona, behaviour, and problem documents.
#[derive(Debug, Parser)]
#[command(name = "leia", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// The three input documents (JSON, or YAML by `.yaml`/`.yml` extension).
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct InputArgs {
    /// Persona document
    #[arg(value_name = "PERSONA")]
    pub persona: PathBuf,

    /// Behaviour document
    #[arg(value_name = "BEHAVIOUR")]
    pub behaviour: PathBuf,

    /// Problem document
    #[arg(value_name = "PROBLEM")]
    pub problem: PathBuf,

    /// Composer configuration file (YAML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Compose a LEIA and print it.
    Compose {
        #[command(flatten)]
        inputs: InputArgs,

        /// Fail when any diagnostic is recorded
        #[arg(long)]
        strict: bool,

        /// Print YAML instead of JSON
        #[arg(long)]
        yaml: bool,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Check the problem's constraints only.
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Show version information.
    Version,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compose { .. } => "compose",
            Self::Check { .. } => "check",
            Self::Version => "version",
        }
    }

    fn inputs(&self) -> Option<&InputArgs> {
        match self {
            Self::Compose { inputs, .. } | Self::Check { inputs } => Some(inputs),
            Self::Version => None,
        }
    }
}

/// Resolve the effective configuration: file and environment, then flags.
pub fn effective_config(command: &Command) -> Result<ComposerConfig, LeiaError> {
    let path = command.inputs().and_then(|inputs| inputs.config.as_deref());
    let mut config = ComposerConfig::load(path)?;
    if let Command::Compose {
        strict,
        yaml,
        compact,
        ..
    } = command
    {
        if *strict {
            config.strict = true;
        }
        if *yaml {
            config.output = OutputFormat::Yaml;
        }
        if *compact {
            config.pretty = false;
        }
    }
    Ok(config)
}

/// Execute a command with an explicit configuration and return the text to
/// print on stdout.
pub fn execute(command: &Command, config: ComposerConfig) -> Result<String, LeiaError> {
    let inputs = match command.inputs() {
        Some(inputs) => inputs,
        None => return Ok(format!("leia {}", crate::VERSION)),
    };

    let persona = Persona::from_path(&inputs.persona)?;
    let behaviour = Behaviour::from_path(&inputs.behaviour)?;
    let problem = Problem::from_path(&inputs.problem)?;

    let output = config.output;
    let pretty = config.pretty;
    let composer = LeiaComposer::new(config);

    match command {
        Command::Check { .. } => {
            composer.check(&persona, &behaviour, &problem)?;
            Ok(format!(
                "constraints satisfied: persona '{}', behaviour '{}', problem '{}'",
                persona.name(),
                behaviour.name(),
                problem.name()
            ))
        }
        _ => {
            let composed = composer.generate(&persona, &behaviour, &problem)?;
            if !composed.diagnostics.is_empty() {
                log::info!("{} diagnostic(s) recorded", composed.diagnostics.len());
            }
            output.render(&composed.leia, pretty)
        }
    }
}

/// Entry point used by the binary.
pub fn run(cli: &Cli) -> Result<String, LeiaError> {
    let config = effective_config(&cli.command)?;
    execute(&cli.command, config)
}
