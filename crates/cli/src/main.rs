mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::{cmd_check, cmd_extract, cmd_split, cmd_validate};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Guard condition extraction for Event-B models.
#[derive(Parser)]
#[command(
    name = "condex",
    version,
    about = "Guard condition extraction for Event-B models"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the conditions of every guard of a model
    Extract {
        /// Path to the model document (.json or .toml)
        model: PathBuf,
        /// Print the well-definedness predicate of each condition
        #[arg(long)]
        wd: bool,
    },

    /// Parse and type-check every guard of a model
    Check {
        /// Path to the model document (.json or .toml)
        model: PathBuf,
    },

    /// Split a single formula into conditions
    Split {
        /// Formula source text
        formula: String,
    },

    /// Validate a JSON model document against the model schema
    Validate {
        /// Path to the JSON model document
        model: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract { model, wd } => {
            cmd_extract(&model, wd, cli.output, cli.quiet);
        }
        Commands::Check { model } => {
            cmd_check(&model, cli.output, cli.quiet);
        }
        Commands::Split { formula } => {
            cmd_split(&formula, cli.output, cli.quiet);
        }
        Commands::Validate { model } => {
            cmd_validate(&model, cli.output, cli.quiet);
        }
    }
}

/// Print an error to stderr as text or as a JSON object.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
