mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use bytesnap_core::{CompileError, Diagnostics, Level};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Bytesnap IDL compiler.
#[derive(Parser)]
#[command(name = "bytesnap", version, about = "Bytesnap IDL compiler")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log compiler progress to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an IDL file and print the IR as JSON
    Compile {
        /// Path to the .idl source file
        file: PathBuf,
    },

    /// Validate an IDL file and print a summary
    Check {
        /// Path to the .idl source file
        file: PathBuf,
    },

    /// Build the emit plan for an IDL file
    Plan {
        /// Path to the .idl source file
        file: PathBuf,
        /// Project config (defaults to bytesnap.toml next to the IDL file)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compile { file } => {
            commands::compile::cmd_compile(&file, cli.output, cli.quiet);
        }
        Commands::Check { file } => {
            commands::check::cmd_check(&file, cli.output, cli.quiet);
        }
        Commands::Plan { file, config } => {
            commands::plan::cmd_plan(&file, config.as_deref(), cli.output, cli.quiet);
        }
    }
}

/// `RUST_LOG` wins; otherwise logging stays off unless `-v` is given.
/// Warnings and errors reach the user through the diagnostic sink instead.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "off",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

/// A fresh sink that also keeps debug entries when debug logging is on.
pub(crate) fn new_diagnostics() -> Diagnostics {
    if tracing::enabled!(tracing::Level::DEBUG) {
        Diagnostics::new(Level::Debug)
    } else {
        Diagnostics::default()
    }
}

/// Print the terminating compile error and exit with status 1.
pub(crate) fn exit_with_compile_error(e: &CompileError, output: OutputFormat, quiet: bool) -> ! {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
    process::exit(1);
}

/// Print warnings recorded during a successful compilation to stderr.
pub(crate) fn report_warnings(diags: &Diagnostics, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    for w in diags.warnings() {
        match output {
            OutputFormat::Text => eprintln!("{}", w),
            OutputFormat::Json => {
                let line = serde_json::to_string(w).unwrap_or_else(|_| format!("{:?}", w));
                eprintln!("{}", line);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
