use anyhow::Result;
use clap::{Parser, Subcommand};
use mdt_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mdt")]
#[command(about = "mdt - Inspect NT-MDT scanning-probe microscopy files", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a per-frame summary
    Inspect {
        /// Input .mdt file
        #[arg(short, long)]
        input: String,

        /// Abort on the first malformed frame
        #[arg(long)]
        strict: bool,
    },

    /// Dump the decoded container as JSON
    Dump {
        /// Input .mdt file
        #[arg(short, long)]
        input: String,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Abort on the first malformed frame
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Inspect { input, strict } => commands::inspect::execute(&input, strict),

        Commands::Dump {
            input,
            output,
            strict,
        } => commands::dump::execute(&input, output.as_deref(), strict),
    }
}
