//! Stepscribe CLI - Main Entry Point

use clap::{Parser, Subcommand};

use stepscribe_cli::commands::{compile, config, parse, synthesize};
use stepscribe_cli::output;

/// Stepscribe - compile natural-language steps into Playwright tests
#[derive(Parser)]
#[command(name = "stepscribe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how each line of a steps file is parsed
    Parse(parse::ParseArgs),

    /// Build the element catalog from recorded observations
    Synthesize(synthesize::SynthesizeArgs),

    /// Compile a steps file into a Playwright Test script
    Compile(compile::CompileArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries scripts and tables
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse(args) => parse::execute(args, cli.format).await?,
        Commands::Synthesize(args) => synthesize::execute(args, cli.format).await?,
        Commands::Compile(args) => compile::execute(args).await?,
        Commands::Config(args) => config::execute(args).await?,
    }

    Ok(())
}
