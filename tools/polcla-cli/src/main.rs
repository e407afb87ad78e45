//! `polcla`: shifter-aware polarity annotation for ParZu-parsed German text.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(author, version, about = "Annotates subjective expressions and their shifters")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a CoNLL corpus and write one JSON record per sentence
    Annotate(commands::AnnotateArgs),
    /// Compile flat lexicon files into an rkyv archive
    Compile(commands::CompileArgs),
    /// Parse a lexicon file and report what it contains
    Check(commands::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Annotate(args) => commands::annotate(args),
        Commands::Compile(args) => commands::compile(args),
        Commands::Check(args) => commands::check(args),
    }
}
