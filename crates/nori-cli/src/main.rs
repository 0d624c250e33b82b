//! nori CLI
//!
//! Command-line interface for the nori Java formatter.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
#[command(name = "nori")]
#[command(about = "nori: a lossless-syntax-tree formatter for Java source")]
#[command(version = nori_core::VERSION)]
#[command(
    long_about = "nori parses Java source into a lossless syntax tree and recomputes its \
layout (indentation, blank lines, spacing, wrap points) without disturbing comments.\n\
\n\
Examples:\n  \
nori fmt                     # Format the current directory in place\n  \
nori fmt --check src/        # Report files that would change, write nothing\n  \
nori fmt --config nori.toml  # Use an explicit style file"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (.norirc.json/.norirc.toml/nori.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (default: number of CPU cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Format Java files in place (or report with --check)
    Fmt {
        /// Files or directories to format (default: current directory)
        paths: Vec<PathBuf>,

        /// Report nonconforming files without writing
        #[arg(long)]
        check: bool,
    },
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default = match verbose {
        0 => "nori=warn",
        1 => "nori=info",
        2 => "nori=debug",
        _ => "nori=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let threads = cli.threads.unwrap_or_else(num_cpus::get);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        error!("failed to configure thread pool: {e}");
    }

    let result = match cli.command {
        Commands::Fmt { paths, check } => commands::fmt(paths, check, cli.config.as_deref()),
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(2);
        }
    }
}
