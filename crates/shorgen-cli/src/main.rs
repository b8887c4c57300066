//! Shorgen Command-Line Interface
//!
//! Writes modular-exponentiation and approximate-QFT benchmark circuits as
//! OpenQASM 2.0 text.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::shor::ShorArgs;
use commands::{presets, qft, shor, version};

/// Shorgen - QFT-arithmetic benchmark circuit generator
#[derive(Parser)]
#[command(name = "shorgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the controlled modular-exponentiation benchmark
    Shor(ShorArgs),

    /// Generate a standalone approximate-QFT benchmark
    Qft {
        /// Register width in qubits
        #[arg(short, long)]
        bits: u32,

        /// Phase-error tolerance of the approximate QFT
        #[arg(long, default_value = "1e-6")]
        tolerance: f64,

        /// Output file
        #[arg(short, long)]
        output: String,
    },

    /// List built-in key presets
    Presets,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Shor(args) => shor::execute(&args).await,

        Commands::Qft {
            bits,
            tolerance,
            output,
        } => qft::execute(bits, tolerance, &output),

        Commands::Presets => {
            presets::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
