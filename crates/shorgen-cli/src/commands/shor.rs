//! Modular-exponentiation benchmark command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use shorgen_synth::presets::{self, parse_decimal};
use shorgen_synth::{GeneratorConfig, ModExpParams, ProgressFn, generate};

use super::common::{create_output, print_summary, write_stats};

/// Arguments of `shorgen shor`.
#[derive(Args, Debug)]
pub struct ShorArgs {
    /// Built-in key (rsa16, rsa128, rsa256)
    #[arg(long, conflicts_with_all = ["bits", "modulus", "base", "base_inv"])]
    pub preset: Option<String>,

    /// Register width in qubits
    #[arg(short, long, requires_all = ["modulus", "base"])]
    pub bits: Option<u32>,

    /// Modulus N, decimal
    #[arg(short = 'N', long, requires = "bits")]
    pub modulus: Option<String>,

    /// Base a, decimal
    #[arg(short = 'a', long, requires = "bits")]
    pub base: Option<String>,

    /// Modular inverse of the base, decimal (computed when omitted)
    #[arg(long, requires = "base")]
    pub base_inv: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Phase-error tolerance of the approximate QFT
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Rounds rendered concurrently (0 or 1 runs sequentially)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Emit one round in every STRIDE rounds
    #[arg(short, long)]
    pub stride: Option<u32>,

    /// Seed for round thinning and feedback rotations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write run statistics as JSON to this file
    #[arg(long)]
    pub stats: Option<String>,

    /// Output file
    #[arg(short, long)]
    pub output: String,
}

impl ShorArgs {
    /// Resolve the constants from a preset or explicit values.
    pub fn params(&self) -> Result<ModExpParams> {
        if let Some(name) = &self.preset {
            let preset = presets::find(name).with_context(|| {
                let names: Vec<&str> = presets::PRESETS.iter().map(|p| p.name).collect();
                format!("Unknown preset: '{name}'. Available: {}", names.join(", "))
            })?;
            debug!(preset = preset.name, "using built-in key");
            return Ok(preset.params()?);
        }

        let (Some(bits), Some(modulus), Some(base)) = (self.bits, &self.modulus, &self.base) else {
            anyhow::bail!("Either --preset or --bits, --modulus and --base are required");
        };
        let modulus = parse_decimal(modulus).context("Invalid --modulus")?;
        let base = parse_decimal(base).context("Invalid --base")?;
        let params = match &self.base_inv {
            Some(inverse) => {
                let inverse = parse_decimal(inverse).context("Invalid --base-inv")?;
                ModExpParams::with_inverse(bits, modulus, base, inverse)?
            }
            None => ModExpParams::new(bits, modulus, base)?,
        };
        Ok(params)
    }

    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

/// Execute the shor command.
pub async fn execute(args: &ShorArgs) -> Result<()> {
    let params = args.params()?;
    let config = args.config()?;

    println!(
        "{} Generating {}-qubit modular exponentiation, N = {}",
        style("→").cyan().bold(),
        style(params.width()).yellow(),
        style(params.modulus()).green()
    );
    println!(
        "  {} rounds, stride {}, {}",
        params.iterations(),
        config.stride,
        if config.is_parallel() {
            format!("{} workers", config.workers)
        } else {
            "sequential".to_string()
        }
    );

    let bar = ProgressBar::new(u64::from(params.iterations()));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} rounds ({elapsed})")?
            .progress_chars("=> "),
    );
    let progress: ProgressFn = {
        let bar = bar.clone();
        Arc::new(move |done, _total| bar.set_position(u64::from(done)))
    };

    info!(
        width = params.width(),
        modulus_bits = params.modulus().bits(),
        output = %args.output,
        "starting generation"
    );
    let writer = create_output(&args.output)?;
    let result = generate(params, &config, writer, Some(progress)).await;
    bar.finish_and_clear();
    let stats = result.with_context(|| format!("Failed to generate {}", args.output))?;
    debug!(
        instructions = stats.instruction_lines,
        bytes = stats.bytes_written,
        elapsed_ms = stats.duration.as_millis() as u64,
        "generation finished"
    );

    print_summary(&args.output, &stats);
    if let Some(path) = &args.stats {
        write_stats(path, &stats)?;
        println!("  Stats: {}", style(path).green());
    }
    Ok(())
}
