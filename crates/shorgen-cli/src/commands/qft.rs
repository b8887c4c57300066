//! QFT benchmark command implementation.

use anyhow::{Context, Result};
use console::style;
use tracing::{debug, info};

use shorgen_synth::emit_qft_benchmark;

use super::common::{create_output, print_summary};

/// Execute the qft command.
pub fn execute(bits: u32, tolerance: f64, output: &str) -> Result<()> {
    if !(tolerance > 0.0 && tolerance < 1.0) {
        anyhow::bail!("Tolerance must lie in (0, 1), got {tolerance}");
    }
    println!(
        "{} Generating {}-qubit approximate QFT",
        style("→").cyan().bold(),
        style(bits).yellow()
    );

    info!(width = bits, tolerance, output, "writing approximate QFT");
    let writer = create_output(output)?;
    let stats = emit_qft_benchmark(writer, bits, tolerance)
        .with_context(|| format!("Failed to write {output}"))?;
    debug!(
        max_denominator = stats.max_denominator,
        instructions = stats.instruction_lines,
        "approximate QFT written"
    );
    print_summary(output, &stats);
    Ok(())
}
