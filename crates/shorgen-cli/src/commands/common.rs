//! Shared helpers for CLI commands.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use shorgen_synth::RunStats;

/// Create (or truncate) the output file.
pub fn create_output(path: &str) -> Result<BufWriter<File>> {
    let parent = Path::new(path).parent();
    if let Some(dir) = parent.filter(|dir| !dir.as_os_str().is_empty() && !dir.exists()) {
        anyhow::bail!("Output directory does not exist: {}", dir.display());
    }
    let file = File::create(path).with_context(|| format!("Failed to create file: {path}"))?;
    Ok(BufWriter::new(file))
}

/// Write run statistics as pretty JSON.
pub fn write_stats(path: &str, stats: &RunStats) -> Result<()> {
    let json = stats.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write stats: {path}"))?;
    Ok(())
}

/// Print the end-of-run summary.
pub fn print_summary(output: &str, stats: &RunStats) {
    println!("{} Wrote {}", style("✓").green().bold(), style(output).green());
    println!(
        "  {} qubits per register, max denominator {}",
        stats.width, stats.max_denominator
    );
    if stats.rounds > 0 {
        println!(
            "  {} of {} rounds emitted",
            stats.emitted_rounds, stats.rounds
        );
    }
    println!(
        "  {} instructions, {} bytes in {:.2?}",
        stats.instruction_lines, stats.bytes_written, stats.duration
    );
}
