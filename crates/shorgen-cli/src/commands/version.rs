//! Version command implementation.

use console::style;

use shorgen_synth::presets::PRESETS;
use shorgen_synth::{DEFAULT_TOLERANCE, max_denominator};

/// Execute the version command.
pub fn execute() {
    println!(
        "{} {}",
        style("shorgen").cyan().bold(),
        style(env!("CARGO_PKG_VERSION")).yellow()
    );
    println!("Output:    OpenQASM 2.0 over qelib1.inc, angles as fpa<2n>0x<hex> tokens");
    println!("Circuits:  shor (semiclassical modular exponentiation), qft (approximate QFT)");

    // Coupling cut-off at the default tolerance for the preset widths.
    let cutoffs: Vec<String> = PRESETS
        .iter()
        .map(|preset| format!("{}: d={}", preset.name, max_denominator(preset.width, DEFAULT_TOLERANCE)))
        .collect();
    println!(
        "Tolerance: {DEFAULT_TOLERANCE:e} ({})",
        style(cutoffs.join(", ")).dim()
    );
}
