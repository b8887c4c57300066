//! Presets command implementation.

use console::style;

use shorgen_synth::presets::PRESETS;

/// Execute the presets command.
pub fn execute() {
    println!("{}", style("Key presets:").bold());
    for preset in PRESETS {
        println!(
            "  {:<8} {:>4} qubits  N = {}",
            style(preset.name).cyan(),
            preset.width,
            preset.modulus
        );
        println!("  {:<8} {:>4}         a = {}", "", "", preset.base);
    }
}
