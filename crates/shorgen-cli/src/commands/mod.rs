//! CLI command implementations.

pub mod common;
pub mod presets;
pub mod qft;
pub mod shor;
pub mod version;
