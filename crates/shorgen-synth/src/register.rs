//! Named qubit registers and the operands that reference them.

use std::fmt;
use std::sync::Arc;

/// A named block of qubits, fixed in width for the lifetime of a run.
///
/// Scalar registers are declared without a size (`qreg c;`) and their single
/// qubit is referenced by the bare register name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    name: Arc<str>,
    width: u32,
    scalar: bool,
}

impl Register {
    /// Create an array register `qreg name[width];`.
    pub fn new(name: impl Into<Arc<str>>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
            scalar: false,
        }
    }

    /// Create a single-qubit register `qreg name;`.
    pub fn scalar(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            width: 1,
            scalar: true,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Whether the register was declared without a size.
    pub const fn is_scalar(&self) -> bool {
        self.scalar
    }

    /// Operand for qubit `index` (LSB is index 0).
    pub fn qubit(&self, index: u32) -> Qubit {
        debug_assert!(index < self.width, "qubit {index} outside {}", self.name);
        Qubit {
            register: Arc::clone(&self.name),
            index: (!self.scalar).then_some(index),
        }
    }

    /// Operand for the most significant qubit (the sign qubit of the adders).
    pub fn msb(&self) -> Qubit {
        self.qubit(self.width.saturating_sub(1))
    }

    /// Operand naming the whole register, for broadcast gates such as `x q;`.
    pub fn whole(&self) -> Qubit {
        Qubit {
            register: Arc::clone(&self.name),
            index: None,
        }
    }
}

/// A reference to one qubit (or, for broadcast, a whole register).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qubit {
    register: Arc<str>,
    index: Option<u32>,
}

impl Qubit {
    /// Name of the register this operand belongs to.
    pub fn register(&self) -> &str {
        &self.register
    }

    /// Index within the register, `None` for scalar or broadcast operands.
    pub const fn index(&self) -> Option<u32> {
        self.index
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.register),
            None => f.write_str(&self.register),
        }
    }
}
