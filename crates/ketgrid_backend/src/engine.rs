//! Simulation engine interface and extracted state
//!
//! Gantree: L6_Backend → EngineTrait
//!
//! The scheduling core only ever talks to a register through
//! [`SimulationEngine`], and only ever forwards the [`StateResult`] it
//! gets back.

use ketgrid_core::{basis_label, KetResult, QubitIndex, SingleQubitGate};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Final register contents: non-negligible amplitudes by basis index
/// Gantree: StateResult // dump output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResult {
    /// Register size
    num_qubits: usize,

    /// (basis index, amplitude), ascending by index; qubit 0 is the MSB
    amplitudes: Vec<(usize, Complex64)>,
}

impl StateResult {
    /// Create from (index, amplitude) pairs
    pub fn new(num_qubits: usize, mut amplitudes: Vec<(usize, Complex64)>) -> Self {
        amplitudes.sort_by_key(|(i, _)| *i);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Register size
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of stored basis states
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Check if no basis state was stored
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Stored (index, amplitude) pairs
    pub fn amplitudes(&self) -> &[(usize, Complex64)] {
        &self.amplitudes
    }

    /// Iterate as (basis label, amplitude)
    pub fn labelled(&self) -> impl Iterator<Item = (String, Complex64)> + '_ {
        self.amplitudes
            .iter()
            .map(move |(i, a)| (basis_label(*i, self.num_qubits), *a))
    }

    /// Amplitude of a basis label such as "01" (zero when not stored)
    pub fn amplitude(&self, label: &str) -> Complex64 {
        let index = match usize::from_str_radix(label, 2) {
            Ok(i) if label.len() == self.num_qubits => i,
            _ if label.is_empty() && self.num_qubits == 0 => 0,
            _ => return Complex64::new(0.0, 0.0),
        };
        self.amplitudes
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, a)| *a)
            .unwrap_or_else(|| Complex64::new(0.0, 0.0))
    }

    /// Probability of a basis label
    pub fn probability(&self, label: &str) -> f64 {
        self.amplitude(label).norm_sqr()
    }

    /// Sum of stored probabilities
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|(_, a)| a.norm_sqr()).sum()
    }

    /// Amplitudes as text by basis label
    ///
    /// `precision` fixes the number of decimals; `None` prints the
    /// shortest exact representation.
    pub fn to_label_map(&self, precision: Option<usize>) -> BTreeMap<String, String> {
        self.labelled()
            .map(|(label, a)| (label, amplitude_text(a, precision)))
            .collect()
    }
}

impl fmt::Display for StateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StateResult({} qubits, {} basis states)",
            self.num_qubits,
            self.amplitudes.len()
        )
    }
}

/// Amplitude as "re+imi" text
pub fn amplitude_text(amplitude: Complex64, precision: Option<usize>) -> String {
    // x + 0.0 folds -0.0 into 0.0
    let a = Complex64::new(amplitude.re + 0.0, amplitude.im + 0.0);
    match precision {
        Some(p) => format!("{:.*}", p, a),
        None => format!("{}", a),
    }
}

/// Quantum register provider driven by the execution driver
/// Gantree: SimulationEngine // allocate/apply/dump
pub trait SimulationEngine: Send + Sync {
    /// Register handle owned by one execution
    type Register;

    /// Engine name
    fn name(&self) -> &str;

    /// Allocate a register of `num_qubits` qubits in the ground state
    fn allocate(&self, num_qubits: usize) -> KetResult<Self::Register>;

    /// Apply a single-qubit unitary
    fn apply(
        &self,
        register: &mut Self::Register,
        gate: SingleQubitGate,
        qubit: QubitIndex,
    ) -> KetResult<()>;

    /// Flip every target when all controls are set
    fn apply_controlled_x(
        &self,
        register: &mut Self::Register,
        controls: &[QubitIndex],
        targets: &[QubitIndex],
    ) -> KetResult<()>;

    /// Read out the register
    fn dump(&self, register: &Self::Register) -> KetResult<StateResult>;
}

// ============================================================================
// Tests
// ============================================================================
