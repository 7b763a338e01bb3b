//! Core types for ketgrid
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Index aliases, the initial basis state, and basis-state labels.

use crate::error::{KetError, KetResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Circuit row (0-indexed)
/// Gantree: QubitIndex // pub type QubitIndex = usize
pub type QubitIndex = usize;

/// Circuit column / time step (0-indexed)
/// Gantree: TimeColumn // pub type TimeColumn = usize
pub type TimeColumn = usize;

// ============================================================================
// InitialState
// ============================================================================

/// Caller-supplied initial basis state, one bit per qubit row
/// Gantree: InitialState // initial bits
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InitialState {
    bits: Vec<bool>,
}

impl InitialState {
    /// Create from a vector of bools (`true` = excited)
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All-ground state for `n` qubits
    pub fn zeros(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    /// Parse from a bitstring such as "010"
    pub fn parse(s: &str) -> KetResult<Self> {
        s.chars()
            .enumerate()
            .map(|(i, c)| parse_bit(&format!("q{}", i), &c.to_string()))
            .collect::<KetResult<Vec<bool>>>()
            .map(Self::new)
    }

    /// Number of qubits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Initial value of a qubit row
    pub fn get(&self, qubit: QubitIndex) -> Option<bool> {
        self.bits.get(qubit).copied()
    }

    /// Whether any qubit starts excited
    pub fn any_excited(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    /// Iterate over bits in row order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for InitialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Parse one initial-state entry ("0" or "1")
pub(crate) fn parse_bit(qubit: &str, value: &str) -> KetResult<bool> {
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(KetError::InvalidInitialBit {
            qubit: qubit.to_string(),
            value: other.to_string(),
        }),
    }
}

// ============================================================================
// Basis Labels
// ============================================================================

/// Bitstring label of a basis state, qubit 0 leftmost
///
/// `index` is the basis-state number with qubit 0 as the most significant bit.
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    if num_qubits == 0 {
        return String::new();
    }
    format!("{:0width$b}", index, width = num_qubits)
}

// ============================================================================
// Tests
// ============================================================================
