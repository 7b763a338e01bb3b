//! Resolved and scheduled operations
//!
//! Gantree: L4_Scheduling → ScheduledOperation
//!
//! The unit of work the driver hands to the simulation engine, tagged
//! with the grid column it was issued from.

use ketgrid_core::{QubitIndex, SingleQubitGate, TimeColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation ready to be issued to the engine
/// Gantree: ResolvedOperation // unitary | mcx
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedOperation {
    /// Single-qubit unitary on one row
    Single {
        /// Unitary
        gate: SingleQubitGate,
        /// Row
        qubit: QubitIndex,
    },
    /// X on every target, conditioned on every control
    ControlledX {
        /// Control rows, in scan order
        controls: Vec<QubitIndex>,
        /// Target rows, in scan order
        targets: Vec<QubitIndex>,
    },
}

impl ResolvedOperation {
    /// Single-qubit operation
    pub fn single(gate: SingleQubitGate, qubit: QubitIndex) -> Self {
        ResolvedOperation::Single { gate, qubit }
    }

    /// Multi-controlled X
    pub fn controlled_x(controls: Vec<QubitIndex>, targets: Vec<QubitIndex>) -> Self {
        ResolvedOperation::ControlledX { controls, targets }
    }

    /// Rows touched, controls before targets
    pub fn qubits(&self) -> Vec<QubitIndex> {
        match self {
            ResolvedOperation::Single { qubit, .. } => vec![*qubit],
            ResolvedOperation::ControlledX { controls, targets } => {
                controls.iter().chain(targets).copied().collect()
            }
        }
    }

    /// Check if this touches a row
    pub fn affects_qubit(&self, qubit: QubitIndex) -> bool {
        self.qubits().contains(&qubit)
    }

    /// Check if single-qubit
    pub fn is_single_qubit(&self) -> bool {
        matches!(self, ResolvedOperation::Single { .. })
    }

    /// Check if multi-controlled X
    pub fn is_controlled(&self) -> bool {
        matches!(self, ResolvedOperation::ControlledX { .. })
    }

    /// Short name ("H", "C2X", ...)
    pub fn name(&self) -> String {
        match self {
            ResolvedOperation::Single { gate, .. } => gate.name().to_string(),
            ResolvedOperation::ControlledX { controls, .. } => match controls.len() {
                1 => "CX".to_string(),
                n => format!("C{}X", n),
            },
        }
    }
}

impl fmt::Display for ResolvedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedOperation::Single { gate, qubit } => write!(f, "{} q{}", gate, qubit),
            ResolvedOperation::ControlledX { controls, targets } => {
                write!(f, "{} {:?} -> {:?}", self.name(), controls, targets)
            }
        }
    }
}

/// An operation with the column it was issued from
/// Gantree: ScheduledOperation // column-tagged op
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    /// Issue order across the whole circuit
    pub seq: usize,

    /// Grid column
    pub column: TimeColumn,

    /// The operation
    pub operation: ResolvedOperation,
}

impl ScheduledOperation {
    /// Create a new scheduled operation
    pub fn new(seq: usize, column: TimeColumn, operation: ResolvedOperation) -> Self {
        Self {
            seq,
            column,
            operation,
        }
    }

    /// Rows touched
    pub fn qubits(&self) -> Vec<QubitIndex> {
        self.operation.qubits()
    }
}

impl fmt::Display for ScheduledOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[t={}] {}", self.column, self.operation)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_qubits() {
        let op = ResolvedOperation::single(SingleQubitGate::H, 2);
        assert_eq!(op.qubits(), vec![2]);
        assert!(op.is_single_qubit());
        assert_eq!(op.to_string(), "H q2");
    }

    #[test]
    fn test_controlled_qubits() {
        let op = ResolvedOperation::controlled_x(vec![0, 1], vec![3]);
        assert_eq!(op.qubits(), vec![0, 1, 3]);
        assert!(op.affects_qubit(3));
        assert!(!op.affects_qubit(2));
        assert_eq!(op.name(), "C2X");
        assert_eq!(
            ResolvedOperation::controlled_x(vec![0], vec![1]).name(),
            "CX"
        );
    }

    #[test]
    fn test_scheduled_display() {
        let op = ScheduledOperation::new(0, 4, ResolvedOperation::single(SingleQubitGate::X, 0));
        assert_eq!(op.to_string(), "[t=4] X q0");
    }
}
