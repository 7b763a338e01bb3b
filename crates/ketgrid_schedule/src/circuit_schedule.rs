//! Circuit schedule for ketgrid
//!
//! Gantree: L4_Scheduling → CircuitSchedule
//!
//! The ordered list of operations a grid produced, as issued (or as
//! planned) by the execution driver.

use crate::scheduled_op::{ResolvedOperation, ScheduledOperation};
use ketgrid_core::{QubitIndex, TimeColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issued operations in issue order
/// Gantree: CircuitSchedule // full schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitSchedule {
    /// Operations in issue order
    /// Gantree: operations: Vec<ScheduledOperation> // schedule list
    operations: Vec<ScheduledOperation>,

    /// Register size
    num_qubits: usize,

    /// Grid width the schedule came from
    num_columns: usize,
}

impl CircuitSchedule {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create empty schedule for a grid shape
    pub fn empty(num_qubits: usize, num_columns: usize) -> Self {
        Self {
            operations: Vec::new(),
            num_qubits,
            num_columns,
        }
    }

    /// Append the next operation
    pub fn push(&mut self, column: TimeColumn, operation: ResolvedOperation) {
        let seq = self.operations.len();
        self.operations
            .push(ScheduledOperation::new(seq, column, operation));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Operations in issue order
    pub fn operations(&self) -> &[ScheduledOperation] {
        &self.operations
    }

    /// Number of operations
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Check if nothing was issued
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Register size
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Grid width
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Bare operations in issue order
    pub fn resolved(&self) -> Vec<&ResolvedOperation> {
        self.operations.iter().map(|s| &s.operation).collect()
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Count single-qubit operations
    pub fn count_single(&self) -> usize {
        self.operations
            .iter()
            .filter(|s| s.operation.is_single_qubit())
            .count()
    }

    /// Count multi-controlled X operations
    pub fn count_controlled(&self) -> usize {
        self.operations
            .iter()
            .filter(|s| s.operation.is_controlled())
            .count()
    }

    /// Operations issued from one column
    pub fn in_column(&self, column: TimeColumn) -> Vec<&ScheduledOperation> {
        self.operations
            .iter()
            .filter(|s| s.column == column)
            .collect()
    }

    /// Operations touching one row
    pub fn on_qubit(&self, qubit: QubitIndex) -> Vec<&ScheduledOperation> {
        self.operations
            .iter()
            .filter(|s| s.operation.affects_qubit(qubit))
            .collect()
    }

    /// Columns that issued at least one operation
    pub fn active_columns(&self) -> usize {
        let mut columns: Vec<TimeColumn> = self.operations.iter().map(|s| s.column).collect();
        columns.dedup();
        columns.len()
    }
}

impl fmt::Display for CircuitSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CircuitSchedule({} qubits, {} columns, {} operations)",
            self.num_qubits,
            self.num_columns,
            self.operations.len()
        )?;
        for op in &self.operations {
            writeln!(f, "  {}", op)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
