//! Validation policy and anomaly channel
//!
//! Gantree: L0_Foundation → Policy
//!
//! Out-of-range references, unknown gate names, and unpaired control
//! markers are dropped by default. The lenient policy records each one
//! in an [`AnomalyLog`] and emits a `warn!` record; the strict policy
//! turns the first one into an error.

use crate::error::{KetError, KetResult};
use crate::types::{QubitIndex, TimeColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How tolerated anomalies are handled
/// Gantree: ValidationPolicy // lenient|strict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Drop the offending placement, token, or group and keep going
    #[default]
    Lenient,
    /// Fail the request on the first anomaly
    Strict,
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationPolicy::Lenient => write!(f, "lenient"),
            ValidationPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// A tolerated deviation from a well-formed circuit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anomaly {
    /// Placement on a row outside `0..num_qubits`
    QubitOutOfRange {
        /// Parsed row index
        qubit: i64,
        /// Declared column
        column: i64,
        /// Register size
        num_qubits: usize,
    },
    /// Placement on a column outside `0..num_columns`
    ColumnOutOfRange {
        /// Declared column
        column: i64,
        /// Grid width
        num_columns: usize,
    },
    /// Token outside the gate vocabulary, resolved to a no-op
    UnknownGate {
        /// Raw token text
        token: String,
        /// Row
        qubit: QubitIndex,
        /// Column
        column: TimeColumn,
    },
    /// Controls or targets never paired before the column ended
    IncompleteControlGroup {
        /// Column
        column: TimeColumn,
        /// Leftover control rows
        controls: Vec<QubitIndex>,
        /// Leftover target rows
        targets: Vec<QubitIndex>,
    },
}

impl From<Anomaly> for KetError {
    fn from(anomaly: Anomaly) -> Self {
        match anomaly {
            Anomaly::QubitOutOfRange {
                qubit,
                column,
                num_qubits,
            } => KetError::QubitOutOfRange {
                qubit,
                column,
                num_qubits,
            },
            Anomaly::ColumnOutOfRange {
                column,
                num_columns,
            } => KetError::ColumnOutOfRange {
                column,
                num_columns,
            },
            Anomaly::UnknownGate {
                token,
                qubit,
                column,
            } => KetError::UnknownGate {
                token,
                qubit,
                column,
            },
            Anomaly::IncompleteControlGroup {
                column,
                controls,
                targets,
            } => KetError::IncompleteControlGroup {
                column,
                controls,
                targets,
            },
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same wording as the error it turns into under the strict policy
        write!(f, "{}", KetError::from(self.clone()))
    }
}

/// Collects anomalies for one request according to a policy
/// Gantree: AnomalyLog // warning channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyLog {
    policy: ValidationPolicy,
    entries: Vec<Anomaly>,
}

impl AnomalyLog {
    /// Create an empty log for a policy
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    /// Policy in effect
    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Report an anomaly
    ///
    /// Returns the anomaly as an error under the strict policy, otherwise
    /// records it and returns `Ok(())`.
    pub fn report(&mut self, anomaly: Anomaly) -> KetResult<()> {
        match self.policy {
            ValidationPolicy::Strict => Err(anomaly.into()),
            ValidationPolicy::Lenient => {
                log::warn!("dropped: {}", anomaly);
                self.entries.push(anomaly);
                Ok(())
            }
        }
    }

    /// Recorded anomalies in report order
    pub fn entries(&self) -> &[Anomaly] {
        &self.entries
    }

    /// Number of recorded anomalies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move entries from another log into this one
    pub fn merge(&mut self, other: AnomalyLog) {
        self.entries.extend(other.entries);
    }

    /// Consume the log, returning its entries
    pub fn into_entries(self) -> Vec<Anomaly> {
        self.entries
    }
}

// ============================================================================
// Tests
// ============================================================================
