//! Error types for ketgrid
//!
//! Gantree: L0_Foundation → Errors
//!
//! One request-scoped error type shared by every crate in the workspace.
//! Variants are grouped the way failures surface to a caller: structural
//! (client input), anomaly (tolerated unless the policy is strict),
//! simulation-stage, and configuration.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for ketgrid
/// Gantree: KetError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KetError {
    // ========================================================================
    // Structural Errors (client input)
    // ========================================================================
    /// Request body missing or `null`
    #[error("No data sent")]
    EmptyPayload,

    /// Payload does not have the expected shape
    /// Gantree: InvalidPayload(String) // payload shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Qubit reference that does not parse as an index
    #[error("Invalid qubit reference '{0}': expected 'q<n>'")]
    InvalidQubitRef(String),

    /// Column key that does not parse as an integer
    #[error("Invalid column key '{0}': expected an integer")]
    InvalidColumn(String),

    /// Initial state entry other than "0" or "1"
    #[error("Invalid initial state '{value}' for qubit '{qubit}': must be \"0\" or \"1\"")]
    InvalidInitialBit { qubit: String, value: String },

    // ========================================================================
    // Anomalies (fatal only under the strict policy)
    // ========================================================================
    /// Placement on a qubit row outside the register
    /// Gantree: QubitOutOfRange{{q,max}} // row bound
    #[error("Qubit {qubit} out of range in column {column}: register has {num_qubits} qubits")]
    QubitOutOfRange {
        qubit: i64,
        column: i64,
        num_qubits: usize,
    },

    /// Placement on a column outside the grid
    #[error("Column {column} out of range: grid has {num_columns} columns")]
    ColumnOutOfRange { column: i64, num_columns: usize },

    /// Gate token outside the fixed vocabulary
    #[error("Unknown gate '{token}' on qubit {qubit} in column {column}")]
    UnknownGate {
        token: String,
        qubit: usize,
        column: usize,
    },

    /// Control or target markers left unpaired at the end of a column
    #[error("Incomplete controlled operation in column {column}: controls {controls:?}, targets {targets:?}")]
    IncompleteControlGroup {
        column: usize,
        controls: Vec<usize>,
        targets: Vec<usize>,
    },

    // ========================================================================
    // Simulation Errors
    // ========================================================================
    /// Engine rejected an operation
    /// Gantree: SimulationError(String) // engine
    #[error("Simulation error: {0}")]
    SimulationError(String),

    /// Same qubit used as control and target, or repeated within one role
    #[error("Qubit {qubit} appears more than once in a controlled operation")]
    OverlappingQubits { qubit: usize },

    /// Operation addressed a qubit the register does not have
    #[error("Qubit {qubit} out of range for register of {num_qubits} qubits")]
    RegisterIndexOutOfRange { qubit: usize, num_qubits: usize },

    /// Register larger than the engine supports
    #[error("Register of {requested} qubits exceeds engine limit of {max}")]
    TooManyQubits { requested: usize, max: usize },

    /// Declared grid wider than the configured limit
    #[error("Grid of {requested} columns exceeds limit of {max}")]
    TooManyColumns { requested: u64, max: usize },

    // ========================================================================
    // Configuration / I/O Errors
    // ========================================================================
    /// Engine configuration rejected by validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for ketgrid operations
/// Gantree: KetResult<T> // type alias
pub type KetResult<T> = Result<T, KetError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for KetError {
    fn from(err: serde_json::Error) -> Self {
        KetError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for KetError {
    fn from(err: std::io::Error) -> Self {
        KetError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl KetError {
    /// Check if error is a client-input failure
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            KetError::EmptyPayload
                | KetError::InvalidPayload(_)
                | KetError::InvalidQubitRef(_)
                | KetError::InvalidColumn(_)
                | KetError::InvalidInitialBit { .. }
                | KetError::JsonError(_)
        )
    }

    /// Check if error is an anomaly promoted by the strict policy
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            KetError::QubitOutOfRange { .. }
                | KetError::ColumnOutOfRange { .. }
                | KetError::UnknownGate { .. }
                | KetError::IncompleteControlGroup { .. }
        )
    }

    /// Check if error was raised by the simulation stage
    pub fn is_simulation_error(&self) -> bool {
        matches!(
            self,
            KetError::SimulationError(_)
                | KetError::OverlappingQubits { .. }
                | KetError::RegisterIndexOutOfRange { .. }
                | KetError::TooManyQubits { .. }
                | KetError::TooManyColumns { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KetError::InvalidQubitRef("qx".into());
        assert!(err.to_string().contains("qx"));
    }

    #[test]
    fn test_qubit_out_of_range() {
        let err = KetError::QubitOutOfRange {
            qubit: 10,
            column: 2,
            num_qubits: 3,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("3 qubits"));
    }

    #[test]
    fn test_classification() {
        assert!(KetError::EmptyPayload.is_structural());
        assert!(KetError::InvalidColumn("a".into()).is_structural());
        assert!(!KetError::EmptyPayload.is_anomaly());

        let unknown = KetError::UnknownGate {
            token: "CNOT".into(),
            qubit: 0,
            column: 0,
        };
        assert!(unknown.is_anomaly());
        assert!(!unknown.is_simulation_error());

        assert!(KetError::OverlappingQubits { qubit: 1 }.is_simulation_error());
        assert!(!KetError::OverlappingQubits { qubit: 1 }.is_structural());

        let wide = KetError::TooManyColumns {
            requested: u64::MAX,
            max: 1024,
        };
        assert!(wide.is_simulation_error());
        assert!(!wide.is_anomaly());
    }

    #[test]
    fn test_from_json_error() {
        let err: KetError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, KetError::JsonError(_)));
        assert!(err.is_structural());
    }
}
