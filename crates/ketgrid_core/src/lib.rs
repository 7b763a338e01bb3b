//! # ketgrid Core
//!
//! Request payloads, gate tokens, and the dense circuit grid for the
//! column-based circuit editor backend.
//!
//! ## Gantree Architecture
//!
//! ```text
//! ketgrid_core // L0+L1: Foundation + Grid
//!     L0_Foundation
//!         CoreTypes // QubitIndex, TimeColumn, InitialState
//!         Errors // KetError, KetResult
//!         Policy // ValidationPolicy, AnomalyLog
//!         Payload // CircuitRequest, StateResponse
//!     L1_Circuit
//!         GateGrid // normalize(), inject_initial_state()
//!         TokenResolver // text -> Cell
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ketgrid_core::prelude::*;
//!
//! let request = CircuitRequest::from_json(
//!     r#"{"qubits": {"q0": ["q0", "1"]}, "gates": {"0": [{"qubit": "q0", "type": "H"}]}}"#,
//! ).unwrap();
//!
//! let mut anomalies = AnomalyLog::new(ValidationPolicy::Lenient);
//! let mut grid = GateGrid::normalize(&request, &mut anomalies).unwrap();
//! grid.inject_initial_state(&request.initial_state()).unwrap();
//!
//! assert_eq!(grid.num_columns(), 2);
//! assert_eq!(grid.cell(0, 0), Some("X"));
//! assert_eq!(TokenResolver::resolve(grid.cell(0, 1).unwrap()), Cell::Unitary(SingleQubitGate::H));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Validation policy (Gantree: L0_Foundation → Policy)
pub mod policy;

/// Request/response payloads (Gantree: L0_Foundation → Payload)
pub mod payload;

/// Gate tokens (Gantree: L1_Circuit → TokenResolver)
pub mod token;

/// Dense grid (Gantree: L1_Circuit → GateGrid)
pub mod grid;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{KetError, KetResult};
pub use grid::{GateGrid, DEFAULT_MAX_COLUMNS};
pub use payload::{CircuitRequest, ColumnEntry, GatePlacement, QubitEntry, QubitRef, StateResponse};
pub use policy::{Anomaly, AnomalyLog, ValidationPolicy};
pub use token::{Cell, GateToken, Role, SingleQubitGate, TokenResolver};
pub use types::{basis_label, InitialState, QubitIndex, TimeColumn};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use ketgrid_core::prelude::*;
    //! ```

    pub use crate::error::{KetError, KetResult};
    pub use crate::grid::GateGrid;
    pub use crate::payload::{CircuitRequest, StateResponse};
    pub use crate::policy::{Anomaly, AnomalyLog, ValidationPolicy};
    pub use crate::token::{Cell, GateToken, Role, SingleQubitGate, TokenResolver};
    pub use crate::types::{InitialState, QubitIndex, TimeColumn};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
