//! # ketgrid Schedule
//!
//! Per-column controlled-operation grouping and column-major execution
//! of a [`GateGrid`](ketgrid_core::GateGrid).
//!
//! ## Gantree Architecture
//!
//! ```text
//! ketgrid_schedule // L4: Scheduling
//!     ResolvedOperation // unitary | multi-controlled X
//!     ControlledOpGroup // reset-on-fire accumulator
//!     ExecutionDriver // plan() | execute()
//!     CircuitSchedule // issued operations
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ketgrid_schedule::prelude::*;
//! use ketgrid_core::{AnomalyLog, GateGrid, ValidationPolicy};
//!
//! let grid = GateGrid::from_rows(&[
//!     vec!["H", "Control"],
//!     vec!["", "Target"],
//! ]).unwrap();
//!
//! let mut anomalies = AnomalyLog::new(ValidationPolicy::Lenient);
//! let schedule = ExecutionDriver::plan(&grid, &mut anomalies).unwrap();
//!
//! assert_eq!(schedule.num_operations(), 2);
//! println!("{}", schedule);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Resolved operations (Gantree: L4_Scheduling → ScheduledOperation)
pub mod scheduled_op;

/// Per-column grouping (Gantree: L4_Scheduling → ControlledOpGroup)
pub mod group;

/// Issued schedule (Gantree: L4_Scheduling → CircuitSchedule)
pub mod circuit_schedule;

/// Grid walker (Gantree: L4_Scheduling → ExecutionDriver)
pub mod driver;

// ============================================================================
// Re-exports
// ============================================================================

pub use circuit_schedule::CircuitSchedule;
pub use driver::ExecutionDriver;
pub use group::{ControlledOpGroup, GroupState, Leftover};
pub use scheduled_op::{ResolvedOperation, ScheduledOperation};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use ketgrid_schedule::prelude::*;
    //! ```

    pub use crate::circuit_schedule::CircuitSchedule;
    pub use crate::driver::ExecutionDriver;
    pub use crate::group::ControlledOpGroup;
    pub use crate::scheduled_op::{ResolvedOperation, ScheduledOperation};
}

// ============================================================================
// Integration Tests
// ============================================================================
