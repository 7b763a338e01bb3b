//! # ketgrid Engine
//!
//! Request pipeline for the column-based circuit editor: JSON body in,
//! amplitudes and rendered state out.
//!
//! ## Gantree Architecture
//!
//! ```text
//! ketgrid_engine // L7: Integration
//!     EngineConfig // policy, render_mode, threshold, precision, limits
//!     Pipeline // staged execution
//!         normalize() → inject() → execute() → extract()
//!         run() - all stages
//!     CircuitProcessor // request → outcome
//!         process(), respond(), process_json()
//!         plan() - dry run
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ketgrid_engine::prelude::*;
//!
//! let processor = CircuitProcessor::lenient();
//! let body = processor.process_json(r#"{
//!     "qubits": {"a": ["q0", "0"], "b": ["q1", "0"]},
//!     "gates": {
//!         "0": [{"qubit": "q0", "type": "H"}],
//!         "1": [{"qubit": "q0", "type": "Control"}, {"qubit": "q1", "type": "Target"}]
//!     }
//! }"#).unwrap();
//!
//! println!("{}", body);
//! ```
//!
//! ## Using Pipeline
//!
//! ```rust
//! use ketgrid_engine::prelude::*;
//! use ketgrid_core::CircuitRequest;
//!
//! let processor = CircuitProcessor::new(EngineConfig::strict().with_verbose(true));
//! let request = CircuitRequest::new().qubit(true).gate(0, "q0", "H");
//!
//! let mut pipeline = processor.pipeline(&request);
//!
//! // Run stages individually
//! pipeline.normalize().unwrap();
//! pipeline.inject().unwrap();
//! pipeline.execute().unwrap();
//! let outcome = pipeline.extract().unwrap();
//! assert_eq!(outcome.state.len(), 2);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L7_Integration → EngineConfig)
pub mod config;

/// Pipeline (Gantree: L7_Integration → Pipeline)
pub mod pipeline;

/// Processor (Gantree: L7_Integration → CircuitProcessor)
pub mod processor;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::EngineConfig;
pub use pipeline::{ExecutionOutcome, Pipeline, PipelineStage, PipelineState};
pub use processor::CircuitProcessor;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use ketgrid_engine::prelude::*;
    //! ```

    pub use crate::config::EngineConfig;
    pub use crate::pipeline::{ExecutionOutcome, Pipeline, PipelineStage};
    pub use crate::processor::CircuitProcessor;
    pub use ketgrid_backend::RenderMode;
    pub use ketgrid_core::ValidationPolicy;
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;
    use ketgrid_core::{Anomaly, CircuitRequest, KetError, StateResponse};
    use std::f64::consts::FRAC_1_SQRT_2;

    const BELL: &str = r#"{
        "qubits": {"a": ["q0", "0"], "b": ["q1", "0"]},
        "gates": {
            "0": [{"qubit": "q0", "type": "H"}],
            "1": [{"qubit": "q0", "type": "Control"}, {"qubit": "q1", "type": "Target"}]
        }
    }"#;

    fn respond(processor: &CircuitProcessor, body: &str) -> StateResponse {
        serde_json::from_str(&processor.process_json(body).unwrap()).unwrap()
    }

    #[test]
    fn test_no_gates_all_zero() {
        let processor = CircuitProcessor::lenient();
        let outcome = processor
            .process(&CircuitRequest::new().qubits(3))
            .unwrap();

        assert_eq!(outcome.state.len(), 1);
        assert_relative_eq!(outcome.state.amplitude("000").re, 1.0, epsilon = 1e-12);
        assert!(outcome.schedule.is_empty());
        assert_eq!(outcome.schedule.num_columns(), 0);
    }

    #[test]
    fn test_excited_qubit_without_gates() {
        let processor = CircuitProcessor::lenient();
        let response = respond(&processor, r#"{"qubits": {"q0": ["q0", "1"]}}"#);

        assert_eq!(response.state.len(), 1);
        assert_eq!(response.state["1"], "1+0i");
    }

    #[test]
    fn test_bell_state() {
        let processor = CircuitProcessor::lenient();
        let request = CircuitRequest::from_json(BELL).unwrap();
        let outcome = processor.process(&request).unwrap();

        assert_eq!(outcome.state.len(), 2);
        assert_relative_eq!(outcome.state.amplitude("00").re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(outcome.state.amplitude("11").re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_eq!(
            outcome.rendering,
            "\\frac{1}{\\sqrt{2}}\\left|00\\right\\rangle + \\frac{1}{\\sqrt{2}}\\left|11\\right\\rangle"
        );
    }

    #[test]
    fn test_bell_response_keys() {
        let processor = CircuitProcessor::lenient();
        let response = respond(&processor, BELL);
        let keys: Vec<&str> = response.state.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["00", "11"]);
        assert!(response.latex.contains("\\left|11\\right\\rangle"));
    }

    #[test]
    fn test_two_targets_one_control_set() {
        // X on q0, q1 in column 0, then controls {0,1} with targets {2,5}
        let request = CircuitRequest::new()
            .qubits(6)
            .gate(0, "q0", "X")
            .gate(0, "q1", "X")
            .gate(1, "q0", "Control")
            .gate(1, "q1", "Control")
            .gate(1, "q2", "Target")
            .gate(1, "q5", "Target");
        let outcome = CircuitProcessor::lenient().process(&request).unwrap();

        assert_eq!(outcome.schedule.count_controlled(), 2);
        assert_relative_eq!(outcome.state.probability("111001"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lenient_drops_out_of_range() {
        let request = CircuitRequest::new()
            .qubits(2)
            .gate(0, "q5", "X")
            .gate(0, "q1", "SWAP")
            .gate(1, "q0", "Control");
        let outcome = CircuitProcessor::lenient().process(&request).unwrap();

        assert_relative_eq!(outcome.state.probability("00"), 1.0, epsilon = 1e-12);
        assert_eq!(outcome.anomalies.len(), 3);
        assert!(matches!(outcome.anomalies[0], Anomaly::QubitOutOfRange { qubit: 5, .. }));
        assert!(matches!(outcome.anomalies[1], Anomaly::UnknownGate { .. }));
        assert!(matches!(outcome.anomalies[2], Anomaly::IncompleteControlGroup { column: 1, .. }));
    }

    #[test]
    fn test_strict_rejects_out_of_range() {
        let request = CircuitRequest::new().qubits(2).gate(0, "q5", "X");
        let err = CircuitProcessor::strict().process(&request).unwrap_err();
        assert!(matches!(err, KetError::QubitOutOfRange { qubit: 5, .. }));
        assert!(err.is_anomaly());
    }

    #[test]
    fn test_structural_errors_abort() {
        let processor = CircuitProcessor::lenient();
        let bad_qubit = r#"{"qubits": {"a": ["q0", "0"]}, "gates": {"0": [{"qubit": "qx", "type": "H"}]}}"#;
        let bad_column = r#"{"qubits": {"a": ["q0", "0"]}, "gates": {"zero": [{"qubit": "q0", "type": "H"}]}}"#;
        let bad_bit = r#"{"qubits": {"a": ["q0", "2"]}}"#;

        for body in [bad_qubit, bad_column, bad_bit, "[1, 2]", "{not json"] {
            let err = processor.process_json(body).unwrap_err();
            assert!(err.is_structural(), "{:?} -> {:?}", body, err);
        }
    }

    #[test]
    fn test_plain_rendering() {
        let processor =
            CircuitProcessor::new(EngineConfig::default().with_render_mode(RenderMode::Plain));
        let response = respond(&processor, BELL);
        assert_eq!(response.latex, "1/\u{221a}2|00\u{27e9} + 1/\u{221a}2|11\u{27e9}");
    }

    #[test]
    fn test_shared_across_threads() {
        let processor = CircuitProcessor::lenient();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| processor.process_json(BELL).unwrap()))
                .collect();
            let bodies: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert!(bodies.windows(2).all(|w| w[0] == w[1]));
        });
    }
}
