//! Request processor for ketgrid
//!
//! Gantree: L7_Integration → CircuitProcessor
//!
//! Owns the engine, the formatter, and the configuration, and turns one
//! request into one outcome. Holds nothing between requests; `&self` is
//! enough to process any number of them, from any number of threads.

use crate::config::EngineConfig;
use crate::pipeline::{ExecutionOutcome, Pipeline};
use ketgrid_backend::{Formatter, KetFormatter, SimulationEngine, StateVectorEngine};
use ketgrid_core::{Anomaly, CircuitRequest, KetResult, StateResponse};
use ketgrid_schedule::CircuitSchedule;
use log::{debug, info};

/// Request processor
/// Gantree: CircuitProcessor // request → outcome
pub struct CircuitProcessor<E = StateVectorEngine, F = KetFormatter> {
    /// Configuration
    config: EngineConfig,

    /// Register provider
    engine: E,

    /// State renderer
    formatter: F,
}

impl CircuitProcessor<StateVectorEngine, KetFormatter> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with the state-vector engine and ket formatter
    pub fn new(config: EngineConfig) -> Self {
        let engine = config.to_engine();
        Self {
            config,
            engine,
            formatter: KetFormatter::new(),
        }
    }

    /// Create with lenient defaults
    pub fn lenient() -> Self {
        Self::new(EngineConfig::lenient())
    }

    /// Create failing on any anomaly
    pub fn strict() -> Self {
        Self::new(EngineConfig::strict())
    }
}

impl<E: SimulationEngine, F: Formatter> CircuitProcessor<E, F> {
    /// Create with custom collaborators
    pub fn with_parts(config: EngineConfig, engine: E, formatter: F) -> Self {
        Self {
            config,
            engine,
            formatter,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get formatter
    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Staged pipeline for one request
    pub fn pipeline<'a>(&'a self, request: &'a CircuitRequest) -> Pipeline<'a, E, F> {
        Pipeline::new(&self.config, &self.engine, &self.formatter, request)
    }

    // ========================================================================
    // Processing
    // ========================================================================

    /// Run one request end to end
    /// Gantree: process(CircuitRequest) -> ExecutionOutcome // full run
    pub fn process(&self, request: &CircuitRequest) -> KetResult<ExecutionOutcome> {
        self.config.validate()?;

        let outcome = self.pipeline(request).run()?;

        info!(
            "processed circuit: {} qubits, {} columns, {} operations, {} anomalies on {}",
            outcome.schedule.num_qubits(),
            outcome.schedule.num_columns(),
            outcome.schedule.num_operations(),
            outcome.anomalies.len(),
            self.engine.name()
        );

        Ok(outcome)
    }

    /// Run one request and build its response body
    pub fn respond(&self, request: &CircuitRequest) -> KetResult<StateResponse> {
        let outcome = self.process(request)?;
        Ok(outcome.to_response(self.config.precision))
    }

    /// Decode a JSON request body, run it, and encode the response body
    /// Gantree: process_json(&str) -> String // body in, body out
    pub fn process_json(&self, body: &str) -> KetResult<String> {
        let request = CircuitRequest::from_json(body)?;
        let response = self.respond(&request)?;
        let text = response.to_json()?;
        debug!("response: {}", text);
        Ok(text)
    }

    /// Resolve a request into its operation sequence without simulating
    /// Gantree: plan(CircuitRequest) -> (CircuitSchedule, anomalies) // dry run
    pub fn plan(&self, request: &CircuitRequest) -> KetResult<(CircuitSchedule, Vec<Anomaly>)> {
        self.config.validate()?;

        let mut pipeline = self.pipeline(request);
        let schedule = pipeline.plan()?;
        Ok((schedule, pipeline.anomalies().entries().to_vec()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ketgrid_core::{KetError, ValidationPolicy};

    #[test]
    fn test_default_parts() {
        let processor = CircuitProcessor::lenient();
        assert_eq!(processor.config().policy, ValidationPolicy::Lenient);
        assert_eq!(processor.engine().name(), "ketgrid_state_vector");
    }

    #[test]
    fn test_process_json_basis_state() {
        let processor = CircuitProcessor::lenient();
        let body = processor
            .process_json(r#"{"qubits": {"q0": ["q0", "1"]}, "gates": {}}"#)
            .unwrap();
        let response: StateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.state.len(), 1);
        assert_eq!(response.state["1"], "1+0i");
        assert_eq!(response.latex, "\\left|1\\right\\rangle");
    }

    #[test]
    fn test_process_json_empty_body() {
        let processor = CircuitProcessor::lenient();
        for body in ["", "null", "{}"] {
            let err = processor.process_json(body).unwrap_err();
            assert!(matches!(err, KetError::EmptyPayload), "body {:?}", body);
        }
    }

    #[test]
    fn test_plan_does_not_simulate() {
        let processor = CircuitProcessor::lenient();
        let request = CircuitRequest::new()
            .qubit(true)
            .qubit(false)
            .gate(0, "q0", "Control")
            .gate(0, "q1", "Target");
        let (schedule, anomalies) = processor.plan(&request).unwrap();
        assert_eq!(schedule.num_columns(), 2);
        assert_eq!(schedule.num_operations(), 2);
        assert_eq!(schedule.count_controlled(), 1);
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_plan_reports_dropped_placements() {
        let processor = CircuitProcessor::lenient();
        let request = CircuitRequest::new()
            .qubits(2)
            .gate(0, "q7", "H")
            .gate(0, "q1", "X");
        let (schedule, anomalies) = processor.plan(&request).unwrap();
        assert_eq!(schedule.num_operations(), 1);
        assert_eq!(anomalies.len(), 1);
        assert!(matches!(anomalies[0], Anomaly::QubitOutOfRange { qubit: 7, .. }));
    }

    #[test]
    fn test_declared_width_without_placements() {
        let processor = CircuitProcessor::lenient();
        let body = r#"{"qubits": {"q0": ["q0", "0"]},
            "gates": {"0": [{"qubit": "q0", "type": "H"}], "3": []}}"#;
        let (schedule, _) = processor.plan(&CircuitRequest::from_json(body).unwrap()).unwrap();
        assert_eq!(schedule.num_columns(), 4);
        assert_eq!(schedule.num_operations(), 1);
    }

    #[test]
    fn test_huge_column_key_is_an_error() {
        let processor = CircuitProcessor::lenient();
        let body = r#"{"qubits": {"q0": ["q0", "0"]},
            "gates": {"9223372036854775806": [{"qubit": "q0", "type": "H"}]}}"#;
        let err = processor.process_json(body).unwrap_err();
        assert!(matches!(
            err,
            KetError::TooManyColumns { requested: 9223372036854775807, .. }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let processor = CircuitProcessor::new(EngineConfig::default().with_threshold(-0.5));
        let err = processor.process(&CircuitRequest::new().qubits(1)).unwrap_err();
        assert!(matches!(err, KetError::ConfigError(_)));
    }

    #[test]
    fn test_fixed_precision() {
        let processor = CircuitProcessor::new(EngineConfig::default().with_precision(3));
        let request = CircuitRequest::new().qubits(1).gate(0, "q0", "H");
        let response = processor.respond(&request).unwrap();
        assert_eq!(response.state["0"], "0.707+0.000i");
        assert_eq!(response.state["1"], "0.707+0.000i");
    }
}
