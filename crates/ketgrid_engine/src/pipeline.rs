//! Staged request pipeline
//!
//! Gantree: L7_Integration → Pipeline
//!
//! One request, one pipeline: normalize → inject → execute → extract.
//! Each stage can be run on its own to inspect intermediate results;
//! asking for a later stage runs any stage that has not happened yet.

use crate::config::EngineConfig;
use ketgrid_backend::{Formatter, SimulationEngine, StateResult};
use ketgrid_core::{
    Anomaly, AnomalyLog, CircuitRequest, GateGrid, KetError, KetResult, StateResponse,
};
use ketgrid_schedule::{CircuitSchedule, ExecutionDriver};
use log::debug;
use serde::{Deserialize, Serialize};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Nothing done yet
    Initial,
    /// Dense grid built
    Normalized,
    /// Initial-state column applied (possibly a no-op)
    Injected,
    /// Every operation issued to the engine
    Executed,
    /// State read out and rendered
    Extracted,
}

/// Everything a finished request produced
/// Gantree: ExecutionOutcome // state + rendering + schedule + anomalies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Final register contents
    pub state: StateResult,

    /// Rendered state
    pub rendering: String,

    /// Operations issued, in order
    pub schedule: CircuitSchedule,

    /// Tolerated anomalies
    pub anomalies: Vec<Anomaly>,
}

impl ExecutionOutcome {
    /// Response body for this outcome
    pub fn to_response(&self, precision: Option<usize>) -> StateResponse {
        StateResponse {
            state: self.state.to_label_map(precision),
            latex: self.rendering.clone(),
        }
    }

    /// Check if anything was dropped along the way
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Intermediate results
#[derive(Debug)]
pub struct PipelineState<R> {
    /// Current stage
    pub stage: PipelineStage,

    /// Dense grid (after normalize; widened by inject)
    pub grid: Option<GateGrid>,

    /// Whether inject prepended a column
    pub injected: bool,

    /// Live register (after execute)
    pub register: Option<R>,

    /// Issued operations (after execute)
    pub schedule: Option<CircuitSchedule>,

    /// Final result (after extract)
    pub outcome: Option<ExecutionOutcome>,
}

impl<R> PipelineState<R> {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Initial,
            grid: None,
            injected: false,
            register: None,
            schedule: None,
            outcome: None,
        }
    }

    /// Check if normalized
    pub fn is_normalized(&self) -> bool {
        self.grid.is_some()
    }

    /// Check if executed
    pub fn is_executed(&self) -> bool {
        self.schedule.is_some()
    }
}

/// Request pipeline over borrowed collaborators
/// Gantree: Pipeline // staged execution
pub struct Pipeline<'a, E: SimulationEngine, F: Formatter> {
    config: &'a EngineConfig,
    engine: &'a E,
    formatter: &'a F,
    request: &'a CircuitRequest,
    anomalies: AnomalyLog,
    state: PipelineState<E::Register>,
}

impl<'a, E: SimulationEngine, F: Formatter> Pipeline<'a, E, F> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a pipeline for one request
    pub fn new(
        config: &'a EngineConfig,
        engine: &'a E,
        formatter: &'a F,
        request: &'a CircuitRequest,
    ) -> Self {
        Self {
            config,
            engine,
            formatter,
            request,
            anomalies: config.anomaly_log(),
            state: PipelineState::new(),
        }
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> PipelineStage {
        self.state.stage
    }

    /// Get intermediate results
    pub fn state(&self) -> &PipelineState<E::Register> {
        &self.state
    }

    /// Anomalies collected so far
    pub fn anomalies(&self) -> &AnomalyLog {
        &self.anomalies
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Stage 1: build the dense grid
    pub fn normalize(&mut self) -> KetResult<&GateGrid> {
        let num_qubits = self.request.num_qubits();
        if num_qubits > self.config.max_qubits {
            return Err(KetError::TooManyQubits {
                requested: num_qubits,
                max: self.config.max_qubits,
            });
        }

        let grid =
            GateGrid::normalize_bounded(self.request, self.config.max_columns, &mut self.anomalies)?;
        if self.config.verbose {
            println!(
                "Pipeline: Normalized {} qubits x {} columns",
                grid.num_qubits(),
                grid.num_columns()
            );
        }

        self.state.stage = PipelineStage::Normalized;
        Ok(&*self.state.grid.insert(grid))
    }

    /// Stage 2: prepend the initial-state column
    pub fn inject(&mut self) -> KetResult<&GateGrid> {
        if self.state.stage < PipelineStage::Normalized {
            self.normalize()?;
        }

        let initial = self.request.initial_state();
        let grid = self
            .state
            .grid
            .as_mut()
            .ok_or_else(|| KetError::InternalError("inject before normalize".to_string()))?;

        if self.state.stage < PipelineStage::Injected {
            self.state.injected = grid.inject_initial_state(&initial)?;
            self.state.stage = PipelineStage::Injected;
            if self.config.verbose {
                println!("Pipeline: Initial state |{}>", initial);
                print!("{}", grid);
            }
        }

        Ok(&*grid)
    }

    /// Resolve the injected grid into its operation sequence without a
    /// register; anomalies join the ones from earlier stages
    pub fn plan(&mut self) -> KetResult<CircuitSchedule> {
        if self.state.stage < PipelineStage::Injected {
            self.inject()?;
        }

        let grid = self
            .state
            .grid
            .as_ref()
            .ok_or_else(|| KetError::InternalError("plan before normalize".to_string()))?;
        ExecutionDriver::plan(grid, &mut self.anomalies)
    }

    /// Stage 3: allocate a register and issue every operation
    pub fn execute(&mut self) -> KetResult<&CircuitSchedule> {
        if self.state.stage < PipelineStage::Injected {
            self.inject()?;
        }

        let grid = self
            .state
            .grid
            .as_ref()
            .ok_or_else(|| KetError::InternalError("execute before normalize".to_string()))?;

        if self.config.verbose {
            println!(
                "Pipeline: Executing on {} ({} columns)...",
                self.engine.name(),
                grid.num_columns()
            );
        }

        let mut register = self.engine.allocate(grid.num_qubits())?;
        let schedule =
            ExecutionDriver::execute(self.engine, &mut register, grid, &mut self.anomalies)?;

        self.state.register = Some(register);
        self.state.stage = PipelineStage::Executed;
        Ok(&*self.state.schedule.insert(schedule))
    }

    /// Stage 4: read out and render the register
    pub fn extract(&mut self) -> KetResult<&ExecutionOutcome> {
        if self.state.stage < PipelineStage::Executed {
            self.execute()?;
        }

        let register = self
            .state
            .register
            .as_ref()
            .ok_or_else(|| KetError::InternalError("extract before execute".to_string()))?;
        let schedule = self
            .state
            .schedule
            .clone()
            .ok_or_else(|| KetError::InternalError("extract before execute".to_string()))?;

        let state = self.engine.dump(register)?;
        let rendering = self.formatter.render(&state, self.config.render_mode);
        debug!("pipeline: extracted {} ({})", state, rendering);
        if self.config.verbose {
            println!("Pipeline: {}", rendering);
        }

        let outcome = ExecutionOutcome {
            state,
            rendering,
            schedule,
            anomalies: self.anomalies.entries().to_vec(),
        };

        self.state.stage = PipelineStage::Extracted;
        Ok(&*self.state.outcome.insert(outcome))
    }

    /// Run every remaining stage
    pub fn run(mut self) -> KetResult<ExecutionOutcome> {
        self.extract()?;
        self.state
            .outcome
            .take()
            .ok_or_else(|| KetError::InternalError("pipeline finished without outcome".to_string()))
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Drop intermediate results and anomalies
    pub fn reset(&mut self) {
        self.anomalies = self.config.anomaly_log();
        self.state = PipelineState::new();
    }
}

// ============================================================================
// Tests
// ============================================================================
