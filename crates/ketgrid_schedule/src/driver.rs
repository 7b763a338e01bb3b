//! Column-major execution driver
//!
//! Gantree: L4_Scheduling → ExecutionDriver
//!
//! Walks the grid column by column and, within a column, row by row.
//! Unitaries are issued as soon as their cell is read; role markers go
//! through a [`ControlledOpGroup`] that lives for one column only.

use crate::circuit_schedule::CircuitSchedule;
use crate::group::ControlledOpGroup;
use crate::scheduled_op::ResolvedOperation;
use ketgrid_backend::SimulationEngine;
use ketgrid_core::{Anomaly, AnomalyLog, Cell, GateGrid, KetResult, TimeColumn, TokenResolver};
use log::debug;

/// Grid walker that turns cells into engine operations
/// Gantree: ExecutionDriver // plan() | execute()
pub struct ExecutionDriver;

impl ExecutionDriver {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Resolve the grid into its operation sequence without an engine
    /// Gantree: plan(GateGrid) -> CircuitSchedule // dry run
    pub fn plan(grid: &GateGrid, anomalies: &mut AnomalyLog) -> KetResult<CircuitSchedule> {
        let mut schedule = CircuitSchedule::empty(grid.num_qubits(), grid.num_columns());
        Self::walk(grid, anomalies, |column, op| {
            schedule.push(column, op);
            Ok(())
        })?;
        Ok(schedule)
    }

    /// Issue every operation of the grid to `engine`, in order
    /// Gantree: execute(engine,register,GateGrid) -> CircuitSchedule // issue
    ///
    /// The first engine error aborts the walk; operations already applied
    /// stay applied.
    pub fn execute<E: SimulationEngine>(
        engine: &E,
        register: &mut E::Register,
        grid: &GateGrid,
        anomalies: &mut AnomalyLog,
    ) -> KetResult<CircuitSchedule> {
        let mut schedule = CircuitSchedule::empty(grid.num_qubits(), grid.num_columns());
        Self::walk(grid, anomalies, |column, op| {
            Self::issue(engine, register, &op)?;
            schedule.push(column, op);
            Ok(())
        })?;
        debug!(
            "driver: {} issued {} operations over {} columns",
            engine.name(),
            schedule.num_operations(),
            schedule.num_columns()
        );
        Ok(schedule)
    }

    /// Issue one operation
    pub fn issue<E: SimulationEngine>(
        engine: &E,
        register: &mut E::Register,
        op: &ResolvedOperation,
    ) -> KetResult<()> {
        match op {
            ResolvedOperation::Single { gate, qubit } => engine.apply(register, *gate, *qubit),
            ResolvedOperation::ControlledX { controls, targets } => {
                engine.apply_controlled_x(register, controls, targets)
            }
        }
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    fn walk<F>(grid: &GateGrid, anomalies: &mut AnomalyLog, mut sink: F) -> KetResult<()>
    where
        F: FnMut(TimeColumn, ResolvedOperation) -> KetResult<()>,
    {
        for column in 0..grid.num_columns() {
            Self::scan_column(grid, column, anomalies, &mut sink)?;
        }
        Ok(())
    }

    /// Scan one column top to bottom, handing each operation to `sink`
    ///
    /// Returns the number of operations issued from the column.
    pub fn scan_column<F>(
        grid: &GateGrid,
        column: TimeColumn,
        anomalies: &mut AnomalyLog,
        sink: &mut F,
    ) -> KetResult<usize>
    where
        F: FnMut(TimeColumn, ResolvedOperation) -> KetResult<()>,
    {
        let mut group = ControlledOpGroup::new(column);
        let mut issued = 0;
        let mut fired = false;

        for (qubit, text) in grid.column(column).enumerate() {
            let op = match TokenResolver::resolve_checked(text, qubit, column, anomalies)? {
                Cell::Empty => None,
                Cell::Unitary(gate) => Some(ResolvedOperation::single(gate, qubit)),
                Cell::Role(role) => {
                    let fire = group.add(role, qubit);
                    fired |= fire.is_some();
                    fire
                }
            };

            if let Some(op) = op {
                debug!("driver: t={} issue {}", column, op);
                sink(column, op)?;
                issued += 1;
            }
        }

        if let Some(leftover) = group.finish(fired) {
            anomalies.report(Anomaly::IncompleteControlGroup {
                column,
                controls: leftover.controls,
                targets: leftover.targets,
            })?;
        }

        Ok(issued)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ketgrid_core::{KetError, SingleQubitGate, ValidationPolicy};

    fn grid(rows: &[&[&str]]) -> GateGrid {
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        GateGrid::from_rows(&rows).unwrap()
    }

    fn lenient() -> AnomalyLog {
        AnomalyLog::new(ValidationPolicy::Lenient)
    }

    #[test]
    fn test_plan_column_major_order() {
        let g = grid(&[&["H", "Z"], &["X", ""]]);
        let schedule = ExecutionDriver::plan(&g, &mut lenient()).unwrap();
        assert_eq!(
            schedule.resolved(),
            vec![
                &ResolvedOperation::single(SingleQubitGate::H, 0),
                &ResolvedOperation::single(SingleQubitGate::X, 1),
                &ResolvedOperation::single(SingleQubitGate::Z, 0),
            ]
        );
        assert_eq!(schedule.operations()[2].column, 1);
    }

    #[test]
    fn test_unitary_between_control_and_target() {
        let g = grid(&[&["Control"], &["H"], &["Target"]]);
        let schedule = ExecutionDriver::plan(&g, &mut lenient()).unwrap();
        assert_eq!(
            schedule.resolved(),
            vec![
                &ResolvedOperation::single(SingleQubitGate::H, 1),
                &ResolvedOperation::controlled_x(vec![0], vec![2]),
            ]
        );
    }

    #[test]
    fn test_groups_do_not_cross_columns() {
        let g = grid(&[&["Control", ""], &["", "Target"]]);
        let mut log = lenient();
        let schedule = ExecutionDriver::plan(&g, &mut log).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_unknown_token_is_noop_when_lenient() {
        let g = grid(&[&["SWAP"], &["X"]]);
        let mut log = lenient();
        let schedule = ExecutionDriver::plan(&g, &mut log).unwrap();
        assert_eq!(schedule.num_operations(), 1);
        assert!(matches!(log.entries()[0], Anomaly::UnknownGate { .. }));
    }

    #[test]
    fn test_strict_incomplete_group_fails() {
        let g = grid(&[&["Control"], &["Control"]]);
        let mut log = AnomalyLog::new(ValidationPolicy::Strict);
        let err = ExecutionDriver::plan(&g, &mut log).unwrap_err();
        assert!(matches!(err, KetError::IncompleteControlGroup { column: 0, .. }));
    }

    #[test]
    fn test_scan_column_counts() {
        let g = grid(&[&["Control"], &["Target"], &["Target"]]);
        let mut ops = Vec::new();
        let mut sink = |_: TimeColumn, op: ResolvedOperation| -> KetResult<()> {
            ops.push(op);
            Ok(())
        };
        let issued = ExecutionDriver::scan_column(&g, 0, &mut lenient(), &mut sink).unwrap();
        assert_eq!(issued, 2);
        assert_eq!(ops.len(), 2);
    }
}
