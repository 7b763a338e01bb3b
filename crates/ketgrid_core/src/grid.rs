//! Dense circuit grid
//!
//! Gantree: L1_Circuit → GateGrid
//!
//! The editor sends gates keyed by column. [`GateGrid::normalize`] lays
//! them out as a rectangular `qubits × columns` table of gate text, and
//! [`GateGrid::inject_initial_state`] prepends the NOT column that
//! prepares excited initial bits.

use crate::error::{KetError, KetResult};
use crate::payload::{CircuitRequest, QubitRef};
use crate::policy::{Anomaly, AnomalyLog};
use crate::token::{GateToken, EMPTY_TOKEN};
use crate::types::{InitialState, QubitIndex, TimeColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest grid [`GateGrid::normalize`] will lay out
pub const DEFAULT_MAX_COLUMNS: usize = 1024;

/// Placement with column and row already parsed (either may be out of range)
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedPlacement<'a> {
    column: i64,
    qubit: i64,
    gate: &'a str,
}

/// Dense gate table, one row per qubit
/// Gantree: GateGrid // N x T grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateGrid {
    /// Gate text per row; every row has `num_columns` cells
    rows: Vec<Vec<String>>,

    /// Grid width
    num_columns: usize,
}

impl GateGrid {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// All-empty grid
    pub fn empty(num_qubits: usize, num_columns: usize) -> Self {
        Self {
            rows: vec![vec![EMPTY_TOKEN.to_string(); num_columns]; num_qubits],
            num_columns,
        }
    }

    /// Build from explicit rows
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> KetResult<Self> {
        let num_columns = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != num_columns) {
            return Err(KetError::InvalidPayload(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                num_columns
            )));
        }
        Ok(Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
            num_columns,
        })
    }

    /// Lay out a request's placements as a dense grid
    /// Gantree: normalize(request, anomalies) -> GateGrid // sparse -> dense
    ///
    /// Width limit is [`DEFAULT_MAX_COLUMNS`].
    pub fn normalize(request: &CircuitRequest, anomalies: &mut AnomalyLog) -> KetResult<Self> {
        Self::normalize_bounded(request, DEFAULT_MAX_COLUMNS, anomalies)
    }

    /// Lay out a request's placements as a grid at most `max_columns` wide
    ///
    /// The width is one past the largest non-negative column key, whether
    /// or not that column holds any placement. Column keys and qubit
    /// references are parsed up front, so a malformed one fails the request
    /// before any cell is written. Placements outside the grid go to
    /// `anomalies`. A later placement on the same cell overwrites an
    /// earlier one.
    pub fn normalize_bounded(
        request: &CircuitRequest,
        max_columns: usize,
        anomalies: &mut AnomalyLog,
    ) -> KetResult<Self> {
        let num_qubits = request.num_qubits();
        let (placements, width) = parse_placements(request)?;

        if width > max_columns as u64 {
            return Err(KetError::TooManyColumns {
                requested: width,
                max: max_columns,
            });
        }
        let num_columns = width as usize;

        let mut grid = Self::empty(num_qubits, num_columns);

        for p in placements {
            if p.column < 0 || p.column as usize >= num_columns {
                anomalies.report(Anomaly::ColumnOutOfRange {
                    column: p.column,
                    num_columns,
                })?;
                continue;
            }
            if p.qubit < 0 || p.qubit as usize >= num_qubits {
                anomalies.report(Anomaly::QubitOutOfRange {
                    qubit: p.qubit,
                    column: p.column,
                    num_qubits,
                })?;
                continue;
            }
            grid.rows[p.qubit as usize][p.column as usize] = p.gate.to_string();
        }

        log::debug!(
            "normalized grid: {} qubits x {} columns",
            grid.num_qubits(),
            grid.num_columns()
        );
        Ok(grid)
    }

    // ========================================================================
    // Initial-State Injection
    // ========================================================================

    /// Prepend an `X` column for excited initial bits
    /// Gantree: inject_initial_state(initial) -> bool // NOT prep column
    ///
    /// Adds the column only when at least one bit is `1`; returns whether
    /// it was added.
    pub fn inject_initial_state(&mut self, initial: &InitialState) -> KetResult<bool> {
        if initial.len() != self.num_qubits() {
            return Err(KetError::InternalError(format!(
                "initial state has {} bits for a {}-qubit grid",
                initial.len(),
                self.num_qubits()
            )));
        }
        if !initial.any_excited() {
            return Ok(false);
        }

        for (row, excited) in self.rows.iter_mut().zip(initial.iter()) {
            let token = if excited { GateToken::X } else { GateToken::Empty };
            row.insert(0, token.as_str().to_string());
        }
        self.num_columns += 1;

        log::debug!("injected initial state {} as column 0", initial);
        Ok(true)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubit rows
    pub fn num_qubits(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Check if there is nothing to execute
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.num_columns == 0
    }

    /// Gate text of one cell
    pub fn cell(&self, qubit: QubitIndex, column: TimeColumn) -> Option<&str> {
        self.rows
            .get(qubit)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Gate text of one row
    pub fn row(&self, qubit: QubitIndex) -> Option<&[String]> {
        self.rows.get(qubit).map(Vec::as_slice)
    }

    /// Gate text of one column, top to bottom
    pub fn column(&self, column: TimeColumn) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |r| r.get(column).map(String::as_str))
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.as_str() != EMPTY_TOKEN)
            .count()
    }
}

/// Parsed placements and the declared width
fn parse_placements(request: &CircuitRequest) -> KetResult<(Vec<ParsedPlacement<'_>>, u64)> {
    let mut parsed = Vec::new();
    let mut width = 0u64;
    for entry in request.columns() {
        let column = entry
            .key
            .trim()
            .parse::<i64>()
            .map_err(|_| KetError::InvalidColumn(entry.key.clone()))?;
        if column >= 0 {
            width = width.max(column as u64 + 1);
        }
        for placement in &entry.placements {
            parsed.push(ParsedPlacement {
                column,
                qubit: QubitRef::index(&placement.qubit)?,
                gate: &placement.gate,
            });
        }
    }
    Ok((parsed, width))
}

// ============================================================================
// Display
// ============================================================================

fn cell_symbol(text: &str) -> &str {
    match GateToken::parse(text) {
        Some(GateToken::Empty) => "-",
        Some(GateToken::Control) => "*",
        Some(GateToken::Target) => "+",
        _ => text,
    }
}

impl fmt::Display for GateGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GateGrid({} qubits, {} columns)",
            self.num_qubits(),
            self.num_columns
        )?;
        let width = self
            .rows
            .iter()
            .flatten()
            .map(|c| cell_symbol(c).len())
            .max()
            .unwrap_or(1);
        for (q, row) in self.rows.iter().enumerate() {
            write!(f, "  q{}:", q)?;
            for cell in row {
                write!(f, " {:^width$}", cell_symbol(cell), width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
