//! Per-column controlled-operation grouping
//!
//! Gantree: L4_Scheduling → ControlledOpGroup
//!
//! Roles are grouped positionally while a column is scanned top to
//! bottom. The group fires the moment it holds at least one control and
//! one target, with every control and every pending target seen so far.
//! Firing clears the pending targets; the controls stay in effect for the
//! rest of the column. With controls on rows 0 and 1 and targets on rows
//! 2 and 5, two operations are issued: `[0, 1] -> [2]` when row 2 is
//! reached, then `[0, 1] -> [5]`.
//!
//! ```text
//!             Control / Target            Target (controls held)
//!  Scanning ───────────────────▶ GroupOpen ─────────────────────▶ fire
//!      ▲                              │ Control (targets pending)
//!      └──────── finish() ────────────┴──────────────────────────▶ fire
//! ```

use crate::scheduled_op::ResolvedOperation;
use ketgrid_core::{QubitIndex, Role, TimeColumn};

/// Scanner state within one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// No role seen yet
    Scanning,
    /// At least one control or target held
    GroupOpen,
}

/// Accumulator for one column's controls and targets
/// Gantree: ControlledOpGroup // {controls, targets}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlledOpGroup {
    column: TimeColumn,
    controls: Vec<QubitIndex>,
    targets: Vec<QubitIndex>,
}

/// Members left over when a column ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leftover {
    /// Controls held at column end
    pub controls: Vec<QubitIndex>,
    /// Targets never paired with a control
    pub targets: Vec<QubitIndex>,
}

impl ControlledOpGroup {
    /// Fresh group for a column
    pub fn new(column: TimeColumn) -> Self {
        Self {
            column,
            controls: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Column this group belongs to
    pub fn column(&self) -> TimeColumn {
        self.column
    }

    /// Current state
    pub fn state(&self) -> GroupState {
        if self.controls.is_empty() && self.targets.is_empty() {
            GroupState::Scanning
        } else {
            GroupState::GroupOpen
        }
    }

    /// Held controls
    pub fn controls(&self) -> &[QubitIndex] {
        &self.controls
    }

    /// Pending targets
    pub fn targets(&self) -> &[QubitIndex] {
        &self.targets
    }

    /// Record a role at `qubit`, returning the operation to issue if the
    /// group fires
    ///
    /// Rows must be fed in increasing order.
    pub fn add(&mut self, role: Role, qubit: QubitIndex) -> Option<ResolvedOperation> {
        match role {
            Role::Control => self.controls.push(qubit),
            Role::Target => self.targets.push(qubit),
        }

        if self.controls.is_empty() || self.targets.is_empty() {
            return None;
        }

        let targets = std::mem::take(&mut self.targets);
        Some(ResolvedOperation::controlled_x(self.controls.clone(), targets))
    }

    /// End the column
    ///
    /// Returns the members that never took part in a fired operation:
    /// pending targets, and controls if nothing fired at all.
    pub fn finish(self, fired: bool) -> Option<Leftover> {
        let controls = if fired { Vec::new() } else { self.controls };
        if controls.is_empty() && self.targets.is_empty() {
            return None;
        }
        Some(Leftover {
            controls,
            targets: self.targets,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
