//! Gate tokens and token resolution
//!
//! Gantree: L1_Circuit → TokenResolver
//!
//! Grid cells hold the gate name exactly as the editor sent it. The
//! resolver turns that text into either a single-qubit unitary or a role
//! in a controlled operation. Names outside the vocabulary resolve to
//! [`Cell::Empty`].

use crate::error::KetResult;
use crate::policy::{Anomaly, AnomalyLog};
use crate::types::{QubitIndex, TimeColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text of an empty cell
pub const EMPTY_TOKEN: &str = "";

// ============================================================================
// GateToken
// ============================================================================

/// Fixed gate vocabulary of the circuit editor
/// Gantree: GateToken // token enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateToken {
    /// No operation
    Empty,
    /// Pauli-X (NOT)
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Hadamard
    H,
    /// Identity
    I,
    /// Control role of a multi-controlled X
    Control,
    /// Target role of a multi-controlled X
    Target,
}

impl GateToken {
    /// All tokens, in vocabulary order
    pub const ALL: [GateToken; 8] = [
        GateToken::Empty,
        GateToken::X,
        GateToken::Y,
        GateToken::Z,
        GateToken::H,
        GateToken::I,
        GateToken::Control,
        GateToken::Target,
    ];

    /// Parse editor text; `None` for names outside the vocabulary
    ///
    /// Matching is exact: "h" or "CONTROL" are unknown.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            EMPTY_TOKEN => Some(GateToken::Empty),
            "X" => Some(GateToken::X),
            "Y" => Some(GateToken::Y),
            "Z" => Some(GateToken::Z),
            "H" => Some(GateToken::H),
            "I" => Some(GateToken::I),
            "Control" => Some(GateToken::Control),
            "Target" => Some(GateToken::Target),
            _ => None,
        }
    }

    /// Editor text of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            GateToken::Empty => EMPTY_TOKEN,
            GateToken::X => "X",
            GateToken::Y => "Y",
            GateToken::Z => "Z",
            GateToken::H => "H",
            GateToken::I => "I",
            GateToken::Control => "Control",
            GateToken::Target => "Target",
        }
    }
}

impl fmt::Display for GateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Resolved Cells
// ============================================================================

/// Single-qubit unitary understood by the simulation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleQubitGate {
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Hadamard
    H,
    /// Identity
    I,
}

impl SingleQubitGate {
    /// Gate name
    pub fn name(&self) -> &'static str {
        match self {
            SingleQubitGate::X => "X",
            SingleQubitGate::Y => "Y",
            SingleQubitGate::Z => "Z",
            SingleQubitGate::H => "H",
            SingleQubitGate::I => "I",
        }
    }
}

impl fmt::Display for SingleQubitGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Role of a qubit in a column's controlled operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Condition qubit
    Control,
    /// Flipped qubit
    Target,
}

/// What a grid cell means once resolved
/// Gantree: Cell // resolved descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No operation
    Empty,
    /// Unitary applied to this row alone
    Unitary(SingleQubitGate),
    /// Participates in the column's controlled operation
    Role(Role),
}

impl From<GateToken> for Cell {
    fn from(token: GateToken) -> Self {
        match token {
            GateToken::Empty => Cell::Empty,
            GateToken::X => Cell::Unitary(SingleQubitGate::X),
            GateToken::Y => Cell::Unitary(SingleQubitGate::Y),
            GateToken::Z => Cell::Unitary(SingleQubitGate::Z),
            GateToken::H => Cell::Unitary(SingleQubitGate::H),
            GateToken::I => Cell::Unitary(SingleQubitGate::I),
            GateToken::Control => Cell::Role(Role::Control),
            GateToken::Target => Cell::Role(Role::Target),
        }
    }
}

// ============================================================================
// TokenResolver
// ============================================================================

/// Maps cell text to [`Cell`] descriptors
/// Gantree: TokenResolver // text -> Cell
pub struct TokenResolver;

impl TokenResolver {
    /// Resolve cell text, treating unknown names as a no-op
    pub fn resolve(text: &str) -> Cell {
        GateToken::parse(text).map(Cell::from).unwrap_or(Cell::Empty)
    }

    /// Resolve cell text, reporting unknown names to the anomaly log
    pub fn resolve_checked(
        text: &str,
        qubit: QubitIndex,
        column: TimeColumn,
        anomalies: &mut AnomalyLog,
    ) -> KetResult<Cell> {
        match GateToken::parse(text) {
            Some(token) => Ok(token.into()),
            None => {
                anomalies.report(Anomaly::UnknownGate {
                    token: text.to_string(),
                    qubit,
                    column,
                })?;
                Ok(Cell::Empty)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ValidationPolicy;

    #[test]
    fn test_parse_roundtrip_vocabulary() {
        for token in GateToken::ALL {
            assert_eq!(GateToken::parse(token.as_str()), Some(token));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(GateToken::parse("h"), None);
        assert_eq!(GateToken::parse("CONTROL"), None);
        assert_eq!(GateToken::parse("CNOT"), None);
    }

    #[test]
    fn test_resolve_unitaries() {
        assert_eq!(
            TokenResolver::resolve("H"),
            Cell::Unitary(SingleQubitGate::H)
        );
        assert_eq!(
            TokenResolver::resolve("I"),
            Cell::Unitary(SingleQubitGate::I)
        );
    }

    #[test]
    fn test_resolve_roles() {
        assert_eq!(TokenResolver::resolve("Control"), Cell::Role(Role::Control));
        assert_eq!(TokenResolver::resolve("Target"), Cell::Role(Role::Target));
    }

    #[test]
    fn test_unknown_is_noop() {
        assert_eq!(TokenResolver::resolve("T"), Cell::Empty);
        assert_eq!(TokenResolver::resolve(""), Cell::Empty);
    }

    #[test]
    fn test_resolve_checked_lenient() {
        let mut log = AnomalyLog::new(ValidationPolicy::Lenient);
        let cell = TokenResolver::resolve_checked("Sdg", 2, 1, &mut log).unwrap();
        assert_eq!(cell, Cell::Empty);
        assert_eq!(
            log.entries(),
            &[Anomaly::UnknownGate {
                token: "Sdg".into(),
                qubit: 2,
                column: 1
            }]
        );
    }

    #[test]
    fn test_resolve_checked_strict() {
        let mut log = AnomalyLog::new(ValidationPolicy::Strict);
        assert!(TokenResolver::resolve_checked("Sdg", 0, 0, &mut log).is_err());
        assert!(TokenResolver::resolve_checked("Z", 0, 0, &mut log).is_ok());
    }

    #[test]
    fn test_empty_not_reported() {
        let mut log = AnomalyLog::new(ValidationPolicy::Strict);
        let cell = TokenResolver::resolve_checked("", 0, 0, &mut log).unwrap();
        assert_eq!(cell, Cell::Empty);
    }
}
