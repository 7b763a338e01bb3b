//! Request and response payloads
//!
//! Gantree: L0_Foundation → Payload
//!
//! Request body:
//!
//! ```text
//! {
//!   "qubits": { "<id>": ["q<n>", "0"|"1"], ... },
//!   "gates":  { "<column>": [ {"qubit": "q<n>", "type": "<token>"}, ... ], ... }
//! }
//! ```
//!
//! Both objects are read in insertion order. Column keys and qubit
//! references stay unparsed here; the grid normalizer owns that step.

use crate::error::{KetError, KetResult};
use crate::types::{parse_bit, InitialState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============================================================================
// Request Pieces
// ============================================================================

/// One row declaration from the `qubits` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitEntry {
    /// Object key
    pub id: String,
    /// Display label (`value[0]`)
    pub label: String,
    /// Initial bit (`value[1]`)
    pub initial: bool,
}

/// Qubit reference inside a gate placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QubitRef {
    /// Bare JSON integer
    Index(i64),
    /// Text such as "q3" or "3"
    Label(String),
}

impl QubitRef {
    /// Parse to a (possibly out-of-range) row index
    pub fn index(&self) -> KetResult<i64> {
        match self {
            QubitRef::Index(i) => Ok(*i),
            QubitRef::Label(text) => {
                let trimmed = text.trim();
                let digits = trimmed.strip_prefix('q').unwrap_or(trimmed);
                digits
                    .parse::<i64>()
                    .map_err(|_| KetError::InvalidQubitRef(text.clone()))
            }
        }
    }
}

impl From<&str> for QubitRef {
    fn from(s: &str) -> Self {
        QubitRef::Label(s.to_string())
    }
}

/// One gate placement inside a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePlacement {
    /// Row reference
    pub qubit: QubitRef,
    /// Gate name as typed in the editor
    #[serde(rename = "type")]
    pub gate: String,
}

/// Placements declared under one column key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    /// Column key, unparsed
    pub key: String,
    /// Placements in payload order
    pub placements: Vec<GatePlacement>,
}

// ============================================================================
// CircuitRequest
// ============================================================================

/// Parsed request body
/// Gantree: CircuitRequest // request payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitRequest {
    qubits: Vec<QubitEntry>,
    gates: Vec<ColumnEntry>,
}

impl CircuitRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON request body
    pub fn from_json(body: &str) -> KetResult<Self> {
        if body.trim().is_empty() {
            return Err(KetError::EmptyPayload);
        }
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Build from an already-decoded JSON value
    ///
    /// `null` and `{}` count as "no data sent".
    pub fn from_value(value: Value) -> KetResult<Self> {
        let object = match value {
            Value::Null => return Err(KetError::EmptyPayload),
            Value::Object(map) if map.is_empty() => return Err(KetError::EmptyPayload),
            Value::Object(map) => map,
            other => {
                return Err(KetError::InvalidPayload(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let qubits = match object.get("qubits") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(id, v)| parse_qubit_entry(id, v))
                .collect::<KetResult<Vec<_>>>()?,
            Some(other) => {
                return Err(KetError::InvalidPayload(format!(
                    "'qubits' must be an object, got {}",
                    json_kind(other)
                )))
            }
        };

        let gates = match object.get("gates") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, v)| parse_column_entry(key, v))
                .collect::<KetResult<Vec<_>>>()?,
            Some(other) => {
                return Err(KetError::InvalidPayload(format!(
                    "'gates' must be an object, got {}",
                    json_kind(other)
                )))
            }
        };

        Ok(Self { qubits, gates })
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Append a qubit row labelled `q<n>` with the given initial bit
    pub fn qubit(mut self, initial: bool) -> Self {
        let n = self.qubits.len();
        self.qubits.push(QubitEntry {
            id: format!("q{}", n),
            label: format!("q{}", n),
            initial,
        });
        self
    }

    /// Append `n` ground-state qubit rows
    pub fn qubits(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.qubit(false);
        }
        self
    }

    /// Append a placement to a column (column key is its decimal text)
    pub fn gate(mut self, column: i64, qubit: impl Into<QubitRef>, gate: &str) -> Self {
        let key = column.to_string();
        let placement = GatePlacement {
            qubit: qubit.into(),
            gate: gate.to_string(),
        };
        match self.gates.iter_mut().find(|c| c.key == key) {
            Some(entry) => entry.placements.push(placement),
            None => self.gates.push(ColumnEntry {
                key,
                placements: vec![placement],
            }),
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Qubit rows in declaration order
    pub fn qubit_entries(&self) -> &[QubitEntry] {
        &self.qubits
    }

    /// Column entries in declaration order
    pub fn columns(&self) -> &[ColumnEntry] {
        &self.gates
    }

    /// Register size
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Initial basis state, one bit per declared row
    pub fn initial_state(&self) -> InitialState {
        InitialState::new(self.qubits.iter().map(|q| q.initial).collect())
    }

    /// Encode back into the wire format
    pub fn to_value(&self) -> Value {
        let mut qubits = Map::new();
        for q in &self.qubits {
            let bit = if q.initial { "1" } else { "0" };
            qubits.insert(q.id.clone(), serde_json::json!([q.label, bit]));
        }
        let mut gates = Map::new();
        for column in &self.gates {
            gates.insert(
                column.key.clone(),
                serde_json::to_value(&column.placements).unwrap_or(Value::Null),
            );
        }
        serde_json::json!({ "qubits": qubits, "gates": gates })
    }
}

fn parse_qubit_entry(id: &str, value: &Value) -> KetResult<QubitEntry> {
    let items = value.as_array().ok_or_else(|| {
        KetError::InvalidPayload(format!("qubit '{}' must be a [label, bit] array", id))
    })?;
    if items.len() < 2 {
        return Err(KetError::InvalidPayload(format!(
            "qubit '{}' must be a [label, bit] array",
            id
        )));
    }
    let label = match &items[0] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let bit_text = match &items[1] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    Ok(QubitEntry {
        id: id.to_string(),
        label,
        initial: parse_bit(id, &bit_text)?,
    })
}

fn parse_column_entry(key: &str, value: &Value) -> KetResult<ColumnEntry> {
    let placements: Vec<GatePlacement> = serde_json::from_value(value.clone())
        .map_err(|e| KetError::InvalidPayload(format!("column '{}': {}", key, e)))?;
    Ok(ColumnEntry {
        key: key.to_string(),
        placements,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// StateResponse
// ============================================================================

/// Response body: amplitudes by basis label plus a rendered state
/// Gantree: StateResponse // response payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    /// Basis label → amplitude text
    pub state: BTreeMap<String, String>,
    /// Rendered state
    pub latex: String,
}

impl StateResponse {
    /// Encode as a JSON string
    pub fn to_json(&self) -> KetResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
