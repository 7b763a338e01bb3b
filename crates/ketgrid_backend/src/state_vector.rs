//! Dense state-vector engine
//!
//! Gantree: L6_Backend → StateVectorEngine
//!
//! Reference [`SimulationEngine`]: a full `2^n` amplitude vector per
//! register, gates applied in place. Qubit 0 is the most significant bit
//! of the basis index so that basis labels read left to right by row.

use crate::engine::{SimulationEngine, StateResult};
use ketgrid_core::{KetError, KetResult, QubitIndex, SingleQubitGate};
use log::debug;
use num_complex::Complex64;
use std::collections::HashSet;
use std::f64::consts::FRAC_1_SQRT_2;

/// Default register size limit
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Default magnitude below which amplitudes are left out of a dump
pub const DEFAULT_AMPLITUDE_THRESHOLD: f64 = 1e-10;

/// Register owned by one execution
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Ground state `|0…0⟩`
    ///
    /// Fails when `2^num_qubits` amplitudes cannot be addressed.
    pub(crate) fn ground(num_qubits: usize) -> KetResult<Self> {
        let len = u32::try_from(num_qubits)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .filter(|len| {
                len.checked_mul(std::mem::size_of::<Complex64>())
                    .map_or(false, |bytes| bytes <= isize::MAX as usize)
            })
            .ok_or_else(|| {
                KetError::SimulationError(format!(
                    "register of {} qubits is not addressable",
                    num_qubits
                ))
            })?;

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); len];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Register size
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Raw amplitudes by basis index
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Bit mask of a qubit (qubit 0 = MSB)
    fn mask(&self, qubit: QubitIndex) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    fn check_qubit(&self, qubit: QubitIndex) -> KetResult<()> {
        if qubit >= self.num_qubits {
            return Err(KetError::RegisterIndexOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn apply_single_qubit_gate<F>(&mut self, qubit: QubitIndex, f: F)
    where
        F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
    {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (new_i, new_j) = f(self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = new_i;
                self.amplitudes[j] = new_j;
            }
        }
    }
}

/// State-vector simulation engine
/// Gantree: StateVectorEngine // reference engine
#[derive(Debug, Clone)]
pub struct StateVectorEngine {
    /// Engine name
    name: String,

    /// Largest register `allocate` accepts
    max_qubits: usize,

    /// Magnitude below which `dump` drops an amplitude
    threshold: f64,
}

impl StateVectorEngine {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with default limits
    pub fn new() -> Self {
        Self {
            name: "ketgrid_state_vector".to_string(),
            max_qubits: DEFAULT_MAX_QUBITS,
            threshold: DEFAULT_AMPLITUDE_THRESHOLD,
        }
    }

    /// Set register size limit
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set dump threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set engine name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Register size limit
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Dump threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for StateVectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine for StateVectorEngine {
    type Register = StateVector;

    fn name(&self) -> &str {
        &self.name
    }

    fn allocate(&self, num_qubits: usize) -> KetResult<StateVector> {
        if num_qubits > self.max_qubits {
            return Err(KetError::TooManyQubits {
                requested: num_qubits,
                max: self.max_qubits,
            });
        }
        debug!("{}: allocated {} qubits", self.name, num_qubits);
        StateVector::ground(num_qubits)
    }

    fn apply(
        &self,
        register: &mut StateVector,
        gate: SingleQubitGate,
        qubit: QubitIndex,
    ) -> KetResult<()> {
        register.check_qubit(qubit)?;
        let i = Complex64::new(0.0, 1.0);
        match gate {
            SingleQubitGate::X => register.apply_single_qubit_gate(qubit, |a, b| (b, a)),
            SingleQubitGate::Y => register.apply_single_qubit_gate(qubit, |a, b| (-i * b, i * a)),
            SingleQubitGate::Z => register.apply_single_qubit_gate(qubit, |a, b| (a, -b)),
            SingleQubitGate::H => register.apply_single_qubit_gate(qubit, |a, b| {
                ((a + b) * FRAC_1_SQRT_2, (a - b) * FRAC_1_SQRT_2)
            }),
            SingleQubitGate::I => {}
        }
        Ok(())
    }

    fn apply_controlled_x(
        &self,
        register: &mut StateVector,
        controls: &[QubitIndex],
        targets: &[QubitIndex],
    ) -> KetResult<()> {
        let mut seen = HashSet::new();
        for &q in controls.iter().chain(targets) {
            register.check_qubit(q)?;
            if !seen.insert(q) {
                return Err(KetError::OverlappingQubits { qubit: q });
            }
        }
        if targets.is_empty() {
            return Err(KetError::SimulationError(
                "controlled X requires at least one target".to_string(),
            ));
        }

        let control_mask = controls.iter().fold(0, |m, &q| m | register.mask(q));
        let target_mask = targets.iter().fold(0, |m, &q| m | register.mask(q));
        // Each flipped pair is visited once, from the side whose first target bit is clear
        let pivot = register.mask(targets[0]);

        for i in 0..register.amplitudes.len() {
            if i & control_mask == control_mask && i & pivot == 0 {
                register.amplitudes.swap(i, i ^ target_mask);
            }
        }
        Ok(())
    }

    fn dump(&self, register: &StateVector) -> KetResult<StateResult> {
        let amplitudes = register
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm() > self.threshold)
            .map(|(i, a)| (i, *a))
            .collect::<Vec<_>>();
        debug!(
            "{}: dumped {} of {} amplitudes",
            self.name,
            amplitudes.len(),
            register.amplitudes.len()
        );
        Ok(StateResult::new(register.num_qubits, amplitudes))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> StateVectorEngine {
        StateVectorEngine::new()
    }

    #[test]
    fn test_unaddressable_register_rejected() {
        let e = engine().with_max_qubits(usize::MAX);
        for n in [60, 64, 200] {
            let err = e.allocate(n).unwrap_err();
            assert!(err.is_simulation_error(), "{} -> {:?}", n, err);
        }
        assert!(StateVector::ground(64).is_err());
    }

    #[test]
    fn test_ground_state_dump() {
        let e = engine();
        let reg = e.allocate(3).unwrap();
        let state = e.dump(&reg).unwrap();
        assert_eq!(state.len(), 1);
        assert_relative_eq!(state.amplitude("000").re, 1.0);
    }

    #[test]
    fn test_x_on_qubit_zero_sets_leftmost_bit() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        e.apply(&mut reg, SingleQubitGate::X, 0).unwrap();
        let state = e.dump(&reg).unwrap();
        assert_relative_eq!(state.probability("10"), 1.0);
    }

    #[test]
    fn test_hadamard_superposition() {
        let e = engine();
        let mut reg = e.allocate(1).unwrap();
        e.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        let state = e.dump(&reg).unwrap();
        assert_relative_eq!(state.amplitude("0").re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(state.amplitude("1").re, FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_hzh_is_x() {
        let e = engine();
        let mut reg = e.allocate(1).unwrap();
        e.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        e.apply(&mut reg, SingleQubitGate::Z, 0).unwrap();
        e.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        let state = e.dump(&reg).unwrap();
        assert_eq!(state.len(), 1);
        assert_relative_eq!(state.probability("1"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_y_phase() {
        // Y|0> = i|1>
        let e = engine();
        let mut reg = e.allocate(1).unwrap();
        e.apply(&mut reg, SingleQubitGate::Y, 0).unwrap();
        let amp = e.dump(&reg).unwrap().amplitude("1");
        assert_relative_eq!(amp.re, 0.0);
        assert_relative_eq!(amp.im, 1.0);
    }

    #[test]
    fn test_identity_is_noop() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        let before = reg.clone();
        e.apply(&mut reg, SingleQubitGate::I, 1).unwrap();
        assert_eq!(reg, before);
    }

    #[test]
    fn test_bell_pair() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        e.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        e.apply_controlled_x(&mut reg, &[0], &[1]).unwrap();
        let state = e.dump(&reg).unwrap();
        assert_eq!(state.len(), 2);
        assert_relative_eq!(state.amplitude("00").re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(state.amplitude("11").re, FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_toffoli() {
        let e = engine();
        let mut reg = e.allocate(3).unwrap();
        e.apply_controlled_x(&mut reg, &[0, 1], &[2]).unwrap();
        assert_relative_eq!(e.dump(&reg).unwrap().probability("000"), 1.0);

        e.apply(&mut reg, SingleQubitGate::X, 0).unwrap();
        e.apply(&mut reg, SingleQubitGate::X, 1).unwrap();
        e.apply_controlled_x(&mut reg, &[0, 1], &[2]).unwrap();
        assert_relative_eq!(e.dump(&reg).unwrap().probability("111"), 1.0);
    }

    #[test]
    fn test_multiple_targets_flip_together() {
        let e = engine();
        let mut reg = e.allocate(3).unwrap();
        e.apply(&mut reg, SingleQubitGate::X, 1).unwrap();
        e.apply_controlled_x(&mut reg, &[1], &[0, 2]).unwrap();
        assert_relative_eq!(e.dump(&reg).unwrap().probability("111"), 1.0);
    }

    #[test]
    fn test_no_controls_is_plain_x() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        e.apply_controlled_x(&mut reg, &[], &[1]).unwrap();
        assert_relative_eq!(e.dump(&reg).unwrap().probability("01"), 1.0);
    }

    #[test]
    fn test_overlapping_rejected() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        let err = e.apply_controlled_x(&mut reg, &[0], &[0]).unwrap_err();
        assert_eq!(err, KetError::OverlappingQubits { qubit: 0 });
        assert!(err.is_simulation_error());
    }

    #[test]
    fn test_empty_targets_rejected() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        assert!(e.apply_controlled_x(&mut reg, &[0], &[]).is_err());
    }

    #[test]
    fn test_index_out_of_range() {
        let e = engine();
        let mut reg = e.allocate(2).unwrap();
        assert!(matches!(
            e.apply(&mut reg, SingleQubitGate::X, 2),
            Err(KetError::RegisterIndexOutOfRange { qubit: 2, .. })
        ));
    }

    #[test]
    fn test_allocation_limit() {
        let e = engine().with_max_qubits(4);
        assert!(e.allocate(4).is_ok());
        assert_eq!(
            e.allocate(5).unwrap_err(),
            KetError::TooManyQubits {
                requested: 5,
                max: 4
            }
        );
    }

    #[test]
    fn test_threshold_filters_dump() {
        let e = engine().with_threshold(0.9);
        let mut reg = e.allocate(1).unwrap();
        e.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        assert!(e.dump(&reg).unwrap().is_empty());
    }

    #[test]
    fn test_zero_qubit_register() {
        let e = engine();
        let reg = e.allocate(0).unwrap();
        let state = e.dump(&reg).unwrap();
        assert_eq!(state.len(), 1);
        assert_relative_eq!(state.probability(""), 1.0);
    }
}
