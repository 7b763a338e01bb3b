//! # ketgrid Backend
//!
//! Simulation engine and state formatter for ketgrid.
//!
//! ## Gantree Architecture
//!
//! ```text
//! ketgrid_backend // L6: Backend
//!     EngineTrait // SimulationEngine, StateResult
//!     StateVectorEngine // dense 2^n amplitudes
//!     Formatter // KetFormatter, RenderMode
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ketgrid_backend::prelude::*;
//! use ketgrid_core::SingleQubitGate;
//!
//! let engine = StateVectorEngine::new();
//! let mut register = engine.allocate(2).unwrap();
//! engine.apply(&mut register, SingleQubitGate::H, 0).unwrap();
//! engine.apply_controlled_x(&mut register, &[0], &[1]).unwrap();
//!
//! let state = engine.dump(&register).unwrap();
//! println!("{}", KetFormatter::new().render(&state, RenderMode::Plain));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Engine trait and extracted state (Gantree: L6_Backend → EngineTrait)
pub mod engine;

/// State-vector engine (Gantree: L6_Backend → StateVectorEngine)
pub mod state_vector;

/// State rendering (Gantree: L6_Backend → Formatter)
pub mod formatter;

// ============================================================================
// Re-exports
// ============================================================================

pub use engine::{amplitude_text, SimulationEngine, StateResult};
pub use formatter::{Formatter, KetFormatter, RenderMode};
pub use state_vector::{StateVector, StateVectorEngine};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use ketgrid_backend::prelude::*;
    //! ```

    pub use crate::engine::{SimulationEngine, StateResult};
    pub use crate::formatter::{Formatter, KetFormatter, RenderMode};
    pub use crate::state_vector::{StateVector, StateVectorEngine};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;
    use ketgrid_core::SingleQubitGate;

    #[test]
    fn test_ghz_render() {
        let engine = StateVectorEngine::new();
        let mut reg = engine.allocate(3).unwrap();
        engine.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        engine.apply_controlled_x(&mut reg, &[0], &[1, 2]).unwrap();

        let state = engine.dump(&reg).unwrap();
        assert_eq!(state.len(), 2);
        assert_relative_eq!(state.probability("000"), 0.5, epsilon = 1e-12);
        assert_relative_eq!(state.probability("111"), 0.5, epsilon = 1e-12);

        let text = KetFormatter::new().render(&state, RenderMode::Plain);
        assert_eq!(text, "1/\u{221a}2|000\u{27e9} + 1/\u{221a}2|111\u{27e9}");
    }

    #[test]
    fn test_uniform_superposition_render() {
        let engine = StateVectorEngine::new();
        let mut reg = engine.allocate(2).unwrap();
        engine.apply(&mut reg, SingleQubitGate::H, 0).unwrap();
        engine.apply(&mut reg, SingleQubitGate::H, 1).unwrap();

        let state = engine.dump(&reg).unwrap();
        assert_eq!(state.len(), 4);
        let text = KetFormatter::new().render(&state, RenderMode::Latex);
        assert_eq!(text.matches("\\frac{1}{2}").count(), 4);
    }

    #[test]
    fn test_normalization_preserved() {
        let engine = StateVectorEngine::new();
        let mut reg = engine.allocate(3).unwrap();
        for (gate, q) in [
            (SingleQubitGate::H, 0),
            (SingleQubitGate::Y, 1),
            (SingleQubitGate::H, 2),
            (SingleQubitGate::Z, 0),
        ] {
            engine.apply(&mut reg, gate, q).unwrap();
        }
        engine.apply_controlled_x(&mut reg, &[0, 2], &[1]).unwrap();

        let state = engine.dump(&reg).unwrap();
        assert_relative_eq!(state.total_probability(), 1.0, epsilon = 1e-12);
    }
}
