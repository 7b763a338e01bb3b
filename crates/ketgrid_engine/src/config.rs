//! Engine configuration for ketgrid
//!
//! Gantree: L7_Integration → EngineConfig
//!
//! One configuration for the request pipeline: anomaly policy, rendering,
//! amplitude filtering, and register limits.

use ketgrid_backend::state_vector::{DEFAULT_AMPLITUDE_THRESHOLD, DEFAULT_MAX_QUBITS};
use ketgrid_backend::{RenderMode, StateVectorEngine};
use ketgrid_core::{AnomalyLog, KetError, KetResult, ValidationPolicy, DEFAULT_MAX_COLUMNS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline configuration
/// Gantree: EngineConfig // unified settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // ========================================================================
    // Validation
    // ========================================================================
    /// How out-of-range references, unknown tokens, and unpaired roles are
    /// handled
    pub policy: ValidationPolicy,

    // ========================================================================
    // Output
    // ========================================================================
    /// Notation for the rendered state
    pub render_mode: RenderMode,

    /// Amplitudes with magnitude at or below this are left out
    pub amplitude_threshold: f64,

    /// Decimal places for amplitude text; `None` prints the shortest exact form
    pub precision: Option<usize>,

    // ========================================================================
    // Limits
    // ========================================================================
    /// Largest register a request may allocate
    pub max_qubits: usize,

    /// Widest grid a request may declare
    pub max_columns: usize,

    /// Print stage progress to stdout
    pub verbose: bool,
}

impl EngineConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Lenient policy, LaTeX output
    pub fn lenient() -> Self {
        Self {
            policy: ValidationPolicy::Lenient,
            render_mode: RenderMode::Latex,
            amplitude_threshold: DEFAULT_AMPLITUDE_THRESHOLD,
            precision: None,
            max_qubits: DEFAULT_MAX_QUBITS,
            max_columns: DEFAULT_MAX_COLUMNS,
            verbose: false,
        }
    }

    /// Fail on the first anomaly
    pub fn strict() -> Self {
        Self {
            policy: ValidationPolicy::Strict,
            ..Self::lenient()
        }
    }

    /// Load from JSON; missing fields take their defaults
    pub fn from_json(text: &str) -> KetResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> KetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set anomaly policy
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set render notation
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Set amplitude cutoff
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.amplitude_threshold = threshold;
        self
    }

    /// Set fixed decimal places for amplitude text
    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = Some(digits);
        self
    }

    /// Set register limit
    pub fn with_max_qubits(mut self, n: usize) -> Self {
        self.max_qubits = n;
        self
    }

    /// Set grid width limit
    pub fn with_max_columns(mut self, n: usize) -> Self {
        self.max_columns = n;
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Fresh anomaly log for one request
    pub fn anomaly_log(&self) -> AnomalyLog {
        AnomalyLog::new(self.policy)
    }

    /// State-vector engine honoring the limits
    pub fn to_engine(&self) -> StateVectorEngine {
        StateVectorEngine::new()
            .with_max_qubits(self.max_qubits)
            .with_threshold(self.amplitude_threshold)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> KetResult<()> {
        if !self.amplitude_threshold.is_finite() || self.amplitude_threshold < 0.0 {
            return Err(KetError::ConfigError(format!(
                "amplitude_threshold must be finite and >= 0, got {}",
                self.amplitude_threshold
            )));
        }

        if self.amplitude_threshold >= 1.0 {
            return Err(KetError::ConfigError(format!(
                "amplitude_threshold must be < 1, got {}",
                self.amplitude_threshold
            )));
        }

        // 2^n complex amplitudes must stay addressable
        if self.max_qubits >= usize::BITS as usize {
            return Err(KetError::ConfigError(format!(
                "max_qubits must be < {}, got {}",
                usize::BITS,
                self.max_qubits
            )));
        }

        if self.max_columns == 0 {
            return Err(KetError::ConfigError("max_columns must be > 0".to_string()));
        }

        if let Some(digits) = self.precision {
            if digits > 17 {
                return Err(KetError::ConfigError(format!(
                    "precision must be <= 17, got {}",
                    digits
                )));
            }
        }

        Ok(())
    }

    /// Check if anomalies fail the request
    pub fn is_strict(&self) -> bool {
        self.policy == ValidationPolicy::Strict
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EngineConfig({}, {}, threshold={:e}, max_qubits={}, max_columns={})",
            self.policy,
            self.render_mode,
            self.amplitude_threshold,
            self.max_qubits,
            self.max_columns
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        let config = EngineConfig::default();
        assert_eq!(config.policy, ValidationPolicy::Lenient);
        assert_eq!(config.render_mode, RenderMode::Latex);
        assert_eq!(config.precision, None);
        assert_eq!(config.max_qubits, 20);
        assert_eq!(config.max_columns, DEFAULT_MAX_COLUMNS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_preset() {
        let config = EngineConfig::strict();
        assert!(config.is_strict());
        assert_eq!(config.anomaly_log().policy(), ValidationPolicy::Strict);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_render_mode(RenderMode::Plain)
            .with_precision(4)
            .with_max_qubits(8)
            .with_max_columns(16)
            .with_verbose(true);
        assert_eq!(config.render_mode, RenderMode::Plain);
        assert_eq!(config.precision, Some(4));
        assert_eq!(config.max_qubits, 8);
        assert_eq!(config.max_columns, 16);
        assert!(config.verbose);
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::default().with_threshold(-1.0).validate().is_err());
        assert!(EngineConfig::default().with_threshold(f64::NAN).validate().is_err());
        assert!(EngineConfig::default().with_max_qubits(64).validate().is_err());
        assert!(EngineConfig::default().with_precision(30).validate().is_err());
        assert!(EngineConfig::default().with_max_columns(0).validate().is_err());
    }

    #[test]
    fn test_json_partial() {
        let config = EngineConfig::from_json(r#"{"policy": "strict", "render_mode": "plain"}"#).unwrap();
        assert!(config.is_strict());
        assert_eq!(config.render_mode, RenderMode::Plain);
        assert_eq!(config.max_qubits, DEFAULT_MAX_QUBITS);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::strict().with_precision(6);
        let back = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_json_rejects_bad_config() {
        let err = EngineConfig::from_json(r#"{"amplitude_threshold": 2.0}"#).unwrap_err();
        assert!(matches!(err, KetError::ConfigError(_)));
    }
}
