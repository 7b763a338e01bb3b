//! Human-readable state rendering
//!
//! Gantree: L6_Backend → Formatter
//!
//! Renders a [`StateResult`] as a sum of kets, e.g.
//! `\frac{1}{\sqrt{2}}\left|00\right\rangle + \frac{1}{\sqrt{2}}\left|11\right\rangle`.
//! Magnitudes of the form `1/√(2^k)` are written as exact fractions;
//! anything else falls back to decimals.

use crate::engine::StateResult;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// LaTeX math
    #[default]
    Latex,
    /// Unicode text
    Plain,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Latex => write!(f, "latex"),
            RenderMode::Plain => write!(f, "plain"),
        }
    }
}

/// Turns an extracted state into text
/// Gantree: Formatter // render(state, mode)
pub trait Formatter: Send + Sync {
    /// Render a state
    fn render(&self, state: &StateResult, mode: RenderMode) -> String;
}

/// Ket-notation formatter
#[derive(Debug, Clone)]
pub struct KetFormatter {
    /// Decimal places for magnitudes that are not exact fractions
    precision: usize,

    /// Relative tolerance for recognizing `1`, `1/√(2^k)`, and zero parts
    tolerance: f64,
}

impl KetFormatter {
    /// Largest `k` tried when matching `1/√(2^k)`
    const MAX_SQRT2_POWER: u32 = 64;

    /// Create with 4 decimals
    pub fn new() -> Self {
        Self {
            precision: 4,
            tolerance: 1e-9,
        }
    }

    /// Set decimal places
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Set recognition tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance * b.abs().max(1.0)
    }

    /// Magnitude text; empty for exactly 1
    fn magnitude(&self, m: f64, mode: RenderMode) -> String {
        if self.is_close(m, 1.0) {
            return String::new();
        }
        for k in 1..=Self::MAX_SQRT2_POWER {
            let expected = 0.5_f64.powf(k as f64 / 2.0);
            if (m - expected).abs() <= self.tolerance * expected {
                return sqrt2_fraction(k, mode);
            }
        }
        trim_decimal(format!("{:.*}", self.precision, m))
    }

    /// Coefficient text and whether it is negative
    fn coefficient(&self, a: Complex64, mode: RenderMode) -> (String, bool) {
        let re_zero = a.re.abs() <= self.tolerance;
        let im_zero = a.im.abs() <= self.tolerance;

        if im_zero {
            return (self.magnitude(a.re.abs(), mode), a.re < 0.0);
        }
        if re_zero {
            let m = self.magnitude(a.im.abs(), mode);
            return (format!("{}i", m), a.im < 0.0);
        }

        let sign = if a.im < 0.0 { "-" } else { "+" };
        let text = format!(
            "{}{}{}i",
            trim_decimal(format!("{:.*}", self.precision, a.re)),
            sign,
            trim_decimal(format!("{:.*}", self.precision, a.im.abs()))
        );
        let wrapped = match mode {
            RenderMode::Latex => format!("\\left({}\\right)", text),
            RenderMode::Plain => format!("({})", text),
        };
        (wrapped, false)
    }
}

impl Default for KetFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for KetFormatter {
    fn render(&self, state: &StateResult, mode: RenderMode) -> String {
        let mut out = String::new();
        for (n, (label, amplitude)) in state.labelled().enumerate() {
            let (coefficient, negative) = self.coefficient(amplitude, mode);
            match (n, negative) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            out.push_str(&coefficient);
            out.push_str(&ket(&label, mode));
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

fn ket(label: &str, mode: RenderMode) -> String {
    match mode {
        RenderMode::Latex => format!("\\left|{}\\right\\rangle", label),
        RenderMode::Plain => format!("|{}\u{27e9}", label),
    }
}

/// `1/√(2^k)` written as `1/(2^a √2^b)` with `k = 2a + b`
fn sqrt2_fraction(k: u32, mode: RenderMode) -> String {
    let whole = 1u128 << (k / 2);
    let has_root = k % 2 == 1;
    match (mode, whole, has_root) {
        (RenderMode::Latex, 1, _) => "\\frac{1}{\\sqrt{2}}".to_string(),
        (RenderMode::Latex, w, false) => format!("\\frac{{1}}{{{}}}", w),
        (RenderMode::Latex, w, true) => format!("\\frac{{1}}{{{}\\sqrt{{2}}}}", w),
        (RenderMode::Plain, 1, _) => "1/\u{221a}2".to_string(),
        (RenderMode::Plain, w, false) => format!("1/{}", w),
        (RenderMode::Plain, w, true) => format!("1/({}\u{221a}2)", w),
    }
}

fn trim_decimal(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ============================================================================
// Tests
// ============================================================================
