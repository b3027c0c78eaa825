//! Reference kernels and tolerance-based output verification.
//!
//! A [`KernelCheck`] couples a reference implementation with its ulp
//! budgets and input shape. Verification walks the input/output slices,
//! derives the acceptable interval per element, and returns every
//! violation as a structured record. Mismatches are data for the caller to
//! report; verification itself never panics on a bad output.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::float_interval::{FloatInterval, PrecisionMode, UlpBudget};

/// Widest vector the kernels operate on.
pub const MAX_VECTOR_WIDTH: usize = 4;

// ---------------------------------------------------------------------------
// Kernels
// ---------------------------------------------------------------------------

/// Math kernels the conformance layer can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelOp {
    /// Approximate Euclidean vector length: one output per input vector.
    FastLength,
    /// Approximate elementwise base-10 logarithm.
    NativeLog10,
}

impl KernelOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FastLength => "fast_length",
            Self::NativeLog10 => "native_log10",
        }
    }

    /// Outputs produced per input vector of the given width.
    #[must_use]
    pub const fn outputs_per_vector(self, vector_width: usize) -> usize {
        match self {
            Self::FastLength => 1,
            Self::NativeLog10 => vector_width,
        }
    }
}

impl fmt::Display for KernelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference Euclidean length, widened to f64 so the reference stays well
/// clear of the tolerance it polices.
#[must_use]
pub fn fast_length_reference(v: &[f32]) -> f32 {
    let sum: f64 = v.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    sum.sqrt() as f32
}

/// Reference base-10 logarithm, widened to f64.
#[must_use]
pub fn native_log10_reference(v: f32) -> f32 {
    f64::from(v).log10() as f32
}

// ---------------------------------------------------------------------------
// Verification records
// ---------------------------------------------------------------------------

/// One output element that fell outside its tolerance interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelMismatch {
    pub element: usize,
    pub inputs: Vec<f32>,
    pub actual: f32,
    pub expected_min: f32,
    pub expected_max: f32,
}

impl fmt::Display for KernelMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {}: inputs [", self.element)?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{input:e}")?;
        }
        write!(
            f,
            "], output {:e} outside [{:e}, {:e}]",
            self.actual, self.expected_min, self.expected_max
        )
    }
}

/// Malformed verification input shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum KernelShapeError {
    #[error("vector width {width} is out of range (1..={MAX_VECTOR_WIDTH})")]
    WidthOutOfRange { width: usize },
    #[error("input length {len} is not a multiple of vector width {width}")]
    InputNotMultipleOfWidth { len: usize, width: usize },
    #[error("expected {expected} output elements, got {actual}")]
    OutputLengthMismatch { expected: usize, actual: usize },
}

/// Artifact of one verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelCheckReport {
    pub op: KernelOp,
    pub precision: PrecisionMode,
    pub elements_checked: usize,
    pub mismatches: Vec<KernelMismatch>,
}

impl KernelCheckReport {
    #[must_use]
    pub fn pass(&self) -> bool {
        self.mismatches.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// A kernel bound to its tolerance budget and input shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelCheck {
    pub op: KernelOp,
    pub vector_width: usize,
    pub budget: UlpBudget,
}

impl KernelCheck {
    #[must_use]
    pub const fn new(op: KernelOp, vector_width: usize, budget: UlpBudget) -> Self {
        Self {
            op,
            vector_width,
            budget,
        }
    }

    /// `fast_length` with the suite's canonical budgets.
    #[must_use]
    pub const fn fast_length(vector_width: usize) -> Self {
        Self::new(KernelOp::FastLength, vector_width, UlpBudget::new(4.0, 128.0))
    }

    /// `native_log10` with the suite's canonical budgets.
    #[must_use]
    pub const fn native_log10(vector_width: usize) -> Self {
        Self::new(KernelOp::NativeLog10, vector_width, UlpBudget::new(16.0, 128.0))
    }

    /// Verify kernel outputs against the reference implementation.
    ///
    /// `inputs` holds the flattened input vectors; `outputs` holds the
    /// kernel's results in the same element order.
    pub fn verify(
        &self,
        inputs: &[f32],
        outputs: &[f32],
        mode: PrecisionMode,
    ) -> Result<KernelCheckReport, KernelShapeError> {
        if self.vector_width == 0 || self.vector_width > MAX_VECTOR_WIDTH {
            return Err(KernelShapeError::WidthOutOfRange {
                width: self.vector_width,
            });
        }
        if inputs.len() % self.vector_width != 0 {
            return Err(KernelShapeError::InputNotMultipleOfWidth {
                len: inputs.len(),
                width: self.vector_width,
            });
        }
        let vectors = inputs.len() / self.vector_width;
        let expected_outputs = vectors * self.op.outputs_per_vector(self.vector_width);
        if outputs.len() != expected_outputs {
            return Err(KernelShapeError::OutputLengthMismatch {
                expected: expected_outputs,
                actual: outputs.len(),
            });
        }

        let tolerance = self.budget.for_mode(mode);
        let mut mismatches = Vec::new();
        match self.op {
            KernelOp::FastLength => {
                for (element, chunk) in inputs.chunks(self.vector_width).enumerate() {
                    let interval =
                        FloatInterval::around(fast_length_reference(chunk), tolerance);
                    let actual = outputs[element];
                    if !interval.could_be(actual) {
                        mismatches.push(KernelMismatch {
                            element,
                            inputs: chunk.to_vec(),
                            actual,
                            expected_min: interval.min(),
                            expected_max: interval.max(),
                        });
                    }
                }
            }
            KernelOp::NativeLog10 => {
                for (element, (&input, &actual)) in inputs.iter().zip(outputs).enumerate() {
                    let interval =
                        FloatInterval::around(native_log10_reference(input), tolerance);
                    if !interval.could_be(actual) {
                        mismatches.push(KernelMismatch {
                            element,
                            inputs: vec![input],
                            actual,
                            expected_min: interval.min(),
                            expected_max: interval.max(),
                        });
                    }
                }
            }
        }

        Ok(KernelCheckReport {
            op: self.op,
            precision: mode,
            elements_checked: outputs.len(),
            mismatches,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
