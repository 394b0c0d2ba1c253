/**
 * File: /src/error.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026 3:12:40 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */
use thiserror::Error;

/// Errors surfaced while scoring a factorization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("shape mismatch in {context}: {left:?} vs {right:?}")]
    ShapeMismatch {
        context: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error(
        "reconstruction is non-positive at ({row}, {col}): original {original}, approx {approx}"
    )]
    NumericSingularity {
        row: usize,
        col: usize,
        original: f64,
        approx: f64,
    },

    #[error("bit width must be positive, got {0}")]
    InvalidBitWidth(u32),

    #[error("{axis} labels: expected {expected}, found {found}")]
    LabelMismatch {
        axis: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("clamp epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f64),

    #[error("unknown singularity policy: {0}")]
    InvalidPolicy(String),
}
