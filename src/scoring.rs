/**
 * File: ./src/scoring.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026 10:21:07 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
**/
// src/scoring.rs
use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::matrix::{FactorModel, MatrixInput};

/// Floor used by `clamp` when no epsilon is given
pub const DEFAULT_CLAMP_EPSILON: f64 = 1e-12;

/// Bits per factor element when nothing else is configured
pub const DEFAULT_N_BITS: u32 = 8;

/// Description length of one candidate factorization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostPair {
    pub encoding_cost: f64,
    pub error_cost: f64,
}

impl CostPair {
    /// Total description length, the quantity compared across ranks
    pub fn total(&self) -> f64 {
        self.encoding_cost + self.error_cost
    }

    pub fn is_finite(&self) -> bool {
        self.encoding_cost.is_finite() && self.error_cost.is_finite()
    }
}

/// What to do when the reconstruction is zero or negative where V is not.
///
/// `Propagate` keeps the plain floating-point result (inf or NaN). `Clamp`
/// floors zero and negative values at `epsilon` but passes NaN through.
///
/// The serde form (`{"clamp":{"epsilon":..}}`) differs from the
/// `FromStr`/`Display` form (`clamp:<eps>`) used on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularityPolicy {
    #[default]
    Propagate,
    Clamp { epsilon: f64 },
    Fail,
}

impl SingularityPolicy {
    pub fn validate(&self) -> Result<(), ScoringError> {
        match *self {
            SingularityPolicy::Clamp { epsilon } if !(epsilon.is_finite() && epsilon > 0.0) => {
                Err(ScoringError::InvalidEpsilon(epsilon))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SingularityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SingularityPolicy::Propagate => write!(f, "propagate"),
            SingularityPolicy::Clamp { epsilon } => write!(f, "clamp:{}", epsilon),
            SingularityPolicy::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for SingularityPolicy {
    type Err = ScoringError;

    /// Accepts `propagate`, `fail`, `clamp` or `clamp:<epsilon>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => SingularityPolicy::Propagate,
            "fail" => SingularityPolicy::Fail,
            "clamp" => SingularityPolicy::Clamp {
                epsilon: DEFAULT_CLAMP_EPSILON,
            },
            other => match other.strip_prefix("clamp:") {
                Some(eps) => {
                    let epsilon = eps
                        .parse::<f64>()
                        .map_err(|_| ScoringError::InvalidPolicy(s.to_string()))?;
                    SingularityPolicy::Clamp { epsilon }
                }
                None => return Err(ScoringError::InvalidPolicy(s.to_string())),
            },
        };
        policy.validate()?;
        Ok(policy)
    }
}

/// Compute (encoding_cost, error_cost) for a factorization of `v`.
///
/// `v` may be a raw array or a `LabeledMatrix`; both give the same numbers.
/// Uses the propagating policy, so a zero in the reconstruction where `v` is
/// non-zero makes the error cost infinite.
pub fn compute_description_length_costs<'a>(
    v: impl Into<MatrixInput<'a>>,
    model: &FactorModel,
    n_bits: u32,
) -> Result<CostPair, ScoringError> {
    score_with_policy(v.into(), model, n_bits, SingularityPolicy::Propagate)
}

/// Fixed per-element cost: `n_bits * (|G| + |F|)`
///
/// The bit width is a whole number of bits; fractional widths are not supported.
pub fn compute_encoding_cost(model: &FactorModel, n_bits: u32) -> f64 {
    n_bits as f64 * model.element_count() as f64
}

/// Generalized KL divergence D(V || V_approx), as in section 2.3 of the RolX paper
pub fn compute_error_cost(
    v: ArrayView2<f64>,
    v_approx: ArrayView2<f64>,
) -> Result<f64, ScoringError> {
    compute_error_cost_with_policy(v, v_approx, SingularityPolicy::Propagate)
}

/// Same divergence as [`compute_error_cost`] with an explicit singularity policy
pub fn compute_error_cost_with_policy(
    v: ArrayView2<f64>,
    v_approx: ArrayView2<f64>,
    policy: SingularityPolicy,
) -> Result<f64, ScoringError> {
    if v.dim() != v_approx.dim() {
        return Err(ScoringError::ShapeMismatch {
            context: "error cost",
            left: v.dim(),
            right: v_approx.dim(),
        });
    }
    policy.validate()?;

    let mut kl_div = 0.0;
    for (((row, col), &orig), &approx) in v.indexed_iter().zip(v_approx.iter()) {
        // 0 * ln(0) is taken as 0
        if orig == 0.0 {
            continue;
        }
        let approx = match policy {
            SingularityPolicy::Propagate => approx,
            // NaN passes through unfloored
            SingularityPolicy::Clamp { .. } if approx.is_nan() => approx,
            SingularityPolicy::Clamp { epsilon } => approx.max(epsilon),
            SingularityPolicy::Fail => {
                if !(approx > 0.0) {
                    return Err(ScoringError::NumericSingularity {
                        row,
                        col,
                        original: orig,
                        approx,
                    });
                }
                approx
            }
        };
        kl_div += orig * (orig / approx).ln() - orig + approx;
    }

    if !kl_div.is_finite() {
        warn!("error cost is not finite ({}) under {} policy", kl_div, policy);
    }
    Ok(kl_div)
}

fn score_with_policy(
    v: MatrixInput<'_>,
    model: &FactorModel,
    n_bits: u32,
    policy: SingularityPolicy,
) -> Result<CostPair, ScoringError> {
    let v_orig = v.values();
    debug!(
        "scoring V {:?} against G {:?} x F {:?} (rank {}, {} bits)",
        v_orig.dim(),
        model.g.dim(),
        model.f.dim(),
        model.rank(),
        n_bits
    );

    let v_approx = model.reconstruct()?;
    let encoding_cost = compute_encoding_cost(model, n_bits);
    let error_cost = compute_error_cost_with_policy(v_orig, v_approx.view(), policy)?;
    trace!(
        "rank {}: encoding cost {}, error cost {}",
        model.rank(),
        encoding_cost,
        error_cost
    );

    Ok(CostPair {
        encoding_cost,
        error_cost,
    })
}

/// Scorer holding a bit width and a singularity policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptionLengthScorer {
    pub n_bits: u32,
    pub policy: SingularityPolicy,
}

impl Default for DescriptionLengthScorer {
    fn default() -> Self {
        Self {
            n_bits: DEFAULT_N_BITS,
            policy: SingularityPolicy::Propagate,
        }
    }
}

impl DescriptionLengthScorer {
    pub fn new(n_bits: u32) -> Result<Self, ScoringError> {
        if n_bits == 0 {
            return Err(ScoringError::InvalidBitWidth(n_bits));
        }
        Ok(Self {
            n_bits,
            ..Self::default()
        })
    }

    pub fn with_policy(mut self, policy: SingularityPolicy) -> Result<Self, ScoringError> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    pub fn score<'a>(
        &self,
        v: impl Into<MatrixInput<'a>>,
        model: &FactorModel,
    ) -> Result<CostPair, ScoringError> {
        score_with_policy(v.into(), model, self.n_bits, self.policy)
    }

    /// Score several candidate factorizations of the same matrix, in order
    pub fn score_all<'a>(
        &self,
        v: impl Into<MatrixInput<'a>>,
        models: &[FactorModel],
    ) -> Result<Vec<CostPair>, ScoringError> {
        let v = v.into();
        models.iter().map(|model| self.score(v, model)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn rank_one_model() -> FactorModel {
        FactorModel::new(array![[1.0], [3.0]], array![[1.0, 1.0]])
    }

    #[test]
    fn test_encoding_cost() {
        assert_eq!(compute_encoding_cost(&rank_one_model(), 8), 32.0);
        assert_eq!(compute_encoding_cost(&rank_one_model(), 0), 0.0);
    }

    #[test]
    fn test_error_cost_rank_one() {
        let v = array![[1.0, 2.0], [3.0, 4.0]];
        let v_approx = array![[1.0, 1.0], [3.0, 3.0]];
        let expected = 2.0 * 2.0_f64.ln() - 1.0 + 4.0 * (4.0_f64 / 3.0).ln() - 1.0;
        let cost = compute_error_cost(v.view(), v_approx.view()).unwrap();
        assert!((cost - expected).abs() < 1e-12);
        assert!((cost - 0.5370).abs() < 1e-4);
    }

    #[test]
    fn test_error_cost_skips_zero_entries() {
        let v = array![[0.0, 1.0]];
        let v_approx = array![[5.0, 1.0]];
        assert_eq!(compute_error_cost(v.view(), v_approx.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_error_cost_shape_mismatch() {
        let v = array![[1.0, 2.0]];
        let v_approx = array![[1.0], [2.0]];
        let err = compute_error_cost(v.view(), v_approx.view()).unwrap_err();
        assert_eq!(
            err,
            ScoringError::ShapeMismatch {
                context: "error cost",
                left: (1, 2),
                right: (2, 1)
            }
        );
    }

    #[test]
    fn test_propagate_gives_infinity() {
        let v = array![[2.0, 1.0]];
        let v_approx = array![[0.0, 1.0]];
        let cost = compute_error_cost(v.view(), v_approx.view()).unwrap();
        assert!(cost.is_infinite() && cost > 0.0);
    }

    #[test]
    fn test_propagate_negative_gives_nan() {
        let v = array![[2.0]];
        let v_approx = array![[-1.0]];
        let cost = compute_error_cost(v.view(), v_approx.view()).unwrap();
        assert!(cost.is_nan());
    }

    #[test]
    fn test_clamp_policy_is_finite() {
        let v = array![[2.0, 1.0]];
        let v_approx = array![[0.0, 1.0]];
        let epsilon = 1e-6;
        let cost = compute_error_cost_with_policy(
            v.view(),
            v_approx.view(),
            SingularityPolicy::Clamp { epsilon },
        )
        .unwrap();
        let expected = 2.0 * (2.0 / epsilon).ln() - 2.0 + epsilon;
        assert!(cost.is_finite());
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_policy_keeps_nan() {
        let v = array![[2.0]];
        let v_approx = array![[f64::NAN]];
        let cost = compute_error_cost_with_policy(
            v.view(),
            v_approx.view(),
            SingularityPolicy::Clamp { epsilon: 1e-6 },
        )
        .unwrap();
        assert!(cost.is_nan());
    }

    #[test]
    fn test_clamp_policy_floors_negative() {
        let v = array![[2.0]];
        let v_approx = array![[-3.0]];
        let epsilon = 1e-6;
        let cost = compute_error_cost_with_policy(
            v.view(),
            v_approx.view(),
            SingularityPolicy::Clamp { epsilon },
        )
        .unwrap();
        let expected = 2.0 * (2.0 / epsilon).ln() - 2.0 + epsilon;
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fail_policy_rejects_negative() {
        let v = array![[2.0, 1.0]];
        let v_approx = array![[-0.5, 1.0]];
        let err = compute_error_cost_with_policy(
            v.view(),
            v_approx.view(),
            SingularityPolicy::Fail,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScoringError::NumericSingularity {
                row: 0,
                col: 0,
                original: 2.0,
                approx: -0.5
            }
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let policy = SingularityPolicy::Clamp { epsilon: 0.25 };
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, r#"{"clamp":{"epsilon":0.25}}"#);
        assert_eq!(serde_json::from_str::<SingularityPolicy>(&json).unwrap(), policy);
        assert_eq!(
            serde_json::to_string(&SingularityPolicy::Fail).unwrap(),
            r#""fail""#
        );

        let scorer = DescriptionLengthScorer::new(16)
            .unwrap()
            .with_policy(policy)
            .unwrap();
        let json = serde_json::to_string(&scorer).unwrap();
        assert_eq!(
            serde_json::from_str::<DescriptionLengthScorer>(&json).unwrap(),
            scorer
        );

        let costs = CostPair {
            encoding_cost: 32.0,
            error_cost: 0.5,
        };
        let json = serde_json::to_string(&costs).unwrap();
        assert_eq!(json, r#"{"encoding_cost":32.0,"error_cost":0.5}"#);
        assert_eq!(serde_json::from_str::<CostPair>(&json).unwrap(), costs);
    }

    #[test]
    fn test_fail_policy_reports_position() {
        let v = array![[1.0, 0.0], [3.0, 4.0]];
        let v_approx = array![[1.0, 0.0], [3.0, 0.0]];
        let err = compute_error_cost_with_policy(
            v.view(),
            v_approx.view(),
            SingularityPolicy::Fail,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScoringError::NumericSingularity {
                row: 1,
                col: 1,
                original: 4.0,
                approx: 0.0
            }
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "propagate".parse::<SingularityPolicy>().unwrap(),
            SingularityPolicy::Propagate
        );
        assert_eq!("FAIL".parse::<SingularityPolicy>().unwrap(), SingularityPolicy::Fail);
        assert_eq!(
            "clamp".parse::<SingularityPolicy>().unwrap(),
            SingularityPolicy::Clamp {
                epsilon: DEFAULT_CLAMP_EPSILON
            }
        );
        assert_eq!(
            "clamp:0.001".parse::<SingularityPolicy>().unwrap(),
            SingularityPolicy::Clamp { epsilon: 0.001 }
        );
        assert_eq!(
            "clamp:-1".parse::<SingularityPolicy>().unwrap_err(),
            ScoringError::InvalidEpsilon(-1.0)
        );
        assert!(matches!(
            "clamp:abc".parse::<SingularityPolicy>(),
            Err(ScoringError::InvalidPolicy(_))
        ));
        assert!(matches!(
            "ignore".parse::<SingularityPolicy>(),
            Err(ScoringError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_policy_display_round_trips() {
        let policy = SingularityPolicy::Clamp { epsilon: 0.5 };
        assert_eq!(policy.to_string(), "clamp:0.5");
        assert_eq!(policy.to_string().parse::<SingularityPolicy>().unwrap(), policy);
    }

    #[test]
    fn test_scorer_rejects_zero_bits() {
        assert_eq!(
            DescriptionLengthScorer::new(0).unwrap_err(),
            ScoringError::InvalidBitWidth(0)
        );
    }

    #[test]
    fn test_scorer_rejects_bad_epsilon() {
        let err = DescriptionLengthScorer::default()
            .with_policy(SingularityPolicy::Clamp { epsilon: 0.0 })
            .unwrap_err();
        assert_eq!(err, ScoringError::InvalidEpsilon(0.0));
    }

    #[test]
    fn test_scorer_score() {
        let v = array![[1.0, 2.0], [3.0, 4.0]];
        let scorer = DescriptionLengthScorer::new(8).unwrap();
        let costs = scorer.score(&v, &rank_one_model()).unwrap();
        assert_eq!(costs.encoding_cost, 32.0);
        assert!((costs.error_cost - 0.5370).abs() < 1e-4);
        assert!((costs.total() - 32.5370).abs() < 1e-4);
        assert!(costs.is_finite());
    }

    #[test]
    fn test_scorer_propagates_shape_mismatch() {
        let v = array![[1.0, 2.0, 3.0], [3.0, 4.0, 5.0]];
        let err = DescriptionLengthScorer::default()
            .score(&v, &rank_one_model())
            .unwrap_err();
        assert!(matches!(
            err,
            ScoringError::ShapeMismatch {
                context: "error cost",
                ..
            }
        ));
    }
}
