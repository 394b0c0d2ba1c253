//! Description-length scoring for choosing the rank of an NMF in RolX-style
//! role extraction.
//!
//! For a feature matrix V and a factor pair (G, F) with V ≈ G * F, the
//! scorer returns the cost of encoding G and F plus the generalized KL
//! divergence between V and its reconstruction. Callers sum the two and keep
//! the rank with the smallest total.

/**
 * File: /src/lib.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026 11:30:18 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */
pub mod config;
pub mod error;
pub mod matrix;
pub mod scoring;

pub use error::ScoringError;
pub use matrix::{FactorModel, LabeledMatrix, MatrixInput};
pub use scoring::{
    compute_description_length_costs, compute_encoding_cost, compute_error_cost,
    compute_error_cost_with_policy, CostPair, DescriptionLengthScorer, SingularityPolicy,
};
