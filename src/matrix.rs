/*
 * File: /matrix.rs
 * Created Date: Saturday October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026 4:02:11 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

use std::ops::Index;

use ndarray::{Array2, ArrayView2};

use crate::error::ScoringError;

/// Feature matrix carrying row and column labels next to its raw values.
///
/// Labels are optional; when present their lengths must match the matrix shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    values: Array2<f64>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl LabeledMatrix {
    pub fn new(
        values: Array2<f64>,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
    ) -> Result<Self, ScoringError> {
        let (rows, cols) = values.dim();
        if !row_labels.is_empty() && row_labels.len() != rows {
            return Err(ScoringError::LabelMismatch {
                axis: "row",
                expected: rows,
                found: row_labels.len(),
            });
        }
        if !col_labels.is_empty() && col_labels.len() != cols {
            return Err(ScoringError::LabelMismatch {
                axis: "column",
                expected: cols,
                found: col_labels.len(),
            });
        }
        Ok(LabeledMatrix {
            values,
            row_labels,
            col_labels,
        })
    }

    /// Wrap raw values without any labels
    pub fn unlabeled(values: Array2<f64>) -> Self {
        LabeledMatrix {
            values,
            row_labels: Vec::new(),
            col_labels: Vec::new(),
        }
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Look up a value by its row and column labels
    pub fn get(&self, row_label: &str, col_label: &str) -> Option<f64> {
        let row = self.row_labels.iter().position(|l| l == row_label)?;
        let col = self.col_labels.iter().position(|l| l == col_label)?;
        Some(self.values[(row, col)])
    }
}

impl Index<(usize, usize)> for LabeledMatrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.values[index]
    }
}

/// Either a plain array or a labeled table wrapping one.
///
/// Resolved to a raw view once, at the scoring boundary.
#[derive(Debug, Clone, Copy)]
pub enum MatrixInput<'a> {
    Raw(ArrayView2<'a, f64>),
    Labeled(&'a LabeledMatrix),
}

impl<'a> MatrixInput<'a> {
    pub fn values(&self) -> ArrayView2<'a, f64> {
        match *self {
            MatrixInput::Raw(view) => view,
            MatrixInput::Labeled(labeled) => labeled.values.view(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values().dim()
    }
}

impl<'a> From<ArrayView2<'a, f64>> for MatrixInput<'a> {
    fn from(view: ArrayView2<'a, f64>) -> Self {
        MatrixInput::Raw(view)
    }
}

impl<'a> From<&'a Array2<f64>> for MatrixInput<'a> {
    fn from(array: &'a Array2<f64>) -> Self {
        MatrixInput::Raw(array.view())
    }
}

impl<'a> From<&'a LabeledMatrix> for MatrixInput<'a> {
    fn from(labeled: &'a LabeledMatrix) -> Self {
        MatrixInput::Labeled(labeled)
    }
}

/// Factor pair (G, F) with V ≈ G * F
///
/// G is n_rows x k, F is k x n_cols. Non-negativity is the solver's job and is
/// not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorModel {
    pub g: Array2<f64>,
    pub f: Array2<f64>,
}

impl FactorModel {
    pub fn new(g: Array2<f64>, f: Array2<f64>) -> Self {
        FactorModel { g, f }
    }

    /// Inner dimension k
    pub fn rank(&self) -> usize {
        self.g.ncols()
    }

    pub fn element_count(&self) -> usize {
        self.g.len() + self.f.len()
    }

    /// V_approx = G * F
    pub fn reconstruct(&self) -> Result<Array2<f64>, ScoringError> {
        if self.g.ncols() != self.f.nrows() {
            return Err(ScoringError::ShapeMismatch {
                context: "factor product",
                left: self.g.dim(),
                right: self.f.dim(),
            });
        }
        Ok(self.g.dot(&self.f))
    }
}

impl From<(Array2<f64>, Array2<f64>)> for FactorModel {
    fn from((g, f): (Array2<f64>, Array2<f64>)) -> Self {
        FactorModel::new(g, f)
    }
}
