//! QR-based least squares shared by the OLS and fixed-effects engines
//!
//! The design matrix is factorised as X = QR (thin). Coefficients come from
//! back-substitution on R b = Q'y and (X'X)^-1 is formed as R^-1 R^-T, which
//! avoids squaring the condition number through the normal equations.

use faer::Mat;

use crate::pipeline::error::RegressionError;

/// Relative size below which a diagonal entry of R is treated as zero
pub const RANK_TOLERANCE: f64 = 1e-10;

/// Least-squares solution with the pieces needed for inference
#[derive(Debug, Clone)]
pub struct LeastSquaresSolution {
    pub coefficients: Vec<f64>,
    /// (X'X)^-1, k x k
    pub xtx_inverse: Mat<f64>,
    pub residuals: Vec<f64>,
}

impl LeastSquaresSolution {
    pub fn sum_squared_residuals(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }
}

/// Solve min ||y - Xb||^2.
///
/// Fails with [`RegressionError::DegenerateDesign`] when there are no
/// residual degrees of freedom, when the inputs contain non-finite values, or
/// when X is (numerically) rank deficient.
pub fn solve_least_squares(
    x: &Mat<f64>,
    y: &[f64],
) -> Result<LeastSquaresSolution, RegressionError> {
    let n = x.nrows();
    let k = x.ncols();

    if k == 0 {
        return Err(RegressionError::degenerate("design matrix has no columns"));
    }
    if y.len() != n {
        return Err(RegressionError::degenerate(format!(
            "response has {} values but design matrix has {} rows",
            y.len(),
            n
        )));
    }
    if n <= k {
        return Err(RegressionError::degenerate(format!(
            "{} observations for {} parameters leaves no residual degrees of freedom",
            n, k
        )));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(RegressionError::degenerate("response contains non-finite values"));
    }
    for j in 0..k {
        for i in 0..n {
            if !x[(i, j)].is_finite() {
                return Err(RegressionError::degenerate(format!(
                    "column {} contains non-finite values",
                    j
                )));
            }
        }
    }

    let qr = x.qr();
    let q = qr.compute_thin_q();
    let r = qr.compute_thin_r();

    check_rank(&r)?;

    let y_col = Mat::from_fn(n, 1, |i, _| y[i]);
    let qty = q.transpose() * &y_col;

    let r_inv = invert_upper_triangular(&r);
    let coefficients: Vec<f64> = (0..k)
        .map(|i| (i..k).map(|j| r_inv[(i, j)] * qty[(j, 0)]).sum())
        .collect();

    let xtx_inverse = r_inv.as_ref() * r_inv.transpose();

    let residuals: Vec<f64> = (0..n)
        .map(|i| y[i] - (0..k).map(|j| x[(i, j)] * coefficients[j]).sum::<f64>())
        .collect();

    Ok(LeastSquaresSolution {
        coefficients,
        xtx_inverse,
        residuals,
    })
}

/// Reject an R factor whose diagonal reveals (near) collinear columns
fn check_rank(r: &Mat<f64>) -> Result<(), RegressionError> {
    let k = r.ncols();
    let max_diag = (0..k).map(|j| r[(j, j)].abs()).fold(0.0_f64, f64::max);

    if max_diag == 0.0 || !max_diag.is_finite() {
        return Err(RegressionError::degenerate("design matrix is zero"));
    }

    for j in 0..k {
        let ratio = r[(j, j)].abs() / max_diag;
        if ratio <= RANK_TOLERANCE {
            return Err(RegressionError::degenerate(format!(
                "column {} is collinear with preceding columns (|R[{},{}]| / max = {:.3e})",
                j, j, j, ratio
            )));
        }
    }

    Ok(())
}

/// Inverse of an upper-triangular matrix with a non-zero diagonal
fn invert_upper_triangular(r: &Mat<f64>) -> Mat<f64> {
    let k = r.nrows();
    let mut inv = Mat::<f64>::zeros(k, k);

    for col in 0..k {
        for row in (0..=col).rev() {
            let mut acc = if row == col { 1.0 } else { 0.0 };
            for m in (row + 1)..=col {
                acc -= r[(row, m)] * inv[(m, col)];
            }
            inv[(row, col)] = acc / r[(row, row)];
        }
    }

    inv
}
