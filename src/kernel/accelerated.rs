use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::core::SelectError;
use crate::kernel::SelectionKernel;
use crate::utils::{ReferenceSet, PIVOT_EPSILON};

/// The matrix-library backed kernel provider and the engine default. Intercepts come from an
/// `nalgebra` LU factorisation (same pivot threshold as the portable path) and the
/// association batch projects each point onto all reference directions with one
/// matrix-vector product.
#[derive(Debug, Clone)]
pub struct AcceleratedKernel {
    /// Whether the association batch runs on the rayon thread pool.
    parallel: bool,
}

impl AcceleratedKernel {
    /// Create the provider.
    ///
    /// # Arguments
    ///
    /// * `parallel`: Whether to spread the association batch across threads.
    ///
    /// returns: `AcceleratedKernel`
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }
}

impl SelectionKernel for AcceleratedKernel {
    fn hyperplane_intercepts(&self, extremes: &[Vec<f64>]) -> Result<Vec<f64>, SelectError> {
        let size = extremes.len();
        if size == 0 || extremes.iter().any(|column| column.len() != size) {
            return Err(SelectError::InvalidParam(
                "matrix",
                "the extreme-point matrix must be square and non-empty".to_string(),
            ));
        }

        // `extremes` holds the columns of P; filling rows from its entries builds P^T
        let p_transposed = DMatrix::from_fn(size, size, |r, c| extremes[r][c]);
        let lu = p_transposed.lu();
        if lu
            .u()
            .diagonal()
            .iter()
            .any(|pivot| pivot.abs() < PIVOT_EPSILON)
        {
            return Err(SelectError::Singular(PIVOT_EPSILON));
        }

        // solving P^T * x = 1 directly is equivalent to inverting against the identity
        let ones = DVector::from_element(size, 1.0);
        let solution = lu
            .solve(&ones)
            .ok_or(SelectError::Singular(PIVOT_EPSILON))?;
        Ok(solution.iter().map(|v| 1.0 / v).collect())
    }

    fn associate(&self, points: &[Vec<f64>], references: &ReferenceSet) -> Vec<(usize, f64)> {
        if points.is_empty() {
            return Vec::new();
        }
        let m = points[0].len();
        let directions = DMatrix::from_fn(m, references.len(), |r, c| references.point(c)[r]);

        // d^2(s, w_j) = |s|^2 - (s . w_j)^2 / |w_j|^2, minimised over j with ties to the
        // lowest index
        let nearest = |point: &Vec<f64>| -> (usize, f64) {
            let s = DVector::from_column_slice(point);
            let projections = directions.tr_mul(&s);
            let s_norm = s.norm_squared();

            let mut closest = 0;
            let mut min_distance = f64::INFINITY;
            for (j, projection) in projections.iter().enumerate() {
                let distance =
                    (s_norm - projection * projection / references.squared_norm(j)).max(0.0);
                if distance < min_distance {
                    min_distance = distance;
                    closest = j;
                }
            }
            (closest, min_distance)
        };

        if self.parallel {
            points.par_iter().map(nearest).collect()
        } else {
            points.iter().map(nearest).collect()
        }
    }
}
