use rayon::prelude::*;

use crate::core::SelectError;
use crate::kernel::SelectionKernel;
use crate::utils::{invert, mat_vec, perpendicular_distance_sq_cached, ReferenceSet};

/// The portable kernel provider. Intercepts come from the in-crate LU inverse and distances
/// from explicit loops; the association batch optionally fans out across threads with rayon,
/// one point per task, which keeps the per-point tie-breaking deterministic.
#[derive(Debug, Clone)]
pub struct ScalarKernel {
    /// Whether the association batch runs on the rayon thread pool.
    parallel: bool,
}

impl ScalarKernel {
    /// Create the provider.
    ///
    /// # Arguments
    ///
    /// * `parallel`: Whether to spread the association batch across threads.
    ///
    /// returns: `ScalarKernel`
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }
}

/// The closest direction for one point, by exhaustive scan in direction order.
fn nearest_reference(point: &[f64], references: &ReferenceSet) -> (usize, f64) {
    let mut closest = 0;
    let mut min_distance = f64::INFINITY;
    for j in 0..references.len() {
        let distance = perpendicular_distance_sq_cached(
            references.point(j),
            references.squared_norm(j),
            point,
        );
        if distance < min_distance {
            min_distance = distance;
            closest = j;
        }
    }
    (closest, min_distance)
}

impl SelectionKernel for ScalarKernel {
    fn hyperplane_intercepts(&self, extremes: &[Vec<f64>]) -> Result<Vec<f64>, SelectError> {
        // `extremes` holds the columns of P, so the rows of P^T are exactly its entries
        let inverse = invert(extremes)?;
        let ones = vec![1.0; extremes.len()];
        Ok(mat_vec(&inverse, &ones).iter().map(|v| 1.0 / v).collect())
    }

    fn associate(&self, points: &[Vec<f64>], references: &ReferenceSet) -> Vec<(usize, f64)> {
        if self.parallel {
            points
                .par_iter()
                .map(|point| nearest_reference(point, references))
                .collect()
        } else {
            points
                .iter()
                .map(|point| nearest_reference(point, references))
                .collect()
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::core::test_utils::assert_approx_array_eq;
    use crate::kernel::{ScalarKernel, SelectionKernel};
    use crate::utils::ReferenceSet;

    #[test]
    /// The plane through (3, 0) and (0, 3) crosses both axes at 3.
    fn test_intercepts() {
        let kernel = ScalarKernel::new(false);
        let extremes = vec![vec![3.0, 0.0], vec![0.0, 3.0]];
        let intercepts = kernel.hyperplane_intercepts(&extremes).unwrap();
        assert_approx_array_eq(&intercepts, &[3.0, 3.0], None);
    }

    #[test]
    /// The plane through the three extreme points crosses the axes at 2, 4 and 4.
    fn test_intercepts_3obj() {
        let kernel = ScalarKernel::new(false);
        // plane x/2 + y/4 + z/4 = 1
        let extremes = vec![
            vec![2.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0],
            vec![0.0, 0.0, 4.0],
        ];
        let intercepts = kernel.hyperplane_intercepts(&extremes).unwrap();
        assert_approx_array_eq(&intercepts, &[2.0, 4.0, 4.0], Some(1e-9));
    }

    #[test]
    fn test_association() {
        let kernel = ScalarKernel::new(false);
        let references = ReferenceSet::new(
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
            3,
        )
        .unwrap();

        let points = vec![vec![0.95, 0.15, 0.15], vec![0.1, 0.9, 0.1]];
        let nearest = kernel.associate(&points, &references);

        assert_eq!(nearest[0].0, 0);
        assert_approx_eq!(f64, nearest[0].1, 0.045, epsilon = 1e-9);
        assert_eq!(nearest[1].0, 1);
        assert_approx_eq!(f64, nearest[1].1, 0.02, epsilon = 1e-9);
    }

    #[test]
    /// A point equidistant from two directions associates with the lower index.
    fn test_association_tie_break() {
        let kernel = ScalarKernel::new(false);
        let references =
            ReferenceSet::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]], 2).unwrap();
        let nearest = kernel.associate(&[vec![0.5, 0.5]], &references);
        assert_eq!(nearest[0].0, 0);
        assert_approx_eq!(f64, nearest[0].1, 0.25, epsilon = 1e-9);
    }

    #[test]
    /// The threaded batch must match the sequential one.
    fn test_parallel_association_matches() {
        let references = ReferenceSet::new(
            vec![
                vec![0.0, 1.0],
                vec![0.25, 0.75],
                vec![0.5, 0.5],
                vec![0.75, 0.25],
                vec![1.0, 0.0],
            ],
            2,
        )
        .unwrap();
        let points: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![i as f64 / 49.0, 1.0 - i as f64 / 49.0])
            .collect();

        let sequential = ScalarKernel::new(false).associate(&points, &references);
        let threaded = ScalarKernel::new(true).associate(&points, &references);
        assert_eq!(sequential, threaded);
    }
}
