pub use accelerated::AcceleratedKernel;
pub use scalar::ScalarKernel;

mod accelerated;
mod scalar;

use crate::core::SelectError;
use crate::utils::ReferenceSet;

/// The linear-algebra capability consumed by the selection driver. The normalisation and
/// association steps go through this interface only, so a matrix-library backed provider
/// ([`AcceleratedKernel`], the default) can be swapped for the portable [`ScalarKernel`]
/// without touching the selection semantics.
///
/// Providers may fan the association batch out across threads; results must not depend on
/// the schedule, so ties between reference directions always resolve to the lowest index.
/// Floating-point summation order may differ between providers.
pub trait SelectionKernel: Send + Sync {
    /// Calculate the axis intercepts of the hyper-plane passing through the translated
    /// extreme points. `extremes[c]` is the extreme point chosen for objective `c`, i.e. one
    /// column of the extreme-point matrix `P`; the intercepts are the element-wise inverse
    /// of `P^{-T} * 1`.
    ///
    /// # Arguments
    ///
    /// * `extremes`: The columns of the extreme-point matrix.
    ///
    /// returns: `Result<Vec<f64>, SelectError>`. One intercept per objective, or
    /// [`SelectError::Singular`] when `P` cannot be inverted.
    fn hyperplane_intercepts(&self, extremes: &[Vec<f64>]) -> Result<Vec<f64>, SelectError>;

    /// For every point, find the reference direction with the smallest squared perpendicular
    /// distance. Ties resolve to the lowest direction index.
    ///
    /// # Arguments
    ///
    /// * `points`: The translated objective points.
    /// * `references`: The reference directions.
    ///
    /// returns: `Vec<(usize, f64)>`. For each point, the closest direction index and its
    /// squared distance, in input order.
    fn associate(&self, points: &[Vec<f64>], references: &ReferenceSet) -> Vec<(usize, f64)>;
}
