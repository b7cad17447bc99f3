use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the selection engine.
pub enum SelectError {
    /// A configuration or input value is out of range or has the wrong dimension.
    #[error("invalid value for parameter '{0}': {1}")]
    InvalidParam(&'static str, String),
    /// The matrix of extreme points cannot be inverted because a pivot magnitude fell below
    /// the threshold. This is always recovered by the normalisation fallback and never
    /// surfaces from a selection pass.
    #[error("the extreme-point matrix is singular (pivot magnitude below {0:e})")]
    Singular(f64),
    /// A hyper-plane intercept is non-positive after the singularity fallback. The front
    /// collapsed onto fewer than `M` dimensions and the objectives cannot be scaled.
    #[error("the front is degenerate: the intercept for objective #{0} is {1}")]
    DegenerateFront(usize, f64),
    /// There are no individuals to sort into fronts.
    #[error("the population is empty")]
    EmptyFront,
}
