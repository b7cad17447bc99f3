pub use dimension::{DynObjectives, FixedObjectives, ObjectiveDim};
pub use error::SelectError;
pub use observer::{FrontArchive, FrontSemantics, ParetoObserver};
pub use population::{Individual, Population, SolutionId};

mod dimension;
mod error;
mod observer;
mod population;
#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod utils;
