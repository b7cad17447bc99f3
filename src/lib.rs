//! # nsga3-select
//!
//! The survivor-selection core of a many-objective evolutionary optimiser. Given a merged
//! parent and offspring population evaluated on `M` minimisation objectives, the engine
//! keeps `N` individuals that are both non-dominated and well spread across a set of
//! reference directions, following the NSGA3 approach from:
//!
//! > K. Deb and H. Jain, "An Evolutionary Many-Objective Optimization Algorithm Using
//! > Reference-Point-Based Non-dominated Sorting Approach, Part I: Solving Problems With
//! > Box Constraints," in IEEE Transactions on Evolutionary Computation, vol. 18, no. 4,
//! > pp. 577-601, Aug. 2014.
//!
//! The crate only handles selection: fitness evaluation, crossover, mutation and the
//! generation loop belong to the caller. A pass consists of the dominated-count front sort,
//! the publication of the Pareto front, the admission of whole layers, and, when a layer
//! has to be split, the normalise, associate and niche-preservation steps.
//!
//! The main types are:
//!  - [`selection::NSGA3Selector`]: the selection engine, generic over the objective count
//!    ([`core::FixedObjectives`] or [`core::DynObjectives`]).
//!  - [`utils::DasDennis`]: the reference-direction lattice generator.
//!  - [`kernel::SelectionKernel`]: the linear-algebra capability, with a portable and an
//!    `nalgebra`-accelerated provider.
pub mod core;
pub mod kernel;
pub mod selection;
pub mod utils;
