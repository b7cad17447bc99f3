pub use algebra::{
    dot_product, elementwise_div, elementwise_max, elementwise_min, elementwise_sub, mat_vec,
    perpendicular_distance_sq, squared_norm,
};
pub(crate) use algebra::perpendicular_distance_sq_cached;
pub use dominance::{compare, pareto_layers, Dominance, FrontLayers};
pub use lu::{invert, PIVOT_EPSILON};
pub use reference_points::{DasDennis, NumberOfPartitions, ReferenceSet, TwoLayerPartitions};

mod algebra;
mod dominance;
mod lu;
mod reference_points;
