#[cfg(feature = "plot")]
use std::error::Error;

#[cfg(feature = "plot")]
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::SelectError;
use crate::utils::squared_norm;

/// Calculate the binomial coefficient. This gives the number of `k`-subsets possible out of a
/// set of `n` distinct items. See <https://mathworld.wolfram.com/BinomialCoefficient.html>.
///
/// # Arguments
///
/// * `n`: The number of possibilities.
/// * `k`: The number of outcomes.
///
/// returns: `u64`
fn binomial_coefficient(mut n: u64, k: u64) -> u64 {
    let mut r: u64 = 1;
    if k > n {
        0
    } else {
        for d in 1..=k {
            r *= n;
            n -= 1;
            r /= d;
        }
        r
    }
}

/// Define the number of partitions for the two layers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TwoLayerPartitions {
    /// The number of partitions to use in the boundary layer.
    pub boundary_layer: usize,
    /// The number of partitions to use in the inner layer.
    pub inner_layer: usize,
    /// Control the size of the inner layer. This defaults to 0.5 which means that the maximum
    /// points on each objective axis will be located at 0.5 instead of 1 (as in the boundary
    /// layer).
    pub scaling: Option<f64>,
}

/// Define the number of partitions used to generate the reference directions. You can create:
///  - 1 layer or set of points with constant uniform gaps with [`NumberOfPartitions::OneLayer`].
///  - 2 layers of points, each with a different gap, with [`NumberOfPartitions::TwoLayers`].
///    Use this approach for problems with many objectives (4 or more) to keep the number of
///    reference directions small while still controlling the point density in the inner area.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum NumberOfPartitions {
    /// Create one layer of points by specifying the number of uniform gaps between two
    /// consecutive points along all objective axes on the hyper-plane.
    OneLayer(usize),
    /// Create two sets of points with two different gap values. The lattices are generated
    /// independently, the inner one is shrunk towards the simplex centroid, and the two sets
    /// are concatenated.
    TwoLayers(TwoLayerPartitions),
}

/// Generate uniformly-spaced reference directions on the unit simplex with the approach from
/// Section 5.2 in the Das & Dennis (1998) paper:
///
/// > Indraneel Das and J. E. Dennis. Normal-Boundary Intersection: A New Method for Generating
/// > the Pareto Surface in Nonlinear Multicriteria Optimization Problems. SIAM Journal on
/// > Optimization. 1998 8:3, 631-657. <https://doi.org/10.1137/S1052623496307510>
///
/// Each direction is an integer composition of the partition count `P` into `M` non-negative
/// parts scaled by `1/P`; compositions are emitted in lexicographic order.
pub struct DasDennis {
    /// The number of problem objectives.
    number_of_objectives: usize,
    /// The number of uniform gaps between two consecutive points along all objective axes on
    /// the hyper-plane, for one or two layers of points.
    partitions: NumberOfPartitions,
}

impl DasDennis {
    /// Set up the generator. This returns an error if the number of objectives or any
    /// partition count is below 1, or a layer scaling factor is not strictly positive.
    ///
    /// # Arguments
    ///
    /// * `number_of_objectives`: The number of problem objectives.
    /// * `partitions`: The number of partitions for one or two lattice layers.
    ///
    /// returns: `Result<DasDennis, SelectError>`
    pub fn new(
        number_of_objectives: usize,
        partitions: &NumberOfPartitions,
    ) -> Result<Self, SelectError> {
        if number_of_objectives < 1 {
            return Err(SelectError::InvalidParam(
                "number_of_objectives",
                "at least 1 objective is needed to generate reference points".to_string(),
            ));
        }
        match partitions {
            NumberOfPartitions::OneLayer(gaps) => {
                if *gaps < 1 {
                    return Err(SelectError::InvalidParam(
                        "number_of_partitions",
                        "the number of partitions must be at least 1".to_string(),
                    ));
                }
            }
            NumberOfPartitions::TwoLayers(layers) => {
                if layers.boundary_layer < 1 || layers.inner_layer < 1 {
                    return Err(SelectError::InvalidParam(
                        "number_of_partitions",
                        "both layers must have at least 1 partition".to_string(),
                    ));
                }
                if let Some(scaling) = layers.scaling {
                    if scaling < f64::EPSILON {
                        return Err(SelectError::InvalidParam(
                            "scaling",
                            "the inner layer scaling factor must be larger than 0".to_string(),
                        ));
                    }
                }
            }
        }

        Ok(Self {
            number_of_objectives,
            partitions: partitions.clone(),
        })
    }

    /// Determine the number of reference points that [`DasDennis::weights`] generates. For one
    /// layer with `P` partitions and `M` objectives this is the binomial coefficient of
    /// `M + P - 1` and `P`; for two layers the counts of both lattices are summed.
    ///
    /// returns: `u64`
    pub fn number_of_points(&self) -> u64 {
        let m = self.number_of_objectives as u64;
        match &self.partitions {
            NumberOfPartitions::OneLayer(gaps) => {
                binomial_coefficient(m + *gaps as u64 - 1, *gaps as u64)
            }
            NumberOfPartitions::TwoLayers(layers) => {
                binomial_coefficient(m + layers.boundary_layer as u64 - 1, layers.boundary_layer as u64)
                    + binomial_coefficient(m + layers.inner_layer as u64 - 1, layers.inner_layer as u64)
            }
        }
    }

    /// Generate the vector of reference directions.
    ///
    /// return: `Vec<Vec<f64>>`. The directions, each with one coordinate (between 0 and 1)
    /// per objective. Coordinates of a direction always sum to 1 for a one-layer lattice.
    pub fn weights(&self) -> Vec<Vec<f64>> {
        match &self.partitions {
            NumberOfPartitions::OneLayer(gaps) => self.lattice(*gaps),
            NumberOfPartitions::TwoLayers(layers) => {
                let mut weights = self.lattice(layers.boundary_layer);
                // shrink the inner layer towards the simplex centroid before merging
                let scaling = layers.scaling.unwrap_or(0.5);
                let centroid_shift = 1.0 / self.number_of_objectives as f64;
                for point in self.lattice(layers.inner_layer) {
                    weights.push(
                        point
                            .iter()
                            .map(|value| (value + centroid_shift) * scaling)
                            .collect(),
                    );
                }
                weights
            }
        }
    }

    /// Enumerate all integer compositions of `partitions` into one non-negative part per
    /// objective, in lexicographic order, scaled by `1 / partitions`.
    ///
    /// # Arguments
    ///
    /// * `partitions`: The number of gaps along each objective axis.
    ///
    /// returns: `Vec<Vec<f64>>`
    fn lattice(&self, partitions: usize) -> Vec<Vec<f64>> {
        fn descend(
            tally: &mut Vec<usize>,
            axis: usize,
            left: usize,
            partitions: usize,
            points: &mut Vec<Vec<f64>>,
        ) {
            if axis == tally.len() - 1 {
                // the last objective takes the partitions left over by the previous axes
                tally[axis] = left;
                points.push(
                    tally
                        .iter()
                        .map(|v| *v as f64 / partitions as f64)
                        .collect(),
                );
                return;
            }
            for part in 0..=left {
                tally[axis] = part;
                descend(tally, axis + 1, left - part, partitions, points);
            }
        }

        let mut points = Vec::with_capacity(self.number_of_points() as usize);
        let mut tally = vec![0_usize; self.number_of_objectives];
        descend(&mut tally, 0, partitions, partitions, &mut points);
        points
    }
}

/// An immutable set of reference directions with pre-computed squared norms. This is the
/// `W` matrix consumed by the association step; each entry is one column of `W`.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    /// The direction vectors.
    points: Vec<Vec<f64>>,
    /// The squared L2 norm of each direction.
    squared_norms: Vec<f64>,
}

impl ReferenceSet {
    /// Build the set and validate the directions against the objective count. Directions must
    /// be non-empty, finite, non-negative and of non-zero length; perpendicular distances are
    /// invariant under positive rescaling, so the directions do not need to be unit vectors.
    ///
    /// # Arguments
    ///
    /// * `points`: The direction vectors, each with one coordinate per objective.
    /// * `number_of_objectives`: The expected dimension of each direction.
    ///
    /// returns: `Result<ReferenceSet, SelectError>`
    pub fn new(points: Vec<Vec<f64>>, number_of_objectives: usize) -> Result<Self, SelectError> {
        if points.is_empty() {
            return Err(SelectError::InvalidParam(
                "reference_points",
                "at least one reference direction is needed".to_string(),
            ));
        }
        for (j, point) in points.iter().enumerate() {
            if point.len() != number_of_objectives {
                return Err(SelectError::InvalidParam(
                    "reference_points",
                    format!(
                        "direction #{} has {} coordinates but the problem has {} objectives",
                        j,
                        point.len(),
                        number_of_objectives
                    ),
                ));
            }
            if point.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(SelectError::InvalidParam(
                    "reference_points",
                    format!("direction #{} must have finite non-negative coordinates", j),
                ));
            }
        }

        let squared_norms: Vec<f64> = points.iter().map(|p| squared_norm(p)).collect();
        if squared_norms.iter().any(|n| *n <= 0.0) {
            return Err(SelectError::InvalidParam(
                "reference_points",
                "reference directions must have a non-zero length".to_string(),
            ));
        }

        Ok(Self {
            points,
            squared_norms,
        })
    }

    /// The number of reference directions.
    ///
    /// return: `usize`
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no directions. Construction rejects empty sets, so this is only
    /// `false` for a built set.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All direction vectors.
    ///
    /// return: `&[Vec<f64>]`
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// The direction vector at `index`.
    ///
    /// return: `&[f64]`
    pub fn point(&self, index: usize) -> &[f64] {
        &self.points[index]
    }

    /// The squared norm of the direction at `index`.
    ///
    /// return: `f64`
    pub fn squared_norm(&self, index: usize) -> f64 {
        self.squared_norms[index]
    }

    /// Generate and save a chart with the reference directions. This is only available for
    /// sets with 2- or 3-dimensional directions.
    ///
    /// # Arguments
    ///
    /// * `file_name`: The file path where to save the chart.
    ///
    /// returns: `Result<(), Box<dyn Error>>`
    #[cfg(feature = "plot")]
    pub fn plot(&self, file_name: &str) -> Result<(), Box<dyn Error>> {
        match self.points[0].len() {
            2 => self.plot_2d(file_name),
            3 => self.plot_3d(file_name),
            _ => Err("plotting is available when directions have 2 or 3 coordinates".into()),
        }
    }

    /// Generate and save a 2D chart with the reference directions.
    #[cfg(feature = "plot")]
    fn plot_2d(&self, file_name: &str) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(file_name, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .x_label_area_size(65)
            .y_label_area_size(65)
            .margin_top(5)
            .margin_left(10)
            .margin_right(30)
            .margin_bottom(5)
            .caption("Reference directions", ("sans-serif", 30.0))
            .build_cartesian_2d(0f64..1.2f64, 0f64..1.2f64)?;

        chart
            .configure_mesh()
            .bold_line_style(WHITE.mix(0.3))
            .y_desc("Objective #2")
            .x_desc("Objective #1")
            .axis_desc_style(("sans-serif", 25, &BLACK))
            .label_style(("sans-serif", 20, &BLACK))
            .draw()?;

        chart.draw_series(self.points.iter().map(|p| {
            Circle::new(
                (p[0], p[1]),
                5,
                ShapeStyle {
                    color: Palette99::pick(1).to_rgba(),
                    filled: true,
                    stroke_width: 1,
                },
            )
        }))?;

        root.present()?;
        Ok(())
    }

    /// Generate and save a 3D chart with the reference directions.
    #[cfg(feature = "plot")]
    fn plot_3d(&self, file_name: &str) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(file_name, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .x_label_area_size(65)
            .y_label_area_size(65)
            .margin_top(5)
            .margin_left(10)
            .margin_right(30)
            .margin_bottom(5)
            .caption("Reference directions", ("sans-serif", 30.0))
            .build_cartesian_3d(0f64..1.2f64, 0f64..1.2f64, 0f64..1.2f64)?;

        chart.with_projection(|mut pb| {
            pb.yaw = 0.5;
            pb.into_matrix()
        });

        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .draw()?;

        chart.draw_series(self.points.iter().map(|p| {
            Circle::new(
                (p[0], p[1], p[2]),
                5,
                ShapeStyle {
                    color: Palette99::pick(1).to_rgba(),
                    filled: true,
                    stroke_width: 1,
                },
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::assert_approx_array_eq;
    use crate::core::SelectError;
    use crate::utils::reference_points::{
        binomial_coefficient, DasDennis, NumberOfPartitions, ReferenceSet, TwoLayerPartitions,
    };

    #[test]
    /// Test the binomial coefficient using results from the Scipy package.
    fn test_binomial_coefficient() {
        assert_eq!(binomial_coefficient(6, 4), 15);
        assert_eq!(binomial_coefficient(1, 3), 0);
        assert_eq!(binomial_coefficient(7, 3), 35);
        assert_eq!(binomial_coefficient(100, 2), 4950);
    }

    #[test]
    /// Test the lattice with 3 objectives and 3 partitions.
    fn test_lattice_3obj() {
        let generator = DasDennis::new(3, &NumberOfPartitions::OneLayer(3)).unwrap();
        let weights = generator.weights();
        let expected_weights = [
            [0.0, 0.0, 1.0],
            [0.0, 0.333, 0.666],
            [0.0, 0.666, 0.333],
            [0.0, 1.0, 0.0],
            [0.333, 0.0, 0.666],
            [0.333, 0.333, 0.333],
            [0.333, 0.666, 0.0],
            [0.666, 0.0, 0.333],
            [0.666, 0.333, 0.0],
            [1.0, 0.0, 0.0],
        ];
        assert_eq!(weights.len() as u64, generator.number_of_points());
        assert_eq!(weights.len(), expected_weights.len());

        for (wi, expected) in expected_weights.iter().enumerate() {
            assert_approx_array_eq(&weights[wi], expected, Some(0.001));
        }
    }

    #[test]
    /// The point counts from Section 5.2 of Das & Dennis (1998).
    fn test_point_counts() {
        let generator = DasDennis::new(3, &NumberOfPartitions::OneLayer(4)).unwrap();
        assert_eq!(generator.number_of_points(), 15);
        assert_eq!(generator.weights().len(), 15);

        let generator = DasDennis::new(5, &NumberOfPartitions::OneLayer(3)).unwrap();
        assert_eq!(generator.number_of_points(), 35);
        assert_eq!(generator.weights().len(), 35);
    }

    #[test]
    /// Every direction of a one-layer lattice must lie on the unit simplex.
    fn test_weights_sum_to_one() {
        for (m, p) in [(2, 4), (3, 5), (4, 3), (6, 2)] {
            let generator = DasDennis::new(m, &NumberOfPartitions::OneLayer(p)).unwrap();
            for weight in generator.weights() {
                let sum: f64 = weight.iter().sum();
                assert!(
                    (sum - 1.0).abs() < 1e-9,
                    "direction {:?} sums to {}",
                    weight,
                    sum
                );
                assert!(weight.iter().all(|v| *v >= 0.0));
            }
        }
    }

    #[test]
    /// Test the two-layer lattice with the boundary and inner gaps from the NSGA3 paper.
    fn test_two_layers() {
        let layers = TwoLayerPartitions {
            boundary_layer: 4,
            inner_layer: 3,
            scaling: Some(0.5),
        };
        let generator = DasDennis::new(3, &NumberOfPartitions::TwoLayers(layers)).unwrap();
        let weights = generator.weights();
        assert_eq!(weights.len() as u64, generator.number_of_points());
        assert_eq!(weights.len(), 25);

        // boundary layer points come first
        assert_approx_array_eq(&weights[0], &[0.0, 0.0, 1.0], None);
        assert_approx_array_eq(&weights[14], &[1.0, 0.0, 0.0], None);
        // the first inner point is (0, 0, 1) shrunk towards the centroid
        assert_approx_array_eq(&weights[15], &[1.0 / 6.0, 1.0 / 6.0, 2.0 / 3.0], None);
        // with the default scaling the inner layer stays on the simplex
        for weight in &weights[15..] {
            let sum: f64 = weight.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            DasDennis::new(0, &NumberOfPartitions::OneLayer(3)),
            Err(SelectError::InvalidParam("number_of_objectives", _))
        ));
        assert!(matches!(
            DasDennis::new(3, &NumberOfPartitions::OneLayer(0)),
            Err(SelectError::InvalidParam("number_of_partitions", _))
        ));
    }

    #[test]
    fn test_reference_set_validation() {
        // wrong dimension
        assert!(ReferenceSet::new(vec![vec![1.0, 0.0]], 3).is_err());
        // negative coordinate
        assert!(ReferenceSet::new(vec![vec![-1.0, 0.0]], 2).is_err());
        // zero-length direction
        assert!(ReferenceSet::new(vec![vec![0.0, 0.0]], 2).is_err());

        let set = ReferenceSet::new(vec![vec![0.0, 1.0], vec![0.5, 0.5]], 2).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.squared_norm(0), 1.0);
        assert_eq!(set.squared_norm(1), 0.5);
    }
}
