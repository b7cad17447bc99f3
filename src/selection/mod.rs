use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::{debug, info};
use rand::RngCore;
use serde::{Deserialize, Serialize};

pub(crate) use associate::Associate;
pub(crate) use niching::Niching;
pub(crate) use normalise::Normalise;

use crate::core::utils::get_rng;
use crate::core::{
    DynObjectives, FrontArchive, FrontSemantics, Individual, ObjectiveDim, ParetoObserver,
    Population, SelectError, SolutionId,
};
use crate::kernel::{AcceleratedKernel, SelectionKernel};
use crate::utils::{pareto_layers, DasDennis, NumberOfPartitions, ReferenceSet};

mod associate;
mod niching;
mod normalise;

/// How to build the reference directions used by the association step.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum ReferencePointOptions {
    /// Generate a Das & Dennis lattice with one or two layers of uniformly-spaced points.
    Lattice(NumberOfPartitions),
    /// Use an explicit set of directions, one vector per direction with one coordinate per
    /// objective. Directions do not need to be unit vectors.
    Custom(Vec<Vec<f64>>),
}

/// What to do when the front is degenerate, i.e. when a hyper-plane intercept is still
/// non-positive after the singularity fallback.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum DegenerateFrontPolicy {
    /// Abort the selection pass with [`SelectError::DegenerateFront`]. The population is left
    /// untouched.
    Error,
    /// Replace each offending intercept with `1` and log a warning.
    UnitIntercepts,
}

/// Input arguments for the selection engine.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NSGA3SelectorArg {
    /// The reference directions to associate the population with.
    pub reference_points: ReferencePointOptions,
    /// Whether to keep one Pareto-front snapshot per selection pass in addition to the
    /// current one.
    pub record_pareto_front: bool,
    /// Whether a published front snapshot stays valid across later passes.
    pub front_semantics: FrontSemantics,
    /// What to do when the front is degenerate.
    pub degenerate_front_policy: DegenerateFrontPolicy,
    /// Whether the association batch should run using threads. This defaults to `true`.
    pub parallel: Option<bool>,
    /// The seed used in the random number generator (RNG). You can specify a seed in case
    /// you want to try to reproduce results. The niche preservation step draws from the RNG
    /// when breaking ties between directions and when picking from an occupied niche; the
    /// seed is randomly picked if this is `None`.
    pub seed: Option<u64>,
}

/// Per-pass scratch record for one population member. The ephemeral selection state lives
/// here and is discarded when the pass commits.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    /// The handle of the individual in the population.
    pub id: SolutionId,
    /// A copy of the individual's fitness.
    pub fitness: Vec<f64>,
    /// The normalised fitness. Empty until the normalisation step runs.
    pub translated: Vec<f64>,
    /// The index of the closest reference direction, set by the association step.
    pub closest_ref: Option<usize>,
    /// The squared perpendicular distance to the closest reference direction.
    pub distance: f64,
    /// The number of individuals dominating this one.
    pub dominated_by: usize,
}

impl Candidate {
    fn new(id: SolutionId, fitness: Vec<f64>) -> Self {
        Self {
            id,
            fitness,
            translated: Vec::new(),
            closest_ref: None,
            distance: f64::INFINITY,
            dominated_by: 0,
        }
    }
}

/// The NSGA3 survivor-selection engine.
///
/// Implemented based on:
/// > K. Deb and H. Jain, "An Evolutionary Many-Objective Optimization Algorithm Using
/// > Reference-Point-Based Non-dominated Sorting Approach, Part I: Solving Problems With Box
/// > Constraints," in IEEE Transactions on Evolutionary Computation, vol. 18, no. 4,
/// > pp. 577-601, Aug. 2014, doi: 10.1109/TEVC.2013.2281535
///
/// The engine owns the population of fitness vectors between two generations of an outer
/// evolutionary loop. A call to [`NSGA3Selector::select`] sorts the merged parent and
/// offspring population into Pareto layers, publishes the non-dominated front, admits whole
/// layers while they fit, and completes the survivor set from the splitting front with the
/// normalise, associate and niche-preservation steps. The pass commits by deleting every
/// unselected individual; on error the population is left untouched.
pub struct NSGA3Selector<D: ObjectiveDim = DynObjectives> {
    /// The number of objectives.
    objectives: D,
    /// The reference directions.
    reference_points: ReferenceSet,
    /// The population with the fitness vectors.
    population: Population,
    /// The provider for the normalisation and association algebra.
    kernel: Box<dyn SelectionKernel>,
    /// The archive with the published Pareto fronts.
    archive: FrontArchive,
    /// The optional observer notified of every published front.
    observer: Option<Box<dyn ParetoObserver>>,
    /// What to do when the front is degenerate.
    degenerate_front_policy: DegenerateFrontPolicy,
    /// The random number generator.
    rng: Box<dyn RngCore>,
    /// The engine options.
    args: NSGA3SelectorArg,
}

impl<D: ObjectiveDim> Display for NSGA3Selector<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NSGA3Selector({} objectives, {} reference directions)",
            self.objectives.count(),
            self.reference_points.len()
        )
    }
}

impl<D: ObjectiveDim> NSGA3Selector<D> {
    /// Initialise the selection engine.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The number of objectives, fixed for the whole run.
    /// * `args`: The [`NSGA3SelectorArg`] arguments to customise the engine behaviour.
    ///
    /// returns: `Result<NSGA3Selector<D>, SelectError>`
    pub fn new(objectives: D, args: NSGA3SelectorArg) -> Result<Self, SelectError> {
        let m = objectives.count();
        if m < 1 {
            return Err(SelectError::InvalidParam(
                "objective_count",
                "at least 1 objective is needed".to_string(),
            ));
        }

        let reference_points = match &args.reference_points {
            ReferencePointOptions::Lattice(partitions) => {
                let generator = DasDennis::new(m, partitions)?;
                ReferenceSet::new(generator.weights(), m)?
            }
            ReferencePointOptions::Custom(points) => ReferenceSet::new(points.clone(), m)?,
        };
        info!(
            "Created {} reference directions for {} objectives",
            reference_points.len(),
            m
        );

        let parallel = args.parallel.unwrap_or(true);
        Ok(Self {
            objectives,
            reference_points,
            population: Population::new(),
            kernel: Box::new(AcceleratedKernel::new(parallel)),
            archive: FrontArchive::new(args.record_pareto_front, args.front_semantics),
            observer: None,
            degenerate_front_policy: args.degenerate_front_policy,
            rng: get_rng(args.seed),
            args,
        })
    }

    /// Replace the population with new individuals.
    ///
    /// # Arguments
    ///
    /// * `fitness_vectors`: One fitness vector per individual, each with one finite value
    ///   per objective.
    ///
    /// returns: `Result<Vec<SolutionId>, SelectError>`. The handle of each individual, in
    /// input order.
    pub fn set_population(
        &mut self,
        fitness_vectors: Vec<Vec<f64>>,
    ) -> Result<Vec<SolutionId>, SelectError> {
        for fitness in &fitness_vectors {
            self.validate_fitness(fitness)?;
        }
        self.population.clear();
        Ok(fitness_vectors
            .into_iter()
            .map(|fitness| self.population.insert(Individual::new(fitness)))
            .collect())
    }

    /// Add individuals to the population. The outer loop calls this with the offspring
    /// before a selection pass, so that the pass sees the merged parent and offspring
    /// population.
    ///
    /// # Arguments
    ///
    /// * `fitness_vectors`: One fitness vector per individual.
    ///
    /// returns: `Result<Vec<SolutionId>, SelectError>`. The handle of each new individual.
    pub fn extend_population(
        &mut self,
        fitness_vectors: Vec<Vec<f64>>,
    ) -> Result<Vec<SolutionId>, SelectError> {
        for fitness in &fitness_vectors {
            self.validate_fitness(fitness)?;
        }
        Ok(fitness_vectors
            .into_iter()
            .map(|fitness| self.population.insert(Individual::new(fitness)))
            .collect())
    }

    /// Run one selection pass and shrink the population to `target_size` survivors that are
    /// both non-dominated and well spread across the reference directions. When the
    /// population has at most `target_size` individuals the pass only refreshes the
    /// Pareto-front snapshot.
    ///
    /// # Arguments
    ///
    /// * `target_size`: The number of survivors to keep.
    ///
    /// returns: `Result<(), SelectError>`
    pub fn select(&mut self, target_size: usize) -> Result<(), SelectError> {
        if target_size < 1 {
            return Err(SelectError::InvalidParam(
                "target_size",
                "at least 1 survivor must be selected".to_string(),
            ));
        }
        debug!(
            "Starting a selection pass with {} candidates (target size {})",
            self.population.len(),
            target_size
        );

        // scratch candidates in ascending handle order
        let mut candidates: Vec<Candidate> = self
            .population
            .iter()
            .map(|(id, individual)| Candidate::new(id, individual.fitness().to_vec()))
            .collect();

        let fitness: Vec<Vec<f64>> = candidates
            .iter()
            .map(|candidate| candidate.fitness.clone())
            .collect();
        let sorting = pareto_layers(&fitness)?;
        for (candidate, count) in candidates.iter_mut().zip(&sorting.dominated_by) {
            candidate.dominated_by = *count;
        }
        debug!("Collected {} layers", sorting.layers.len());

        // publish the non-dominated front before any individual is dropped
        let front: Vec<Vec<f64>> = candidates
            .iter()
            .filter(|candidate| candidate.dominated_by == 0)
            .map(|candidate| candidate.fitness.clone())
            .collect();
        if let Some(observer) = self.observer.as_mut() {
            observer.update_pf(&front);
        }
        self.archive.publish(front);

        // admit whole layers while the next one does not overflow the target
        let mut admitted: Vec<usize> = Vec::with_capacity(target_size);
        let mut splitting_front: Option<Vec<usize>> = None;
        for (layer_index, layer) in sorting.layers.into_iter().enumerate() {
            if admitted.len() == target_size {
                break;
            }
            if admitted.len() + layer.len() <= target_size {
                debug!("Admitting layer #{} (size {})", layer_index, layer.len());
                admitted.extend(layer);
            } else {
                debug!(
                    "Layer #{} (size {}) does not fit the remaining {} slots",
                    layer_index,
                    layer.len(),
                    target_size - admitted.len()
                );
                splitting_front = Some(layer);
                break;
            }
        }

        let survivors: HashSet<SolutionId> = match splitting_front {
            // the target was met with whole layers (or the population is small)
            None => admitted.iter().map(|index| candidates[*index].id).collect(),
            Some(splitting) => {
                let missing = target_size - admitted.len();

                // compact scratch with the admitted candidates first, the splitting front after
                let mut pool: Vec<Candidate> =
                    Vec::with_capacity(admitted.len() + splitting.len());
                for index in &admitted {
                    pool.push(candidates[*index].clone());
                }
                let split_at = pool.len();
                for index in &splitting {
                    pool.push(candidates[*index].clone());
                }

                debug!("Normalising {} candidates", pool.len());
                let mut normalise = Normalise::new(
                    &mut pool,
                    split_at,
                    self.objectives.count(),
                    self.kernel.as_ref(),
                    self.degenerate_front_policy,
                )?;
                normalise.calculate()?;

                debug!("Associating candidates with the reference directions");
                let mut associate = Associate::new(
                    &mut pool,
                    split_at,
                    &self.reference_points,
                    self.kernel.as_ref(),
                )?;
                let mut front_map = associate.calculate()?;

                debug!("Filling the last {} slots by niche preservation", missing);
                let mut selected: Vec<usize> = (0..split_at).collect();
                let mut niching = Niching::new(
                    &mut selected,
                    &mut front_map,
                    &pool,
                    missing,
                    self.reference_points.len(),
                    self.rng.as_mut(),
                )?;
                niching.calculate()?;

                selected.iter().map(|index| pool[*index].id).collect()
            }
        };

        // commit the pass by deleting everything that was not selected
        self.population.retain(&survivors);
        debug!(
            "Selection pass completed with {} survivors",
            self.population.len()
        );
        Ok(())
    }

    /// The reference directions used by the association step.
    ///
    /// return: `&[Vec<f64>]`
    pub fn reference_points(&self) -> &[Vec<f64>] {
        self.reference_points.points()
    }

    /// The last published Pareto front. This is empty until a selection pass runs; see
    /// [`FrontSemantics`] for the stability of the returned snapshot.
    ///
    /// return: `Arc<Vec<Vec<f64>>>`
    pub fn pareto_front(&self) -> Arc<Vec<Vec<f64>>> {
        self.archive.snapshot()
    }

    /// The per-pass Pareto-front snapshots. This is empty unless `record_pareto_front` is
    /// enabled.
    ///
    /// return: `&[Arc<Vec<Vec<f64>>>]`
    pub fn front_history(&self) -> &[Arc<Vec<Vec<f64>>>] {
        self.archive.history()
    }

    /// The element-wise minimum fitness across the last published Pareto front, or `None`
    /// before the first pass.
    ///
    /// return: `Option<Vec<f64>>`
    pub fn best_fitness(&self) -> Option<Vec<f64>> {
        self.archive.best_fitness()
    }

    /// The number of individuals currently in the population.
    ///
    /// return: `usize`
    pub fn population_len(&self) -> usize {
        self.population.len()
    }

    /// The handles of the individuals currently in the population, in ascending order.
    ///
    /// return: `Vec<SolutionId>`
    pub fn ids(&self) -> Vec<SolutionId> {
        self.population.ids()
    }

    /// The fitness of an individual, or `None` when the handle is stale.
    ///
    /// # Arguments
    ///
    /// * `id`: The individual's handle.
    ///
    /// return: `Option<&[f64]>`
    pub fn fitness_of(&self, id: SolutionId) -> Option<&[f64]> {
        self.population.get(id).map(|individual| individual.fitness())
    }

    /// The number of objectives.
    ///
    /// return: `usize`
    pub fn objective_count(&self) -> usize {
        self.objectives.count()
    }

    /// Register the observer notified with a deep-copied fitness snapshot every time the
    /// Pareto front is published.
    ///
    /// # Arguments
    ///
    /// * `observer`: The observer.
    pub fn set_observer(&mut self, observer: Box<dyn ParetoObserver>) {
        self.observer = Some(observer);
    }

    /// Replace the linear-algebra provider.
    ///
    /// # Arguments
    ///
    /// * `kernel`: The provider for the normalisation and association algebra.
    pub fn set_kernel(&mut self, kernel: Box<dyn SelectionKernel>) {
        self.kernel = kernel;
    }

    /// The engine options.
    ///
    /// return: `NSGA3SelectorArg`
    pub fn options(&self) -> NSGA3SelectorArg {
        self.args.clone()
    }

    /// Check that a fitness vector matches the objective count and has no non-finite values.
    fn validate_fitness(&self, fitness: &[f64]) -> Result<(), SelectError> {
        if fitness.len() != self.objectives.count() {
            return Err(SelectError::InvalidParam(
                "fitness",
                format!(
                    "the fitness vector has {} values but the problem has {} objectives",
                    fitness.len(),
                    self.objectives.count()
                ),
            ));
        }
        if fitness.iter().any(|value| !value.is_finite()) {
            return Err(SelectError::InvalidParam(
                "fitness",
                "fitness values must be finite; this may be an error in the upstream evaluation function".to_string(),
            ));
        }
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::test_utils::assert_approx_array_eq;
    use crate::core::{
        DynObjectives, FixedObjectives, FrontSemantics, ParetoObserver, SelectError, SolutionId,
    };
    use crate::kernel::ScalarKernel;
    use crate::selection::{
        DegenerateFrontPolicy, NSGA3Selector, NSGA3SelectorArg, ReferencePointOptions,
    };
    use crate::utils::{compare, Dominance, NumberOfPartitions};

    fn default_args(partitions: usize, seed: Option<u64>) -> NSGA3SelectorArg {
        NSGA3SelectorArg {
            reference_points: ReferencePointOptions::Lattice(NumberOfPartitions::OneLayer(
                partitions,
            )),
            record_pareto_front: false,
            front_semantics: FrontSemantics::Frozen,
            degenerate_front_policy: DegenerateFrontPolicy::Error,
            parallel: Some(false),
            seed,
        }
    }

    /// Ten mutually non-dominated points spread over the line between (0, 1) and (1, 0).
    fn linear_front(count: usize) -> Vec<Vec<f64>> {
        let scale = (count - 1) as f64;
        (0..count)
            .map(|i| vec![i as f64 / scale, 1.0 - i as f64 / scale])
            .collect()
    }

    #[test]
    /// A single non-dominated front larger than the target: the survivors must keep both
    /// extremes and equalise the niche occupancy over the five reference directions.
    fn test_single_front_niche_equalisation() {
        let mut selector =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(42))).unwrap();
        assert_eq!(selector.reference_points().len(), 5);

        let ids = selector.set_population(linear_front(10)).unwrap();
        selector.select(5).unwrap();

        // each direction receives its closest candidate, so the survivor set does not depend
        // on the seed
        let expected: Vec<SolutionId> = [0, 2, 4, 7, 9].iter().map(|i| ids[*i]).collect();
        assert_eq!(selector.ids(), expected);
        assert_eq!(selector.fitness_of(ids[0]).unwrap(), &[0.0, 1.0]);
        assert_eq!(selector.fitness_of(ids[9]).unwrap(), &[1.0, 0.0]);
    }

    #[test]
    /// All individuals share one fitness point: the extremes collapse, the fallback
    /// intercepts are zero and the pass aborts without touching the population.
    fn test_collapsed_front_is_degenerate() {
        let mut selector =
            NSGA3Selector::new(DynObjectives(3), default_args(2, Some(1))).unwrap();
        selector
            .set_population(vec![vec![1.0, 1.0, 1.0]; 3])
            .unwrap();

        let result = selector.select(2);
        assert!(matches!(result, Err(SelectError::DegenerateFront(_, _))));
        // the failed pass is transactional
        assert_eq!(selector.population_len(), 3);
    }

    #[test]
    /// With the unit-intercept policy the collapsed front is selectable.
    fn test_collapsed_front_with_unit_intercepts() {
        let mut args = default_args(2, Some(1));
        args.degenerate_front_policy = DegenerateFrontPolicy::UnitIntercepts;
        let mut selector = NSGA3Selector::new(DynObjectives(3), args).unwrap();
        selector
            .set_population(vec![vec![1.0, 1.0, 1.0]; 3])
            .unwrap();

        selector.select(2).unwrap();
        assert_eq!(selector.population_len(), 2);
    }

    #[test]
    /// Four non-dominated points and two survivor slots: the niche preservation picks the
    /// two candidates lying exactly on distinct reference directions.
    fn test_two_survivors_on_distinct_directions() {
        let mut selector =
            NSGA3Selector::new(DynObjectives(2), default_args(1, Some(7))).unwrap();
        let ids = selector
            .set_population(vec![
                vec![1.0, 5.0],
                vec![2.0, 4.0],
                vec![3.0, 3.0],
                vec![4.0, 2.0],
            ])
            .unwrap();

        selector.select(2).unwrap();
        assert_eq!(selector.ids(), vec![ids[0], ids[3]]);
    }

    #[test]
    /// Mixed layers: the first layer fills the target exactly, so no niching is needed and
    /// the lower layers are dropped.
    fn test_whole_layer_admission() {
        let mut selector =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(3))).unwrap();
        let ids = selector
            .set_population(vec![
                vec![1.0, 1.0],
                vec![2.0, 2.0],
                vec![3.0, 0.5],
                vec![0.5, 3.0],
                vec![5.0, 5.0],
                vec![4.0, 4.0],
            ])
            .unwrap();

        selector.select(3).unwrap();
        assert_eq!(selector.ids(), vec![ids[0], ids[2], ids[3]]);

        // the published front is the first layer, in input order
        let front = selector.pareto_front();
        assert_eq!(front.len(), 3);
        assert_approx_array_eq(&front[0], &[1.0, 1.0], None);
        assert_approx_array_eq(&front[1], &[3.0, 0.5], None);
        assert_approx_array_eq(&front[2], &[0.5, 3.0], None);
        assert_eq!(selector.best_fitness().unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    /// A second pass without new offspring must be a no-op.
    fn test_selection_is_idempotent() {
        let mut selector =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(3))).unwrap();
        selector.set_population(linear_front(10)).unwrap();

        selector.select(5).unwrap();
        let first = selector.ids();
        selector.select(5).unwrap();
        assert_eq!(selector.ids(), first);
    }

    #[test]
    /// Selecting more survivors than individuals keeps the whole population.
    fn test_target_larger_than_population() {
        let mut selector =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(3))).unwrap();
        selector.set_population(linear_front(4)).unwrap();
        selector.select(10).unwrap();
        assert_eq!(selector.population_len(), 4);
    }

    #[test]
    /// Every member of the published front must be non-dominated by every individual of the
    /// merged population.
    fn test_front_members_are_non_dominated() {
        let population = vec![
            vec![1.0, 4.0],
            vec![2.0, 3.0],
            vec![3.0, 3.5],
            vec![4.0, 1.0],
            vec![2.5, 2.5],
            vec![5.0, 5.0],
        ];
        let mut selector =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(3))).unwrap();
        selector.set_population(population.clone()).unwrap();
        selector.select(3).unwrap();

        for member in selector.pareto_front().iter() {
            for other in &population {
                assert_ne!(compare(other, member), Dominance::First);
            }
        }
    }

    #[test]
    /// Two runs with the same seed must produce byte-identical survivor sets, also when the
    /// niche preservation has to draw from the generator.
    fn test_determinism_under_seed() {
        let run = |seed| {
            let mut args = default_args(4, Some(seed));
            args.degenerate_front_policy = DegenerateFrontPolicy::UnitIntercepts;
            let mut selector = NSGA3Selector::new(DynObjectives(2), args).unwrap();
            // six copies of the same point force random niche and candidate picks
            selector.set_population(vec![vec![1.0, 1.0]; 6]).unwrap();
            selector.select(3).unwrap();
            selector.ids()
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    /// The fixed-size and dynamic-size instantiations must behave identically.
    fn test_fixed_and_dynamic_objectives_match() {
        let population = vec![
            vec![1.0, 5.0],
            vec![2.0, 4.0],
            vec![3.0, 3.0],
            vec![4.0, 2.0],
        ];

        let mut fixed =
            NSGA3Selector::new(FixedObjectives::<2>, default_args(1, Some(11))).unwrap();
        fixed.set_population(population.clone()).unwrap();
        fixed.select(2).unwrap();

        let mut dynamic =
            NSGA3Selector::new(DynObjectives(2), default_args(1, Some(11))).unwrap();
        dynamic.set_population(population).unwrap();
        dynamic.select(2).unwrap();

        assert_eq!(fixed.ids(), dynamic.ids());
        assert_eq!(fixed.best_fitness(), dynamic.best_fitness());
    }

    #[test]
    /// The scalar provider must select the same survivors as the default provider.
    fn test_kernel_providers_match() {
        let mut accelerated =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(9))).unwrap();
        accelerated.set_population(linear_front(10)).unwrap();
        accelerated.select(5).unwrap();

        let mut scalar =
            NSGA3Selector::new(DynObjectives(2), default_args(4, Some(9))).unwrap();
        scalar.set_kernel(Box::new(ScalarKernel::new(false)));
        scalar.set_population(linear_front(10)).unwrap();
        scalar.select(5).unwrap();

        assert_eq!(accelerated.ids(), scalar.ids());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            NSGA3Selector::new(DynObjectives(0), default_args(4, None)),
            Err(SelectError::InvalidParam("objective_count", _))
        ));
        assert!(matches!(
            NSGA3Selector::new(DynObjectives(2), default_args(0, None)),
            Err(SelectError::InvalidParam("number_of_partitions", _))
        ));

        let mut selector = NSGA3Selector::new(DynObjectives(2), default_args(4, None)).unwrap();
        // wrong dimension
        assert!(selector.set_population(vec![vec![1.0, 2.0, 3.0]]).is_err());
        // non-finite fitness
        assert!(selector
            .set_population(vec![vec![f64::NAN, 1.0]])
            .is_err());
        // empty population
        assert!(matches!(selector.select(2), Err(SelectError::EmptyFront)));
        // zero survivors
        selector.set_population(linear_front(4)).unwrap();
        assert!(matches!(
            selector.select(0),
            Err(SelectError::InvalidParam("target_size", _))
        ));
    }

    #[test]
    fn test_custom_reference_points() {
        let mut args = default_args(1, Some(5));
        args.reference_points =
            ReferencePointOptions::Custom(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        let mut selector = NSGA3Selector::new(DynObjectives(2), args).unwrap();
        assert_eq!(selector.reference_points().len(), 2);

        let ids = selector
            .set_population(vec![
                vec![1.0, 5.0],
                vec![2.0, 4.0],
                vec![3.0, 3.0],
                vec![4.0, 2.0],
            ])
            .unwrap();
        selector.select(2).unwrap();
        assert_eq!(selector.ids(), vec![ids[0], ids[3]]);

        let mut args = default_args(1, None);
        args.reference_points = ReferencePointOptions::Custom(vec![vec![0.0, 1.0, 0.0]]);
        assert!(NSGA3Selector::new(DynObjectives(2), args).is_err());
    }

    /// An observer sharing its record with the test.
    struct CollectingObserver {
        fronts: Rc<RefCell<Vec<Vec<Vec<f64>>>>>,
    }

    impl ParetoObserver for CollectingObserver {
        fn update_pf(&mut self, front: &[Vec<f64>]) {
            self.fronts.borrow_mut().push(front.to_vec());
        }
    }

    #[test]
    fn test_observer_receives_each_front() {
        let fronts = Rc::new(RefCell::new(Vec::new()));
        let mut args = default_args(4, Some(3));
        args.record_pareto_front = true;
        let mut selector = NSGA3Selector::new(DynObjectives(2), args).unwrap();
        selector.set_observer(Box::new(CollectingObserver {
            fronts: fronts.clone(),
        }));

        selector.set_population(linear_front(6)).unwrap();
        selector.select(4).unwrap();
        selector.select(4).unwrap();

        let fronts = fronts.borrow();
        assert_eq!(fronts.len(), 2);
        assert_eq!(fronts[0].len(), 6);
        assert_eq!(fronts[1].len(), 4);
        assert_eq!(selector.front_history().len(), 2);
    }

    #[test]
    fn test_options_round_trip() {
        let args = default_args(4, Some(42));
        let selector = NSGA3Selector::new(DynObjectives(2), args).unwrap();
        let serialised = serde_json::to_string(&selector.options()).unwrap();
        let deserialised: NSGA3SelectorArg = serde_json::from_str(&serialised).unwrap();
        let restored = NSGA3Selector::new(DynObjectives(2), deserialised).unwrap();
        assert_eq!(restored.reference_points().len(), 5);
    }
}
