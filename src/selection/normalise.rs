use std::collections::HashSet;

use log::{debug, warn};

use crate::core::{SelectError, SolutionId};
use crate::kernel::SelectionKernel;
use crate::selection::{Candidate, DegenerateFrontPolicy};
use crate::utils::{elementwise_div, elementwise_min, elementwise_sub};

/// Normalises the candidates of a selection pass using the ideal point and the intercepts of
/// the hyper-plane passing through the extreme points. The candidate slice holds the already
/// admitted individuals followed by the splitting front; the ideal point and the extreme
/// points are taken over the whole slice.
///
/// When the extreme points collapse onto fewer than `M` distinct individuals, or the
/// extreme-point matrix turns out to be numerically singular, the intercepts fall back to
/// the diagonal of the translated extreme-point matrix. A non-positive intercept left after
/// the fallback means the front is degenerate; depending on the policy this either aborts
/// the pass or is replaced by a unit intercept.
pub(crate) struct Normalise<'a> {
    /// The candidates to normalise. Entries from `split_at` onwards form the splitting front.
    candidates: &'a mut [Candidate],
    /// The index of the first splitting-front candidate.
    split_at: usize,
    /// The number of objectives.
    objective_count: usize,
    /// The provider for the intercept computation.
    kernel: &'a dyn SelectionKernel,
    /// What to do when the front is degenerate.
    policy: DegenerateFrontPolicy,
}

/// Calculated points used in the normalisation.
pub(crate) struct NormalisationPoints {
    /// The ideal point, i.e. the element-wise minimum fitness over all candidates.
    pub ideal: Vec<f64>,
    /// The intercepts used to scale each translated objective.
    pub intercepts: Vec<f64>,
    /// For each objective, the index of the candidate picked as its extreme point.
    pub extremes: Vec<usize>,
}

impl<'a> Normalise<'a> {
    /// Build the [`Normalise`] struct. This returns an error when the splitting front is
    /// empty, as the extreme-point search starts from its first member.
    ///
    /// # Arguments
    ///
    /// * `candidates`: The admitted candidates followed by the splitting front.
    /// * `split_at`: The index of the first splitting-front candidate.
    /// * `objective_count`: The number of objectives.
    /// * `kernel`: The provider for the intercept computation.
    /// * `policy`: What to do when the front is degenerate.
    ///
    /// returns: `Result<Normalise, SelectError>`
    pub fn new(
        candidates: &'a mut [Candidate],
        split_at: usize,
        objective_count: usize,
        kernel: &'a dyn SelectionKernel,
        policy: DegenerateFrontPolicy,
    ) -> Result<Self, SelectError> {
        if split_at >= candidates.len() {
            return Err(SelectError::InvalidParam(
                "splitting_front",
                "the splitting front must have at least one candidate".to_string(),
            ));
        }
        Ok(Self {
            candidates,
            split_at,
            objective_count,
            kernel,
            policy,
        })
    }

    /// Normalise the candidates. The fitness vectors are first translated with respect to
    /// the ideal point and then scaled by the hyper-plane intercepts; the result is stored
    /// in each candidate's `translated` field.
    ///
    /// returns: `Result<NormalisationPoints, SelectError>`
    pub fn calculate(&mut self) -> Result<NormalisationPoints, SelectError> {
        let m = self.objective_count;

        // ideal point over the admitted candidates and the splitting front
        let mut ideal = vec![f64::INFINITY; m];
        for candidate in self.candidates.iter() {
            ideal = elementwise_min(&ideal, &candidate.fitness);
        }
        debug!("Set ideal point to {:?}", ideal);

        // extreme point for each objective, seeded with the first member of the splitting
        // front and replaced on a strictly larger fitness value
        let mut extremes = vec![self.split_at; m];
        for (index, candidate) in self.candidates.iter().enumerate() {
            for objective in 0..m {
                if candidate.fitness[objective]
                    > self.candidates[extremes[objective]].fitness[objective]
                {
                    extremes[objective] = index;
                }
            }
        }
        debug!("Set extreme points to candidates {:?}", extremes);

        // columns of the extreme-point matrix, translated by the ideal point
        let columns: Vec<Vec<f64>> = extremes
            .iter()
            .map(|index| elementwise_sub(&self.candidates[*index].fitness, &ideal))
            .collect();

        let distinct: HashSet<SolutionId> = extremes
            .iter()
            .map(|index| self.candidates[*index].id)
            .collect();
        let mut intercepts = if distinct.len() < m {
            // the matrix has repeated columns, skip the solver
            debug!("Extreme points are not distinct, using the diagonal fallback");
            (0..m).map(|r| columns[r][r]).collect()
        } else {
            match self.kernel.hyperplane_intercepts(&columns) {
                Ok(intercepts) => intercepts,
                Err(SelectError::Singular(_)) => {
                    debug!("Extreme-point matrix is singular, using the diagonal fallback");
                    (0..m).map(|r| columns[r][r]).collect()
                }
                Err(e) => return Err(e),
            }
        };

        for (objective, intercept) in intercepts.iter_mut().enumerate() {
            if *intercept <= 0.0 {
                match self.policy {
                    DegenerateFrontPolicy::Error => {
                        return Err(SelectError::DegenerateFront(objective, *intercept));
                    }
                    DegenerateFrontPolicy::UnitIntercepts => {
                        warn!(
                            "The intercept for objective #{} is {}; continuing with a unit intercept",
                            objective, intercept
                        );
                        *intercept = 1.0;
                    }
                }
            }
        }
        debug!("Found intercepts {:?}", intercepts);

        for candidate in self.candidates.iter_mut() {
            candidate.translated =
                elementwise_div(&elementwise_sub(&candidate.fitness, &ideal), &intercepts);
        }

        Ok(NormalisationPoints {
            ideal,
            intercepts,
            extremes,
        })
    }
}
