use std::collections::BTreeMap;

use log::debug;

use crate::core::SelectError;
use crate::kernel::SelectionKernel;
use crate::selection::Candidate;
use crate::utils::ReferenceSet;

/// Associates each candidate's normalised objectives with its closest reference direction.
/// Every candidate receives the direction index and the squared perpendicular distance; for
/// the splitting front the association is additionally collected into a direction-indexed
/// multimap consumed by the niche preservation step.
pub(crate) struct Associate<'a> {
    /// The candidates with the normalised objectives. Entries from `split_at` onwards form
    /// the splitting front.
    candidates: &'a mut [Candidate],
    /// The index of the first splitting-front candidate.
    split_at: usize,
    /// The reference directions.
    references: &'a ReferenceSet,
    /// The provider for the distance computation.
    kernel: &'a dyn SelectionKernel,
}

impl<'a> Associate<'a> {
    /// Build the [`Associate`] struct. This returns an error when a candidate has not been
    /// normalised yet.
    ///
    /// # Arguments
    ///
    /// * `candidates`: The candidates with the normalised objectives.
    /// * `split_at`: The index of the first splitting-front candidate.
    /// * `references`: The reference directions.
    /// * `kernel`: The provider for the distance computation.
    ///
    /// returns: `Result<Associate, SelectError>`
    pub fn new(
        candidates: &'a mut [Candidate],
        split_at: usize,
        references: &'a ReferenceSet,
        kernel: &'a dyn SelectionKernel,
    ) -> Result<Self, SelectError> {
        if candidates
            .iter()
            .any(|candidate| candidate.translated.len() != candidate.fitness.len())
        {
            return Err(SelectError::InvalidParam(
                "candidates",
                "all candidates must be normalised before the association".to_string(),
            ));
        }
        Ok(Self {
            candidates,
            split_at,
            references,
            kernel,
        })
    }

    /// Associate the candidates. Each candidate stores the index of the closest reference
    /// direction and the squared perpendicular distance to it.
    ///
    /// returns: `Result<BTreeMap<usize, Vec<usize>>, SelectError>`. For each direction, the
    /// splitting-front candidates associated with it, in candidate order.
    pub fn calculate(&mut self) -> Result<BTreeMap<usize, Vec<usize>>, SelectError> {
        let points: Vec<Vec<f64>> = self
            .candidates
            .iter()
            .map(|candidate| candidate.translated.clone())
            .collect();
        let nearest = self.kernel.associate(&points, self.references);

        let mut front_map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, (candidate, (reference, distance))) in
            self.candidates.iter_mut().zip(nearest).enumerate()
        {
            candidate.closest_ref = Some(reference);
            candidate.distance = distance;
            debug!(
                "Associated candidate #{} with reference direction #{} (distance = {})",
                index, reference, distance
            );
            if index >= self.split_at {
                front_map.entry(reference).or_default().push(index);
            }
        }

        Ok(front_map)
    }
}
