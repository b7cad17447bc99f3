use std::collections::BTreeMap;

use log::debug;
use ordered_float::OrderedFloat;
use rand::prelude::SliceRandom;
use rand::{Rng, RngCore};

use crate::core::SelectError;
use crate::selection::Candidate;

/// Fills the remaining survivor slots from the splitting front by equalising the niche
/// occupancy across the reference directions. Every iteration targets the direction with the
/// lowest niche count: an empty niche receives its closest splitting-front candidate, an
/// occupied niche a uniformly drawn one, and a direction with no remaining candidates is
/// excluded from the rest of the pass.
///
/// The niche and candidate books are ordered maps, so with a seeded generator the loop is
/// reproducible. At most two uniform draws happen per iteration: one to break a tie between
/// directions with the same niche count and one to pick the candidate of an occupied niche;
/// either draw is skipped when the choice set has a single element.
pub(crate) struct Niching<'a> {
    /// The indexes of the candidates admitted so far. Completed in place up to the target.
    selected: &'a mut Vec<usize>,
    /// For each reference direction, the splitting-front candidates still available.
    front_map: &'a mut BTreeMap<usize, Vec<usize>>,
    /// The candidates of the selection pass.
    candidates: &'a [Candidate],
    /// The number of individuals still to admit.
    missing: usize,
    /// The niche count for each reference direction still in play.
    rho: BTreeMap<usize, usize>,
    /// The random number generator.
    rng: &'a mut dyn RngCore,
}

impl<'a> Niching<'a> {
    /// Build the [`Niching`] struct. The niche counts start at zero for every direction and
    /// are incremented with the association of each already admitted candidate.
    ///
    /// # Arguments
    ///
    /// * `selected`: The indexes of the candidates admitted so far.
    /// * `front_map`: The splitting-front candidates grouped by reference direction.
    /// * `candidates`: The candidates of the selection pass.
    /// * `missing`: The number of individuals to admit from the splitting front.
    /// * `reference_count`: The total number of reference directions.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Niching, SelectError>`
    pub fn new(
        selected: &'a mut Vec<usize>,
        front_map: &'a mut BTreeMap<usize, Vec<usize>>,
        candidates: &'a [Candidate],
        missing: usize,
        reference_count: usize,
        rng: &'a mut dyn RngCore,
    ) -> Result<Self, SelectError> {
        let available: usize = front_map.values().map(|pool| pool.len()).sum();
        if available < missing {
            return Err(SelectError::InvalidParam(
                "missing",
                format!(
                    "the number of individuals to add ({}) is larger than the number of splitting-front candidates ({})",
                    missing, available
                ),
            ));
        }

        let mut rho: BTreeMap<usize, usize> =
            (0..reference_count).map(|index| (index, 0)).collect();
        for index in selected.iter() {
            let reference = candidates[*index].closest_ref.ok_or_else(|| {
                SelectError::InvalidParam(
                    "candidates",
                    "all admitted candidates must be associated before the niche preservation"
                        .to_string(),
                )
            })?;
            *rho.get_mut(&reference).ok_or_else(|| {
                SelectError::InvalidParam(
                    "candidates",
                    format!("the reference direction index {} is out of range", reference),
                )
            })? += 1;
        }

        Ok(Self {
            selected,
            front_map,
            candidates,
            missing,
            rho,
            rng,
        })
    }

    /// Admit candidates from the splitting front until the target size is reached. Each
    /// iteration either admits one candidate or excludes one exhausted direction, so the
    /// loop terminates.
    ///
    /// returns: `Result<(), SelectError>`
    pub fn calculate(&mut self) -> Result<(), SelectError> {
        let mut admitted = 0;
        while admitted < self.missing {
            // the directions tied on the lowest niche count, in index order
            let min_rho = *self.rho.values().min().ok_or_else(|| {
                SelectError::InvalidParam(
                    "rho",
                    "all reference directions were excluded before the target was reached"
                        .to_string(),
                )
            })?;
            let tied: Vec<usize> = self
                .rho
                .iter()
                .filter_map(|(index, count)| (*count == min_rho).then_some(*index))
                .collect();
            let target = match tied.len() {
                1 => tied[0],
                _ => *tied.choose(&mut self.rng).unwrap_or(&tied[0]),
            };

            let pool = match self.front_map.get_mut(&target) {
                Some(pool) if !pool.is_empty() => pool,
                _ => {
                    // nothing in the splitting front can fill this niche at this pass
                    debug!("Excluding reference direction #{}", target);
                    self.rho.remove(&target);
                    continue;
                }
            };

            let position = if min_rho == 0 {
                // empty niche: take the closest candidate, first one on a tie
                pool.iter()
                    .enumerate()
                    .min_by_key(|(_, index)| OrderedFloat(self.candidates[**index].distance))
                    .map(|(position, _)| position)
                    .unwrap_or(0)
            } else if pool.len() == 1 {
                0
            } else {
                self.rng.gen_range(0..pool.len())
            };

            let index = pool.remove(position);
            debug!(
                "Admitting candidate #{} for reference direction #{} ({})",
                index,
                target,
                if min_rho == 0 { "closest" } else { "random" }
            );
            self.selected.push(index);
            *self.rho.entry(target).or_insert(0) += 1;
            admitted += 1;
        }

        Ok(())
    }
}
