use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::utils::elementwise_min;

/// Receives the non-dominated front published at every selection pass. The engine hands the
/// observer deep-copied fitness rows, so the snapshot can outlive the individuals it was
/// taken from and may be read while the next generation is being evaluated.
pub trait ParetoObserver {
    /// Called once per selection pass with the fitness vectors of the current Pareto front.
    ///
    /// # Arguments
    ///
    /// * `front`: The fitness vectors of the non-dominated individuals.
    fn update_pf(&mut self, front: &[Vec<f64>]);
}

/// Controls whether a published front snapshot stays valid across later selection passes.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrontSemantics {
    /// The snapshot allocation may be reused by the next pass. Handles returned by
    /// [`FrontArchive::snapshot`] carry no stability guarantee across passes.
    MayMutate,
    /// Every publication allocates a fresh snapshot. Handles returned before a new pass
    /// remain valid and unchanged afterwards.
    Frozen,
}

/// The engine's archive of published Pareto fronts. The current snapshot backs the
/// `pareto_front` and `best_fitness` queries; when history recording is enabled, one entry
/// is kept per selection pass.
#[derive(Debug)]
pub struct FrontArchive {
    semantics: FrontSemantics,
    record_history: bool,
    current: Arc<Vec<Vec<f64>>>,
    history: Vec<Arc<Vec<Vec<f64>>>>,
}

impl FrontArchive {
    /// Create an empty archive.
    ///
    /// # Arguments
    ///
    /// * `record_history`: Whether to keep one snapshot per selection pass.
    /// * `semantics`: The snapshot stability contract.
    ///
    /// returns: `FrontArchive`
    pub(crate) fn new(record_history: bool, semantics: FrontSemantics) -> Self {
        Self {
            semantics,
            record_history,
            current: Arc::new(Vec::new()),
            history: Vec::new(),
        }
    }

    /// Store the front published by a selection pass.
    ///
    /// # Arguments
    ///
    /// * `front`: The deep-copied fitness vectors of the non-dominated individuals.
    pub(crate) fn publish(&mut self, front: Vec<Vec<f64>>) {
        match self.semantics {
            FrontSemantics::Frozen => self.current = Arc::new(front),
            // reuse the allocation when nobody else holds the snapshot
            FrontSemantics::MayMutate => match Arc::get_mut(&mut self.current) {
                Some(slot) => *slot = front,
                None => self.current = Arc::new(front),
            },
        }
        if self.record_history {
            self.history.push(self.current.clone());
        }
    }

    /// The last published front. This is empty until a selection pass runs.
    ///
    /// return: `Arc<Vec<Vec<f64>>>`
    pub fn snapshot(&self) -> Arc<Vec<Vec<f64>>> {
        self.current.clone()
    }

    /// The per-pass snapshots collected so far. This is empty unless history recording is
    /// enabled.
    ///
    /// return: `&[Arc<Vec<Vec<f64>>>]`
    pub fn history(&self) -> &[Arc<Vec<Vec<f64>>>] {
        &self.history
    }

    /// The element-wise minimum fitness across the last published front, or `None` when no
    /// front has been published yet.
    ///
    /// return: `Option<Vec<f64>>`
    pub fn best_fitness(&self) -> Option<Vec<f64>> {
        let mut members = self.current.iter();
        let first = members.next()?.clone();
        Some(members.fold(first, |best, f| elementwise_min(&best, f)))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::core::observer::{FrontArchive, FrontSemantics};

    #[test]
    fn test_best_fitness_is_elementwise_min() {
        let mut archive = FrontArchive::new(false, FrontSemantics::Frozen);
        assert!(archive.best_fitness().is_none());

        archive.publish(vec![vec![1.0, 5.0], vec![4.0, 2.0], vec![3.0, 3.0]]);
        assert_eq!(archive.best_fitness().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_frozen_snapshots_survive_later_passes() {
        let mut archive = FrontArchive::new(false, FrontSemantics::Frozen);
        archive.publish(vec![vec![1.0, 2.0]]);
        let first = archive.snapshot();

        archive.publish(vec![vec![9.0, 9.0]]);
        assert_eq!(*first, vec![vec![1.0, 2.0]]);
        assert_eq!(*archive.snapshot(), vec![vec![9.0, 9.0]]);
    }

    #[test]
    fn test_may_mutate_reuses_the_allocation() {
        let mut archive = FrontArchive::new(false, FrontSemantics::MayMutate);
        archive.publish(vec![vec![1.0, 2.0]]);
        let first = Arc::as_ptr(&archive.snapshot());

        archive.publish(vec![vec![9.0, 9.0]]);
        assert_eq!(first, Arc::as_ptr(&archive.snapshot()));
    }

    #[test]
    fn test_history_recording() {
        let mut archive = FrontArchive::new(true, FrontSemantics::Frozen);
        archive.publish(vec![vec![1.0]]);
        archive.publish(vec![vec![2.0]]);
        let history = archive.history();
        assert_eq!(history.len(), 2);
        assert_eq!(*history[0], vec![vec![1.0]]);
        assert_eq!(*history[1], vec![vec![2.0]]);
    }
}
