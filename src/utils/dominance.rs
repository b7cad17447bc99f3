use crate::core::SelectError;

/// The outcome of a Pareto comparison between two fitness vectors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dominance {
    /// The first vector dominates the second.
    First,
    /// The second vector dominates the first.
    Second,
    /// Neither vector dominates the other.
    Neither,
}

/// Pareto-compare two fitness vectors with all objectives minimised. A vector dominates
/// another when it is no worse on every objective and strictly better on at least one.
///
/// # Arguments
///
/// * `a`: The first fitness vector.
/// * `b`: The second fitness vector.
///
/// returns: `Dominance`
pub fn compare(a: &[f64], b: &[f64]) -> Dominance {
    let mut first_better = false;
    let mut second_better = false;
    for (v_a, v_b) in a.iter().zip(b) {
        if v_a < v_b {
            first_better = true;
        } else if v_b < v_a {
            second_better = true;
        }
    }
    match (first_better, second_better) {
        (true, false) => Dominance::First,
        (false, true) => Dominance::Second,
        _ => Dominance::Neither,
    }
}

/// Outputs of the dominated-count front sort.
#[derive(Debug)]
pub struct FrontLayers {
    /// The Pareto layers. Each child vector contains indexes into the fitness slice passed to
    /// [`pareto_layers`]; the first layer is the non-dominated front and subsequent layers
    /// group individuals with an equal, increasing number of dominators. Within a layer the
    /// indexes keep their input order.
    pub layers: Vec<Vec<usize>>,
    /// The number of individuals dominating each input, in input order.
    pub dominated_by: Vec<usize>,
}

/// Count, for every individual, how many others dominate it and partition the population
/// into Pareto layers by grouping equal counts in ascending order. The count loop compares
/// every pair once, so the cost is `O(P^2 * M)` for `P` individuals and `M` objectives.
///
/// # Arguments
///
/// * `fitness`: The fitness vectors of the population.
///
/// returns: `Result<FrontLayers, SelectError>`. [`SelectError::EmptyFront`] when there is
/// nothing to sort.
pub fn pareto_layers(fitness: &[Vec<f64>]) -> Result<FrontLayers, SelectError> {
    if fitness.is_empty() {
        return Err(SelectError::EmptyFront);
    }

    let mut dominated_by = vec![0_usize; fitness.len()];
    for p in 0..fitness.len() {
        for q in (p + 1)..fitness.len() {
            match compare(&fitness[p], &fitness[q]) {
                Dominance::First => dominated_by[q] += 1,
                Dominance::Second => dominated_by[p] += 1,
                Dominance::Neither => {}
            }
        }
    }

    // stable ascending sort by count keeps the input order within each layer
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by_key(|i| dominated_by[*i]);

    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut current_count = usize::MAX;
    for index in order {
        if dominated_by[index] != current_count {
            current_count = dominated_by[index];
            layers.push(Vec::new());
        }
        layers.last_mut().unwrap().push(index);
    }

    Ok(FrontLayers {
        layers,
        dominated_by,
    })
}
