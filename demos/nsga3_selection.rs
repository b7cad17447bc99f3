use std::error::Error;

use log::info;

use nsga3_select::core::{DynObjectives, FrontSemantics};
use nsga3_select::selection::{
    DegenerateFrontPolicy, NSGA3Selector, NSGA3SelectorArg, ReferencePointOptions,
};
use nsga3_select::utils::NumberOfPartitions;

/// Run one selection pass on a 2-objective population lying on a linear trade-off front.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = NSGA3SelectorArg {
        reference_points: ReferencePointOptions::Lattice(NumberOfPartitions::OneLayer(4)),
        record_pareto_front: true,
        front_semantics: FrontSemantics::Frozen,
        degenerate_front_policy: DegenerateFrontPolicy::Error,
        parallel: Some(true),
        seed: Some(42),
    };
    println!("options: {}", serde_json::to_string_pretty(&args)?);

    let mut selector = NSGA3Selector::new(DynObjectives(2), args)?;
    info!("{selector}");

    // twenty points on the segment between (0, 1) and (1, 0); all mutually non-dominated
    let population: Vec<Vec<f64>> = (0..20)
        .map(|i| vec![i as f64 / 19.0, 1.0 - i as f64 / 19.0])
        .collect();
    selector.set_population(population)?;

    selector.select(5)?;
    for id in selector.ids() {
        println!("kept {} with fitness {:?}", id, selector.fitness_of(id));
    }
    println!("best fitness: {:?}", selector.best_fitness());

    Ok(())
}
