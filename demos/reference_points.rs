use std::error::Error;

use log::info;

use nsga3_select::utils::{DasDennis, NumberOfPartitions};

/// Generate the reference directions for a 3-objective problem and export them.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let generator = DasDennis::new(3, &NumberOfPartitions::OneLayer(4))?;
    let weights = generator.weights();
    info!("Generated {} reference directions", weights.len());
    println!("{}", serde_json::to_string_pretty(&weights)?);

    #[cfg(feature = "plot")]
    {
        use nsga3_select::utils::ReferenceSet;

        let set = ReferenceSet::new(weights, 3)?;
        set.plot("ref_points_3obj_4gaps.png")?;
        info!("Saved chart to ref_points_3obj_4gaps.png");
    }

    Ok(())
}
