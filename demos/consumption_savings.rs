//! Builds the state-choice space of a small retirement model and the
//! feasibility mask of its retirement rule.

use indexmap::IndexMap;
use statechoice::functions::{FunctionSet, ModelFunction, Value};
use statechoice::grid::GridSpec;
use statechoice::mask::{FixedInputs, MaskBuilder};
use statechoice::{create_state_choice_space, Model, SpaceError};

fn main() -> Result<(), SpaceError> {
    let model = Model::new()
        .with_state("wealth", GridSpec::linspace(0.0, 100.0, 6))
        .with_state("lagged_retirement", GridSpec::options([0, 1]))
        .with_choice("retirement", GridSpec::options([0, 1]))
        .with_choice("consumption", GridSpec::logspace(1.0, 100.0, 5));

    let space = create_state_choice_space(&model)?;
    println!("dense variables ({} points):", space.n_dense_points());
    for (name, grid) in space.value_grid() {
        println!("  {name}: {grid}");
    }

    // Retirement is absorbing, and nobody may retire before period 2.
    let filters = FunctionSet::new()
        .with(ModelFunction::predicate(
            "absorbing",
            ["lagged_retirement", "retirement"],
            |x| x[0] == 0.0 || x[1] == 1.0,
        ))
        .with(ModelFunction::predicate(
            "old_enough",
            ["retirement", "_period"],
            |x| x[0] == 0.0 || x[1] >= 2.0,
        ));
    let grids: IndexMap<_, _> = space
        .value_grid()
        .iter()
        .filter(|(name, _)| name.as_str() != "wealth")
        .map(|(name, grid)| (name.clone(), grid.clone()))
        .collect();

    for period in 0..4 {
        let fixed = FixedInputs::from([("_period".to_string(), Value::from(period))]);
        let mask = MaskBuilder::new(&grids, &filters)
            .fixed_inputs(&fixed)
            .build()?;
        println!("period {period}, axes {:?}:\n{mask}", grids.keys().collect::<Vec<_>>());
    }

    Ok(())
}
