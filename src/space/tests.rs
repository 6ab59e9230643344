//! Test suite for state-choice space assembly.

use super::*;
use crate::error::SpaceError;
use crate::functions::ModelFunction;
use crate::grid::{GridError, GridSpec};

/// Retirement model without any filters.
fn base_model() -> Model {
    Model::new()
        .with_state("wealth", GridSpec::linspace(0.0, 100.0, 11))
        .with_state("lagged_retirement", GridSpec::options([0, 1]))
        .with_choice("retirement", GridSpec::options([0, 1]))
        .with_choice("consumption", GridSpec::logspace(1.0, 100.0, 20))
}

mod dense_path {
    use super::*;

    #[test]
    fn value_grid_keys_are_dense_variables() {
        let model = base_model();
        let space = create_state_choice_space(&model).unwrap();
        let partition = classify(&model).unwrap();

        let keys: std::collections::BTreeSet<String> =
            space.value_grid().keys().cloned().collect();
        assert_eq!(keys, partition.dense);
    }

    #[test]
    fn combination_grid_empty_without_sparse_or_filters() {
        let space = create_state_choice_space(&base_model()).unwrap();
        assert!(space.combination_grid().is_empty());
    }

    #[test]
    fn value_grid_in_choices_then_states_order() {
        let space = create_state_choice_space(&base_model()).unwrap();
        assert_eq!(
            space.dense_names().collect::<Vec<_>>(),
            vec!["retirement", "wealth", "lagged_retirement"]
        );
    }

    #[test]
    fn continuous_choice_is_not_in_value_grid() {
        let space = create_state_choice_space(&base_model()).unwrap();
        assert!(!space.value_grid().contains_key("consumption"));
    }

    #[test]
    fn grids_hold_built_coordinates() {
        let space = create_state_choice_space(&base_model()).unwrap();
        let wealth = &space.value_grid()["wealth"];
        assert_eq!(wealth.len(), 11);
        assert_eq!(wealth[0], 0.0);
        assert_eq!(wealth[10], 100.0);
        assert_eq!(space.value_grid()["retirement"].to_vec(), vec![0.0, 1.0]);
        assert_eq!(space.n_dense_points(), 2 * 11 * 2);
    }

    #[test]
    fn state_spec_overrides_choice_of_same_name() {
        let model = Model::new()
            .with_choice("x", GridSpec::options([1, 2, 3]))
            .with_state("y", GridSpec::options([0]))
            .with_state("x", GridSpec::options([7, 8]));
        let space = create_state_choice_space(&model).unwrap();

        assert_eq!(space.dense_names().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(space.value_grid()["x"].to_vec(), vec![7.0, 8.0]);
    }

    #[test]
    fn empty_model_gives_empty_space() {
        let space = create_state_choice_space(&Model::new()).unwrap();
        assert!(space.value_grid().is_empty());
        assert!(space.combination_grid().is_empty());
        assert_eq!(space.n_dense_points(), 1);
    }
}

mod sparse_path {
    use super::*;

    #[test]
    fn sparse_variables_are_not_implemented() {
        let model = base_model().with_state_filter(ModelFunction::predicate(
            "absorbing_retirement",
            ["lagged_retirement", "retirement"],
            |x| x[0] == 0.0 || x[1] == 1.0,
        ));

        let err = create_state_choice_space(&model).unwrap_err();
        assert!(matches!(err, SpaceError::NotImplementedFeature(_)));
        assert!(err.to_string().contains("lagged_retirement, retirement"));
    }

    #[test]
    fn general_filters_are_not_implemented() {
        let model = base_model().with_filter(ModelFunction::predicate(
            "budget",
            ["consumption", "wealth"],
            |x| x[0] <= x[1],
        ));

        let err = create_state_choice_space(&model).unwrap_err();
        assert!(matches!(err, SpaceError::NotImplementedFeature(_)));
    }

    #[test]
    fn state_filter_reading_continuous_choice_fails() {
        let model = base_model().with_state_filter(ModelFunction::predicate(
            "budget",
            ["consumption", "wealth"],
            |x| x[0] <= x[1],
        ));
        let partition = classify(&model).unwrap();
        assert!(partition.is_sparse("wealth"));
        assert!(create_state_choice_space(&model).is_err());
    }
}

mod errors {
    use super::*;

    #[test]
    fn invalid_grid_aborts_pipeline() {
        let model = base_model().with_state("bad", GridSpec::logspace(0.0, 1.0, 3));
        let err = create_state_choice_space(&model).unwrap_err();
        assert!(matches!(
            err,
            SpaceError::Grid(GridError::InvalidGridParameter { .. })
        ));
    }

    #[test]
    fn unknown_grid_type_surfaces_at_spec_construction() {
        let err = GridSpec::parametric("chebyshev", [("n_points", 3.0)]).unwrap_err();
        let err = SpaceError::from(err);
        assert_eq!(
            err,
            SpaceError::Grid(GridError::UnknownGridType("chebyshev".to_string()))
        );
    }
}

#[cfg(feature = "serde")]
mod from_json {
    use super::*;

    #[test]
    fn deserialized_specs_assemble() {
        let specs: VariableSpecs = serde_json::from_str(
            r#"{
                "states": {"wealth": {"grid_type": "linspace", "start": 0, "stop": 4, "n_points": 5}},
                "choices": {"retirement": {"options": [1, 0]}}
            }"#,
        )
        .unwrap();
        let space = create_state_choice_space(&Model::from_specs(specs)).unwrap();

        assert_eq!(
            space.value_grid()["wealth"].to_vec(),
            vec![0.0, 1.0, 2.0, 3.0, 4.0]
        );
        assert_eq!(space.value_grid()["retirement"].to_vec(), vec![1.0, 0.0]);
    }
}
