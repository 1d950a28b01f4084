//! Integration tests projecting the bundled demo scenarios.
use guano::projection::{ControlPolicy, YieldProjector};
use guano::scenario::Scenario;
use guano::units::TonnesPerYear;
use itertools::Itertools;
use rstest::rstest;
use std::path::PathBuf;

#[rstest]
#[case("basic")]
#[case("census")]
#[case("recovery")]
fn test_demo_projection(#[case] name: &str) {
    let path: PathBuf = ["demos", name, "scenario.toml"].iter().collect();
    let scenario = Scenario::from_path(&path).unwrap();
    let projector = YieldProjector::new(scenario.parameters.clone()).unwrap();
    let input = scenario
        .projection_input(ControlPolicy::Controlled, None)
        .unwrap();
    let comparison = projector.compare(&input).unwrap();

    assert_eq!(comparison.years, input.years);
    assert_eq!(comparison.controlled.len(), input.years.len());
    assert_eq!(comparison.uncontrolled.len(), input.years.len());

    let floor = input.base_yield * scenario.parameters.floor_fraction;
    for row in comparison.rows() {
        assert!(row.controlled >= row.uncontrolled);
        assert!(row.uncontrolled >= floor);
        assert!(row.controlled <= input.base_yield);
    }

    // Untreated stands only ever decline
    assert!(
        comparison
            .uncontrolled
            .iter()
            .tuple_windows()
            .all(|(a, b)| b <= a)
    );
    assert!(comparison.uncontrolled.iter().all(|y| y > TonnesPerYear(0.0)));
}

#[test]
fn test_census_demo_uses_census() {
    let scenario = Scenario::from_path("demos/census/scenario.toml").unwrap();
    let census = scenario.census.as_ref().unwrap();
    assert_eq!(scenario.palm_counts().unwrap(), (470, 50));
    assert_eq!(census.total(), 470);
    assert_eq!(scenario.years().unwrap(), (13..=25).collect_vec());
}
