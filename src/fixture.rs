//! Fixtures for tests

use crate::census::Census;
use crate::parameters::ModelParameters;
use crate::projection::{ControlPolicy, ProjectionInput, YieldProjector};
use crate::units::{Millimetres, TonnesPerYear};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn model_parameters() -> ModelParameters {
    ModelParameters::default()
}

#[fixture]
pub fn yield_projector(model_parameters: ModelParameters) -> YieldProjector {
    YieldProjector::new(model_parameters).unwrap()
}

/// A 10-year-old stand of 100 palms, 20 of them infected, on good soil
#[fixture]
pub fn projection_input() -> ProjectionInput {
    ProjectionInput {
        base_yield: TonnesPerYear(20.0),
        stand_age: 10,
        total_palm_count: 100,
        infected_palm_count: 20,
        rainfall_monthly_avg: Millimetres(250.0),
        soil_condition: "Baik".into(),
        years: vec![11, 12, 13],
        policy: ControlPolicy::Controlled,
    }
}

/// A census of 100 palms, 20 of them unhealthy
#[fixture]
pub fn census() -> Census {
    Census {
        a: 5,
        b: 4,
        c: 3,
        d: 3,
        e: 80,
        f: 5,
    }
}
