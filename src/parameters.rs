//! Defines the `ModelParameters` struct, which holds the constants of the yield projection.
//!
//! Every constant has a default, so an empty TOML table gives the canonical parameter set.
use crate::census::CensusYields;
use crate::input::{
    deserialise_proportion, deserialise_proportion_nonzero, input_err_msg, is_sorted_and_unique,
    read_toml,
};
use crate::soil::SoilCondition;
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::path::Path;

/// The largest value permitted for the weather, age and soil factors
pub const MAX_CONDITION_FACTOR: Dimensionless = Dimensionless(1.5);

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::from($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_infection_cap, Dimensionless, 0.8);
define_unit_param_default!(default_infection_scale, Dimensionless, 1.5);
define_unit_param_default!(default_soil_factor, Dimensionless, 0.8);
define_unit_param_default!(default_controlled_rate, Dimensionless, 0.1);
define_unit_param_default!(default_uncontrolled_rate, Dimensionless, 0.6);
define_unit_param_default!(default_progression_rate, Dimensionless, 0.05);
define_unit_param_default!(default_reduction_cap, Dimensionless, 0.9);
define_unit_param_default!(default_floor_fraction, Dimensionless, 0.1);
define_param_default!(default_final_year, u32, 25);

/// Monthly rainfall bands (mm) and the weather factor for each
fn default_weather_bands() -> StepFunction {
    StepFunction::new(&[(100.0, 0.6), (200.0, 0.8), (300.0, 1.0)], 0.9)
}

/// Stand age bands (years) and the age factor for each
fn default_age_bands() -> StepFunction {
    StepFunction::new(&[(5.0, 0.5), (15.0, 0.8), (20.0, 1.0)], 1.2)
}

/// The soil factor for each soil condition
fn default_soil_factors() -> IndexMap<SoilCondition, Dimensionless> {
    [
        (SoilCondition::Baik, 0.8),
        (SoilCondition::Sederhana, 1.0),
        (SoilCondition::Buruk, 1.2),
        (SoilCondition::Gambut, 1.3),
    ]
    .into_iter()
    .map(|(condition, factor)| (condition, Dimensionless(factor)))
    .collect()
}

/// One band of a [`StepFunction`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepBand {
    /// The (exclusive) upper edge of the band
    pub upper: f64,
    /// The factor for values which fall within the band
    pub factor: Dimensionless,
}

/// A piecewise constant function of a single value.
///
/// Bands are checked in order and the first band whose upper edge is above the value applies.
/// Values at or beyond the last edge take the `above` factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepFunction {
    /// Bands in ascending order of upper edge
    pub bands: Vec<StepBand>,
    /// Factor for values at or above the last band edge
    pub above: Dimensionless,
}

impl StepFunction {
    /// Create a new [`StepFunction`] from (upper edge, factor) pairs
    pub fn new(bands: &[(f64, f64)], above: f64) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|&(upper, factor)| StepBand {
                    upper,
                    factor: Dimensionless(factor),
                })
                .collect(),
            above: Dimensionless(above),
        }
    }

    /// Get the factor for the given value
    pub fn evaluate(&self, value: f64) -> Dimensionless {
        self.bands
            .iter()
            .find(|band| value < band.upper)
            .map_or(self.above, |band| band.factor)
    }

    /// Iterate over all the factors in the function
    fn factors(&self) -> impl Iterator<Item = Dimensionless> + '_ {
        self.bands
            .iter()
            .map(|band| band.factor)
            .chain(std::iter::once(self.above))
    }
}

/// What to do with a soil condition label which names no known soil condition
#[derive(
    DeserializeLabeledStringEnum, SerializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default,
)]
pub enum UnknownSoilPolicy {
    /// Reject the input
    #[default]
    #[string = "strict"]
    Strict,
    /// Use the default soil factor
    #[string = "fallback"]
    Fallback,
}

/// Partial recovery of treated stands.
///
/// Only applies to controlled projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecoveryParameters {
    /// Recovery applies to year indices (0-based) greater than this
    pub start_index: u32,
    /// Amount subtracted from the annual reduction once recovery applies
    #[serde(deserialize_with = "deserialise_proportion")]
    pub offset: Dimensionless,
}

/// The constants of the yield projection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelParameters {
    /// Weather factor as a function of average monthly rainfall (mm)
    #[serde(default = "default_weather_bands")]
    pub weather_bands: StepFunction,
    /// Age factor as a function of stand age (years)
    #[serde(default = "default_age_bands")]
    pub age_bands: StepFunction,
    /// The highest value infection pressure can take
    #[serde(default = "default_infection_cap")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub infection_cap: Dimensionless,
    /// Multiplier applied to the ratio of infected palms to total palms
    #[serde(default = "default_infection_scale")]
    pub infection_scale: Dimensionless,
    /// Soil factor for each soil condition
    #[serde(default = "default_soil_factors")]
    pub soil_factors: IndexMap<SoilCondition, Dimensionless>,
    /// Soil factor for soil conditions missing from `soil_factors`.
    ///
    /// Also applies to unrecognised soil conditions if `unknown_soil_policy` is `fallback`.
    #[serde(default = "default_soil_factor")]
    pub default_soil_factor: Dimensionless,
    /// How to treat unrecognised soil conditions
    #[serde(default)]
    pub unknown_soil_policy: UnknownSoilPolicy,
    /// Reduction rate constant for stands under treatment
    #[serde(default = "default_controlled_rate")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub controlled_rate: Dimensionless,
    /// Reduction rate constant for untreated stands
    #[serde(default = "default_uncontrolled_rate")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub uncontrolled_rate: Dimensionless,
    /// Increase in disease impact per year projected
    #[serde(default = "default_progression_rate")]
    pub progression_rate: Dimensionless,
    /// The highest annual reduction allowed
    #[serde(default = "default_reduction_cap")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub reduction_cap: Dimensionless,
    /// Projected yield never falls below this fraction of the base yield
    #[serde(default = "default_floor_fraction")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub floor_fraction: Dimensionless,
    /// Optional partial recovery for controlled projections
    #[serde(default)]
    pub recovery: Option<RecoveryParameters>,
    /// The last harvest year projected when years are derived from a harvest year
    #[serde(default = "default_final_year")]
    pub final_year: u32,
    /// Per-palm yields and losses for census-based estimates
    #[serde(default)]
    pub census: CensusYields,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            weather_bands: default_weather_bands(),
            age_bands: default_age_bands(),
            infection_cap: default_infection_cap(),
            infection_scale: default_infection_scale(),
            soil_factors: default_soil_factors(),
            default_soil_factor: default_soil_factor(),
            unknown_soil_policy: UnknownSoilPolicy::default(),
            controlled_rate: default_controlled_rate(),
            uncontrolled_rate: default_uncontrolled_rate(),
            progression_rate: default_progression_rate(),
            reduction_cap: default_reduction_cap(),
            floor_fraction: default_floor_fraction(),
            recovery: None,
            final_year: default_final_year(),
            census: CensusYields::default(),
        }
    }
}

/// Check that a condition factor is finite and within bounds
fn check_condition_factor(name: &str, factor: Dimensionless) -> Result<()> {
    ensure!(
        factor.is_finite() && factor >= Dimensionless(0.0) && factor <= MAX_CONDITION_FACTOR,
        "{name} factors must be between 0 and {}",
        MAX_CONDITION_FACTOR.value()
    );

    Ok(())
}

/// Check that a step function has finite, increasing band edges and valid factors
fn check_step_function(name: &str, function: &StepFunction) -> Result<()> {
    ensure!(
        function.bands.iter().all(|band| band.upper.is_finite()),
        "{name} band edges must be finite"
    );
    ensure!(
        is_sorted_and_unique(function.bands.iter().map(|band| band.upper)),
        "{name} band edges must be strictly increasing"
    );
    for factor in function.factors() {
        check_condition_factor(name, factor)?;
    }

    Ok(())
}

/// Check that the controlled rate is below the uncontrolled rate
fn check_policy_rates(controlled: Dimensionless, uncontrolled: Dimensionless) -> Result<()> {
    ensure!(
        controlled < uncontrolled,
        "controlled_rate must be less than uncontrolled_rate"
    );

    Ok(())
}

/// Check that a multiplier is a finite, non-negative number
fn check_non_negative(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Dimensionless(0.0),
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the census yields are all finite and non-negative
fn check_census_yields(yields: &CensusYields) -> Result<()> {
    for (name, value) in yields.named_values() {
        ensure!(
            value.is_finite() && value >= 0.0,
            "census.{name} must be a finite number greater than or equal to zero"
        );
    }

    Ok(())
}

impl ModelParameters {
    /// Read model parameters from the specified TOML file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the parameters file
    ///
    /// # Returns
    ///
    /// The file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<ModelParameters> {
        let file_path = file_path.as_ref();
        let params: ModelParameters = read_toml(file_path)?;

        params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(params)
    }

    /// Validate parameters after reading them in
    pub fn validate(&self) -> Result<()> {
        // infection_cap, controlled_rate, uncontrolled_rate, reduction_cap and floor_fraction
        // are checked on deserialisation, but not when built in code
        for (name, value) in [
            ("infection_cap", self.infection_cap),
            ("controlled_rate", self.controlled_rate),
            ("uncontrolled_rate", self.uncontrolled_rate),
            ("reduction_cap", self.reduction_cap),
        ] {
            ensure!(
                (Dimensionless(0.0)..=Dimensionless(1.0)).contains(&value),
                "{name} must be between 0 and 1"
            );
        }
        ensure!(
            self.floor_fraction > Dimensionless(0.0) && self.floor_fraction <= Dimensionless(1.0),
            "floor_fraction must be > 0 and <= 1"
        );

        check_step_function("weather_bands", &self.weather_bands)?;
        check_step_function("age_bands", &self.age_bands)?;

        check_non_negative("infection_scale", self.infection_scale)?;
        check_non_negative("progression_rate", self.progression_rate)?;

        for factor in self.soil_factors.values() {
            check_condition_factor("soil", *factor)?;
        }
        check_condition_factor("default_soil", self.default_soil_factor)?;

        check_policy_rates(self.controlled_rate, self.uncontrolled_rate)?;

        if let Some(recovery) = &self.recovery {
            ensure!(
                (Dimensionless(0.0)..=Dimensionless(1.0)).contains(&recovery.offset),
                "recovery.offset must be between 0 and 1"
            );
        }

        ensure!(self.final_year > 0, "final_year cannot be zero");

        check_census_yields(&self.census)?;

        if self.unknown_soil_policy == UnknownSoilPolicy::Fallback {
            warn!(
                "Unrecognised soil conditions will be given the default soil factor ({})",
                self.default_soil_factor.value()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_matches_empty_toml() {
        let params: ModelParameters = toml::from_str("").unwrap();
        assert_eq!(params, ModelParameters::default());
        params.validate().unwrap();
    }

    #[rstest]
    #[case(0.0, Dimensionless(0.6))]
    #[case(99.9, Dimensionless(0.6))]
    #[case(100.0, Dimensionless(0.8))]
    #[case(199.0, Dimensionless(0.8))]
    #[case(250.0, Dimensionless(1.0))]
    #[case(300.0, Dimensionless(0.9))]
    #[case(1000.0, Dimensionless(0.9))]
    fn test_step_function_evaluate(#[case] rainfall: f64, #[case] expected: Dimensionless) {
        assert_eq!(default_weather_bands().evaluate(rainfall), expected);
    }

    #[test]
    fn test_step_function_no_bands() {
        let function = StepFunction::new(&[], 0.7);
        assert_eq!(function.evaluate(-5.0), Dimensionless(0.7));
        assert_eq!(function.evaluate(5.0), Dimensionless(0.7));
    }

    #[rstest]
    #[case(StepFunction::new(&[(1.0, 0.5), (2.0, 0.6)], 0.7), true)]
    #[case(StepFunction::new(&[(2.0, 0.5), (1.0, 0.6)], 0.7), false)] // out of order
    #[case(StepFunction::new(&[(1.0, 0.5), (1.0, 0.6)], 0.7), false)] // duplicate
    #[case(StepFunction::new(&[(f64::INFINITY, 0.5)], 0.7), false)]
    #[case(StepFunction::new(&[(1.0, -0.1)], 0.7), false)]
    #[case(StepFunction::new(&[(1.0, 0.5)], 1.6), false)]
    #[case(StepFunction::new(&[(1.0, f64::NAN)], 0.7), false)]
    fn test_check_step_function(#[case] function: StepFunction, #[case] expected_valid: bool) {
        assert_eq!(
            check_step_function("weather_bands", &function).is_ok(),
            expected_valid
        );
    }

    #[rstest]
    #[case(0.1, 0.6, true)]
    #[case(0.08, 0.15, true)]
    #[case(0.6, 0.6, false)]
    #[case(0.6, 0.1, false)]
    fn test_check_policy_rates(
        #[case] controlled: f64,
        #[case] uncontrolled: f64,
        #[case] expected_valid: bool,
    ) {
        assert_eq!(
            check_policy_rates(Dimensionless(controlled), Dimensionless(uncontrolled)).is_ok(),
            expected_valid
        );
    }

    #[test]
    fn test_validate_rejects_bad_floor_fraction() {
        let params = ModelParameters {
            floor_fraction: Dimensionless(0.0),
            ..ModelParameters::default()
        };
        assert_error!(params.validate(), "floor_fraction must be > 0 and <= 1");
    }

    #[test]
    fn test_validate_rejects_bad_soil_factor() {
        let mut params = ModelParameters::default();
        params
            .soil_factors
            .insert(SoilCondition::Gambut, Dimensionless(2.0));
        assert_error!(params.validate(), "soil factors must be between 0 and 1.5");
    }

    #[test]
    fn test_validate_rejects_bad_census_yield() {
        let mut params = ModelParameters::default();
        params.census.category_e = crate::units::TonnesPerYearPerPalm(-1.0);
        assert_error!(
            params.validate(),
            "census.category_e must be a finite number greater than or equal to zero"
        );
    }

    #[test]
    fn test_params_from_toml() {
        let params: ModelParameters = toml::from_str(
            r#"
            floor_fraction = 0.05
            unknown_soil_policy = "fallback"
            controlled_rate = 0.08
            uncontrolled_rate = 0.15

            [soil_factors]
            baik = 0.7

            [recovery]
            start_index = 5
            offset = 0.02

            [weather_bands]
            bands = [{upper = 150.0, factor = 0.7}]
            above = 1.0
            "#,
        )
        .unwrap();

        params.validate().unwrap();
        assert_eq!(params.floor_fraction, Dimensionless(0.05));
        assert_eq!(params.unknown_soil_policy, UnknownSoilPolicy::Fallback);
        assert_eq!(params.soil_factors.len(), 1);
        assert_eq!(
            params.recovery,
            Some(RecoveryParameters {
                start_index: 5,
                offset: Dimensionless(0.02)
            })
        );
        assert_eq!(params.weather_bands.evaluate(200.0), Dimensionless(1.0));
        assert_eq!(params.age_bands, default_age_bands());
    }

    #[rstest]
    #[case("baik")]
    #[case("Baik")]
    #[case("BAIK")]
    fn test_soil_factor_keys_ignore_case(#[case] key: &str) {
        let params: ModelParameters =
            toml::from_str(&format!("[soil_factors]\n{key} = 0.7\nGambut = 1.1")).unwrap();
        assert_eq!(
            params.soil_factors.get(&SoilCondition::Baik),
            Some(&Dimensionless(0.7))
        );
        assert_eq!(
            params.soil_factors.get(&SoilCondition::Gambut),
            Some(&Dimensionless(1.1))
        );
    }

    #[rstest]
    #[case("floor_fraction = 0.0")]
    #[case("reduction_cap = 1.5")]
    #[case("unknown_soil_policy = \"lenient\"")]
    #[case("no_such_parameter = 1")]
    #[case("[soil_factors]\nclay = 1.0")]
    fn test_params_from_toml_invalid(#[case] toml_str: &str) {
        assert!(toml::from_str::<ModelParameters>(toml_str).is_err());
    }

    #[test]
    fn test_params_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("parameters.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "controlled_rate = 0.7").unwrap();
        }

        // Controlled rate above the uncontrolled rate
        assert!(ModelParameters::from_path(&file_path).is_err());

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "progression_rate = 0.03").unwrap();
        }
        let params = ModelParameters::from_path(&file_path).unwrap();
        assert_eq!(params.progression_rate, Dimensionless(0.03));
    }
}
