//! Condition factors which scale the rate at which Ganoderma reduces yield.
use crate::error::ProjectionError;
use crate::parameters::{MAX_CONDITION_FACTOR, ModelParameters, UnknownSoilPolicy};
use crate::soil::SoilCondition;
use crate::units::{Dimensionless, Millimetres};
use log::warn;

/// The factors derived from a single projection input.
///
/// Weather, age and soil factors lie in `[0, MAX_CONDITION_FACTOR]`; infection pressure lies in
/// `[0, infection_cap]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorSet {
    /// Effect of rainfall on disease spread
    pub weather: Dimensionless,
    /// Susceptibility of the stand given its age
    pub age: Dimensionless,
    /// Effect of soil drainage and fertility on disease spread
    pub soil: Dimensionless,
    /// Bounded measure of the density of infected palms
    pub infection_pressure: Dimensionless,
}

impl FactorSet {
    /// The product of all the factors
    pub fn product(&self) -> Dimensionless {
        self.weather * self.age * self.soil * self.infection_pressure
    }
}

/// Restrict a condition factor to its permitted range
fn clamp_condition_factor(factor: Dimensionless) -> Dimensionless {
    factor.clamp(Dimensionless(0.0), MAX_CONDITION_FACTOR)
}

/// Weather factor for the given average monthly rainfall
pub fn weather_factor(params: &ModelParameters, rainfall: Millimetres) -> Dimensionless {
    clamp_condition_factor(params.weather_bands.evaluate(rainfall.value()))
}

/// Age factor for a stand of the given age (years)
pub fn age_factor(params: &ModelParameters, stand_age: u32) -> Dimensionless {
    clamp_condition_factor(params.age_bands.evaluate(f64::from(stand_age)))
}

/// Infection pressure for the given palm counts.
///
/// The infection ratio is zero if there are no palms.
pub fn infection_pressure(
    params: &ModelParameters,
    infected_palm_count: u32,
    total_palm_count: u32,
) -> Dimensionless {
    let ratio =
        Dimensionless(f64::from(infected_palm_count) / f64::from(total_palm_count.max(1)));
    (ratio * params.infection_scale).clamp(Dimensionless(0.0), params.infection_cap)
}

/// Soil factor for a soil condition label.
///
/// Known soil conditions missing from the soil factor table get the default soil factor. An
/// unrecognised label is an error under the strict policy and gets the default factor otherwise.
pub fn soil_factor(params: &ModelParameters, label: &str) -> Result<Dimensionless, ProjectionError> {
    let factor = match SoilCondition::from_label(label) {
        Some(condition) => params
            .soil_factors
            .get(&condition)
            .copied()
            .unwrap_or(params.default_soil_factor),
        None => match params.unknown_soil_policy {
            UnknownSoilPolicy::Strict => {
                return Err(ProjectionError::invalid_configuration(format!(
                    "Unknown soil condition: {label}"
                )));
            }
            UnknownSoilPolicy::Fallback => {
                warn!(
                    "Unknown soil condition '{label}', using default soil factor {}",
                    params.default_soil_factor.value()
                );
                params.default_soil_factor
            }
        },
    };

    Ok(clamp_condition_factor(factor))
}
