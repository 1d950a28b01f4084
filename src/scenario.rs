//! Scenario files describe a single stand for the command line tool.
//!
//! A scenario gives the conditions of the stand and either a census or explicit palm counts and
//! yields. It may also override any of the model parameters.
use crate::census::Census;
use crate::finance::{TreatmentCosts, default_ffb_price};
use crate::input::{input_err_msg, read_toml};
use crate::parameters::ModelParameters;
use crate::projection::{ControlPolicy, ProjectionInput, projection_years};
use crate::units::{Millimetres, MoneyPerTonne, TonnesPerYear};
use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use std::path::Path;

/// The contents of a scenario file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Age of the stand in years
    pub stand_age: u32,
    /// Average monthly rainfall
    pub rainfall_monthly_avg: Millimetres,
    /// Soil condition label
    pub soil_condition: String,
    /// Years to project
    #[serde(default)]
    pub years: Option<Vec<u32>>,
    /// Current harvest year; the years after it are projected
    #[serde(default)]
    pub harvest_year: Option<u32>,
    /// Current annual yield, if not estimated from the census
    #[serde(default)]
    pub base_yield: Option<TonnesPerYear>,
    /// Total palms, if not taken from the census
    #[serde(default)]
    pub total_palm_count: Option<u32>,
    /// Infected palms, if not taken from the census
    #[serde(default)]
    pub infected_palm_count: Option<u32>,
    /// Ganoderma census of the stand
    #[serde(default)]
    pub census: Option<Census>,
    /// Price of fresh fruit bunches
    #[serde(default = "default_ffb_price")]
    pub price: MoneyPerTonne,
    /// Unit costs of treatment
    #[serde(default)]
    pub costs: TreatmentCosts,
    /// Model parameters
    #[serde(default)]
    pub parameters: ModelParameters,
}

impl Scenario {
    /// Read a scenario from the specified TOML file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the scenario file
    ///
    /// # Returns
    ///
    /// The scenario or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<Scenario> {
        let file_path = file_path.as_ref();
        let scenario: Scenario = read_toml(file_path)?;

        scenario
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(scenario)
    }

    /// Check that the scenario is complete and consistent
    pub fn validate(&self) -> Result<()> {
        self.parameters
            .validate()
            .context("Invalid model parameters")?;
        self.costs.validate()?;
        ensure!(
            self.price.is_finite() && self.price >= MoneyPerTonne(0.0),
            "price must be a finite number greater than or equal to zero"
        );

        // Check for missing or conflicting fields
        self.years()?;
        self.base_yield()?;
        self.palm_counts()?;

        Ok(())
    }

    /// The years to project
    pub fn years(&self) -> Result<Vec<u32>> {
        match (&self.years, self.harvest_year) {
            (Some(years), None) => Ok(years.clone()),
            (None, Some(harvest_year)) => {
                Ok(projection_years(harvest_year, self.parameters.final_year)?)
            }
            (Some(_), Some(_)) => bail!("Only one of years and harvest_year may be given"),
            (None, None) => bail!("One of years or harvest_year must be given"),
        }
    }

    /// The current annual yield, taken from `base_yield` or estimated from the census
    pub fn base_yield(&self) -> Result<TonnesPerYear> {
        match (self.base_yield, &self.census) {
            (Some(base_yield), _) => Ok(base_yield),
            (None, Some(census)) => Ok(census.current_yield(&self.parameters.census)),
            (None, None) => bail!("One of base_yield or census must be given"),
        }
    }

    /// The total and infected palm counts, taken from explicit values or from the census
    pub fn palm_counts(&self) -> Result<(u32, u32)> {
        match (self.total_palm_count, self.infected_palm_count, &self.census) {
            (Some(total), Some(infected), _) => Ok((total, infected)),
            (None, None, Some(census)) => {
                let total = u32::try_from(census.total()).with_context(|| {
                    format!(
                        "Census total of {} palms exceeds the maximum of {}",
                        census.total(),
                        u32::MAX
                    )
                })?;

                // Infected palms are a subset of the total, so this always fits
                let infected = u32::try_from(census.unhealthy())?;

                Ok((total, infected))
            }
            (None, None, None) => {
                bail!("Either a census or total_palm_count and infected_palm_count must be given")
            }
            _ => bail!("total_palm_count and infected_palm_count must be given together"),
        }
    }

    /// Build the input for a projection of this scenario.
    ///
    /// # Arguments
    ///
    /// * `policy` - Whether the stand is treated
    /// * `years` - Years to project, overriding those in the scenario
    pub fn projection_input(
        &self,
        policy: ControlPolicy,
        years: Option<Vec<u32>>,
    ) -> Result<ProjectionInput> {
        let (total_palm_count, infected_palm_count) = self.palm_counts()?;
        let years = match years {
            Some(years) => years,
            None => self.years()?,
        };

        Ok(ProjectionInput {
            base_yield: self.base_yield()?,
            stand_age: self.stand_age,
            total_palm_count,
            infected_palm_count,
            rainfall_monthly_avg: self.rainfall_monthly_avg,
            soil_condition: self.soil_condition.clone(),
            years,
            policy,
        })
    }
}
