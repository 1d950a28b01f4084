//! Projection of annual yields for stands affected by Ganoderma.
//!
//! A projection starts from the current yield of a stand and applies a reduction each year. The
//! size of the reduction depends on the conditions of the stand (see [`FactorSet`]) and on
//! whether the stand is under treatment ([`ControlPolicy`]). The reduction grows a little each
//! year, as the disease progresses, and the yield never falls below a fixed fraction of the
//! starting yield.
use crate::error::ProjectionError;
use crate::factor::{FactorSet, age_factor, infection_pressure, soil_factor, weather_factor};
use crate::input::{format_list, is_sorted_and_unique};
use crate::parameters::ModelParameters;
use crate::units::{Dimensionless, Millimetres, TonnesPerYear};
use anyhow::Result;
use log::debug;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// Whether a stand is treated for Ganoderma
#[derive(
    DeserializeLabeledStringEnum, SerializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ControlPolicy {
    /// Treatment (soil mounding and sanitation) is applied
    #[string = "controlled"]
    Controlled,
    /// The disease is left to spread
    #[string = "uncontrolled"]
    Uncontrolled,
}

/// The inputs for a single projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    /// The current annual yield of the stand
    pub base_yield: TonnesPerYear,
    /// Age of the stand in years
    pub stand_age: u32,
    /// Number of palms in the stand
    pub total_palm_count: u32,
    /// Number of infected palms in the stand
    pub infected_palm_count: u32,
    /// Average monthly rainfall
    pub rainfall_monthly_avg: Millimetres,
    /// Label of the stand's soil condition (see [`crate::soil::SoilCondition`])
    pub soil_condition: String,
    /// The years to project, in strictly ascending order
    pub years: Vec<u32>,
    /// Whether the stand is treated
    pub policy: ControlPolicy,
}

impl ProjectionInput {
    /// Check that the input is well formed
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.years.is_empty() {
            return Err(ProjectionError::invalid_input("`years` is empty"));
        }
        if !is_sorted_and_unique(&self.years) {
            return Err(ProjectionError::invalid_input(format!(
                "`years` must be strictly increasing, got {}",
                format_list(&self.years)
            )));
        }
        if !(self.base_yield.is_finite() && self.base_yield >= TonnesPerYear(0.0)) {
            return Err(ProjectionError::invalid_input(format!(
                "Base yield must be a finite number greater than or equal to zero, got {}",
                self.base_yield.value()
            )));
        }
        if !(self.rainfall_monthly_avg.is_finite()
            && self.rainfall_monthly_avg >= Millimetres(0.0))
        {
            return Err(ProjectionError::invalid_input(format!(
                "Rainfall must be a finite number greater than or equal to zero, got {}",
                self.rainfall_monthly_avg.value()
            )));
        }
        if self.infected_palm_count > self.total_palm_count {
            return Err(ProjectionError::invalid_input(format!(
                "Infected palm count ({}) exceeds total palm count ({})",
                self.infected_palm_count, self.total_palm_count
            )));
        }

        Ok(())
    }
}

/// The projected yield for each of the requested years
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    /// The policy the projection was made under
    pub policy: ControlPolicy,
    /// The factors derived from the input
    pub factors: FactorSet,
    /// The reduction in the first projected year, before it is capped
    pub base_reduction_rate: Dimensionless,
    /// One projected yield per requested year, in the same order
    pub yields: Vec<TonnesPerYear>,
}

impl ProjectionResult {
    /// The number of projected years
    pub fn len(&self) -> usize {
        self.yields.len()
    }

    /// Whether there are no projected years. Never true for a successful projection.
    pub fn is_empty(&self) -> bool {
        self.yields.is_empty()
    }

    /// Iterate over the projected yields
    pub fn iter(&self) -> impl Iterator<Item = TonnesPerYear> + '_ {
        self.yields.iter().copied()
    }
}

/// A row of a [`ProjectionComparison`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    /// The projected year
    pub year: u32,
    /// Projected yield with treatment
    pub controlled: TonnesPerYear,
    /// Projected yield without treatment
    pub uncontrolled: TonnesPerYear,
}

impl ComparisonRow {
    /// The yield saved by treatment
    pub fn difference(&self) -> TonnesPerYear {
        self.controlled - self.uncontrolled
    }
}

/// Projections of the same stand with and without treatment
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionComparison {
    /// The projected years
    pub years: Vec<u32>,
    /// Projection with treatment
    pub controlled: ProjectionResult,
    /// Projection without treatment
    pub uncontrolled: ProjectionResult,
}

impl ProjectionComparison {
    /// Iterate over the projections year by year
    pub fn rows(&self) -> impl Iterator<Item = ComparisonRow> + '_ {
        self.years
            .iter()
            .zip(self.controlled.iter().zip(self.uncontrolled.iter()))
            .map(|(&year, (controlled, uncontrolled))| ComparisonRow {
                year,
                controlled,
                uncontrolled,
            })
    }
}

/// Projects annual yields with the given model parameters
#[derive(Debug, Clone, PartialEq)]
pub struct YieldProjector {
    params: ModelParameters,
}

impl YieldProjector {
    /// Create a new [`YieldProjector`], checking that the parameters are valid
    pub fn new(params: ModelParameters) -> Result<Self> {
        params.validate()?;

        Ok(Self { params })
    }

    /// The parameters used for projections
    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Compute the condition factors for the given input
    pub fn factors(&self, input: &ProjectionInput) -> Result<FactorSet, ProjectionError> {
        Ok(FactorSet {
            weather: weather_factor(&self.params, input.rainfall_monthly_avg),
            age: age_factor(&self.params, input.stand_age),
            soil: soil_factor(&self.params, &input.soil_condition)?,
            infection_pressure: infection_pressure(
                &self.params,
                input.infected_palm_count,
                input.total_palm_count,
            ),
        })
    }

    /// The policy constant for the given policy
    pub fn policy_rate(&self, policy: ControlPolicy) -> Dimensionless {
        match policy {
            ControlPolicy::Controlled => self.params.controlled_rate,
            ControlPolicy::Uncontrolled => self.params.uncontrolled_rate,
        }
    }

    /// The annual reduction before any increase over time
    pub fn base_reduction_rate(&self, factors: &FactorSet, policy: ControlPolicy) -> Dimensionless {
        self.policy_rate(policy) * factors.product()
    }

    /// The reduction applied in the year with the given (0-based) index
    fn adjusted_reduction(
        &self,
        base_reduction_rate: Dimensionless,
        index: u32,
        policy: ControlPolicy,
    ) -> Dimensionless {
        let time_factor =
            Dimensionless(1.0) + Dimensionless(f64::from(index)) * self.params.progression_rate;
        let mut reduction = (base_reduction_rate * time_factor).min(self.params.reduction_cap);

        if let Some(recovery) = &self.params.recovery {
            if policy == ControlPolicy::Controlled && index > recovery.start_index {
                reduction = (reduction - recovery.offset).max(Dimensionless(0.0));
            }
        }

        reduction
    }

    /// Project annual yields for the years in `input`.
    ///
    /// # Returns
    ///
    /// One projected yield per requested year or an error if the input is invalid. Yields never
    /// increase from one year to the next and never fall below `base_yield * floor_fraction`.
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        input.validate()?;
        let factors = self.factors(input)?;
        let base_reduction_rate = self.base_reduction_rate(&factors, input.policy);
        debug!(
            "{} projection: factors {factors:?}, base reduction rate {}",
            input.policy,
            base_reduction_rate.value()
        );

        let floor = input.base_yield * self.params.floor_fraction;
        let mut current_yield = input.base_yield;
        let yields = (0u32..)
            .zip(&input.years)
            .map(|(index, _)| {
                let reduction = self.adjusted_reduction(base_reduction_rate, index, input.policy);
                current_yield = (current_yield * (Dimensionless(1.0) - reduction)).max(floor);
                current_yield
            })
            .collect();

        Ok(ProjectionResult {
            policy: input.policy,
            factors,
            base_reduction_rate,
            yields,
        })
    }

    /// Project the input both with and without treatment.
    ///
    /// The policy given in `input` is ignored.
    pub fn compare(
        &self,
        input: &ProjectionInput,
    ) -> Result<ProjectionComparison, ProjectionError> {
        let project_with = |policy| {
            self.project(&ProjectionInput {
                policy,
                ..input.clone()
            })
        };

        Ok(ProjectionComparison {
            years: input.years.clone(),
            controlled: project_with(ControlPolicy::Controlled)?,
            uncontrolled: project_with(ControlPolicy::Uncontrolled)?,
        })
    }
}

/// The years to project following the given harvest year, up to and including `final_year`
pub fn projection_years(harvest_year: u32, final_year: u32) -> Result<Vec<u32>, ProjectionError> {
    if !(1..=final_year).contains(&harvest_year) {
        return Err(ProjectionError::invalid_input(format!(
            "Harvest year must be between 1 and {final_year}, got {harvest_year}"
        )));
    }
    if harvest_year == final_year {
        return Err(ProjectionError::invalid_input(format!(
            "No years to project after harvest year {harvest_year}"
        )));
    }

    Ok((harvest_year + 1..=final_year).collect())
}
