//! General functions related to finance: treatment costs and the value of lost yield.
use crate::census::{Census, CensusYields};
use crate::projection::ProjectionComparison;
use crate::units::{Money, MoneyPerPalm, MoneyPerTonne, MoneyPerYear, Tonnes};
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

macro_rules! define_cost_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_cost_default!(default_soil_mounding_cost, MoneyPerPalm, 15.0);
define_cost_default!(default_sanitation_cost, MoneyPerPalm, 30.0);

/// The default price of fresh fruit bunches (RM/t)
pub fn default_ffb_price() -> MoneyPerTonne {
    MoneyPerTonne(500.0)
}

/// Unit costs of treating infected palms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreatmentCosts {
    /// Cost of soil mounding one palm
    #[serde(default = "default_soil_mounding_cost")]
    pub soil_mounding: MoneyPerPalm,
    /// Cost of sanitising (removing) one palm
    #[serde(default = "default_sanitation_cost")]
    pub sanitation: MoneyPerPalm,
}

impl Default for TreatmentCosts {
    fn default() -> Self {
        Self {
            soil_mounding: default_soil_mounding_cost(),
            sanitation: default_sanitation_cost(),
        }
    }
}

impl TreatmentCosts {
    /// Check that the costs are finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, cost) in [
            ("soil_mounding", self.soil_mounding),
            ("sanitation", self.sanitation),
        ] {
            ensure!(
                cost.is_finite() && cost >= MoneyPerPalm(0.0),
                "costs.{name} must be a finite number greater than or equal to zero"
            );
        }

        Ok(())
    }
}

/// The cost of treating the palms in a census
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Cost of soil mounding
    pub soil_mounding: Money,
    /// Cost of sanitation
    pub sanitation: Money,
}

impl CostBreakdown {
    /// The total treatment cost
    pub fn total(&self) -> Money {
        self.soil_mounding + self.sanitation
    }
}

/// Calculate the cost of treating the palms in a census
pub fn treatment_cost(census: &Census, costs: &TreatmentCosts) -> CostBreakdown {
    CostBreakdown {
        soil_mounding: costs.soil_mounding * census.soil_mounding(),
        sanitation: costs.sanitation * census.sanitation(),
    }
}

/// Yield lost to Ganoderma and what it is worth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossEstimate {
    /// Weight of fresh fruit bunches lost
    pub tonnage: Tonnes,
    /// Value of the lost fruit
    pub value: Money,
}

/// Estimate the yield lost to palms which need treatment
pub fn yield_loss(census: &Census, yields: &CensusYields, price: MoneyPerTonne) -> LossEstimate {
    let tonnage = census.yield_loss(yields);
    LossEstimate {
        tonnage,
        value: price * tonnage,
    }
}

/// The value of lost yield less the cost of treatment.
///
/// A positive balance means that treatment costs less than the loss it prevents.
pub fn treatment_balance(loss: &LossEstimate, costs: &CostBreakdown) -> Money {
    loss.value - costs.total()
}

/// The value of the yield saved by treatment in each projected year
pub fn projection_value(
    comparison: &ProjectionComparison,
    price: MoneyPerTonne,
) -> Vec<MoneyPerYear> {
    comparison
        .rows()
        .map(|row| price * row.difference())
        .collect()
}

/// The total value of the yield saved by treatment over all projected years
pub fn total_projection_value(comparison: &ProjectionComparison, price: MoneyPerTonne) -> Money {
    // Each row covers a single year
    Money(
        projection_value(comparison, price)
            .into_iter()
            .map(MoneyPerYear::value)
            .sum(),
    )
}
