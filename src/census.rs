//! Ganoderma census of palms by infection category.
//!
//! Surveyors assign every palm in a block to one of six categories. The census supplies the palm
//! counts for the yield projection and the inputs for the treatment cost and yield loss estimates.
use crate::units::{Tonnes, TonnesPerPalm, TonnesPerYear, TonnesPerYearPerPalm};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The category assigned to a palm during a Ganoderma census
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CensusCategory {
    /// Fertile palm with no frond skirting, still productive, with fruiting bodies
    A,
    /// Infertile palm with frond skirting, unproductive, with fruiting bodies
    B,
    /// Fallen, snapped or dead palm with fruiting bodies
    C,
    /// Palm with unopened spears, frond skirting or rot at the base or crown, but no fruiting
    /// bodies
    D,
    /// Healthy palm
    E,
    /// Any other palm showing nutrient deficiency or water stress
    F,
}

impl CensusCategory {
    /// Whether palms in this category count as infected
    pub fn is_infected(self) -> bool {
        self != Self::E
    }
}

/// Counts of palms in each census category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Census {
    /// Palms in category A
    #[serde(default)]
    pub a: u32,
    /// Palms in category B
    #[serde(default)]
    pub b: u32,
    /// Palms in category C
    #[serde(default)]
    pub c: u32,
    /// Palms in category D
    #[serde(default)]
    pub d: u32,
    /// Palms in category E
    #[serde(default)]
    pub e: u32,
    /// Palms in category F
    #[serde(default)]
    pub f: u32,
}

impl Census {
    /// The number of palms recorded in the given category
    pub fn count(&self, category: CensusCategory) -> u32 {
        match category {
            CensusCategory::A => self.a,
            CensusCategory::B => self.b,
            CensusCategory::C => self.c,
            CensusCategory::D => self.d,
            CensusCategory::E => self.e,
            CensusCategory::F => self.f,
        }
    }

    /// Sum the counts for the categories which match `predicate`.
    ///
    /// Counts are summed as `u64` so that a census of six `u32` counts cannot overflow.
    fn sum_where<F>(&self, predicate: F) -> u64
    where
        F: Fn(CensusCategory) -> bool,
    {
        CensusCategory::iter()
            .filter(|category| predicate(*category))
            .map(|category| u64::from(self.count(category)))
            .sum()
    }

    /// Total number of palms counted
    pub fn total(&self) -> u64 {
        self.sum_where(|_| true)
    }

    /// Number of healthy palms
    pub fn healthy(&self) -> u64 {
        u64::from(self.e)
    }

    /// Number of palms showing any sign of infection or stress
    pub fn unhealthy(&self) -> u64 {
        self.sum_where(CensusCategory::is_infected)
    }

    /// Number of palms which need soil mounding
    pub fn soil_mounding(&self) -> u64 {
        u64::from(self.a)
    }

    /// Number of palms which need sanitation (removal)
    pub fn sanitation(&self) -> u64 {
        self.sum_where(|category| matches!(category, CensusCategory::B | CensusCategory::C))
    }

    /// Estimate the current annual yield of the block
    pub fn current_yield(&self, yields: &CensusYields) -> TonnesPerYear {
        yields.category_a * u64::from(self.a)
            + yields.category_d * u64::from(self.d)
            + yields.category_e * u64::from(self.e)
            + yields.category_f * u64::from(self.f)
    }

    /// Estimate the yield lost to palms which need treatment
    pub fn yield_loss(&self, yields: &CensusYields) -> Tonnes {
        yields.sanitation_loss * self.sanitation() + yields.soil_mounding_loss * self.soil_mounding()
    }
}

macro_rules! define_yield_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_yield_default!(default_category_a_yield, TonnesPerYearPerPalm, 0.1);
define_yield_default!(default_category_d_yield, TonnesPerYearPerPalm, 0.1);
define_yield_default!(default_category_e_yield, TonnesPerYearPerPalm, 0.18);
define_yield_default!(default_category_f_yield, TonnesPerYearPerPalm, 0.15);
define_yield_default!(default_sanitation_loss, TonnesPerPalm, 0.18);
define_yield_default!(default_soil_mounding_loss, TonnesPerPalm, 0.8);

/// Per-palm yields and losses used to turn a census into tonnages.
///
/// Palms in categories B and C are unproductive and contribute no yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CensusYields {
    /// Annual yield of a category A palm
    #[serde(default = "default_category_a_yield")]
    pub category_a: TonnesPerYearPerPalm,
    /// Annual yield of a category D palm
    #[serde(default = "default_category_d_yield")]
    pub category_d: TonnesPerYearPerPalm,
    /// Annual yield of a healthy palm
    #[serde(default = "default_category_e_yield")]
    pub category_e: TonnesPerYearPerPalm,
    /// Annual yield of a category F palm
    #[serde(default = "default_category_f_yield")]
    pub category_f: TonnesPerYearPerPalm,
    /// Yield lost per palm needing sanitation
    #[serde(default = "default_sanitation_loss")]
    pub sanitation_loss: TonnesPerPalm,
    /// Yield lost per palm needing soil mounding
    #[serde(default = "default_soil_mounding_loss")]
    pub soil_mounding_loss: TonnesPerPalm,
}

impl Default for CensusYields {
    fn default() -> Self {
        Self {
            category_a: default_category_a_yield(),
            category_d: default_category_d_yield(),
            category_e: default_category_e_yield(),
            category_f: default_category_f_yield(),
            sanitation_loss: default_sanitation_loss(),
            soil_mounding_loss: default_soil_mounding_loss(),
        }
    }
}

impl CensusYields {
    /// The values as a list of (name, value) pairs, for validation
    pub(crate) fn named_values(&self) -> [(&'static str, f64); 6] {
        [
            ("category_a", self.category_a.value()),
            ("category_d", self.category_d.value()),
            ("category_e", self.category_e.value()),
            ("category_f", self.category_f.value()),
            ("sanitation_loss", self.sanitation_loss.value()),
            ("soil_mounding_loss", self.soil_mounding_loss.value()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::census;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    fn test_census_counts(census: Census) {
        assert_eq!(census.total(), 100);
        assert_eq!(census.healthy(), 80);
        assert_eq!(census.unhealthy(), 20);
        assert_eq!(census.soil_mounding(), 5);
        assert_eq!(census.sanitation(), 7);
        assert_eq!(
            CensusCategory::iter()
                .map(|c| u64::from(census.count(c)))
                .sum::<u64>(),
            census.total()
        );
        assert_eq!(
            CensusCategory::iter()
                .filter(|c| c.is_infected())
                .map(|c| u64::from(census.count(c)))
                .sum::<u64>(),
            census.unhealthy()
        );
    }

    #[rstest]
    fn test_current_yield(census: Census) {
        // 0.1 * 5 + 0.1 * 3 + 0.18 * 80 + 0.15 * 5
        assert_approx_eq!(
            TonnesPerYear,
            census.current_yield(&CensusYields::default()),
            TonnesPerYear(15.95),
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_yield_loss(census: Census) {
        // 0.18 * 7 + 0.8 * 5
        assert_approx_eq!(
            Tonnes,
            census.yield_loss(&CensusYields::default()),
            Tonnes(5.26),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_empty_census() {
        let census = Census::default();
        assert_eq!(census.total(), 0);
        assert_eq!(
            census.current_yield(&CensusYields::default()),
            TonnesPerYear(0.0)
        );
    }

    #[test]
    fn test_census_counts_do_not_overflow() {
        let census = Census {
            a: u32::MAX,
            b: u32::MAX,
            c: u32::MAX,
            e: 1,
            ..Census::default()
        };
        assert_eq!(census.total(), 3 * u64::from(u32::MAX) + 1);
        assert_eq!(census.unhealthy(), 3 * u64::from(u32::MAX));
        assert_eq!(census.sanitation(), 2 * u64::from(u32::MAX));
        assert!(census.yield_loss(&CensusYields::default()).is_finite());
    }

    #[test]
    fn test_census_from_toml() {
        let census: Census = toml::from_str("a = 2\ne = 10").unwrap();
        assert_eq!(
            census,
            Census {
                a: 2,
                e: 10,
                ..Census::default()
            }
        );
        assert!(toml::from_str::<Census>("g = 1").is_err());
    }

    #[test]
    fn test_census_yields_default_matches_empty_toml() {
        let yields: CensusYields = toml::from_str("").unwrap();
        assert_eq!(yields, CensusYields::default());
    }
}
