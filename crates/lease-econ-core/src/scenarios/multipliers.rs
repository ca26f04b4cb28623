use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LeaseEconError;
use crate::types::Multiple;

/// Named market scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioName {
    Optimistic,
    #[default]
    Baseline,
    Conservative,
}

impl ScenarioName {
    pub const ALL: [ScenarioName; 3] = [
        ScenarioName::Optimistic,
        ScenarioName::Baseline,
        ScenarioName::Conservative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::Optimistic => "optimistic",
            ScenarioName::Baseline => "baseline",
            ScenarioName::Conservative => "conservative",
        }
    }

    pub fn multipliers(&self) -> &'static ScenarioMultipliers {
        match self {
            ScenarioName::Optimistic => &OPTIMISTIC,
            ScenarioName::Baseline => &BASELINE,
            ScenarioName::Conservative => &CONSERVATIVE,
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioName {
    type Err = LeaseEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(ScenarioName::Optimistic),
            "baseline" | "base" => Ok(ScenarioName::Baseline),
            "conservative" => Ok(ScenarioName::Conservative),
            other => Err(LeaseEconError::UnknownScenario(other.to_string())),
        }
    }
}

/// Stress factors applied to the deal inputs under a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMultipliers {
    pub rent: Multiple,
    pub freight: Multiple,
    /// Applied to the settlement cost of imported equipment
    pub exchange: Multiple,
    pub tax: Multiple,
    pub operating: Multiple,
}

const OPTIMISTIC: ScenarioMultipliers = ScenarioMultipliers {
    rent: dec!(1.05),
    freight: dec!(0.95),
    exchange: dec!(0.98),
    tax: dec!(1.00),
    operating: dec!(0.95),
};

const BASELINE: ScenarioMultipliers = ScenarioMultipliers {
    rent: dec!(1.00),
    freight: dec!(1.00),
    exchange: dec!(1.00),
    tax: dec!(1.00),
    operating: dec!(1.00),
};

const CONSERVATIVE: ScenarioMultipliers = ScenarioMultipliers {
    rent: dec!(0.90),
    freight: dec!(1.15),
    exchange: dec!(1.05),
    tax: dec!(1.05),
    operating: dec!(1.10),
};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_baseline_is_identity() {
        let m = ScenarioName::Baseline.multipliers();
        for factor in [m.rent, m.freight, m.exchange, m.tax, m.operating] {
            assert_eq!(factor, Decimal::ONE);
        }
    }

    #[test]
    fn test_conservative_directions() {
        let m = ScenarioName::Conservative.multipliers();
        assert!(m.rent < Decimal::ONE);
        assert!(m.freight > Decimal::ONE);
        assert!(m.exchange > Decimal::ONE);
        assert!(m.tax > Decimal::ONE);
        assert!(m.operating > Decimal::ONE);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Optimistic".parse::<ScenarioName>().unwrap(), ScenarioName::Optimistic);
        assert_eq!(" base ".parse::<ScenarioName>().unwrap(), ScenarioName::Baseline);
        assert!(matches!(
            "worst".parse::<ScenarioName>(),
            Err(LeaseEconError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for name in ScenarioName::ALL {
            assert_eq!(name.to_string().parse::<ScenarioName>().unwrap(), name);
        }
    }
}
