use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::term_years;
use crate::params::ParameterSnapshot;
use crate::scenarios::ScenarioMultipliers;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingBreakdown {
    pub annual: Money,
    pub monthly: Money,
    /// Operating cost over the lease term
    pub total: Money,
}

pub fn calculate_operating(p: &ParameterSnapshot, m: &ScenarioMultipliers) -> OperatingBreakdown {
    let o = &p.operating;
    let per_unit = o.annual_maintenance + o.local_parts + o.local_service_fee + o.other_operating_cost;
    let annual = per_unit * Decimal::from(p.equipment.quantity) * m.operating;

    OperatingBreakdown {
        annual,
        monthly: annual / dec!(12),
        total: annual * term_years(p.revenue.lease_term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::fixtures::reference_deal;
    use crate::scenarios::ScenarioName;

    #[test]
    fn test_operating_totals() {
        let mut p = reference_deal();
        p.equipment.quantity = 2;
        p.revenue.lease_term = 24;
        p.operating.annual_maintenance = dec!(12000);
        p.operating.local_parts = dec!(6000);
        p.operating.local_service_fee = dec!(4000);
        p.operating.other_operating_cost = dec!(2000);
        let o = calculate_operating(&p, ScenarioName::Baseline.multipliers());
        assert_eq!(o.annual, dec!(48000));
        assert_eq!(o.monthly, dec!(4000));
        assert_eq!(o.total, dec!(96000));
    }

    #[test]
    fn test_operating_multiplier() {
        let mut p = reference_deal();
        p.operating.annual_maintenance = dec!(10000);
        let o = calculate_operating(&p, ScenarioName::Conservative.multipliers());
        assert_eq!(o.annual, dec!(11000));
    }
}
