use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

/// Business targets a deal is judged against. Every field has a default, so
/// a config file only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessThresholds {
    /// GM1, GM2 and GM3 must each reach this
    pub min_gross_margin: Rate,
    /// PB1 and PB2 must break even within this many months
    pub max_payback_months: u32,
    /// Cost categories below this share of revenue are not reported as issues
    pub issue_impact_floor: Rate,
    /// Cost drivers reported per failed margin indicator
    pub max_ranked_drivers: usize,
    /// Rent below this share of total revenue is flagged
    pub min_rent_share: Rate,
    /// Transport cost above this share of the purchase total raises a warning
    pub max_transport_ratio: Rate,
    /// Tax cost above this share of the purchase total raises a warning
    pub max_tax_ratio: Rate,
    /// Upper bound on a reverse-solved capital or financing rate
    pub max_capital_rate: Rate,
    /// Bounds on a reverse-solved advance period, in months
    pub min_advance_period: u32,
    pub max_advance_period: u32,
}

impl Default for BusinessThresholds {
    fn default() -> Self {
        BusinessThresholds {
            min_gross_margin: dec!(0.30),
            max_payback_months: 24,
            issue_impact_floor: dec!(0.05),
            max_ranked_drivers: 3,
            min_rent_share: dec!(0.85),
            max_transport_ratio: dec!(0.20),
            max_tax_ratio: dec!(0.20),
            max_capital_rate: dec!(0.30),
            min_advance_period: 1,
            max_advance_period: 12,
        }
    }
}

impl BusinessThresholds {
    /// A break-even month passes when it exists, is after month 0 and is
    /// within the payback target.
    pub fn payback_passes(&self, month: Option<u32>) -> bool {
        matches!(month, Some(m) if m > 0 && m <= self.max_payback_months)
    }

    pub fn margin_passes(&self, margin: Rate) -> bool {
        margin >= self.min_gross_margin
    }
}
