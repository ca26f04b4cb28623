use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculators::DealBreakdown;
use crate::compliance::BusinessThresholds;
use crate::types::{ratio_or_zero, Money, Rate};

/// The cost terms the three margins subtract from revenue, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBase {
    pub revenue: Money,
    /// Transport, operating, unrecovered VAT and disposal fees
    pub variable_cost: Money,
    /// Variable cost plus tariff and customs brokerage
    pub variable_total: Money,
    pub depreciation: Money,
    pub financing_cost: Money,
}

impl CostBase {
    pub fn from_breakdown(b: &DealBreakdown) -> Self {
        let variable_cost = b.transport.total
            + b.operating.total
            + b.tax.vat_cash_occupied
            + b.revenue.disposal_cost;
        CostBase {
            revenue: b.revenue.total,
            variable_cost,
            variable_total: variable_cost + b.tax.tariff + b.tax.customs_agent_fee,
            depreciation: b.purchase.total_depreciation,
            financing_cost: b.financing.capital_cost,
        }
    }

    /// Cost subtracted by GM1, GM2 or GM3 (`level` 1..=3).
    pub fn cost_for_level(&self, level: u8) -> Money {
        match level {
            1 => self.variable_total,
            2 => self.variable_total + self.depreciation,
            _ => self.variable_total + self.depreciation + self.financing_cost,
        }
    }

    pub fn total_cost(&self) -> Money {
        self.cost_for_level(3)
    }
}

/// GM1 after variable and clearance costs, GM2 after depreciation, GM3
/// after financing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossMargins {
    pub gm1: Rate,
    pub gm2: Rate,
    pub gm3: Rate,
    pub gm1_pass: bool,
    pub gm2_pass: bool,
    pub gm3_pass: bool,
    #[serde(flatten)]
    pub base: CostBase,
}

pub fn calculate_gross_margins(b: &DealBreakdown, thresholds: &BusinessThresholds) -> GrossMargins {
    let base = CostBase::from_breakdown(b);
    let margin = |level| {
        if base.revenue <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            ratio_or_zero(base.revenue - base.cost_for_level(level), base.revenue)
        }
    };
    let (gm1, gm2, gm3) = (margin(1), margin(2), margin(3));

    GrossMargins {
        gm1,
        gm2,
        gm3,
        gm1_pass: thresholds.margin_passes(gm1),
        gm2_pass: thresholds.margin_passes(gm2),
        gm3_pass: thresholds.margin_passes(gm3),
        base,
    }
}
