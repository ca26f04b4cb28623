use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::term_years;
use crate::params::ParameterSnapshot;
use crate::scenarios::ScenarioMultipliers;
use crate::types::Money;

/// Equipment acquisition and straight-line depreciation over the lease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseBreakdown {
    /// Unit price in settlement currency after the scenario FX stress
    pub unit_price: Money,
    pub purchase_total: Money,
    pub residual_value: Money,
    pub annual_depreciation: Money,
    /// Depreciation charged over the lease term
    pub total_depreciation: Money,
    pub book_value_at_end: Money,
}

pub fn calculate_purchase(p: &ParameterSnapshot, m: &ScenarioMultipliers) -> PurchaseBreakdown {
    let qty = Decimal::from(p.equipment.quantity);
    let unit_price = p.equipment.purchase_price * m.exchange;
    let purchase_total = unit_price * qty;
    let residual_value = purchase_total * p.equipment.residual_value_rate;

    let annual_depreciation = if p.equipment.economic_life == 0 {
        Decimal::ZERO
    } else {
        (purchase_total - residual_value) / Decimal::from(p.equipment.economic_life)
    };
    let total_depreciation = annual_depreciation * term_years(p.revenue.lease_term);

    PurchaseBreakdown {
        unit_price,
        purchase_total,
        residual_value,
        annual_depreciation,
        total_depreciation,
        book_value_at_end: purchase_total - total_depreciation,
    }
}
