use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::term_years;
use crate::params::ParameterSnapshot;
use crate::scenarios::ScenarioMultipliers;
use crate::types::{ratio_or_zero, Money, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    /// Per-unit monthly rent after the scenario rent multiplier
    pub effective_monthly_rent: Money,
    /// Rent received each month across all units
    pub monthly_rent_income: Money,
    /// Maintenance service fee received each month across all units
    pub monthly_service_income: Money,
    pub total_rent: Money,
    pub installation: Money,
    pub service: Money,
    pub disposal_revenue: Money,
    pub disposal_cost: Money,
    pub total: Money,
    /// Rent as a share of total revenue
    pub rent_share: Rate,
}

pub fn calculate_revenue(p: &ParameterSnapshot, m: &ScenarioMultipliers) -> RevenueBreakdown {
    let qty = Decimal::from(p.equipment.quantity);
    let months = Decimal::from(p.revenue.lease_term);

    let effective_monthly_rent = p.revenue.monthly_rent * m.rent;
    let monthly_rent_income = effective_monthly_rent * qty;
    let total_rent = monthly_rent_income * months;
    let installation = p.revenue.installation_fee * qty;
    let service = p.revenue.maintenance_service_fee * term_years(p.revenue.lease_term) * qty;
    let monthly_service_income = ratio_or_zero(service, months);

    let (disposal_revenue, disposal_cost) =
        if p.is_lease_to_sell() && p.revenue.end_sale_price > Decimal::ZERO {
            let proceeds = p.revenue.end_sale_price * qty;
            (proceeds, proceeds * p.revenue.disposal_fee_rate)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

    let total = total_rent + installation + service + disposal_revenue;

    RevenueBreakdown {
        effective_monthly_rent,
        monthly_rent_income,
        monthly_service_income,
        total_rent,
        installation,
        service,
        disposal_revenue,
        disposal_cost,
        total,
        rent_share: ratio_or_zero(total_rent, total),
    }
}
