use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::margins::CostBase;
use crate::calculators::DealBreakdown;
use crate::types::{ratio_or_zero, Money, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub total_revenue: Money,
    pub total_cost: Money,
    pub net_profit: Money,
    /// Net profit scaled to twelve months of the lease term
    pub annual_profit: Money,
    pub profit_margin: Rate,
    /// Net profit over the up-front outlay
    pub roi: Rate,
}

pub fn calculate_profit(b: &DealBreakdown, lease_term: u32) -> ProfitSummary {
    let base = CostBase::from_breakdown(b);
    let total_cost = base.total_cost();
    let net_profit = base.revenue - total_cost;
    let annual_profit = if lease_term == 0 {
        Decimal::ZERO
    } else {
        net_profit * dec!(12) / Decimal::from(lease_term)
    };

    ProfitSummary {
        total_revenue: base.revenue,
        total_cost,
        net_profit,
        annual_profit,
        profit_margin: ratio_or_zero(net_profit, base.revenue),
        roi: ratio_or_zero(net_profit, b.financing.initial_total),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Purchase,
    Transport,
    Tax,
    Operating,
    Financing,
    Depreciation,
    Disposal,
}

impl CostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Purchase => "purchase",
            CostCategory::Transport => "transport",
            CostCategory::Tax => "tax",
            CostCategory::Operating => "operating",
            CostCategory::Financing => "financing",
            CostCategory::Depreciation => "depreciation",
            CostCategory::Disposal => "disposal",
        }
    }

    /// Amount this category contributes for the deal. Purchase is the
    /// capital outlay and is shown alongside, not summed into, the
    /// margin cost base (depreciation carries it there).
    pub fn amount(&self, b: &DealBreakdown) -> Money {
        match self {
            CostCategory::Purchase => b.purchase.purchase_total,
            CostCategory::Transport => b.transport.total,
            CostCategory::Tax => b.tax.total,
            CostCategory::Operating => b.operating.total,
            CostCategory::Financing => b.financing.capital_cost,
            CostCategory::Depreciation => b.purchase.total_depreciation,
            CostCategory::Disposal => b.revenue.disposal_cost,
        }
    }

    /// Every category except the purchase outlay is a margin cost term.
    pub fn in_cost_base(&self) -> bool {
        !matches!(self, CostCategory::Purchase)
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShare {
    pub category: CostCategory,
    pub amount: Money,
    /// Share of `VarTotal + Dep + Fin`; `None` for the purchase outlay,
    /// which reaches the cost base only through depreciation
    pub share_of_cost: Option<Rate>,
    pub share_of_revenue: Rate,
}

const STRUCTURE_ORDER: [CostCategory; 7] = [
    CostCategory::Purchase,
    CostCategory::Transport,
    CostCategory::Tax,
    CostCategory::Operating,
    CostCategory::Financing,
    CostCategory::Depreciation,
    CostCategory::Disposal,
];

pub fn calculate_cost_structure(b: &DealBreakdown) -> Vec<CostShare> {
    let total_cost = CostBase::from_breakdown(b).total_cost();

    STRUCTURE_ORDER
        .iter()
        .map(|&category| {
            let amount = category.amount(b);
            CostShare {
                category,
                amount,
                share_of_cost: category
                    .in_cost_base()
                    .then(|| ratio_or_zero(amount, total_cost)),
                share_of_revenue: ratio_or_zero(amount, b.revenue.total),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::calculate_breakdown;
    use crate::calculators::fixtures::reference_deal;

    fn breakdown() -> DealBreakdown {
        let p = reference_deal();
        calculate_breakdown(&p, p.scenario.multipliers())
    }

    #[test]
    fn test_reference_profit() {
        let profit = calculate_profit(&breakdown(), 12);
        assert_eq!(profit.total_cost, dec!(293475.456));
        assert_eq!(profit.net_profit, dec!(306524.544));
        assert_eq!(profit.annual_profit, dec!(306524.544));
        assert_eq!(profit.profit_margin, dec!(306524.544) / dec!(600000));
        assert_eq!(profit.roi, dec!(306524.544) / dec!(1003726.4));
    }

    #[test]
    fn test_annual_profit_scales_with_term() {
        let profit = calculate_profit(&breakdown(), 24);
        assert_eq!(profit.annual_profit, profit.net_profit / dec!(2));
        assert_eq!(calculate_profit(&breakdown(), 0).annual_profit, Decimal::ZERO);
    }

    #[test]
    fn test_cost_structure_shares_sum_to_one() {
        let b = breakdown();
        let structure = calculate_cost_structure(&b);
        assert_eq!(structure.len(), 7);
        assert_eq!(structure[0].category, CostCategory::Purchase);
        assert_eq!(structure[0].amount, dec!(800000));
        assert_eq!(structure[0].share_of_cost, None);
        let shares: Decimal = structure.iter().filter_map(|s| s.share_of_cost).sum();
        assert!((shares - Decimal::ONE).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_cost_shares_use_margin_cost_base() {
        let structure = calculate_cost_structure(&breakdown());
        let transport = &structure[1];
        assert_eq!(transport.category, CostCategory::Transport);
        assert_eq!(transport.share_of_cost, Some(dec!(54400) / dec!(293475.456)));
        assert_eq!(transport.share_of_revenue, dec!(54400) / dec!(600000));
        let amounts: Decimal = structure[1..].iter().map(|s| s.amount).sum();
        assert_eq!(amounts, calculate_profit(&breakdown(), 12).total_cost);
    }
}
