use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::BusinessThresholds;
use crate::analysis::CostBase;
use crate::calculators::DealBreakdown;
use crate::params::{ParameterSnapshot, PaymentMode};
use crate::scenarios::ScenarioMultipliers;

/// A reverse-solved input value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum Threshold {
    Solved(Decimal),
    /// Denominator at or below zero, or the value overflowed
    NoSolution,
    /// Does not apply to this payment mode
    NotApplicable,
}

impl Threshold {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Threshold::Solved(v) => Some(*v),
            _ => None,
        }
    }

    fn ratio(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator <= Decimal::ZERO {
            return Threshold::NoSolution;
        }
        numerator
            .checked_div(denominator)
            .map(Threshold::Solved)
            .unwrap_or(Threshold::NoSolution)
    }

    /// Whole months only: a partial month of carry still costs the month.
    fn floor(self) -> Self {
        match self {
            Threshold::Solved(v) => Threshold::Solved(v.floor()),
            other => other,
        }
    }

    fn clamp(self, lo: Decimal, hi: Decimal) -> Self {
        match self {
            Threshold::Solved(v) => Threshold::Solved(v.clamp(lo, hi)),
            other => other,
        }
    }
}

/// Input values at which the deal would just meet its targets, all else
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdReport {
    /// Per-unit monthly rent (before the scenario rent multiplier is applied)
    pub min_rent_for_gm1: Threshold,
    pub min_rent_for_gm2: Threshold,
    pub min_rent_for_gm3: Threshold,
    /// Total transport cost that still lets PB1 break even on target
    pub max_transport_for_pb1: Threshold,
    /// Capital cost rate (full mode) or financing rate (financing mode)
    /// that still lets PB2 break even on target
    pub max_capital_rate: Threshold,
    /// Longest advance period, in months, that still lets PB2 break even
    pub max_advance_period: Threshold,
}

pub fn solve_thresholds(
    p: &ParameterSnapshot,
    m: &ScenarioMultipliers,
    b: &DealBreakdown,
    thresholds: &BusinessThresholds,
) -> ThresholdReport {
    let base = CostBase::from_breakdown(b);
    let rent_units = Decimal::from(p.revenue.lease_term) * Decimal::from(p.equipment.quantity) * m.rent;
    let other_revenue = b.revenue.installation + b.revenue.service + b.revenue.disposal_revenue;
    let keep = Decimal::ONE.checked_sub(thresholds.min_gross_margin);

    let min_rent = |level: u8| {
        let required_rent = keep
            .filter(|keep| *keep > Decimal::ZERO)
            .and_then(|keep| base.cost_for_level(level).checked_div(keep))
            .and_then(|required_revenue| required_revenue.checked_sub(other_revenue));
        match required_rent {
            Some(required_rent) => {
                Threshold::ratio(required_rent, rent_units).clamp(Decimal::ZERO, Decimal::MAX)
            }
            None => Threshold::NoSolution,
        }
    };

    // Net cash the lease earns by the payback target, before funding costs
    let horizon = Decimal::from(thresholds.max_payback_months);
    let earned = (b.monthly_revenue() - b.operating.monthly)
        .checked_mul(horizon)
        .and_then(|net| net.checked_add(b.revenue.installation));

    let max_transport_for_pb1 = match earned
        .and_then(|earned| earned.checked_sub(b.purchase.purchase_total + b.tax.total))
    {
        Some(headroom) => Threshold::Solved(headroom.max(Decimal::ZERO)),
        None => Threshold::NoSolution,
    };

    let f = &b.financing;
    let rate_cap = thresholds.max_capital_rate;
    let (max_capital_rate, max_advance_period) = match (p.financing.payment_mode, earned) {
        (_, None) => (Threshold::NoSolution, Threshold::NoSolution),
        (PaymentMode::Full, Some(earned)) => match earned.checked_sub(f.advance_amount) {
            None => (Threshold::NoSolution, Threshold::NoSolution),
            Some(allowable) => {
                let period = Decimal::from(p.financing.advance_period);
                let carried = f.advance_amount * period / dec!(12);
                let rate = if allowable >= Decimal::ZERO && carried <= Decimal::ZERO {
                    // nothing is carried, so any rate in range pays back
                    Threshold::Solved(rate_cap)
                } else {
                    Threshold::ratio(allowable, carried).clamp(Decimal::ZERO, rate_cap)
                };

                let (lo, hi) = (
                    Decimal::from(thresholds.min_advance_period),
                    Decimal::from(thresholds.max_advance_period),
                );
                let monthly_charge = f.advance_amount * p.financing.capital_cost_rate;
                let months = if allowable < Decimal::ZERO {
                    Threshold::NoSolution
                } else if monthly_charge <= Decimal::ZERO {
                    // free capital: the longest allowed advance still pays back
                    Threshold::Solved(hi)
                } else {
                    match allowable.checked_mul(dec!(12)) {
                        Some(annual) => Threshold::ratio(annual, monthly_charge).floor().clamp(lo, hi),
                        None => Threshold::Solved(hi),
                    }
                };
                (rate, months)
            }
        },
        (PaymentMode::Financing, Some(earned)) => {
            let allowable_interest = earned
                .checked_sub(f.initial_total)
                .and_then(|rest| rest.checked_sub(f.handling_fee));
            let term = Decimal::from(p.financing.financing_term);
            let rate = match allowable_interest {
                Some(allowable) => {
                    Threshold::ratio(allowable, f.financing_amount * term / dec!(12))
                        .clamp(Decimal::ZERO, rate_cap)
                }
                None => Threshold::NoSolution,
            };
            (rate, Threshold::NotApplicable)
        }
    };

    ThresholdReport {
        min_rent_for_gm1: min_rent(1),
        min_rent_for_gm2: min_rent(2),
        min_rent_for_gm3: min_rent(3),
        max_transport_for_pb1,
        max_capital_rate,
        max_advance_period,
    }
}
