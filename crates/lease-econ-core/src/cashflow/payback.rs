use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{break_even_month, cumulative};
use crate::calculators::DealBreakdown;
use crate::compliance::BusinessThresholds;
use crate::params::{ParameterSnapshot, PaymentMode};
use crate::types::Money;

/// One payback view: its own initial investment, monthly net series,
/// cumulative position and break-even month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackSeries {
    pub initial_investment: Money,
    pub net: Vec<Money>,
    pub cumulative: Vec<Money>,
    pub month: Option<u32>,
    pub pass: bool,
}

/// PB1 looks at the project ignoring how it is funded; PB2 at the equity
/// actually put in, including loan draws and repayments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackPeriods {
    pub pb1: PaybackSeries,
    pub pb2: PaybackSeries,
}

pub fn calculate_payback_periods(
    p: &ParameterSnapshot,
    b: &DealBreakdown,
    thresholds: &BusinessThresholds,
) -> PaybackPeriods {
    PaybackPeriods {
        pb1: project_view(p, b, thresholds),
        pb2: shareholder_view(p, b, thresholds),
    }
}

/// Monthly operating net shared by both views: revenue less operating cost,
/// with disposal proceeds and fees in the last month.
fn operating_net(p: &ParameterSnapshot, b: &DealBreakdown, month: u32) -> Money {
    let mut net = b.monthly_revenue() - b.operating.monthly;
    if month == p.revenue.lease_term {
        net += b.revenue.disposal_revenue - b.revenue.disposal_cost;
    }
    net
}

fn finish(initial_investment: Money, net: Vec<Money>, thresholds: &BusinessThresholds) -> PaybackSeries {
    let cumulative = cumulative(&net);
    let month = break_even_month(&cumulative);
    PaybackSeries {
        initial_investment,
        net,
        cumulative,
        month,
        pass: thresholds.payback_passes(month),
    }
}

fn project_view(
    p: &ParameterSnapshot,
    b: &DealBreakdown,
    thresholds: &BusinessThresholds,
) -> PaybackSeries {
    let initial_investment = b.upfront_outlay();
    let mut net = Vec::with_capacity(p.revenue.lease_term as usize + 1);
    net.push(b.revenue.installation - initial_investment);
    for month in 1..=p.revenue.lease_term {
        net.push(operating_net(p, b, month));
    }
    finish(initial_investment, net, thresholds)
}

fn shareholder_view(
    p: &ParameterSnapshot,
    b: &DealBreakdown,
    thresholds: &BusinessThresholds,
) -> PaybackSeries {
    let term = p.revenue.lease_term;
    let f = &b.financing;
    let mut net = Vec::with_capacity(term as usize + 1);

    let initial_investment = match p.financing.payment_mode {
        PaymentMode::Financing => {
            // Loan proceeds come straight back in against the outlay
            net.push(
                b.revenue.installation - b.upfront_outlay() + f.financing_amount - f.handling_fee,
            );
            for month in 1..=term {
                net.push(operating_net(p, b, month) - f.scheduled_payment(month));
            }
            f.down_payment + f.handling_fee
        }
        PaymentMode::Full => {
            net.push(b.revenue.installation - f.advance_amount);
            let charge_month = capital_charge_month(p.financing.advance_period, term);
            for month in 1..=term {
                let mut month_net = operating_net(p, b, month);
                if Some(month) == charge_month {
                    month_net -= f.capital_cost;
                }
                net.push(month_net);
            }
            f.advance_amount
        }
    };

    finish(initial_investment, net, thresholds)
}

/// Month in which the advance carry cost is paid: the advance period, kept
/// inside the lease horizon so the cost is never dropped.
fn capital_charge_month(advance_period: u32, term: u32) -> Option<u32> {
    if term == 0 {
        None
    } else {
        Some(advance_period.clamp(1, term))
    }
}
