use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{break_even_month, cumulative};
use crate::calculators::DealBreakdown;
use crate::params::ParameterSnapshot;
use crate::time_value::{annualized_monthly_irr, RootFinder};
use crate::types::{Money, Rate};

/// One month of the deal cash-flow projection. Month 0 is delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    pub month: u32,
    /// Calendar month (`YYYY-MM`) when the lease start date is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
    pub cumulative: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowProjection {
    pub rows: Vec<CashflowRow>,
    pub cumulative: Vec<Money>,
    /// First month with a non-negative cumulative position
    pub payback_month: Option<u32>,
    /// Annualized IRR of the monthly net series
    pub irr: Option<Rate>,
    pub total_income: Money,
    pub total_expense: Money,
    pub total_net: Money,
}

/// Build the month-0..=term cash-flow series for the deal.
///
/// Month 0 carries installation income against the full up-front outlay.
/// Each lease month earns rent and service income and pays operating cost
/// plus, when financed, the scheduled loan payment. A lease-to-sell deal
/// books its disposal proceeds and fees in the final month.
pub fn project_cashflows(
    p: &ParameterSnapshot,
    b: &DealBreakdown,
    solver: &RootFinder,
) -> CashflowProjection {
    let term = p.revenue.lease_term;
    let mut income = Vec::with_capacity(term as usize + 1);
    let mut expense = Vec::with_capacity(term as usize + 1);

    income.push(b.revenue.installation);
    expense.push(b.upfront_outlay());

    for month in 1..=term {
        let mut month_income = b.monthly_revenue();
        let mut month_expense = b.operating.monthly;

        if p.is_financed() {
            month_expense += b.financing.scheduled_payment(month);
        }
        if month == term {
            month_income += b.revenue.disposal_revenue;
            month_expense += b.revenue.disposal_cost;
        }

        income.push(month_income);
        expense.push(month_expense);
    }

    let net: Vec<Money> = income.iter().zip(&expense).map(|(i, e)| i - e).collect();
    let cumulative = cumulative(&net);
    let payback_month = break_even_month(&cumulative);
    let irr = annualized_monthly_irr(&net, solver);

    let rows = (0..net.len())
        .map(|idx| CashflowRow {
            month: idx as u32,
            label: p.lease_start.and_then(|start| month_label(start, idx as u32)),
            income: income[idx],
            expense: expense[idx],
            net: net[idx],
            cumulative: cumulative[idx],
        })
        .collect();

    let total_income: Money = income.iter().sum();
    let total_expense: Money = expense.iter().sum();

    debug!(
        months = term,
        payback_month = ?payback_month,
        irr = ?irr,
        "projected deal cash flows"
    );

    CashflowProjection {
        rows,
        cumulative,
        payback_month,
        irr,
        total_income,
        total_expense,
        total_net: total_income - total_expense,
    }
}

fn month_label(start: NaiveDate, offset: u32) -> Option<String> {
    start
        .checked_add_months(Months::new(offset))
        .map(|date| date.format("%Y-%m").to_string())
}
