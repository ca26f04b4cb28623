pub mod payback;
pub mod projector;

pub use payback::{calculate_payback_periods, PaybackPeriods, PaybackSeries};
pub use projector::{project_cashflows, CashflowProjection, CashflowRow};

use rust_decimal::Decimal;

use crate::types::Money;

/// Running sum of a net cash-flow series.
pub fn cumulative(net: &[Money]) -> Vec<Money> {
    net.iter()
        .scan(Decimal::ZERO, |running, cf| {
            *running += *cf;
            Some(*running)
        })
        .collect()
}

/// First month whose cumulative position is non-negative. Never extrapolates
/// past the end of the series.
pub fn break_even_month(cumulative: &[Money]) -> Option<u32> {
    cumulative
        .iter()
        .position(|c| *c >= Decimal::ZERO)
        .map(|idx| idx as u32)
}
