use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Newton–Raphson settings shared by every iterative solver in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootFinder {
    pub initial_guess: Decimal,
    pub max_iterations: u32,
    /// Convergence is declared when |x_{n+1} - x_n| falls below this
    pub tolerance: Decimal,
}

impl RootFinder {
    /// Monthly IRR search: 10% per period, 100 iterations, 1e-4 on the step.
    pub const IRR_MONTHLY: RootFinder = RootFinder {
        initial_guess: dec!(0.10),
        max_iterations: 100,
        tolerance: dec!(0.0001),
    };

    /// Find a root of `f` given a function returning `(f(x), f'(x))`.
    ///
    /// `eval` returns `None` when the function is undefined at `x`; that,
    /// a zero derivative, or running out of iterations all yield `None`.
    pub fn solve<F>(&self, eval: F) -> Option<Decimal>
    where
        F: Fn(Decimal) -> Option<(Decimal, Decimal)>,
    {
        let mut x = self.initial_guess;
        for _ in 0..self.max_iterations {
            let (value, derivative) = eval(x)?;
            if derivative.is_zero() {
                return None;
            }
            let step = value.checked_div(derivative)?;
            let next = x.checked_sub(step)?;
            if step.abs() < self.tolerance {
                return Some(next);
            }
            x = next;
        }
        None
    }
}

impl Default for RootFinder {
    fn default() -> Self {
        Self::IRR_MONTHLY
    }
}

/// Net Present Value of a series of per-period cash flows.
///
/// Returns `None` for a rate at or below -100% or on overflow.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> Option<Money> {
    npv_with_derivative(rate, cash_flows).map(|(value, _)| value)
}

/// NPV and its analytic derivative `Σ -j·cf[j] / (1+r)^(j+1)`.
fn npv_with_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Money, Decimal)> {
    let one_plus_r = Decimal::ONE.checked_add(rate)?;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let mut value = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (j, cf) in cash_flows.iter().enumerate() {
        if j > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        value = value.checked_add(cf.checked_div(discount)?)?;
        if j > 0 {
            let weight = Decimal::from(j as u64).checked_mul(*cf)?;
            let next_discount = discount.checked_mul(one_plus_r)?;
            derivative = derivative.checked_sub(weight.checked_div(next_discount)?)?;
        }
    }

    Some((value, derivative))
}

/// True if the series contains at least one strictly positive and one
/// strictly negative flow.
fn has_sign_change(cash_flows: &[Money]) -> bool {
    let positive = cash_flows.iter().any(|cf| cf.is_sign_positive() && !cf.is_zero());
    let negative = cash_flows.iter().any(|cf| cf.is_sign_negative() && !cf.is_zero());
    positive && negative
}

/// Per-period Internal Rate of Return using Newton-Raphson.
pub fn irr(cash_flows: &[Money], solver: &RootFinder) -> Option<Rate> {
    if cash_flows.len() < 2 || !has_sign_change(cash_flows) {
        return None;
    }
    solver.solve(|rate| npv_with_derivative(rate, cash_flows))
}

/// IRR of a monthly series expressed as a nominal annual rate (monthly × 12).
pub fn annualized_monthly_irr(cash_flows: &[Money], solver: &RootFinder) -> Option<Rate> {
    irr(cash_flows, solver).and_then(|monthly| monthly.checked_mul(dec!(12)))
}

/// Level installment that retires `principal` over `periods` at `rate` per period.
///
/// `P·r·(1+r)^n / ((1+r)^n − 1)`, or `P/n` when the rate is zero.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> Option<Money> {
    if periods == 0 {
        return None;
    }
    if rate.is_zero() {
        return principal.checked_div(Decimal::from(periods));
    }

    let factor = (Decimal::ONE + rate).checked_powu(periods as u64)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return None;
    }
    principal.checked_mul(rate)?.checked_mul(factor)?.checked_div(denominator)
}
