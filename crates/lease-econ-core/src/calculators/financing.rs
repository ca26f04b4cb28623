use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::tax::TaxBreakdown;
use super::transport::TransportBreakdown;
use crate::params::{ParameterSnapshot, PaymentMode, RepaymentMethod};
use crate::time_value::level_payment;
use crate::types::{Money, Rate};

/// A single month in the loan amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingPeriod {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Cost of funding the up-front outlay, in either payment mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingBreakdown {
    pub payment_mode: PaymentMode,
    pub repayment_method: RepaymentMethod,
    /// Purchase + transport + tax paid before the first rent month
    pub initial_total: Money,
    /// Full mode: capital advanced and carried at `capital_cost_rate`
    pub advance_amount: Money,
    pub down_payment: Money,
    pub financing_amount: Money,
    /// Level installment (equal repayment); zero otherwise
    pub monthly_payment: Money,
    pub interest: Money,
    pub handling_fee: Money,
    /// Total cost of funds: interest + handling fee, or the advance carry cost
    pub capital_cost: Money,
    pub schedule: Vec<FinancingPeriod>,
}

impl FinancingBreakdown {
    /// Loan payment due in `month` (1-based); zero outside the schedule.
    pub fn scheduled_payment(&self, month: u32) -> Money {
        if month == 0 {
            return Decimal::ZERO;
        }
        self.schedule
            .get(month as usize - 1)
            .map(|period| period.payment)
            .unwrap_or(Decimal::ZERO)
    }
}

pub fn calculate_financing(
    p: &ParameterSnapshot,
    purchase_total: Money,
    transport: &TransportBreakdown,
    tax: &TaxBreakdown,
) -> FinancingBreakdown {
    let f = &p.financing;
    let initial_total = purchase_total + transport.total + tax.total;

    let mut out = FinancingBreakdown {
        payment_mode: f.payment_mode,
        repayment_method: f.repayment_method,
        initial_total,
        advance_amount: Decimal::ZERO,
        down_payment: Decimal::ZERO,
        financing_amount: Decimal::ZERO,
        monthly_payment: Decimal::ZERO,
        interest: Decimal::ZERO,
        handling_fee: Decimal::ZERO,
        capital_cost: Decimal::ZERO,
        schedule: Vec::new(),
    };

    match f.payment_mode {
        PaymentMode::Full => {
            out.advance_amount = purchase_total * f.purchase_advance_rate
                + (transport.total + tax.total) * f.freight_tax_advance_rate;
            out.capital_cost = out.advance_amount
                * f.capital_cost_rate
                * Decimal::from(f.advance_period)
                / dec!(12);
        }
        PaymentMode::Financing => {
            out.down_payment = initial_total * f.down_payment_rate;
            out.financing_amount = initial_total - out.down_payment;
            out.handling_fee = out.financing_amount * f.handling_fee_rate;

            if f.financing_term == 0 {
                warn!("financing mode with a zero-month term; no repayment schedule built");
            } else {
                match f.repayment_method {
                    RepaymentMethod::Equal => {
                        let (payment, schedule) =
                            equal_schedule(out.financing_amount, f.financing_rate, f.financing_term);
                        out.monthly_payment = payment;
                        out.interest = schedule.iter().map(|period| period.interest).sum();
                        out.schedule = schedule;
                    }
                    RepaymentMethod::Bullet => {
                        out.interest = out.financing_amount
                            * f.financing_rate
                            * Decimal::from(f.financing_term)
                            / dec!(12);
                        out.schedule =
                            bullet_schedule(out.financing_amount, out.interest, f.financing_term);
                    }
                }
            }
            out.capital_cost = out.interest + out.handling_fee;
        }
    }

    out
}

/// Level-installment schedule. The final month clears any residual balance.
fn equal_schedule(principal: Money, annual_rate: Rate, term: u32) -> (Money, Vec<FinancingPeriod>) {
    let monthly_rate = annual_rate / dec!(12);
    // (1+r)^n too large to represent: the installment is interest-only in the limit
    let payment = level_payment(principal, monthly_rate, term)
        .unwrap_or_else(|| principal * monthly_rate);

    let mut schedule = Vec::with_capacity(term as usize);
    let mut balance = principal;

    for month in 1..=term {
        let opening = balance;
        let interest = opening * monthly_rate;
        let (payment_due, principal_paid) = if month == term {
            (opening + interest, opening)
        } else {
            (payment, payment - interest)
        };
        balance = opening - principal_paid;

        schedule.push(FinancingPeriod {
            month,
            opening_balance: opening,
            payment: payment_due,
            interest,
            principal: principal_paid,
            closing_balance: balance,
        });
    }

    (payment, schedule)
}

/// Nothing is paid until maturity, when principal and all interest fall due.
fn bullet_schedule(principal: Money, total_interest: Money, term: u32) -> Vec<FinancingPeriod> {
    (1..=term)
        .map(|month| {
            let at_maturity = month == term;
            FinancingPeriod {
                month,
                opening_balance: principal,
                payment: if at_maturity { principal + total_interest } else { Decimal::ZERO },
                interest: if at_maturity { total_interest } else { Decimal::ZERO },
                principal: if at_maturity { principal } else { Decimal::ZERO },
                closing_balance: if at_maturity { Decimal::ZERO } else { principal },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::fixtures::reference_deal;
    use crate::calculators::tax::calculate_tax;
    use crate::calculators::transport::calculate_transport;
    use crate::scenarios::ScenarioName;

    fn run(p: &ParameterSnapshot) -> FinancingBreakdown {
        let m = ScenarioName::Baseline.multipliers();
        let transport = calculate_transport(p, m, dec!(800000));
        let tax = calculate_tax(p, m, dec!(800000), &transport);
        calculate_financing(p, dec!(800000), &transport, &tax)
    }

    #[test]
    fn test_full_mode_advance_and_capital_cost() {
        let f = run(&reference_deal());
        // 800,000 × 30% + (54,400 + 149,326.4) × 100%
        assert_eq!(f.advance_amount, dec!(443726.4));
        // × 8% × 6/12
        assert_eq!(f.capital_cost, dec!(17749.056));
        assert!(f.schedule.is_empty());
        assert_eq!(f.scheduled_payment(1), Decimal::ZERO);
    }

    #[test]
    fn test_equal_repayment_schedule_retires_principal() {
        let mut p = reference_deal();
        p.financing.payment_mode = PaymentMode::Financing;
        p.financing.down_payment_rate = dec!(0.30);
        p.financing.financing_rate = dec!(0.06);
        p.financing.financing_term = 12;
        p.financing.handling_fee_rate = dec!(0.01);
        let f = run(&p);

        assert_eq!(f.initial_total, dec!(1003726.4));
        assert_eq!(f.down_payment, dec!(301117.92));
        assert_eq!(f.financing_amount, dec!(702608.48));
        assert_eq!(f.schedule.len(), 12);
        assert_eq!(f.schedule.last().unwrap().closing_balance, Decimal::ZERO);

        let principal_paid: Decimal = f.schedule.iter().map(|x| x.principal).sum();
        assert!((principal_paid - f.financing_amount).abs() < dec!(0.000001));

        let total_paid: Decimal = f.schedule.iter().map(|x| x.payment).sum();
        assert!((total_paid - f.financing_amount - f.interest).abs() < dec!(0.000001));
        // 702,608.48 at 0.5%/month for 12 months ≈ 60,471.00 per month
        assert!((f.monthly_payment - dec!(60471.00)).abs() < dec!(0.01));
        assert_eq!(f.handling_fee, dec!(7026.0848));
        assert_eq!(f.capital_cost, f.interest + f.handling_fee);
    }

    #[test]
    fn test_zero_rate_equal_repayment() {
        let mut p = reference_deal();
        p.financing.payment_mode = PaymentMode::Financing;
        p.financing.financing_rate = Decimal::ZERO;
        p.financing.handling_fee_rate = Decimal::ZERO;
        let f = run(&p);
        assert_eq!(f.interest, Decimal::ZERO);
        assert_eq!(f.capital_cost, Decimal::ZERO);
        assert_eq!(f.monthly_payment, f.financing_amount / dec!(12));
    }

    #[test]
    fn test_bullet_pays_everything_at_maturity() {
        let mut p = reference_deal();
        p.financing.payment_mode = PaymentMode::Financing;
        p.financing.repayment_method = RepaymentMethod::Bullet;
        p.financing.financing_rate = dec!(0.06);
        p.financing.financing_term = 24;
        let f = run(&p);

        // simple interest: P × 6% × 2 years
        assert_eq!(f.interest, f.financing_amount * dec!(0.12));
        for month in 1..24 {
            assert_eq!(f.scheduled_payment(month), Decimal::ZERO);
        }
        assert_eq!(f.scheduled_payment(24), f.financing_amount + f.interest);
        assert_eq!(f.scheduled_payment(25), Decimal::ZERO);
        let paid: Money = f.schedule.iter().map(|period| period.payment).sum();
        assert_eq!(paid, f.financing_amount + f.interest);
    }

    #[test]
    fn test_zero_term_financing_has_no_schedule() {
        let mut p = reference_deal();
        p.financing.payment_mode = PaymentMode::Financing;
        p.financing.financing_term = 0;
        let f = run(&p);
        assert!(f.schedule.is_empty());
        assert_eq!(f.interest, Decimal::ZERO);
        assert_eq!(f.capital_cost, f.handling_fee);
    }
}
