//! Per-category cost and revenue calculators. Each is a pure function of
//! the normalized snapshot and the scenario multipliers; tax and financing
//! also read the transport (and tax) totals they are based on.

pub mod exchange;
pub mod financing;
pub mod operating;
pub mod purchase;
pub mod revenue;
pub mod tax;
pub mod transport;

pub use exchange::{calculate_exchange, ExchangeExposure};
pub use financing::{calculate_financing, FinancingBreakdown, FinancingPeriod};
pub use operating::{calculate_operating, OperatingBreakdown};
pub use purchase::{calculate_purchase, PurchaseBreakdown};
pub use revenue::{calculate_revenue, RevenueBreakdown};
pub use tax::{calculate_tax, TaxBreakdown};
pub use transport::{calculate_transport, TransportBreakdown};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::params::ParameterSnapshot;
use crate::scenarios::ScenarioMultipliers;
use crate::types::Money;

/// Output of every calculator for one snapshot under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealBreakdown {
    pub revenue: RevenueBreakdown,
    pub purchase: PurchaseBreakdown,
    pub transport: TransportBreakdown,
    pub tax: TaxBreakdown,
    pub operating: OperatingBreakdown,
    pub financing: FinancingBreakdown,
    pub exchange: ExchangeExposure,
}

impl DealBreakdown {
    /// Rent plus service income received in each month of the term.
    pub fn monthly_revenue(&self) -> Money {
        self.revenue.monthly_rent_income + self.revenue.monthly_service_income
    }

    /// Purchase, transport and tax paid up front.
    pub fn upfront_outlay(&self) -> Money {
        self.purchase.purchase_total + self.transport.total + self.tax.total
    }
}

pub fn calculate_breakdown(p: &ParameterSnapshot, m: &ScenarioMultipliers) -> DealBreakdown {
    let revenue = calculate_revenue(p, m);
    let purchase = calculate_purchase(p, m);
    let transport = calculate_transport(p, m, purchase.purchase_total);
    let tax = calculate_tax(p, m, purchase.purchase_total, &transport);
    let operating = calculate_operating(p, m);
    let financing = calculate_financing(p, purchase.purchase_total, &transport, &tax);
    let exchange = calculate_exchange(p, m, revenue.total_rent);

    DealBreakdown {
        revenue,
        purchase,
        transport,
        tax,
        operating,
        financing,
        exchange,
    }
}

/// Lease term as a fraction of a year.
pub(crate) fn term_years(lease_term: u32) -> Decimal {
    Decimal::from(lease_term) / dec!(12)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal_macros::dec;

    use crate::params::{ParameterSnapshot, PaymentMode, TaxBasis};

    /// Reference deal: one machine, 12 months at 50,000, CIF valuation,
    /// full payment with 30% purchase advance for 6 months at 8%.
    pub fn reference_deal() -> ParameterSnapshot {
        let mut p = ParameterSnapshot::default();
        p.equipment.quantity = 1;
        p.revenue.lease_term = 12;
        p.revenue.monthly_rent = dec!(50000);
        p.equipment.purchase_price = dec!(800000);
        p.equipment.residual_value_rate = dec!(0.10);
        p.equipment.economic_life = 10;
        p.crossborder.domestic_freight = dec!(15000);
        p.crossborder.international_freight = dec!(25000);
        p.crossborder.port_charges = dec!(8000);
        p.crossborder.insurance_rate = dec!(0.008);
        p.crossborder.customs_agent_fee = dec!(3000);
        p.tax.tariff_rate = dec!(0.05);
        p.tax.vat_rate = dec!(0.12);
        p.tax.tax_basis = TaxBasis::Cif;
        p.financing.payment_mode = PaymentMode::Full;
        p.financing.purchase_advance_rate = dec!(0.30);
        p.financing.freight_tax_advance_rate = dec!(1.0);
        p.financing.advance_period = 6;
        p.financing.capital_cost_rate = dec!(0.08);
        p
    }
}
