use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transport::TransportBreakdown;
use crate::params::{ParameterSnapshot, TaxBasis};
use crate::scenarios::ScenarioMultipliers;
use crate::types::{ratio_or_zero, Money, Rate};

/// Import duties, VAT and customs clearance for all units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub dutiable_value: Money,
    pub tariff: Money,
    pub vat_base: Money,
    pub vat: Money,
    pub vat_deduct_amount: Money,
    /// VAT that is not recovered as input credit
    pub vat_cash_occupied: Money,
    pub customs_agent_fee: Money,
    /// tariff + unrecovered VAT + customs brokerage
    pub total: Money,
    /// Tax total relative to the purchase total
    pub tax_ratio: Rate,
}

pub fn calculate_tax(
    p: &ParameterSnapshot,
    m: &ScenarioMultipliers,
    purchase_total: Money,
    transport: &TransportBreakdown,
) -> TaxBreakdown {
    let t = &p.tax;

    let mut dutiable_value = purchase_total;
    if t.tax_basis == TaxBasis::Cif {
        if t.include_freight_in_dutiable {
            dutiable_value += transport.international_freight;
        }
        if t.include_insurance_in_dutiable {
            dutiable_value += transport.insurance;
        }
    }

    let tariff = if t.tariff_exempt {
        Decimal::ZERO
    } else {
        dutiable_value * t.tariff_rate * m.tax
    };

    let vat_base = dutiable_value + tariff;
    let vat = vat_base * t.vat_rate * m.tax;
    let vat_deduct_amount = if t.vat_deductible {
        vat * t.vat_deduct_rate
    } else {
        Decimal::ZERO
    };
    let vat_cash_occupied = vat - vat_deduct_amount;

    let customs_agent_fee = p.crossborder.customs_agent_fee * Decimal::from(p.equipment.quantity);
    let total = tariff + vat_cash_occupied + customs_agent_fee;

    TaxBreakdown {
        dutiable_value,
        tariff,
        vat_base,
        vat,
        vat_deduct_amount,
        vat_cash_occupied,
        customs_agent_fee,
        total,
        tax_ratio: ratio_or_zero(total, purchase_total),
    }
}
