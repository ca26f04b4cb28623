use rust_decimal_macros::dec;

use super::snapshot::ParameterSnapshot;
use crate::types::{Money, Rate};

/// Longest lease, financing or advance term, in months.
pub const MAX_TERM_MONTHS: u32 = 600;
pub const MAX_ECONOMIC_LIFE_YEARS: u32 = 100;
pub const MAX_QUANTITY: u32 = 10_000;
/// Largest per-unit amount (and exchange rate) the engine computes with.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);
/// Largest rate magnitude, as a fraction (1000%).
pub const MAX_RATE: Rate = dec!(10);

/// Rates that are a share of a whole and so must lie in `[0, 1]`.
pub const SHARE_RATES: [&str; 6] = [
    "residual_value_rate",
    "disposal_fee_rate",
    "vat_deduct_rate",
    "purchase_advance_rate",
    "freight_tax_advance_rate",
    "down_payment_rate",
];

impl ParameterSnapshot {
    /// Per-unit amounts and the exchange rate, by field name.
    pub fn amounts(&self) -> [(&'static str, Money); 14] {
        [
            ("monthly_rent", self.revenue.monthly_rent),
            ("purchase_price", self.equipment.purchase_price),
            ("installation_fee", self.revenue.installation_fee),
            ("maintenance_service_fee", self.revenue.maintenance_service_fee),
            ("end_sale_price", self.revenue.end_sale_price),
            ("domestic_freight", self.crossborder.domestic_freight),
            ("international_freight", self.crossborder.international_freight),
            ("port_charges", self.crossborder.port_charges),
            ("customs_agent_fee", self.crossborder.customs_agent_fee),
            ("annual_maintenance", self.operating.annual_maintenance),
            ("local_parts", self.operating.local_parts),
            ("local_service_fee", self.operating.local_service_fee),
            ("other_operating_cost", self.operating.other_operating_cost),
            ("exchange_rate", self.fx.exchange_rate),
        ]
    }

    /// Every fraction-valued field, by field name.
    pub fn rates(&self) -> [(&'static str, Rate); 13] {
        [
            ("residual_value_rate", self.equipment.residual_value_rate),
            ("disposal_fee_rate", self.revenue.disposal_fee_rate),
            ("insurance_rate", self.crossborder.insurance_rate),
            ("tariff_rate", self.tax.tariff_rate),
            ("vat_rate", self.tax.vat_rate),
            ("vat_deduct_rate", self.tax.vat_deduct_rate),
            ("purchase_advance_rate", self.financing.purchase_advance_rate),
            ("freight_tax_advance_rate", self.financing.freight_tax_advance_rate),
            ("capital_cost_rate", self.financing.capital_cost_rate),
            ("down_payment_rate", self.financing.down_payment_rate),
            ("financing_rate", self.financing.financing_rate),
            ("handling_fee_rate", self.financing.handling_fee_rate),
            ("exchange_volatility", self.fx.exchange_volatility),
        ]
    }

    /// Whole-number fields with their upper limits.
    pub fn counts(&self) -> [(&'static str, u32, u32); 5] {
        [
            ("quantity", self.equipment.quantity, MAX_QUANTITY),
            ("economic_life", self.equipment.economic_life, MAX_ECONOMIC_LIFE_YEARS),
            ("lease_term", self.revenue.lease_term, MAX_TERM_MONTHS),
            ("advance_period", self.financing.advance_period, MAX_TERM_MONTHS),
            ("financing_term", self.financing.financing_term, MAX_TERM_MONTHS),
        ]
    }

    /// Copy with every magnitude clamped to the supported range. Within it
    /// no pipeline figure can overflow; in-range snapshots come back equal.
    pub fn bounded(&self) -> ParameterSnapshot {
        let mut p = self.clone();

        let amounts = [
            &mut p.revenue.monthly_rent,
            &mut p.equipment.purchase_price,
            &mut p.revenue.installation_fee,
            &mut p.revenue.maintenance_service_fee,
            &mut p.revenue.end_sale_price,
            &mut p.crossborder.domestic_freight,
            &mut p.crossborder.international_freight,
            &mut p.crossborder.port_charges,
            &mut p.crossborder.customs_agent_fee,
            &mut p.operating.annual_maintenance,
            &mut p.operating.local_parts,
            &mut p.operating.local_service_fee,
            &mut p.operating.other_operating_cost,
            &mut p.fx.exchange_rate,
        ];
        for value in amounts {
            *value = (*value).clamp(-MAX_AMOUNT, MAX_AMOUNT);
        }

        let rates = [
            &mut p.equipment.residual_value_rate,
            &mut p.revenue.disposal_fee_rate,
            &mut p.crossborder.insurance_rate,
            &mut p.tax.tariff_rate,
            &mut p.tax.vat_rate,
            &mut p.tax.vat_deduct_rate,
            &mut p.financing.purchase_advance_rate,
            &mut p.financing.freight_tax_advance_rate,
            &mut p.financing.capital_cost_rate,
            &mut p.financing.down_payment_rate,
            &mut p.financing.financing_rate,
            &mut p.financing.handling_fee_rate,
            &mut p.fx.exchange_volatility,
        ];
        for value in rates {
            *value = (*value).clamp(-MAX_RATE, MAX_RATE);
        }

        p.equipment.quantity = p.equipment.quantity.min(MAX_QUANTITY);
        p.equipment.economic_life = p.equipment.economic_life.min(MAX_ECONOMIC_LIFE_YEARS);
        p.revenue.lease_term = p.revenue.lease_term.min(MAX_TERM_MONTHS);
        p.financing.advance_period = p.financing.advance_period.min(MAX_TERM_MONTHS);
        p.financing.financing_term = p.financing.financing_term.min(MAX_TERM_MONTHS);
        p
    }
}

/// Whether a rate field is a share of a whole, bounded by one.
pub fn is_share_rate(field: &str) -> bool {
    SHARE_RATES.contains(&field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::normalize;
    use serde_json::json;

    #[test]
    fn test_in_range_snapshot_is_unchanged() {
        let p = ParameterSnapshot::default();
        assert_eq!(p.bounded(), p);
    }

    #[test]
    fn test_extreme_values_are_clamped() {
        let raw = json!({
            "purchasePrice": "79228162514264337593543950000",
            "quantity": 100000,
            "leaseTerm": 4000000000u64,
            "financingTerm": "1e12",
            "tariffRate": -5000,
        });
        let p = normalize(raw.as_object().unwrap()).bounded();
        assert_eq!(p.equipment.purchase_price, MAX_AMOUNT);
        assert_eq!(p.equipment.quantity, MAX_QUANTITY);
        assert_eq!(p.revenue.lease_term, MAX_TERM_MONTHS);
        assert_eq!(p.financing.financing_term, MAX_TERM_MONTHS);
        assert_eq!(p.tax.tariff_rate, -MAX_RATE);
    }

    #[test]
    fn test_field_lists_name_every_value() {
        let p = ParameterSnapshot::default();
        assert!(p.amounts().iter().any(|(f, _)| *f == "exchange_rate"));
        assert_eq!(p.rates().len(), 13);
        for field in SHARE_RATES {
            assert!(p.rates().iter().any(|(f, _)| *f == field), "{field}");
        }
        assert!(is_share_rate("down_payment_rate"));
        assert!(!is_share_rate("tariff_rate"));
    }
}
