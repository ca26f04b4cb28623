use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use super::snapshot::*;
use crate::scenarios::multipliers::ScenarioName;
use crate::types::{Currency, Money, Percent, Rate};

/// Raw deal form: camelCase keys, loosely-typed values.
pub type RawInput = Map<String, Value>;

/// Turn a raw form map into a fully-defaulted [`ParameterSnapshot`].
///
/// Percent fields are entered as "5" meaning 5% and are converted to
/// fractions here and nowhere else. Missing, blank or unparseable values fall
/// back to the defaults of [`ParameterSnapshot::default`]. Nothing is
/// rejected: range checks are reported later by the validation step.
pub fn normalize(raw: &RawInput) -> ParameterSnapshot {
    let d = ParameterSnapshot::default();
    let f = Fields(raw);

    let snapshot = ParameterSnapshot {
        equipment: EquipmentParams {
            quantity: f.count("quantity", d.equipment.quantity),
            purchase_price: f.money("purchasePrice", d.equipment.purchase_price),
            economic_life: f.count("economicLife", d.equipment.economic_life),
            residual_value_rate: f.rate("residualValueRate", d.equipment.residual_value_rate),
        },
        revenue: RevenueParams {
            monthly_rent: f.money("monthlyRent", d.revenue.monthly_rent),
            installation_fee: f.money("installationFee", d.revenue.installation_fee),
            maintenance_service_fee: f
                .money("maintenanceServiceFee", d.revenue.maintenance_service_fee),
            lease_term: f.count("leaseTerm", d.revenue.lease_term),
            end_sale_price: f.money("endSalePrice", d.revenue.end_sale_price),
            disposal_fee_rate: f.rate("disposalFeeRate", d.revenue.disposal_fee_rate),
        },
        crossborder: CrossborderParams {
            domestic_freight: f.money("domesticFreight", d.crossborder.domestic_freight),
            international_freight: f
                .money("internationalFreight", d.crossborder.international_freight),
            port_charges: f.money("portCharges", d.crossborder.port_charges),
            insurance_rate: f.rate("insuranceRate", d.crossborder.insurance_rate),
            insurance_base: match f.choice("insuranceBase").as_deref() {
                Some("cif") | Some("cif_value") | Some("cifvalue") => InsuranceBase::CifValue,
                Some("equipment") | Some("equipment_value") | Some("goods") => {
                    InsuranceBase::EquipmentValue
                }
                _ => d.crossborder.insurance_base,
            },
            customs_agent_fee: f.money("customsAgentFee", d.crossborder.customs_agent_fee),
        },
        tax: TaxParams {
            tax_basis: match f.choice("taxBasis").as_deref() {
                Some("cif") => TaxBasis::Cif,
                Some("fob") => TaxBasis::Fob,
                _ => d.tax.tax_basis,
            },
            tariff_rate: f.rate("tariffRate", d.tax.tariff_rate),
            vat_rate: f.rate("vatRate", d.tax.vat_rate),
            tariff_exempt: f.flag("tariffExempt", d.tax.tariff_exempt),
            vat_deductible: f.flag("vatDeductible", d.tax.vat_deductible),
            vat_deduct_rate: f.rate("vatDeductRate", d.tax.vat_deduct_rate),
            include_freight_in_dutiable: f
                .flag("includeFreightInTax", d.tax.include_freight_in_dutiable),
            include_insurance_in_dutiable: f
                .flag("includeInsuranceInTax", d.tax.include_insurance_in_dutiable),
        },
        operating: OperatingParams {
            annual_maintenance: f.money("annualMaintenance", d.operating.annual_maintenance),
            local_parts: f.money("localParts", d.operating.local_parts),
            local_service_fee: f.money("localServiceFee", d.operating.local_service_fee),
            other_operating_cost: f
                .money("otherOperatingCost", d.operating.other_operating_cost),
        },
        financing: FinancingParams {
            payment_mode: match f.choice("paymentMode").as_deref() {
                Some("full") => PaymentMode::Full,
                Some("financing") | Some("finance") | Some("loan") => PaymentMode::Financing,
                _ => d.financing.payment_mode,
            },
            purchase_advance_rate: f
                .rate("purchaseAdvanceRate", d.financing.purchase_advance_rate),
            freight_tax_advance_rate: f
                .rate("freightTaxAdvanceRate", d.financing.freight_tax_advance_rate),
            advance_period: f.count("advancePeriod", d.financing.advance_period),
            capital_cost_rate: f.rate("capitalCostRate", d.financing.capital_cost_rate),
            down_payment_rate: f.rate("downPaymentRate", d.financing.down_payment_rate),
            financing_rate: f.rate("financingRate", d.financing.financing_rate),
            financing_term: f.count("financingTerm", d.financing.financing_term),
            repayment_method: match f.choice("repaymentMethod").as_deref() {
                Some("equal") | Some("annuity") => RepaymentMethod::Equal,
                Some("bullet") => RepaymentMethod::Bullet,
                _ => d.financing.repayment_method,
            },
            handling_fee_rate: f.rate("handlingFeeRate", d.financing.handling_fee_rate),
        },
        fx: FxParams {
            exchange_rate: f.money("exchangeRate", d.fx.exchange_rate),
            exchange_volatility: f.rate("exchangeVolatility", d.fx.exchange_volatility),
            rent_currency: f
                .text("rentCurrency")
                .map(|code| Currency::from_code(&code))
                .unwrap_or(d.fx.rent_currency),
        },
        business_mode: match f.choice("businessMode").as_deref() {
            Some("lease") => BusinessMode::Lease,
            Some("lease-to-sell") | Some("lease_to_sell") | Some("leasetosell") => {
                BusinessMode::LeaseToSell
            }
            _ => d.business_mode,
        },
        scenario: f
            .choice("scenario")
            .and_then(|name| name.parse::<ScenarioName>().ok())
            .unwrap_or(d.scenario),
        lease_start: f
            .text("leaseStart")
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
    };

    debug!(
        supplied_fields = raw.len(),
        scenario = ?snapshot.scenario,
        "normalized deal parameters"
    );
    snapshot
}

/// Typed accessors over the raw map.
struct Fields<'a>(&'a RawInput);

impl Fields<'_> {
    fn number(&self, key: &str) -> Option<Decimal> {
        match self.0.get(key)? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s),
            _ => None,
        }
    }

    fn money(&self, key: &str, default: Money) -> Money {
        self.number(key).unwrap_or(default)
    }

    /// Percent-typed field: "5" on the form is stored as 0.05.
    fn rate(&self, key: &str, default: Rate) -> Rate {
        self.number(key)
            .map(|value| Percent(value).to_rate())
            .unwrap_or(default)
    }

    /// Whole-number field. Fractions truncate, negatives clamp to zero.
    fn count(&self, key: &str, default: u32) -> u32 {
        match self.number(key) {
            Some(value) if value.is_sign_negative() => 0,
            Some(value) => value.trunc().to_u32().unwrap_or(u32::MAX),
            None => default,
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "on" => true,
                "false" | "0" | "no" | "n" | "off" => false,
                _ => default,
            },
            _ => default,
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Lower-cased enum choice.
    fn choice(&self, key: &str) -> Option<String> {
        self.text(key).map(|s| s.to_ascii_lowercase())
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw(value: Value) -> RawInput {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        assert_eq!(normalize(&RawInput::new()), ParameterSnapshot::default());
    }

    #[test]
    fn test_percent_fields_divided_once() {
        let snapshot = normalize(&raw(json!({
            "tariffRate": 5,
            "vatRate": "13",
            "insuranceRate": 0.8,
            "residualValueRate": "10",
        })));
        assert_eq!(snapshot.tax.tariff_rate, dec!(0.05));
        assert_eq!(snapshot.tax.vat_rate, dec!(0.13));
        assert_eq!(snapshot.crossborder.insurance_rate, dec!(0.008));
        assert_eq!(snapshot.equipment.residual_value_rate, dec!(0.10));
    }

    #[test]
    fn test_blank_and_garbage_fall_back_to_defaults() {
        let snapshot = normalize(&raw(json!({
            "quantity": "",
            "leaseTerm": "abc",
            "purchasePrice": null,
        })));
        assert_eq!(snapshot.equipment.quantity, 1);
        assert_eq!(snapshot.revenue.lease_term, 12);
        assert_eq!(snapshot.equipment.purchase_price, dec!(800000));
    }

    #[test]
    fn test_numeric_strings_with_separators() {
        let snapshot = normalize(&raw(json!({ "purchasePrice": "1,250,000.50" })));
        assert_eq!(snapshot.equipment.purchase_price, dec!(1250000.50));
    }

    #[test]
    fn test_invalid_values_are_kept_for_validation() {
        let snapshot = normalize(&raw(json!({
            "quantity": -2,
            "monthlyRent": 0,
            "leaseTerm": "0",
        })));
        assert_eq!(snapshot.equipment.quantity, 0);
        assert_eq!(snapshot.revenue.monthly_rent, Decimal::ZERO);
        assert_eq!(snapshot.revenue.lease_term, 0);
    }

    #[test]
    fn test_enum_choices() {
        let snapshot = normalize(&raw(json!({
            "taxBasis": "FOB",
            "paymentMode": "financing",
            "repaymentMethod": "bullet",
            "businessMode": "lease-to-sell",
            "scenario": "conservative",
            "insuranceBase": "cif",
            "rentCurrency": "eur",
        })));
        assert_eq!(snapshot.tax.tax_basis, TaxBasis::Fob);
        assert_eq!(snapshot.financing.payment_mode, PaymentMode::Financing);
        assert_eq!(snapshot.financing.repayment_method, RepaymentMethod::Bullet);
        assert_eq!(snapshot.business_mode, BusinessMode::LeaseToSell);
        assert_eq!(snapshot.scenario, ScenarioName::Conservative);
        assert_eq!(snapshot.crossborder.insurance_base, InsuranceBase::CifValue);
        assert_eq!(snapshot.fx.rent_currency, Currency::EUR);
    }

    #[test]
    fn test_unknown_choice_keeps_default() {
        let snapshot = normalize(&raw(json!({ "scenario": "apocalyptic", "taxBasis": "DDP" })));
        assert_eq!(snapshot.scenario, ScenarioName::Baseline);
        assert_eq!(snapshot.tax.tax_basis, TaxBasis::Cif);
    }

    #[test]
    fn test_flags_accept_form_spellings() {
        let snapshot = normalize(&raw(json!({
            "tariffExempt": "on",
            "vatDeductible": 1,
            "includeFreightInTax": "false",
        })));
        assert!(snapshot.tax.tariff_exempt);
        assert!(snapshot.tax.vat_deductible);
        assert!(!snapshot.tax.include_freight_in_dutiable);
    }

    #[test]
    fn test_lease_start_date() {
        let snapshot = normalize(&raw(json!({ "leaseStart": "2025-03-01" })));
        assert_eq!(snapshot.lease_start, NaiveDate::from_ymd_opt(2025, 3, 1));
    }
}
