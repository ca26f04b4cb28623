use lease_econ_core::compliance::Threshold;
use lease_econ_core::params::{BusinessMode, PaymentMode, RepaymentMethod, TaxBasis};
use lease_econ_core::time_value::{annualized_monthly_irr, RootFinder};
use lease_econ_core::{
    calculate, calculate_all_scenarios, normalize, sensitivity_analysis, ParameterSnapshot,
    RawInput, ScenarioName, SensitivityTarget, SensitivityVariable, DEFAULT_SENSITIVITY_STEPS,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Fixtures
// ===========================================================================

/// The reference deal as the deal form submits it: percent fields as
/// percent numbers, some values as strings.
fn reference_form() -> RawInput {
    let value = json!({
        "quantity": 1,
        "leaseTerm": "12",
        "monthlyRent": 50000,
        "purchasePrice": "800,000",
        "residualValueRate": 10,
        "economicLife": 10,
        "domesticFreight": 15000,
        "internationalFreight": 25000,
        "portCharges": 8000,
        "insuranceRate": "0.8",
        "customsAgentFee": 3000,
        "tariffRate": 5,
        "vatRate": 12,
        "taxBasis": "CIF",
        "paymentMode": "full",
        "purchaseAdvanceRate": 30,
        "freightTaxAdvanceRate": 100,
        "advancePeriod": 6,
        "capitalCostRate": 8,
        "scenario": "baseline"
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn reference_deal() -> ParameterSnapshot {
    normalize(&reference_form())
}

fn long_lease() -> ParameterSnapshot {
    let mut p = reference_deal();
    p.revenue.lease_term = 36;
    p
}

/// A spread of valid deals touching every mode and basis.
fn deal_grid() -> Vec<ParameterSnapshot> {
    let mut deals = Vec::new();
    for rent in [dec!(20000), dec!(50000), dec!(120000)] {
        for term in [6u32, 12, 36, 60] {
            for financed in [false, true] {
                let mut p = reference_deal();
                p.revenue.monthly_rent = rent;
                p.revenue.lease_term = term;
                p.equipment.quantity = if term > 12 { 3 } else { 1 };
                if financed {
                    p.financing.payment_mode = PaymentMode::Financing;
                    p.financing.repayment_method = if term > 12 {
                        RepaymentMethod::Bullet
                    } else {
                        RepaymentMethod::Equal
                    };
                }
                if term == 36 {
                    p.tax.tax_basis = TaxBasis::Fob;
                    p.operating.annual_maintenance = dec!(12000);
                }
                if term == 60 {
                    p.business_mode = BusinessMode::LeaseToSell;
                    p.revenue.end_sale_price = dec!(300000);
                    p.revenue.installation_fee = dec!(5000);
                }
                deals.push(p);
            }
        }
    }
    deals
}

// ===========================================================================
// Reference deal
// ===========================================================================

#[test]
fn test_reference_deal_figures() {
    let r = calculate(&reference_deal());

    assert_eq!(r.revenue.total_rent, dec!(600000));
    assert_eq!(r.purchase.purchase_total, dec!(800000));
    assert_eq!(r.purchase.annual_depreciation, dec!(72000));
    // 800,000 + 25,000 freight + 6,400 insurance
    assert_eq!(r.tax.dutiable_value, dec!(831400));
    // 15,000 + 25,000 + 8,000 + 6,400
    assert_eq!(r.transport.total, dec!(54400));
    assert!(r.validation.is_valid());
}

#[test]
fn test_reference_deal_margins_and_payback() {
    let r = calculate(&reference_deal());
    assert!(r.gross_margins.gm1_pass);
    assert!(r.gross_margins.gm3_pass);
    assert_eq!(r.payback_periods.pb1.month, None);
    assert_eq!(r.payback_periods.pb2.month, Some(10));
    assert_eq!(r.cashflow.payback_month, None);
    assert!(!r.compliance.passed);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_gross_margins_never_increase() {
    for p in deal_grid() {
        let gm = calculate(&p).gross_margins;
        assert!(gm.gm1 >= gm.gm2, "GM1 < GM2 for {:?}", p.revenue);
        assert!(gm.gm2 >= gm.gm3, "GM2 < GM3 for {:?}", p.revenue);
    }
}

#[test]
fn test_zero_revenue_gives_zero_margins() {
    let mut p = reference_deal();
    p.revenue.monthly_rent = Decimal::ZERO;
    let r = calculate(&p);
    assert_eq!(r.revenue.total, Decimal::ZERO);
    assert_eq!(r.gross_margins.gm1, Decimal::ZERO);
    assert_eq!(r.gross_margins.gm2, Decimal::ZERO);
    assert_eq!(r.gross_margins.gm3, Decimal::ZERO);
    assert_eq!(r.profit.profit_margin, Decimal::ZERO);
    assert!(!r.validation.is_valid());
}

#[test]
fn test_baseline_scenario_equals_single_run() {
    for p in deal_grid() {
        assert_eq!(calculate_all_scenarios(&p).baseline, calculate(&p));
    }
}

#[test]
fn test_min_rent_round_trip() {
    for mut p in deal_grid() {
        let t = calculate(&p).thresholds;
        let Threshold::Solved(rent) = t.min_rent_for_gm1 else {
            panic!("no rent solution for {:?}", p.revenue);
        };
        if rent.is_zero() {
            continue;
        }
        p.revenue.monthly_rent = rent;
        let gm1 = calculate(&p).gross_margins.gm1;
        assert!((gm1 - dec!(0.30)).abs() < dec!(0.000001), "GM1 = {gm1}");
    }
}

#[test]
fn test_irr_sign_behaviour() {
    let mut flows = vec![dec!(-500000)];
    flows.extend(std::iter::repeat(dec!(30000)).take(24));
    let irr = annualized_monthly_irr(&flows, &RootFinder::IRR_MONTHLY).unwrap();
    assert!(irr > Decimal::ZERO);

    let positive_only = vec![dec!(1000); 12];
    assert_eq!(annualized_monthly_irr(&positive_only, &RootFinder::IRR_MONTHLY), None);

    assert!(calculate(&long_lease()).cashflow.irr.unwrap() > Decimal::ZERO);
}

#[test]
fn test_calculate_is_idempotent() {
    for p in deal_grid() {
        assert_eq!(calculate(&p), calculate(&p));
    }
}

#[test]
fn test_conservative_is_strictly_worse() {
    let p = long_lease();
    let set = calculate_all_scenarios(&p);
    let (base, cons) = (&set.baseline, &set.conservative);

    assert!(cons.gross_margins.gm1 < base.gross_margins.gm1);
    assert!(cons.gross_margins.gm2 < base.gross_margins.gm2);
    assert!(cons.gross_margins.gm3 < base.gross_margins.gm3);

    // 21 -> 24 and 10 -> 12 months
    assert_eq!(base.payback_periods.pb1.month, Some(21));
    assert_eq!(cons.payback_periods.pb1.month, Some(24));
    assert_eq!(base.payback_periods.pb2.month, Some(10));
    assert_eq!(cons.payback_periods.pb2.month, Some(12));
}

#[test]
fn test_optimistic_is_better() {
    let set = calculate_all_scenarios(&long_lease());
    assert!(set.optimistic.gross_margins.gm1 > set.baseline.gross_margins.gm1);
    assert!(set.optimistic.profit.annual_profit > set.baseline.profit.annual_profit);
}

// ===========================================================================
// Sensitivity
// ===========================================================================

#[test]
fn test_sensitivity_payback_moves_with_rent() {
    let p = long_lease();
    let points = sensitivity_analysis(
        &p,
        SensitivityTarget::PaybackMonth,
        SensitivityVariable::MonthlyRent,
        &DEFAULT_SENSITIVITY_STEPS,
    );
    let months: Vec<Option<Decimal>> = points.iter().map(|pt| pt.value).collect();
    // -20% rent: 1,003,726.4 / 40,000 => 26; +20%: / 60,000 => 17
    assert_eq!(months.first().copied().flatten(), Some(dec!(26)));
    assert_eq!(months.last().copied().flatten(), Some(dec!(17)));
    assert_eq!(months[3], Some(dec!(21)));
}

#[test]
fn test_sensitivity_runs_are_independent() {
    let p = long_lease();
    let forward = sensitivity_analysis(
        &p,
        SensitivityTarget::Irr,
        SensitivityVariable::Freight,
        &[dec!(-10), dec!(0), dec!(10)],
    );
    let single = sensitivity_analysis(&p, SensitivityTarget::Irr, SensitivityVariable::Freight, &[dec!(0)]);
    assert_eq!(forward[1], single[0]);
    assert_eq!(forward[1].value, calculate(&p).cashflow.irr);
}

// ===========================================================================
// Serialization
// ===========================================================================

#[test]
fn test_record_serializes_missing_payback_as_null() {
    let r = calculate(&reference_deal());
    let value = serde_json::to_value(&r).unwrap();
    assert!(value["payback_periods"]["pb1"]["month"].is_null());
    assert_eq!(value["scenario"], "baseline");
    assert_eq!(value["thresholds"]["max_advance_period"]["status"], "solved");
}

#[test]
fn test_scenario_name_round_trip_from_form() {
    let mut form = reference_form();
    form.insert("scenario".into(), json!("conservative"));
    let p = normalize(&form);
    assert_eq!(p.scenario, ScenarioName::Conservative);
    assert_eq!(calculate(&p).revenue.total_rent, dec!(540000));
}

// ===========================================================================
// Out-of-range input
// ===========================================================================

fn form_with(overrides: serde_json::Value) -> RawInput {
    let mut form = reference_form();
    if let serde_json::Value::Object(extra) = overrides {
        form.extend(extra);
    }
    form
}

fn error_fields(p: &ParameterSnapshot) -> Vec<String> {
    calculate(p)
        .validation
        .errors
        .into_iter()
        .map(|e| e.field)
        .collect()
}

#[test]
fn test_huge_amounts_are_reported_not_computed_raw() {
    let p = normalize(&form_with(json!({
        "purchasePrice": "79228162514264337593543950000",
    })));
    let r = calculate(&p);
    assert!(!r.validation.is_valid());
    assert_eq!(error_fields(&p), vec!["purchase_price".to_string()]);

    let p = normalize(&form_with(json!({
        "purchasePrice": "1e24",
        "quantity": 100000,
    })));
    let fields = error_fields(&p);
    assert!(fields.contains(&"purchase_price".to_string()));
    assert!(fields.contains(&"quantity".to_string()));
}

#[test]
fn test_huge_lease_term_keeps_the_projection_bounded() {
    let p = normalize(&form_with(json!({ "leaseTerm": 4000000000u64 })));
    let r = calculate(&p);
    assert!(r.cashflow.rows.len() <= 601);
    assert_eq!(error_fields(&p), vec!["lease_term".to_string()]);
}

#[test]
fn test_extreme_sensitivity_steps_complete() {
    let p = normalize(&form_with(json!({ "purchasePrice": "1e15" })));
    let points = sensitivity_analysis(
        &p,
        SensitivityTarget::Irr,
        SensitivityVariable::PurchasePrice,
        &[dec!(1000000000000), dec!(-1000000000000)],
    );
    assert_eq!(points.len(), 2);
}

#[test]
fn test_rates_outside_their_range_are_errors() {
    for (key, value, field) in [
        ("residualValueRate", json!(150), "residual_value_rate"),
        ("capitalCostRate", json!(-50), "capital_cost_rate"),
        ("downPaymentRate", json!(120), "down_payment_rate"),
        ("tariffRate", json!(5000), "tariff_rate"),
    ] {
        let mut overrides = serde_json::Map::new();
        overrides.insert(key.to_string(), value);
        let p = normalize(&form_with(serde_json::Value::Object(overrides)));
        assert_eq!(error_fields(&p), vec![field.to_string()], "{key}");
    }
}

#[test]
fn test_rate_above_one_hundred_percent_is_a_warning() {
    let p = normalize(&form_with(json!({ "tariffRate": 150 })));
    let r = calculate(&p);
    assert!(r.validation.is_valid());
    assert!(r.validation.warnings.iter().any(|w| w.field == "tariff_rate"));
}
