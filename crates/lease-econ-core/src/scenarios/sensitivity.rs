use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{calculate_with, EngineConfig, ResultRecord};
use crate::error::LeaseEconError;
use crate::params::ParameterSnapshot;

/// Percent changes applied when the caller gives none.
pub const DEFAULT_SENSITIVITY_STEPS: [Decimal; 7] = [
    dec!(-20),
    dec!(-10),
    dec!(-5),
    dec!(0),
    dec!(5),
    dec!(10),
    dec!(20),
];

/// Output metric read from each re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityTarget {
    AnnualProfit,
    PaybackMonth,
    Irr,
}

impl SensitivityTarget {
    pub fn extract(&self, record: &ResultRecord) -> Option<Decimal> {
        match self {
            SensitivityTarget::AnnualProfit => Some(record.profit.annual_profit),
            SensitivityTarget::PaybackMonth => record.cashflow.payback_month.map(Decimal::from),
            SensitivityTarget::Irr => record.cashflow.irr,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityTarget::AnnualProfit => "annual_profit",
            SensitivityTarget::PaybackMonth => "payback_month",
            SensitivityTarget::Irr => "irr",
        }
    }
}

/// Input flexed by a sensitivity run. Each names one or more snapshot
/// fields that are scaled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    MonthlyRent,
    PurchasePrice,
    /// Domestic and international freight and port charges
    Freight,
    /// Tariff and VAT rates
    TaxRate,
    /// All four operating cost lines
    OperatingCost,
    /// Capital cost rate and financing rate
    CapitalRate,
}

impl SensitivityVariable {
    pub const ALL: [SensitivityVariable; 6] = [
        SensitivityVariable::MonthlyRent,
        SensitivityVariable::PurchasePrice,
        SensitivityVariable::Freight,
        SensitivityVariable::TaxRate,
        SensitivityVariable::OperatingCost,
        SensitivityVariable::CapitalRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityVariable::MonthlyRent => "monthly_rent",
            SensitivityVariable::PurchasePrice => "purchase_price",
            SensitivityVariable::Freight => "freight",
            SensitivityVariable::TaxRate => "tax_rate",
            SensitivityVariable::OperatingCost => "operating_cost",
            SensitivityVariable::CapitalRate => "capital_rate",
        }
    }

    /// Multiply this variable's fields by `factor`, saturating at the
    /// Decimal range.
    pub fn scale(&self, p: &mut ParameterSnapshot, factor: Decimal) {
        let fields: Vec<&mut Decimal> = match self {
            SensitivityVariable::MonthlyRent => vec![&mut p.revenue.monthly_rent],
            SensitivityVariable::PurchasePrice => vec![&mut p.equipment.purchase_price],
            SensitivityVariable::Freight => vec![
                &mut p.crossborder.domestic_freight,
                &mut p.crossborder.international_freight,
                &mut p.crossborder.port_charges,
            ],
            SensitivityVariable::TaxRate => vec![&mut p.tax.tariff_rate, &mut p.tax.vat_rate],
            SensitivityVariable::OperatingCost => vec![
                &mut p.operating.annual_maintenance,
                &mut p.operating.local_parts,
                &mut p.operating.local_service_fee,
                &mut p.operating.other_operating_cost,
            ],
            SensitivityVariable::CapitalRate => vec![
                &mut p.financing.capital_cost_rate,
                &mut p.financing.financing_rate,
            ],
        };
        for value in fields {
            *value = value.saturating_mul(factor);
        }
    }
}

/// Lower-case and drop separators so `monthlyRent`, `monthly_rent` and
/// `monthly-rent` all match.
fn name_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for SensitivityTarget {
    type Err = LeaseEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match name_key(s).as_str() {
            "annualprofit" | "profit" => Ok(SensitivityTarget::AnnualProfit),
            "paybackmonth" | "payback" => Ok(SensitivityTarget::PaybackMonth),
            "irr" => Ok(SensitivityTarget::Irr),
            _ => Err(LeaseEconError::UnknownTarget(s.to_string())),
        }
    }
}

impl FromStr for SensitivityVariable {
    type Err = LeaseEconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match name_key(s).as_str() {
            "monthlyrent" | "rent" => Ok(SensitivityVariable::MonthlyRent),
            "purchaseprice" | "price" => Ok(SensitivityVariable::PurchasePrice),
            "freight" | "transport" => Ok(SensitivityVariable::Freight),
            "taxrate" | "tax" => Ok(SensitivityVariable::TaxRate),
            "operatingcost" | "operating" => Ok(SensitivityVariable::OperatingCost),
            "capitalrate" | "rate" => Ok(SensitivityVariable::CapitalRate),
            _ => Err(LeaseEconError::UnknownVariable(s.to_string())),
        }
    }
}

impl fmt::Display for SensitivityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SensitivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Percent change applied to the variable (-10 = 10% lower)
    pub change: Decimal,
    /// `None` when the target is undefined for that run
    pub value: Option<Decimal>,
}

pub fn sensitivity_analysis(
    snapshot: &ParameterSnapshot,
    target: SensitivityTarget,
    variable: SensitivityVariable,
    steps: &[Decimal],
) -> Vec<SensitivityPoint> {
    sensitivity_analysis_with(snapshot, target, variable, steps, &EngineConfig::default())
}

/// Re-run the pipeline once per step on its own copy of the snapshot.
pub fn sensitivity_analysis_with(
    snapshot: &ParameterSnapshot,
    target: SensitivityTarget,
    variable: SensitivityVariable,
    steps: &[Decimal],
    config: &EngineConfig,
) -> Vec<SensitivityPoint> {
    debug!(%target, %variable, steps = steps.len(), "running sensitivity analysis");
    steps
        .iter()
        .map(|&change| {
            let mut flexed = snapshot.clone();
            variable.scale(&mut flexed, Decimal::ONE.saturating_add(change / dec!(100)));
            let record = calculate_with(&flexed, config);
            SensitivityPoint {
                change,
                value: target.extract(&record),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::fixtures::reference_deal;
    use crate::engine::calculate;

    #[test]
    fn test_zero_step_matches_plain_run() {
        let p = reference_deal();
        let points = sensitivity_analysis(
            &p,
            SensitivityTarget::AnnualProfit,
            SensitivityVariable::MonthlyRent,
            &DEFAULT_SENSITIVITY_STEPS,
        );
        assert_eq!(points.len(), 7);
        assert_eq!(points[3].change, Decimal::ZERO);
        assert_eq!(points[3].value, Some(calculate(&p).profit.annual_profit));
    }

    #[test]
    fn test_profit_rises_with_rent_and_falls_with_cost() {
        let p = reference_deal();
        let rent = sensitivity_analysis(
            &p,
            SensitivityTarget::AnnualProfit,
            SensitivityVariable::MonthlyRent,
            &DEFAULT_SENSITIVITY_STEPS,
        );
        assert!(rent.windows(2).all(|w| w[0].value < w[1].value));

        let price = sensitivity_analysis(
            &p,
            SensitivityTarget::AnnualProfit,
            SensitivityVariable::PurchasePrice,
            &DEFAULT_SENSITIVITY_STEPS,
        );
        assert!(price.windows(2).all(|w| w[0].value > w[1].value));
    }

    #[test]
    fn test_rent_step_is_exact() {
        let p = reference_deal();
        let points = sensitivity_analysis(
            &p,
            SensitivityTarget::AnnualProfit,
            SensitivityVariable::MonthlyRent,
            &[dec!(10)],
        );
        // 10% more rent on 600,000 adds 60,000 over a 12-month term
        let base = calculate(&p).profit.annual_profit;
        assert_eq!(points[0].value, Some(base + dec!(60000)));
    }

    #[test]
    fn test_snapshot_left_untouched() {
        let p = reference_deal();
        let before = p.clone();
        for variable in SensitivityVariable::ALL {
            sensitivity_analysis(&p, SensitivityTarget::Irr, variable, &[dec!(-20), dec!(20)]);
        }
        assert_eq!(p, before);
    }

    #[test]
    fn test_payback_undefined_when_never_recovered() {
        let p = reference_deal();
        let points = sensitivity_analysis(
            &p,
            SensitivityTarget::PaybackMonth,
            SensitivityVariable::OperatingCost,
            &[dec!(0)],
        );
        assert_eq!(points[0].value, None);
    }

    #[test]
    fn test_extreme_steps_saturate_instead_of_panicking() {
        let p = reference_deal();
        for variable in SensitivityVariable::ALL {
            let points = sensitivity_analysis(
                &p,
                SensitivityTarget::AnnualProfit,
                variable,
                &[Decimal::MAX, Decimal::MIN],
            );
            assert_eq!(points.len(), 2);
        }
    }

    #[test]
    fn test_names_parse() {
        assert_eq!(
            "monthlyRent".parse::<SensitivityVariable>().unwrap(),
            SensitivityVariable::MonthlyRent
        );
        assert_eq!(
            "capital_rate".parse::<SensitivityVariable>().unwrap(),
            SensitivityVariable::CapitalRate
        );
        assert_eq!(
            "payback-month".parse::<SensitivityTarget>().unwrap(),
            SensitivityTarget::PaybackMonth
        );
        assert!(matches!(
            "exchange".parse::<SensitivityVariable>(),
            Err(LeaseEconError::UnknownVariable(_))
        ));
        assert!(matches!(
            "npv".parse::<SensitivityTarget>(),
            Err(LeaseEconError::UnknownTarget(_))
        ));
    }
}
