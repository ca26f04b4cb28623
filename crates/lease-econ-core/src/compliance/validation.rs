use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::BusinessThresholds;
use crate::calculators::DealBreakdown;
use crate::params::bounds::{is_share_rate, MAX_AMOUNT, MAX_RATE};
use crate::params::ParameterSnapshot;

/// Must be at least one.
const REQUIRED_COUNTS: [&str; 2] = ["quantity", "lease_term"];
/// Must be strictly positive.
const REQUIRED_AMOUNTS: [&str; 3] = ["monthly_rent", "purchase_price", "exchange_rate"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub field: String,
    pub message: String,
}

impl ValidationMessage {
    fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationMessage {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Input problems found for one run. Errors mean the figures are not
/// meaningful; warnings flag a deal worth a second look.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(
    p: &ParameterSnapshot,
    b: &DealBreakdown,
    thresholds: &BusinessThresholds,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (field, value, max) in p.counts() {
        if value == 0 && REQUIRED_COUNTS.contains(&field) {
            report
                .errors
                .push(ValidationMessage::new(field, "must be greater than zero"));
        } else if value > max {
            report.errors.push(ValidationMessage::new(
                field,
                format!("exceeds the supported maximum of {}", max),
            ));
        }
    }

    for (field, value) in p.amounts() {
        let problem = if value <= Decimal::ZERO && REQUIRED_AMOUNTS.contains(&field) {
            Some("must be greater than zero".to_string())
        } else if value < Decimal::ZERO {
            Some("must not be negative".to_string())
        } else if value > MAX_AMOUNT {
            Some(format!("exceeds the supported maximum of {}", MAX_AMOUNT))
        } else {
            None
        };
        if let Some(message) = problem {
            report.errors.push(ValidationMessage::new(field, message));
        }
    }

    for (field, value) in p.rates() {
        if value < Decimal::ZERO {
            report
                .errors
                .push(ValidationMessage::new(field, "must not be negative"));
        } else if value > Decimal::ONE && is_share_rate(field) {
            report.errors.push(ValidationMessage::new(
                field,
                format!("is a share and cannot exceed 100%, got {}", format_pct(value)),
            ));
        } else if value > MAX_RATE {
            report.errors.push(ValidationMessage::new(
                field,
                format!("exceeds the supported maximum of {}", format_target_pct(MAX_RATE)),
            ));
        } else if value > Decimal::ONE {
            report.warnings.push(ValidationMessage::new(
                field,
                format!("{} is above 100%", format_pct(value)),
            ));
        }
    }

    if b.transport.transport_ratio > thresholds.max_transport_ratio {
        report.warnings.push(ValidationMessage::new(
            "transport",
            format!(
                "transport cost is {} of the purchase total, above {}",
                format_pct(b.transport.transport_ratio),
                format_target_pct(thresholds.max_transport_ratio)
            ),
        ));
    }
    if b.tax.tax_ratio > thresholds.max_tax_ratio {
        report.warnings.push(ValidationMessage::new(
            "tax",
            format!(
                "tax cost is {} of the purchase total, above {}",
                format_pct(b.tax.tax_ratio),
                format_target_pct(thresholds.max_tax_ratio)
            ),
        ));
    }
    if !p.tax.vat_deductible && b.tax.vat > Decimal::ZERO {
        report.warnings.push(ValidationMessage::new(
            "vat_deductible",
            "import VAT is not deductible and stays a cash cost",
        ));
    }
    if p.is_financed() && p.financing.financing_term > p.revenue.lease_term {
        report.warnings.push(ValidationMessage::new(
            "financing_term",
            format!(
                "financing term of {} months runs past the {}-month lease",
                p.financing.financing_term, p.revenue.lease_term
            ),
        ));
    }

    if !report.is_valid() {
        let fields: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
        warn!(?fields, "deal parameters failed validation");
    }

    report
}

/// `0.325` → `"32.50%"`, rounded half away from zero.
pub(crate) fn format_pct(rate: Decimal) -> String {
    let pct = rate
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", pct)
}

/// Thresholds print without trailing zeros: `0.3` → `"30%"`
pub(crate) fn format_target_pct(rate: Decimal) -> String {
    format!("{}%", rate.saturating_mul(Decimal::ONE_HUNDRED).normalize())
}
