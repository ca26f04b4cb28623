use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{format_pct, format_target_pct};
use super::BusinessThresholds;
use crate::analysis::{CostCategory, GrossMargins};
use crate::calculators::DealBreakdown;
use crate::cashflow::{PaybackPeriods, PaybackSeries};
use crate::types::{ratio_or_zero, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Gm1,
    Gm2,
    Gm3,
    Pb1,
    Pb2,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Gm1 => "GM1",
            Indicator::Gm2 => "GM2",
            Indicator::Gm3 => "GM3",
            Indicator::Pb1 => "PB1",
            Indicator::Pb2 => "PB2",
        }
    }

    /// Cost categories a margin indicator subtracts; empty for paybacks.
    fn cost_drivers(&self) -> &'static [CostCategory] {
        const GM1: [CostCategory; 3] = [
            CostCategory::Transport,
            CostCategory::Tax,
            CostCategory::Operating,
        ];
        const GM2: [CostCategory; 4] = [
            CostCategory::Transport,
            CostCategory::Tax,
            CostCategory::Operating,
            CostCategory::Depreciation,
        ];
        const GM3: [CostCategory; 5] = [
            CostCategory::Transport,
            CostCategory::Tax,
            CostCategory::Operating,
            CostCategory::Depreciation,
            CostCategory::Financing,
        ];
        match self {
            Indicator::Gm1 => &GM1,
            Indicator::Gm2 => &GM2,
            Indicator::Gm3 => &GM3,
            Indicator::Pb1 | Indicator::Pb2 => &[],
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail for one indicator. Margins carry a rate; paybacks carry a
/// month count, `None` when the investment is never recovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCheck {
    pub indicator: Indicator,
    pub value: Option<Decimal>,
    pub target: Decimal,
    pub pass: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "category")]
pub enum IssueKind {
    CostDriver(CostCategory),
    LowRentShare,
    PaybackTooLong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub indicator: Option<Indicator>,
    pub kind: IssueKind,
    /// Share of revenue (cost drivers, rent share)
    pub impact: Option<Rate>,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub passed: bool,
    pub checks: Vec<IndicatorCheck>,
    pub issues: Vec<Issue>,
}

impl ComplianceReport {
    pub fn check(&self, indicator: Indicator) -> Option<&IndicatorCheck> {
        self.checks.iter().find(|c| c.indicator == indicator)
    }
}

fn cost_suggestion(category: CostCategory) -> &'static str {
    match category {
        CostCategory::Transport => {
            "Negotiate freight rates, consolidate shipments or source a closer port"
        }
        CostCategory::Tax => {
            "Review the customs valuation basis, tariff exemptions and VAT deduction eligibility"
        }
        CostCategory::Operating => {
            "Move maintenance and parts to the lessee or a local service partner"
        }
        CostCategory::Financing => {
            "Lower the advance ratio or negotiate a cheaper funding rate"
        }
        CostCategory::Depreciation => {
            "Extend the lease term or price in a higher residual value"
        }
        CostCategory::Purchase | CostCategory::Disposal => {
            "Renegotiate the equipment price or the disposal terms"
        }
    }
}

const RENT_SHARE_SUGGESTION: &str =
    "Raise the monthly rent instead of relying on one-off fees or the end sale";
const PAYBACK_SUGGESTION: &str =
    "Raise rent, cut the up-front outlay or shorten the capital advance";

pub fn evaluate_compliance(
    b: &DealBreakdown,
    margins: &GrossMargins,
    payback: &PaybackPeriods,
    thresholds: &BusinessThresholds,
) -> ComplianceReport {
    let checks = vec![
        margin_check(Indicator::Gm1, margins.gm1, thresholds),
        margin_check(Indicator::Gm2, margins.gm2, thresholds),
        margin_check(Indicator::Gm3, margins.gm3, thresholds),
        payback_check(Indicator::Pb1, &payback.pb1, thresholds),
        payback_check(Indicator::Pb2, &payback.pb2, thresholds),
    ];

    let mut issues = Vec::new();
    let mut margin_failed = false;

    for check in checks.iter().filter(|c| !c.pass) {
        match check.indicator {
            Indicator::Gm1 | Indicator::Gm2 | Indicator::Gm3 => {
                margin_failed = true;
                issues.extend(rank_cost_drivers(check.indicator, b, thresholds));
            }
            Indicator::Pb1 | Indicator::Pb2 => issues.push(Issue {
                indicator: Some(check.indicator),
                kind: IssueKind::PaybackTooLong,
                impact: None,
                message: format!("{} payback is too long: {}", check.indicator, check.reason),
                suggestion: PAYBACK_SUGGESTION.to_string(),
            }),
        }
    }

    if margin_failed
        && b.revenue.total > Decimal::ZERO
        && b.revenue.rent_share < thresholds.min_rent_share
    {
        issues.push(Issue {
            indicator: None,
            kind: IssueKind::LowRentShare,
            impact: Some(b.revenue.rent_share),
            message: format!(
                "rent is only {} of total revenue, below {}",
                format_pct(b.revenue.rent_share),
                format_target_pct(thresholds.min_rent_share)
            ),
            suggestion: RENT_SHARE_SUGGESTION.to_string(),
        });
    }

    ComplianceReport {
        passed: checks.iter().all(|c| c.pass),
        checks,
        issues,
    }
}

fn margin_check(indicator: Indicator, value: Rate, thresholds: &BusinessThresholds) -> IndicatorCheck {
    let pass = thresholds.margin_passes(value);
    let op = if pass { "≥" } else { "<" };
    IndicatorCheck {
        indicator,
        value: Some(value),
        target: thresholds.min_gross_margin,
        pass,
        reason: format!(
            "{} {} {}",
            format_pct(value),
            op,
            format_target_pct(thresholds.min_gross_margin)
        ),
    }
}

fn payback_check(
    indicator: Indicator,
    series: &PaybackSeries,
    thresholds: &BusinessThresholds,
) -> IndicatorCheck {
    let target = thresholds.max_payback_months;
    let reason = match series.month {
        None => "not recovered within lease term".to_string(),
        Some(0) => "recovered at delivery, no lease months needed".to_string(),
        Some(m) if m <= target => format!("{} months ≤ {} months", m, target),
        Some(m) => format!("{} months > {} months", m, target),
    };
    IndicatorCheck {
        indicator,
        value: series.month.map(Decimal::from),
        target: Decimal::from(target),
        pass: series.pass,
        reason,
    }
}

/// Largest cost categories behind a failed margin, by share of revenue.
fn rank_cost_drivers(
    indicator: Indicator,
    b: &DealBreakdown,
    thresholds: &BusinessThresholds,
) -> Vec<Issue> {
    let mut drivers: Vec<(CostCategory, Rate)> = indicator
        .cost_drivers()
        .iter()
        .map(|c| (*c, ratio_or_zero(c.amount(b), b.revenue.total)))
        .filter(|(_, impact)| *impact > thresholds.issue_impact_floor)
        .collect();
    drivers.sort_by(|x, y| y.1.cmp(&x.1));
    drivers.truncate(thresholds.max_ranked_drivers);

    drivers
        .into_iter()
        .map(|(category, impact)| Issue {
            indicator: Some(indicator),
            kind: IssueKind::CostDriver(category),
            impact: Some(impact),
            message: format!("{} cost is {} of revenue", category, format_pct(impact)),
            suggestion: cost_suggestion(category).to_string(),
        })
        .collect()
}
