use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{
    calculate_cost_structure, calculate_gross_margins, calculate_profit, CostShare, GrossMargins,
    ProfitSummary,
};
use crate::calculators::{
    calculate_breakdown, ExchangeExposure, FinancingBreakdown, OperatingBreakdown,
    PurchaseBreakdown, RevenueBreakdown, TaxBreakdown, TransportBreakdown,
};
use crate::cashflow::{calculate_payback_periods, project_cashflows, CashflowProjection, PaybackPeriods};
use crate::compliance::{
    evaluate_compliance, solve_thresholds, validate, BusinessThresholds, ComplianceReport,
    ThresholdReport, ValidationReport,
};
use crate::params::ParameterSnapshot;
use crate::scenarios::{ScenarioMultipliers, ScenarioName};
use crate::time_value::RootFinder;
use crate::types::{with_metadata, ComputationOutput};

/// Tunable settings for a run. Every field has a default, so a config file
/// only needs the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: BusinessThresholds,
    pub irr_solver: RootFinder,
}

/// Everything computed for one snapshot under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub scenario: ScenarioName,
    pub multipliers: ScenarioMultipliers,
    pub revenue: RevenueBreakdown,
    pub purchase: PurchaseBreakdown,
    pub transport: TransportBreakdown,
    pub tax: TaxBreakdown,
    pub operating: OperatingBreakdown,
    pub financing: FinancingBreakdown,
    pub profit: ProfitSummary,
    pub cashflow: CashflowProjection,
    pub exchange: ExchangeExposure,
    pub cost_structure: Vec<CostShare>,
    pub gross_margins: GrossMargins,
    pub payback_periods: PaybackPeriods,
    pub compliance: ComplianceReport,
    pub thresholds: ThresholdReport,
    pub validation: ValidationReport,
}

/// Run the full pipeline with default thresholds and solver settings.
pub fn calculate(snapshot: &ParameterSnapshot) -> ResultRecord {
    calculate_with(snapshot, &EngineConfig::default())
}

/// Run the full pipeline. Magnitudes are clamped to the supported range
/// before any arithmetic; validation still sees the values as given and
/// reports the out-of-range ones as errors.
pub fn calculate_with(snapshot: &ParameterSnapshot, config: &EngineConfig) -> ResultRecord {
    let p = snapshot.bounded();
    let m = p.scenario.multipliers();
    let breakdown = calculate_breakdown(&p, m);
    debug!(
        scenario = %p.scenario,
        revenue = %breakdown.revenue.total,
        outlay = %breakdown.upfront_outlay(),
        "calculated cost breakdown"
    );

    let validation = validate(snapshot, &breakdown, &config.thresholds);
    let cashflow = project_cashflows(&p, &breakdown, &config.irr_solver);
    if cashflow.irr.is_none() && p.revenue.lease_term > 0 {
        warn!(scenario = %p.scenario, "IRR did not converge or cash flows never change sign");
    }
    let payback_periods = calculate_payback_periods(&p, &breakdown, &config.thresholds);
    let gross_margins = calculate_gross_margins(&breakdown, &config.thresholds);
    let profit = calculate_profit(&breakdown, p.revenue.lease_term);
    let cost_structure = calculate_cost_structure(&breakdown);
    let compliance = evaluate_compliance(&breakdown, &gross_margins, &payback_periods, &config.thresholds);
    let thresholds = solve_thresholds(&p, m, &breakdown, &config.thresholds);
    debug!(
        gm1 = %gross_margins.gm1,
        gm3 = %gross_margins.gm3,
        pb1 = ?payback_periods.pb1.month,
        pb2 = ?payback_periods.pb2.month,
        passed = compliance.passed,
        "evaluated deal"
    );

    ResultRecord {
        scenario: p.scenario,
        multipliers: *m,
        revenue: breakdown.revenue,
        purchase: breakdown.purchase,
        transport: breakdown.transport,
        tax: breakdown.tax,
        operating: breakdown.operating,
        financing: breakdown.financing,
        profit,
        cashflow,
        exchange: breakdown.exchange,
        cost_structure,
        gross_margins,
        payback_periods,
        compliance,
        thresholds,
        validation,
    }
}

/// [`calculate_with`] wrapped in the standard output envelope. Validation
/// messages surface as envelope warnings.
pub fn evaluate_deal(
    snapshot: &ParameterSnapshot,
    config: &EngineConfig,
) -> ComputationOutput<ResultRecord> {
    let start = Instant::now();
    let record = calculate_with(snapshot, config);

    let warnings = record
        .validation
        .errors
        .iter()
        .map(|e| format!("error: {}: {}", e.field, e.message))
        .chain(
            record
                .validation
                .warnings
                .iter()
                .map(|w| format!("{}: {}", w.field, w.message)),
        )
        .collect();

    let assumptions = serde_json::json!({
        "scenario": snapshot.scenario,
        "multipliers": record.multipliers,
        "payment_mode": snapshot.financing.payment_mode,
        "business_mode": snapshot.business_mode,
        "min_gross_margin": config.thresholds.min_gross_margin,
        "max_payback_months": config.thresholds.max_payback_months,
        "gross_margins": "GM1 = (Rev - VarTotal)/Rev, GM2 also less depreciation, GM3 also less financing cost",
        "irr": "monthly Newton-Raphson IRR of the net cash-flow series, x12",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Cross-border equipment lease economics",
        &assumptions,
        warnings,
        elapsed,
        record,
    )
}
