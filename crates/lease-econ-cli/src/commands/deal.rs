use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use lease_econ_core::compliance::{Threshold, ThresholdReport};
use lease_econ_core::{
    calculate_all_scenarios_with, evaluate_deal, normalize, sensitivity_analysis_with,
    with_metadata, EngineConfig, LeaseEconError, ParameterSnapshot, RawInput, ResultRecord,
    ScenarioName, ScenarioSet, SensitivityPoint, SensitivityTarget, SensitivityVariable,
    DEFAULT_SENSITIVITY_STEPS,
};

use crate::input;
use crate::output::{self, Report, Sheet};

/// Arguments shared by every command that evaluates one deal
#[derive(Args)]
pub struct DealArgs {
    /// Path to the deal form, JSON or YAML (camelCase fields, percents as numbers)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the form's scenario: optimistic, baseline, conservative
    #[arg(long)]
    pub scenario: Option<String>,
}

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Output metric: annual_profit, payback_month, irr
    #[arg(long)]
    pub target: String,

    /// Input to flex: monthly_rent, purchase_price, freight, tax_rate,
    /// operating_cost, capital_rate
    #[arg(long)]
    pub variable: String,

    /// Comma-separated percent changes (default -20,-10,-5,0,5,10,20)
    #[arg(long, allow_hyphen_values = true)]
    pub steps: Option<String>,
}

fn load_snapshot(args: &DealArgs) -> Result<ParameterSnapshot, Box<dyn std::error::Error>> {
    let raw: Value = if let Some(ref path) = args.input {
        input::file::read_form(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <deal.json|deal.yaml> or stdin required".into());
    };

    let form: RawInput = match raw {
        Value::Object(map) => map,
        _ => {
            return Err(Box::new(LeaseEconError::InvalidInput {
                field: "input".into(),
                reason: "deal form must be a JSON object".into(),
            }))
        }
    };

    let mut snapshot = normalize(&form);
    if let Some(ref name) = args.scenario {
        snapshot.scenario = name.parse::<ScenarioName>()?;
    }
    Ok(snapshot)
}

/// Headline figures of a record, for minimal output.
fn headline(r: &ResultRecord) -> Value {
    json!({
        "scenario": r.scenario,
        "verdict": verdict(r),
        "total_revenue": r.revenue.total,
        "total_cost": r.profit.total_cost,
        "net_profit": r.profit.net_profit,
        "annual_profit": r.profit.annual_profit,
        "gm1": r.gross_margins.gm1.round_dp(4),
        "gm2": r.gross_margins.gm2.round_dp(4),
        "gm3": r.gross_margins.gm3.round_dp(4),
        "pb1_month": r.payback_periods.pb1.month,
        "pb2_month": r.payback_periods.pb2.month,
        "irr": r.cashflow.irr.map(|irr| irr.round_dp(4)),
        "issues": r.compliance.issues.len(),
    })
}

fn verdict(r: &ResultRecord) -> &'static str {
    if r.compliance.passed {
        "PASS"
    } else {
        "FAIL"
    }
}

fn margin_cell(gm: Decimal, pass: bool) -> String {
    format!("{} {}", output::percent(gm), if pass { "ok" } else { "below target" })
}

fn summary_sheet(r: &ResultRecord) -> Sheet {
    let gm = &r.gross_margins;
    let mut sheet = Sheet::new("Deal summary", &["Field", "Value"]);
    sheet.push(["Scenario".to_string(), r.scenario.to_string()]);
    sheet.push(["Verdict".to_string(), verdict(r).to_string()]);
    sheet.push(["Total revenue".to_string(), output::money(r.revenue.total)]);
    sheet.push(["Total cost".to_string(), output::money(r.profit.total_cost)]);
    sheet.push(["Net profit".to_string(), output::money(r.profit.net_profit)]);
    sheet.push(["Annual profit".to_string(), output::money(r.profit.annual_profit)]);
    sheet.push(["GM1".to_string(), margin_cell(gm.gm1, gm.gm1_pass)]);
    sheet.push(["GM2".to_string(), margin_cell(gm.gm2, gm.gm2_pass)]);
    sheet.push(["GM3".to_string(), margin_cell(gm.gm3, gm.gm3_pass)]);
    sheet.push(["PB1 month".to_string(), output::month(r.payback_periods.pb1.month)]);
    sheet.push(["PB2 month".to_string(), output::month(r.payback_periods.pb2.month)]);
    sheet.push([
        "IRR".to_string(),
        r.cashflow.irr.map_or_else(|| "-".to_string(), output::percent),
    ]);
    sheet.push(["Issues".to_string(), r.compliance.issues.len().to_string()]);
    for error in &r.validation.errors {
        sheet.push([format!("Invalid {}", error.field), error.message.clone()]);
    }
    sheet
}

/// One row per month of the cash-flow projection.
fn cashflow_sheet(r: &ResultRecord) -> Sheet {
    let mut sheet = Sheet::new(
        "Cash flow",
        &["month", "period", "income", "expense", "net", "cumulative"],
    );
    for row in &r.cashflow.rows {
        sheet.push([
            row.month.to_string(),
            row.label.clone().unwrap_or_default(),
            output::money(row.income),
            output::money(row.expense),
            output::money(row.net),
            output::money(row.cumulative),
        ]);
    }
    sheet
}

fn scenario_sheet(set: &ScenarioSet) -> Sheet {
    let mut sheet = Sheet::new(
        "Scenarios",
        &[
            "scenario",
            "verdict",
            "total_revenue",
            "annual_profit",
            "gm1",
            "gm2",
            "gm3",
            "pb1_month",
            "pb2_month",
            "irr",
        ],
    );
    for r in set.iter() {
        sheet.push([
            r.scenario.to_string(),
            verdict(r).to_string(),
            output::money(r.revenue.total),
            output::money(r.profit.annual_profit),
            output::percent(r.gross_margins.gm1),
            output::percent(r.gross_margins.gm2),
            output::percent(r.gross_margins.gm3),
            output::month(r.payback_periods.pb1.month),
            output::month(r.payback_periods.pb2.month),
            r.cashflow.irr.map_or_else(|| "-".to_string(), output::percent),
        ]);
    }
    sheet
}

fn threshold_cell(t: &Threshold) -> String {
    match t {
        Threshold::Solved(v) => v.round_dp(4).to_string(),
        Threshold::NoSolution => "no solution".to_string(),
        Threshold::NotApplicable => "n/a".to_string(),
    }
}

fn threshold_sheet(t: &ThresholdReport) -> Sheet {
    let mut sheet = Sheet::new("Thresholds", &["threshold", "value"]);
    for (name, value) in [
        ("min_rent_for_gm1", &t.min_rent_for_gm1),
        ("min_rent_for_gm2", &t.min_rent_for_gm2),
        ("min_rent_for_gm3", &t.min_rent_for_gm3),
        ("max_transport_for_pb1", &t.max_transport_for_pb1),
        ("max_capital_rate", &t.max_capital_rate),
        ("max_advance_period", &t.max_advance_period),
    ] {
        sheet.push([name.to_string(), threshold_cell(value)]);
    }
    sheet
}

pub fn run_calculate(
    args: DealArgs,
    config: &EngineConfig,
    detailed: bool,
) -> Result<Report, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args)?;
    let output = evaluate_deal(&snapshot, config);
    let summary = Some(summary_sheet(&output.result));
    let detail = cashflow_sheet(&output.result);

    let envelope = if detailed {
        serde_json::to_value(&output)?
    } else {
        serde_json::to_value(with_metadata(
            &output.methodology,
            &output.assumptions,
            output.warnings.clone(),
            output.metadata.computation_time_us,
            headline(&output.result),
        ))?
    };
    Ok(Report {
        envelope,
        summary,
        detail,
    })
}

pub fn run_scenarios(
    args: DealArgs,
    config: &EngineConfig,
    detailed: bool,
) -> Result<Report, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let snapshot = load_snapshot(&args)?;
    let set = calculate_all_scenarios_with(&snapshot, config);

    let result = if detailed {
        serde_json::to_value(&set)?
    } else {
        Value::Array(set.iter().map(headline).collect())
    };
    let assumptions = json!({
        "scenarios": ScenarioName::ALL,
        "profit_range": set.profit_range(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    let envelope = serde_json::to_value(with_metadata(
        "Optimistic / baseline / conservative scenario comparison",
        &assumptions,
        Vec::new(),
        elapsed,
        result,
    ))?;
    Ok(Report {
        envelope,
        summary: None,
        detail: scenario_sheet(&set),
    })
}

pub fn run_thresholds(
    args: DealArgs,
    config: &EngineConfig,
    detailed: bool,
) -> Result<Report, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args)?;
    let output = evaluate_deal(&snapshot, config);
    let r = &output.result;

    let result = if detailed {
        json!({
            "thresholds": r.thresholds,
            "checks": r.compliance.checks,
            "issues": r.compliance.issues,
        })
    } else {
        json!({
            "min_rent_for_gm1": threshold_cell(&r.thresholds.min_rent_for_gm1),
            "min_rent_for_gm2": threshold_cell(&r.thresholds.min_rent_for_gm2),
            "min_rent_for_gm3": threshold_cell(&r.thresholds.min_rent_for_gm3),
            "max_transport_for_pb1": threshold_cell(&r.thresholds.max_transport_for_pb1),
            "max_capital_rate": threshold_cell(&r.thresholds.max_capital_rate),
            "max_advance_period": threshold_cell(&r.thresholds.max_advance_period),
        })
    };

    let envelope = serde_json::to_value(with_metadata(
        "Closed-form threshold inversion",
        &json!({
            "min_gross_margin": config.thresholds.min_gross_margin,
            "max_payback_months": config.thresholds.max_payback_months,
        }),
        output.warnings.clone(),
        output.metadata.computation_time_us,
        result,
    ))?;
    Ok(Report {
        envelope,
        summary: None,
        detail: threshold_sheet(&r.thresholds),
    })
}

fn parse_steps(raw: Option<&str>) -> Result<Vec<Decimal>, Box<dyn std::error::Error>> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SENSITIVITY_STEPS.to_vec());
    };
    raw.split(',')
        .map(|s| {
            s.trim()
                .parse::<Decimal>()
                .map_err(|e| {
                    Box::<dyn std::error::Error>::from(format!("Invalid step '{}': {}", s.trim(), e))
                })
        })
        .collect()
}

fn sensitivity_sheet(target: SensitivityTarget, points: &[SensitivityPoint]) -> Sheet {
    let mut sheet = Sheet::new("Sensitivity", &["change_pct", target.as_str()]);
    for point in points {
        let value = match (target, point.value) {
            (_, None) => "-".to_string(),
            (SensitivityTarget::AnnualProfit, Some(v)) => output::money(v),
            (SensitivityTarget::PaybackMonth, Some(v)) => v.to_string(),
            (SensitivityTarget::Irr, Some(v)) => output::percent(v),
        };
        sheet.push([point.change.normalize().to_string(), value]);
    }
    sheet
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    config: &EngineConfig,
) -> Result<Report, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let target: SensitivityTarget = args.target.parse()?;
    let variable: SensitivityVariable = args.variable.parse()?;
    let steps = parse_steps(args.steps.as_deref())?;
    let snapshot = load_snapshot(&args.deal)?;

    let points = sensitivity_analysis_with(&snapshot, target, variable, &steps, config);
    let detail = sensitivity_sheet(target, &points);

    let elapsed = start.elapsed().as_micros() as u64;
    let envelope = serde_json::to_value(with_metadata(
        "One-way sensitivity: each step re-runs the full pipeline",
        &json!({
            "target": target,
            "variable": variable,
            "scenario": snapshot.scenario,
        }),
        Vec::new(),
        elapsed,
        points,
    ))?;
    Ok(Report {
        envelope,
        summary: None,
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            parse_steps(Some("-10, 0,10")).unwrap(),
            vec![Decimal::from(-10), Decimal::ZERO, Decimal::from(10)]
        );
        assert_eq!(parse_steps(None).unwrap().len(), 7);
        assert!(parse_steps(Some("ten")).is_err());
    }

    #[test]
    fn test_headline_reports_verdict() {
        let r = lease_econ_core::calculate(&ParameterSnapshot::default());
        let h = headline(&r);
        assert_eq!(h["verdict"], "FAIL");
        assert!(h["pb1_month"].is_null());
    }

    #[test]
    fn test_cashflow_sheet_has_a_row_per_month() {
        let mut p = ParameterSnapshot::default();
        p.revenue.lease_term = 24;
        let r = lease_econ_core::calculate(&p);
        let sheet = cashflow_sheet(&r);
        assert_eq!(sheet.rows.len(), 25);
        assert_eq!(sheet.rows[0][0], "0");
        assert_eq!(sheet.rows[24][0], "24");
        assert!(sheet.rows.iter().all(|row| row.len() == sheet.headers.len()));
    }

    #[test]
    fn test_scenario_sheet_lists_each_scenario() {
        let set = lease_econ_core::calculate_all_scenarios(&ParameterSnapshot::default());
        let sheet = scenario_sheet(&set);
        let names: Vec<&str> = sheet.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(names, vec!["optimistic", "baseline", "conservative"]);
    }

    #[test]
    fn test_sensitivity_sheet_formats_by_target() {
        let points = vec![
            SensitivityPoint {
                change: Decimal::from(-10),
                value: Some(Decimal::new(12345678, 3)),
            },
            SensitivityPoint {
                change: Decimal::ZERO,
                value: None,
            },
        ];
        let sheet = sensitivity_sheet(SensitivityTarget::AnnualProfit, &points);
        assert_eq!(sheet.headers, vec!["change_pct", "annual_profit"]);
        assert_eq!(sheet.rows[0], vec!["-10", "12345.68"]);
        assert_eq!(sheet.rows[1], vec!["0", "-"]);
    }

    #[test]
    fn test_threshold_cells() {
        assert_eq!(threshold_cell(&Threshold::Solved(Decimal::new(123456, 5))), "1.2346");
        assert_eq!(threshold_cell(&Threshold::NoSolution), "no solution");
        assert_eq!(threshold_cell(&Threshold::NotApplicable), "n/a");
    }
}
