use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ScenarioName;
use crate::engine::{calculate_with, EngineConfig, ResultRecord};
use crate::params::ParameterSnapshot;
use crate::types::{Money, Rate};

/// One full result per named scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub optimistic: ResultRecord,
    pub baseline: ResultRecord,
    pub conservative: ResultRecord,
}

/// Headline figures of one scenario, for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: ScenarioName,
    pub total_revenue: Money,
    pub annual_profit: Money,
    pub gm1: Rate,
    pub gm2: Rate,
    pub gm3: Rate,
    pub pb1: Option<u32>,
    pub pb2: Option<u32>,
    pub irr: Option<Rate>,
    pub passed: bool,
}

impl ScenarioSet {
    pub fn get(&self, name: ScenarioName) -> &ResultRecord {
        match name {
            ScenarioName::Optimistic => &self.optimistic,
            ScenarioName::Baseline => &self.baseline,
            ScenarioName::Conservative => &self.conservative,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        ScenarioName::ALL.into_iter().map(move |name| self.get(name))
    }

    pub fn summary(&self) -> Vec<ScenarioSummary> {
        self.iter()
            .map(|r| ScenarioSummary {
                scenario: r.scenario,
                total_revenue: r.revenue.total,
                annual_profit: r.profit.annual_profit,
                gm1: r.gross_margins.gm1,
                gm2: r.gross_margins.gm2,
                gm3: r.gross_margins.gm3,
                pb1: r.payback_periods.pb1.month,
                pb2: r.payback_periods.pb2.month,
                irr: r.cashflow.irr,
                passed: r.compliance.passed,
            })
            .collect()
    }

    /// Annual profit spread between the best and worst case.
    pub fn profit_range(&self) -> Money {
        let profits = self.iter().map(|r| r.profit.annual_profit);
        let (lo, hi) = profits.fold((Decimal::MAX, Decimal::MIN), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        hi - lo
    }
}

pub fn calculate_all_scenarios(snapshot: &ParameterSnapshot) -> ScenarioSet {
    calculate_all_scenarios_with(snapshot, &EngineConfig::default())
}

/// Run every scenario on its own copy of the snapshot. The caller's
/// snapshot, including its selected scenario, is never modified.
pub fn calculate_all_scenarios_with(
    snapshot: &ParameterSnapshot,
    config: &EngineConfig,
) -> ScenarioSet {
    let run = |name: ScenarioName| {
        debug!(scenario = %name, "running scenario");
        calculate_with(&snapshot.with_scenario(name), config)
    };
    ScenarioSet {
        optimistic: run(ScenarioName::Optimistic),
        baseline: run(ScenarioName::Baseline),
        conservative: run(ScenarioName::Conservative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::fixtures::reference_deal;
    use crate::engine::calculate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_baseline_matches_single_run() {
        let p = reference_deal();
        let set = calculate_all_scenarios(&p);
        assert_eq!(set.baseline, calculate(&p));
    }

    #[test]
    fn test_selected_scenario_is_preserved() {
        let p = reference_deal().with_scenario(ScenarioName::Conservative);
        let set = calculate_all_scenarios(&p);
        assert_eq!(p.scenario, ScenarioName::Conservative);
        assert_eq!(set.optimistic.scenario, ScenarioName::Optimistic);
        assert_eq!(set.get(ScenarioName::Conservative), &calculate(&p));
    }

    #[test]
    fn test_summary_orders_scenarios() {
        let set = calculate_all_scenarios(&reference_deal());
        let summary = set.summary();
        let names: Vec<ScenarioName> = summary.iter().map(|s| s.scenario).collect();
        assert_eq!(names, ScenarioName::ALL.to_vec());
        assert!(summary[0].annual_profit > summary[1].annual_profit);
        assert!(summary[1].annual_profit > summary[2].annual_profit);
        assert_eq!(
            set.profit_range(),
            summary[0].annual_profit - summary[2].annual_profit
        );
    }
}
