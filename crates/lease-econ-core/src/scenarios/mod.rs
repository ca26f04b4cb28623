//! Scenario multipliers and the batch runners that re-run the pipeline
//! across scenarios or across flexed inputs.

pub mod batch;
pub mod multipliers;
pub mod sensitivity;

pub use batch::{calculate_all_scenarios, calculate_all_scenarios_with, ScenarioSet, ScenarioSummary};
pub use multipliers::{ScenarioMultipliers, ScenarioName};
pub use sensitivity::{
    sensitivity_analysis, sensitivity_analysis_with, SensitivityPoint, SensitivityTarget,
    SensitivityVariable, DEFAULT_SENSITIVITY_STEPS,
};
