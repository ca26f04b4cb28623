pub mod analysis;
pub mod calculators;
pub mod cashflow;
pub mod compliance;
pub mod engine;
pub mod error;
pub mod params;
pub mod scenarios;
pub mod time_value;
pub mod types;

pub use engine::{calculate, calculate_with, evaluate_deal, EngineConfig, ResultRecord};
pub use error::LeaseEconError;
pub use params::{normalize, ParameterSnapshot, RawInput};
pub use scenarios::{
    calculate_all_scenarios, calculate_all_scenarios_with, sensitivity_analysis,
    sensitivity_analysis_with, ScenarioName, ScenarioSet, SensitivityPoint, SensitivityTarget,
    SensitivityVariable, DEFAULT_SENSITIVITY_STEPS,
};
pub use types::*;
