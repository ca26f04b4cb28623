use napi::Result as NapiResult;
use napi_derive::napi;

use lease_econ_core::{
    calculate_all_scenarios_with, evaluate_deal, normalize, sensitivity_analysis_with,
    EngineConfig, RawInput, SensitivityTarget, SensitivityVariable, DEFAULT_SENSITIVITY_STEPS,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_form(input_json: &str) -> NapiResult<RawInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn parse_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    match config_json {
        Some(raw) => serde_json::from_str(&raw).map_err(to_napi_error),
        None => Ok(EngineConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Deal evaluation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let snapshot = normalize(&parse_form(&input_json)?);
    let config = parse_config(config_json)?;
    let output = evaluate_deal(&snapshot, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_all_scenarios(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let snapshot = normalize(&parse_form(&input_json)?);
    let config = parse_config(config_json)?;
    let set = calculate_all_scenarios_with(&snapshot, &config);
    serde_json::to_string(&set).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct SensitivityBindingInput {
    form: RawInput,
    target: String,
    variable: String,
    #[serde(default)]
    steps: Option<Vec<rust_decimal::Decimal>>,
}

#[napi]
pub fn sensitivity_analysis(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let binding_input: SensitivityBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let target: SensitivityTarget = binding_input.target.parse().map_err(to_napi_error)?;
    let variable: SensitivityVariable = binding_input.variable.parse().map_err(to_napi_error)?;
    let steps = binding_input
        .steps
        .unwrap_or_else(|| DEFAULT_SENSITIVITY_STEPS.to_vec());
    let config = parse_config(config_json)?;

    let snapshot = normalize(&binding_input.form);
    let points = sensitivity_analysis_with(&snapshot, target, variable, &steps, &config);
    serde_json::to_string(&points).map_err(to_napi_error)
}
