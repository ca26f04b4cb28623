use lease_econ_core::EngineConfig;
use tracing::debug;

use crate::input::file::{is_yaml, read_text};

/// Load engine settings from a JSON or YAML file, or use the defaults when
/// no file is given. Only the fields present in the file are overridden.
pub fn load(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let (resolved, contents) = read_text(path)?;

    let config: EngineConfig = if is_yaml(&resolved) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?
    };

    debug!(path, ?config, "loaded engine config");
    Ok(config)
}
