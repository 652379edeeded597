//! Scenario configuration loading from `scenario.{ron,toml,json}`.

use crate::loader::{DataLoadError, deserialize_file, find_data_file};
use nebula_core::scenario::ScenarioConfig;
use std::path::Path;
use tracing::info;

/// Load the scenario configuration from `dir`.
///
/// An absent file yields `ScenarioConfig::default()`. A present file may
/// set any subset of fields; the rest keep their defaults. The result is
/// validated before it is returned.
pub fn load_scenario_config(dir: &Path) -> Result<ScenarioConfig, DataLoadError> {
    let Some(path) = find_data_file(dir, "scenario")? else {
        return Ok(ScenarioConfig::default());
    };
    let config: ScenarioConfig = deserialize_file(&path)?;
    config.validate().map_err(|source| DataLoadError::Scenario {
        file: path.clone(),
        source,
    })?;
    info!(file = %path.display(), seed = ?config.seed, "loaded scenario config");
    Ok(config)
}
