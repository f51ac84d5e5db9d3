//! Policy documents and performance dataset loaders for the NATOPS performance workspace.
//!
//! Everything here runs once at startup. The values it produces are immutable
//! and are handed to the engine, aero and envelope crates by the caller.

pub mod datasets;
pub mod policy;

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub use datasets::{
    AeroRecord, EngineRecord, load_aero_records, load_engine_records, read_aero_records,
    read_engine_records,
};
pub use policy::{
    DerateClamp, EnginePolicy, FuelFlowBounds, MIN_RPM_STEP_PCT, PolicyConfig, SafetyPolicy,
};

/// Errors that can occur while loading configuration files and datasets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("dataset '{0}' contains no rows")]
    EmptyDataset(String),
}

/// Load a policy document. `.toml` files are parsed as TOML, anything else as YAML.
pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<PolicyConfig, ConfigError> {
    let policy: PolicyConfig = load_document(path.as_ref())?;
    policy.validate()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        allow_ab = policy.policy.allow_ab,
        min_takeoff_rpm_pct = policy.policy.min_takeoff_rpm_pct,
        "loaded policy"
    );
    Ok(policy)
}

/// Parse and validate a policy document held in memory as TOML.
pub fn policy_from_toml(contents: &str) -> Result<PolicyConfig, ConfigError> {
    let policy: PolicyConfig = toml::from_str(contents)?;
    policy.validate()?;
    Ok(policy)
}

/// Parse and validate a policy document held in memory as YAML.
pub fn policy_from_yaml(contents: &str) -> Result<PolicyConfig, ConfigError> {
    let policy: PolicyConfig = serde_yaml::from_str(contents)?;
    policy.validate()?;
    Ok(policy)
}

fn load_document<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
