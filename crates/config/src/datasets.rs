//! CSV records for engine decks and aerodynamic polars.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// One row of an engine performance grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineRecord {
    #[serde(rename = "ThrustType", alias = "thrust_type")]
    pub thrust_type: String,
    #[serde(rename = "Altitude_ft", alias = "altitude_ft", alias = "alt_ft")]
    pub altitude_ft: f64,
    #[serde(rename = "Mach", alias = "mach")]
    pub mach: f64,
    #[serde(rename = "Thrust_lbf", alias = "thrust_lbf")]
    pub thrust_lbf: f64,
    #[serde(rename = "FuelFlow_pph", alias = "fuel_flow_pph")]
    pub fuel_flow_pph: f64,
    #[serde(rename = "RPM_pct", alias = "rpm_pct", default)]
    pub rpm_pct: Option<f64>,
}

/// One row of an aerodynamic polar table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AeroRecord {
    #[serde(rename = "Config", alias = "config")]
    pub config: String,
    #[serde(
        rename = "Sweep_deg",
        alias = "WingSweep_deg",
        alias = "sweep_deg",
        alias = "sweep"
    )]
    pub sweep_deg: f64,
    #[serde(rename = "Mach", alias = "mach")]
    pub mach: f64,
    #[serde(rename = "CLmax", alias = "clmax")]
    pub cl_max: f64,
    #[serde(rename = "CD0", alias = "cd0")]
    pub cd0: f64,
    pub k: f64,
    #[serde(rename = "StallAoA_deg", alias = "stall_aoa_deg", default)]
    pub stall_aoa_deg: Option<f64>,
    #[serde(rename = "L_D_max", alias = "l_d_max", default)]
    pub l_d_max: Option<f64>,
}

/// Load engine grid records from a CSV file.
pub fn load_engine_records<P: AsRef<Path>>(path: P) -> Result<Vec<EngineRecord>, ConfigError> {
    let path = path.as_ref();
    let records = read_engine_records(File::open(path)?)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded engine records");
    non_empty(records, path)
}

/// Load aerodynamic polar records from a CSV file.
pub fn load_aero_records<P: AsRef<Path>>(path: P) -> Result<Vec<AeroRecord>, ConfigError> {
    let path = path.as_ref();
    let records = read_aero_records(File::open(path)?)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded aero records");
    non_empty(records, path)
}

/// Parse engine grid records from any CSV source.
pub fn read_engine_records<R: Read>(reader: R) -> Result<Vec<EngineRecord>, ConfigError> {
    read_records(reader)
}

/// Parse aerodynamic polar records from any CSV source.
pub fn read_aero_records<R: Read>(reader: R) -> Result<Vec<AeroRecord>, ConfigError> {
    read_records(reader)
}

fn read_records<T, R>(reader: R) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut records = Vec::new();
    for record in csv_reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

fn non_empty<T>(records: Vec<T>, path: &Path) -> Result<Vec<T>, ConfigError> {
    if records.is_empty() {
        return Err(ConfigError::EmptyDataset(path.display().to_string()));
    }
    Ok(records)
}
