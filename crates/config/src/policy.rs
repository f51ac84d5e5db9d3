//! Takeoff power policy: RPM floors, afterburner permission, safety margins.

use std::collections::BTreeMap;

use natops_core::Configuration;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Floor applied to configurations the policy document does not list.
pub const DEFAULT_FLOOR_PCT: f64 = 85.0;

/// Smallest derate search increment (%) a policy may set.
pub const MIN_RPM_STEP_PCT: f64 = 0.1;

/// Complete policy document. Every section is optional and falls back to the
/// documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub policy: EnginePolicy,
    /// Minimum takeoff RPM (%) by configuration.
    #[serde(default = "default_floors")]
    pub floors: BTreeMap<Configuration, f64>,
    #[serde(default)]
    pub safety: SafetyPolicy,
    #[serde(default)]
    pub fuel_flow: FuelFlowBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnginePolicy {
    #[serde(default)]
    pub allow_ab: bool,
    /// Absolute minimum takeoff RPM (%); configuration floors never go below it.
    #[serde(default = "default_min_takeoff_rpm_pct")]
    pub min_takeoff_rpm_pct: f64,
    /// Increment used when searching derate settings (%).
    #[serde(default = "default_rpm_step_pct")]
    pub rpm_step_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyPolicy {
    #[serde(default = "default_runway_factor")]
    pub runway_factor: f64,
    #[serde(default = "default_aeo_gradient")]
    pub aeo_gradient_min_ft_nm: f64,
    #[serde(default = "default_oei_gradient")]
    pub oei_gradient_min_ft_nm: f64,
    /// Afterburner results whose all-engines gradient falls below this are unsafe.
    #[serde(default = "default_ab_gradient_floor")]
    pub ab_gradient_floor_ft_nm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelFlowBounds {
    #[serde(default = "default_min_idle_ff_pph")]
    pub min_idle_ff_pph: f64,
    #[serde(default)]
    pub max_mil_ff_pph: Option<f64>,
}

/// Outcome of clamping a requested derate to the applicable floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerateClamp {
    pub requested_pct: f64,
    pub applied_pct: f64,
    pub floor_pct: f64,
    pub clamped_to_floor: bool,
}

impl PolicyConfig {
    /// RPM floor for a configuration, raised to the absolute minimum takeoff RPM.
    pub fn floor_pct_for_configuration(&self, configuration: Configuration) -> f64 {
        let floor = self
            .floors
            .get(&configuration)
            .copied()
            .unwrap_or(DEFAULT_FLOOR_PCT);
        floor.max(self.policy.min_takeoff_rpm_pct)
    }

    /// Clamp a requested derate percentage up to the configuration floor.
    pub fn clamp_derate(&self, requested_pct: f64, configuration: Configuration) -> DerateClamp {
        let floor_pct = self.floor_pct_for_configuration(configuration);
        let requested = if requested_pct.is_finite() {
            requested_pct
        } else {
            0.0
        };
        let applied_pct = requested.max(floor_pct);
        DerateClamp {
            requested_pct: requested,
            applied_pct,
            floor_pct,
            clamped_to_floor: applied_pct > requested,
        }
    }

    /// Runway distance multiplied by the policy safety factor.
    pub fn factored_distance(&self, distance_ft: f64) -> f64 {
        distance_ft * self.safety.runway_factor
    }

    /// Fuel flow held inside the policy idle/MIL bounds.
    pub fn clamp_fuel_flow(&self, fuel_flow_pph: f64) -> f64 {
        let lower = fuel_flow_pph.max(self.fuel_flow.min_idle_ff_pph);
        match self.fuel_flow.max_mil_ff_pph {
            Some(upper) => lower.min(upper),
            None => lower,
        }
    }

    /// Reject documents the solver cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct_ok = |v: f64| v.is_finite() && v > 0.0 && v <= 100.0;

        let step = self.policy.rpm_step_pct;
        if !(step.is_finite() && step >= MIN_RPM_STEP_PCT) {
            return Err(ConfigError::InvalidPolicy(format!(
                "rpm_step_pct must be at least {MIN_RPM_STEP_PCT}, got {step}"
            )));
        }
        if !pct_ok(self.policy.min_takeoff_rpm_pct) {
            return Err(ConfigError::InvalidPolicy(format!(
                "min_takeoff_rpm_pct must lie in (0, 100], got {}",
                self.policy.min_takeoff_rpm_pct
            )));
        }
        if let Some((config, floor)) = self.floors.iter().find(|(_, floor)| !pct_ok(**floor)) {
            return Err(ConfigError::InvalidPolicy(format!(
                "floor for {config} must lie in (0, 100], got {floor}"
            )));
        }
        if !(self.safety.runway_factor.is_finite() && self.safety.runway_factor > 0.0) {
            return Err(ConfigError::InvalidPolicy(format!(
                "runway_factor must be positive, got {}",
                self.safety.runway_factor
            )));
        }
        if let Some(max) = self.fuel_flow.max_mil_ff_pph {
            if max < self.fuel_flow.min_idle_ff_pph {
                return Err(ConfigError::InvalidPolicy(format!(
                    "max_mil_ff_pph ({max}) is below min_idle_ff_pph ({})",
                    self.fuel_flow.min_idle_ff_pph
                )));
            }
        }
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            policy: EnginePolicy::default(),
            floors: default_floors(),
            safety: SafetyPolicy::default(),
            fuel_flow: FuelFlowBounds::default(),
        }
    }
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            allow_ab: false,
            min_takeoff_rpm_pct: default_min_takeoff_rpm_pct(),
            rpm_step_pct: default_rpm_step_pct(),
        }
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            runway_factor: default_runway_factor(),
            aeo_gradient_min_ft_nm: default_aeo_gradient(),
            oei_gradient_min_ft_nm: default_oei_gradient(),
            ab_gradient_floor_ft_nm: default_ab_gradient_floor(),
        }
    }
}

impl Default for FuelFlowBounds {
    fn default() -> Self {
        Self {
            min_idle_ff_pph: default_min_idle_ff_pph(),
            max_mil_ff_pph: None,
        }
    }
}

fn default_floors() -> BTreeMap<Configuration, f64> {
    [
        (Configuration::Clean, 85.0),
        (Configuration::Maneuver, 90.0),
        (Configuration::Full, 96.0),
    ]
    .into()
}

fn default_min_takeoff_rpm_pct() -> f64 {
    85.0
}

fn default_rpm_step_pct() -> f64 {
    1.0
}

fn default_runway_factor() -> f64 {
    1.10
}

fn default_aeo_gradient() -> f64 {
    300.0
}

fn default_oei_gradient() -> f64 {
    200.0
}

fn default_ab_gradient_floor() -> f64 {
    200.0
}

fn default_min_idle_ff_pph() -> f64 {
    1_200.0
}
