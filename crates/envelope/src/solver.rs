//! Minimum-power search over derate, MIL and afterburner settings.

use std::fmt;

use natops_aero::{AeroModel, auto_sweep};
use natops_atmosphere::atmosphere;
use natops_config::PolicyConfig;
use natops_core::Configuration;
use natops_core::constants::FT_PER_NM;
use natops_propulsion::{EngineDeck, EnginePerformance, MAX_DERATE_PCT, PowerSetting};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::EnvelopeError;

/// Fraction of all-engines thrust left with one engine out (twin-engine airframe).
const OEI_THRUST_FRACTION: f64 = 0.5;

/// Flight condition the envelope is solved for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvelopeRequest {
    pub weight_lbf: f64,
    pub altitude_ft: f64,
    pub mach: f64,
    pub configuration: Configuration,
    /// Wing sweep (degrees); the automatic schedule applies when absent.
    pub sweep_deg: Option<f64>,
}

impl EnvelopeRequest {
    pub fn new(weight_lbf: f64, altitude_ft: f64, mach: f64, configuration: Configuration) -> Self {
        Self {
            weight_lbf,
            altitude_ft,
            mach,
            configuration,
            sweep_deg: None,
        }
    }

    pub fn with_sweep(mut self, sweep_deg: f64) -> Self {
        self.sweep_deg = Some(sweep_deg);
        self
    }

    pub fn with_weight(mut self, weight_lbf: f64) -> Self {
        self.weight_lbf = weight_lbf;
        self
    }

    fn validate(&self) -> Result<(), EnvelopeError> {
        if !(self.weight_lbf.is_finite() && self.weight_lbf > 0.0) {
            return Err(EnvelopeError::InvalidCondition(format!(
                "weight must be positive, got {}",
                self.weight_lbf
            )));
        }
        if !(self.mach.is_finite() && self.mach > 0.0) {
            return Err(EnvelopeError::InvalidCondition(format!(
                "Mach must be positive, got {}",
                self.mach
            )));
        }
        if !self.altitude_ft.is_finite() {
            return Err(EnvelopeError::InvalidCondition(format!(
                "altitude must be finite, got {}",
                self.altitude_ft
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvelopeStatus {
    /// Margins met at or below MIL with headroom left.
    Normal,
    /// Margins met only at MIL and afterburner is not available.
    Caution,
    /// Margins required afterburner.
    Escalated,
    /// No permitted setting is safe; the caller must reject the configuration.
    Unsafe,
}

impl EnvelopeStatus {
    pub fn is_dispatchable(self) -> bool {
        !matches!(self, Self::Unsafe)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Caution => "CAUTION",
            Self::Escalated => "ESCALATED",
            Self::Unsafe => "UNSAFE",
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One evaluated power setting, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvelopeTrial {
    pub setting: PowerSetting,
    pub thrust_lbf: f64,
    pub rpm_pct: f64,
    pub fuel_flow_pph: f64,
    pub drag_lbf: f64,
    pub aeo_gradient_ft_nm: f64,
    pub oei_gradient_ft_nm: f64,
    pub meets_margins: bool,
}

/// Solver output. Thrust, RPM and fuel flow are rounded to reporting precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeResult {
    pub request: EnvelopeRequest,
    pub setting: PowerSetting,
    pub thrust_lbf: f64,
    pub rpm_pct: f64,
    pub fuel_flow_pph: f64,
    pub aeo_gradient_ft_nm: f64,
    pub oei_gradient_ft_nm: f64,
    pub status: EnvelopeStatus,
    /// RPM floor the search started from.
    pub floor_pct: f64,
    /// Sampled sweep the polar was taken at.
    pub sweep_deg: f64,
    pub drag_lbf: f64,
    pub trials: Vec<EnvelopeTrial>,
}

/// Composes the engine deck and aero model into the envelope search.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeSolver<'a> {
    deck: &'a EngineDeck,
    aero: &'a AeroModel,
}

impl<'a> EnvelopeSolver<'a> {
    pub fn new(deck: &'a EngineDeck, aero: &'a AeroModel) -> Self {
        Self { deck, aero }
    }

    /// Lowest power setting meeting both climb-gradient margins.
    pub fn solve(
        &self,
        request: &EnvelopeRequest,
        policy: &PolicyConfig,
    ) -> Result<EnvelopeResult, EnvelopeError> {
        request.validate()?;
        policy.validate()?;

        let air = atmosphere(request.altitude_ft);
        let tas_m_s = air.true_airspeed(request.mach);
        let sweep = request.sweep_deg.unwrap_or_else(|| auto_sweep(request.mach));
        let polar = self.aero.polar(request.configuration, sweep, request.mach)?;
        let drag_lbf = polar.drag_lbf(request.weight_lbf, air.density_kg_m3, tas_m_s);

        let floor_pct = policy.floor_pct_for_configuration(request.configuration);
        let mil_pct = self.deck.mil_nominal_rpm_pct();
        let step = policy.policy.rpm_step_pct;

        let search = Search {
            deck: self.deck,
            request,
            policy,
            drag_lbf,
        };
        let finish = |setting: &EnvelopeTrial, status: EnvelopeStatus, trials: Vec<EnvelopeTrial>| {
            let rounded = EnginePerformance {
                thrust_lbf: setting.thrust_lbf,
                rpm_pct: setting.rpm_pct,
                fuel_flow_pph: setting.fuel_flow_pph,
            }
            .rounded();
            EnvelopeResult {
                request: *request,
                setting: setting.setting,
                thrust_lbf: rounded.thrust_lbf,
                rpm_pct: rounded.rpm_pct,
                fuel_flow_pph: rounded.fuel_flow_pph,
                aeo_gradient_ft_nm: setting.aeo_gradient_ft_nm,
                oei_gradient_ft_nm: setting.oei_gradient_ft_nm,
                status,
                floor_pct,
                sweep_deg: polar.sweep_deg,
                drag_lbf,
                trials,
            }
        };

        let mut trials = Vec::new();

        // A floor above MIL nominal replaces MIL with derates up to full RPM.
        let above_mil = floor_pct > mil_pct;
        let (ceiling_pct, top_setting) = if above_mil {
            (MAX_DERATE_PCT, PowerSetting::Derate(MAX_DERATE_PCT))
        } else {
            (mil_pct, PowerSetting::Mil)
        };
        let top_status = if policy.policy.allow_ab {
            EnvelopeStatus::Normal
        } else {
            EnvelopeStatus::Caution
        };
        let ladder_status = if above_mil {
            top_status
        } else {
            EnvelopeStatus::Normal
        };

        // Indexed so steps do not accumulate error.
        let derate_steps = ((ceiling_pct - floor_pct) / step).ceil().max(0.0) as usize;
        for idx in 0..derate_steps {
            let rpm_pct = floor_pct + step * idx as f64;
            if rpm_pct >= ceiling_pct {
                break;
            }
            let trial = search.trial(PowerSetting::Derate(rpm_pct))?;
            trials.push(trial);
            if trial.meets_margins {
                return Ok(finish(&trial, ladder_status, trials));
            }
        }

        let top = search.trial(top_setting)?;
        trials.push(top);
        if top.meets_margins {
            return Ok(finish(&top, top_status, trials));
        }

        if policy.policy.allow_ab {
            let ab = search.trial(PowerSetting::Afterburner)?;
            trials.push(ab);
            if ab.aeo_gradient_ft_nm < policy.safety.ab_gradient_floor_ft_nm {
                warn!(
                    configuration = %request.configuration,
                    weight_lbf = request.weight_lbf,
                    aeo_gradient_ft_nm = ab.aeo_gradient_ft_nm,
                    "afterburner does not reach the minimum gradient"
                );
                return Ok(finish(&ab, EnvelopeStatus::Unsafe, trials));
            }
            info!(
                configuration = %request.configuration,
                weight_lbf = request.weight_lbf,
                aeo_gradient_ft_nm = ab.aeo_gradient_ft_nm,
                oei_gradient_ft_nm = ab.oei_gradient_ft_nm,
                "escalated to afterburner"
            );
            return Ok(finish(&ab, EnvelopeStatus::Escalated, trials));
        }

        let best = trials
            .iter()
            .copied()
            .max_by(|a, b| a.aeo_gradient_ft_nm.total_cmp(&b.aeo_gradient_ft_nm))
            .unwrap_or(top);
        warn!(
            configuration = %request.configuration,
            weight_lbf = request.weight_lbf,
            aeo_gradient_ft_nm = best.aeo_gradient_ft_nm,
            oei_gradient_ft_nm = best.oei_gradient_ft_nm,
            "no permitted setting meets climb margins"
        );
        Ok(finish(&best, EnvelopeStatus::Unsafe, trials))
    }
}

struct Search<'s> {
    deck: &'s EngineDeck,
    request: &'s EnvelopeRequest,
    policy: &'s PolicyConfig,
    drag_lbf: f64,
}

impl Search<'_> {
    fn trial(&self, setting: PowerSetting) -> Result<EnvelopeTrial, EnvelopeError> {
        let perf = self
            .deck
            .evaluate(self.request.altitude_ft, self.request.mach, setting)?;
        let fuel_flow_pph = match setting {
            PowerSetting::Derate(_) => self.policy.clamp_fuel_flow(perf.fuel_flow_pph),
            _ => perf.fuel_flow_pph,
        };

        let weight = self.request.weight_lbf;
        let aeo = (perf.thrust_lbf - self.drag_lbf) / weight * FT_PER_NM;
        let oei = (perf.thrust_lbf * OEI_THRUST_FRACTION - self.drag_lbf) / weight * FT_PER_NM;
        let meets_margins = aeo >= self.policy.safety.aeo_gradient_min_ft_nm
            && oei >= self.policy.safety.oei_gradient_min_ft_nm;

        debug!(
            setting = %setting,
            thrust_lbf = perf.thrust_lbf,
            drag_lbf = self.drag_lbf,
            aeo_gradient_ft_nm = aeo,
            oei_gradient_ft_nm = oei,
            meets_margins,
            "envelope trial"
        );

        Ok(EnvelopeTrial {
            setting,
            thrust_lbf: perf.thrust_lbf,
            rpm_pct: perf.rpm_pct,
            fuel_flow_pph,
            drag_lbf: self.drag_lbf,
            aeo_gradient_ft_nm: aeo,
            oei_gradient_ft_nm: oei,
            meets_margins,
        })
    }
}
