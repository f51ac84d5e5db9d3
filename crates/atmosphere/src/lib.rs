//! International Standard Atmosphere (troposphere and lower stratosphere).
//!
//! Closed-form ISA: a linear temperature lapse up to the tropopause at
//! 11 000 m and an isothermal layer above it. Every finite altitude is
//! accepted, including negative ones, which extrapolate through the
//! troposphere relation.

use natops_core::constants::{G0, GAMMA_AIR, R_AIR};
use natops_core::units::ft_to_m;
use serde::Serialize;

/// Sea-level standard temperature (K).
pub const T0_K: f64 = 288.15;
/// Sea-level standard pressure (Pa).
pub const P0_PA: f64 = 101_325.0;
/// Sea-level standard density (kg/m³).
pub const RHO0_KG_M3: f64 = P0_PA / (R_AIR * T0_K);
/// Tropospheric temperature lapse rate (K/m).
pub const LAPSE_RATE_K_M: f64 = 0.0065;
/// Geopotential altitude of the tropopause (m).
pub const TROPOPAUSE_M: f64 = 11_000.0;
/// Temperature of the isothermal layer above the tropopause (K).
pub const TROPOPAUSE_T_K: f64 = T0_K - LAPSE_RATE_K_M * TROPOPAUSE_M;

/// Thermodynamic state of the standard atmosphere at one altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphereState {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub speed_of_sound_m_s: f64,
}

impl AtmosphereState {
    /// Temperature ratio θ = T / T0.
    pub fn temperature_ratio(&self) -> f64 {
        self.temperature_k / T0_K
    }

    /// Pressure ratio δ = p / p0.
    pub fn pressure_ratio(&self) -> f64 {
        self.pressure_pa / P0_PA
    }

    /// Density ratio σ = ρ / ρ0.
    pub fn density_ratio(&self) -> f64 {
        self.density_kg_m3 / RHO0_KG_M3
    }

    /// True airspeed (m/s) for a flight Mach number at this state.
    pub fn true_airspeed(&self, mach: f64) -> f64 {
        mach * self.speed_of_sound_m_s
    }
}

/// Standard atmosphere at a pressure altitude given in feet.
pub fn atmosphere(altitude_ft: f64) -> AtmosphereState {
    let h = ft_to_m(altitude_ft);
    let exponent = G0 / (R_AIR * LAPSE_RATE_K_M);

    let (temperature, pressure) = if h < TROPOPAUSE_M {
        let t = T0_K - LAPSE_RATE_K_M * h;
        (t, P0_PA * (t / T0_K).powf(exponent))
    } else {
        let p11 = P0_PA * (TROPOPAUSE_T_K / T0_K).powf(exponent);
        let p = p11 * f64::exp(-G0 * (h - TROPOPAUSE_M) / (R_AIR * TROPOPAUSE_T_K));
        (TROPOPAUSE_T_K, p)
    };

    AtmosphereState {
        temperature_k: temperature,
        pressure_pa: pressure,
        density_kg_m3: pressure / (R_AIR * temperature),
        speed_of_sound_m_s: (GAMMA_AIR * R_AIR * temperature).sqrt(),
    }
}
