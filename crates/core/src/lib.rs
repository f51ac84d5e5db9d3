//! Core units, constants, and shared primitives for the NATOPS performance workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Specific gas constant for dry air (J/(kg·K)).
    pub const R_AIR: f64 = 287.052_87;
    /// Ratio of specific heats for air.
    pub const GAMMA_AIR: f64 = 1.4;
    /// Feet per international nautical mile.
    pub const FT_PER_NM: f64 = 6_076.12;
}

/// Basic unit conversion helpers.
pub mod units {
    const M_PER_FT: f64 = 0.3048;
    const N_PER_LBF: f64 = 4.448_22;
    const M2_PER_FT2: f64 = 0.092_903;
    const M_S_PER_KT: f64 = 0.514_444;

    /// Convert feet to metres.
    #[inline]
    pub fn ft_to_m(v: f64) -> f64 {
        v * M_PER_FT
    }

    /// Convert metres to feet.
    #[inline]
    pub fn m_to_ft(v: f64) -> f64 {
        v / M_PER_FT
    }

    /// Convert pounds-force to newtons.
    #[inline]
    pub fn lbf_to_n(v: f64) -> f64 {
        v * N_PER_LBF
    }

    /// Convert newtons to pounds-force.
    #[inline]
    pub fn n_to_lbf(v: f64) -> f64 {
        v / N_PER_LBF
    }

    /// Convert square feet to square metres.
    #[inline]
    pub fn ft2_to_m2(v: f64) -> f64 {
        v * M2_PER_FT2
    }

    /// Convert metres per second to knots.
    #[inline]
    pub fn ms_to_kt(v: f64) -> f64 {
        v / M_S_PER_KT
    }

    /// Convert knots to metres per second.
    #[inline]
    pub fn kt_to_ms(v: f64) -> f64 {
        v * M_S_PER_KT
    }
}

/// High-lift / flap configuration of the aircraft.
///
/// Configurations are keyed in datasets and policy documents by their
/// upper-case name; the legacy flap names used by older charts are accepted
/// when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Configuration {
    Clean,
    Maneuver,
    Full,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown configuration '{0}'")]
pub struct UnknownConfiguration(pub String);

impl Configuration {
    pub const ALL: [Configuration; 3] = [Self::Clean, Self::Maneuver, Self::Full];

    /// Canonical upper-case name used in datasets and policy documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clean => "CLEAN",
            Self::Maneuver => "MANEUVER",
            Self::Full => "FULL",
        }
    }

    /// Nominal flap deflection associated with the configuration (degrees).
    pub fn flap_deg(self) -> f64 {
        match self {
            Self::Clean => 0.0,
            Self::Maneuver => 20.0,
            Self::Full => 35.0,
        }
    }

    /// Configuration whose nominal flap deflection is closest to `deg`.
    /// Ties resolve to the smaller deflection.
    pub fn nearest_flap(deg: f64) -> Self {
        let mut best = Self::Clean;
        for candidate in Self::ALL {
            if (candidate.flap_deg() - deg).abs() < (best.flap_deg() - deg).abs() {
                best = candidate;
            }
        }
        best
    }

    /// Automatic flap schedule by gross weight (lb).
    pub fn auto_for_weight(weight_lbf: f64) -> Self {
        if weight_lbf < 55_000.0 {
            Self::Clean
        } else if weight_lbf < 65_000.0 {
            Self::Maneuver
        } else {
            Self::Full
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Configuration {
    type Err = UnknownConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLEAN" | "UP" => Ok(Self::Clean),
            "MANEUVER" | "MAN" => Ok(Self::Maneuver),
            "FULL" | "DOWN" => Ok(Self::Full),
            _ => Err(UnknownConfiguration(s.to_string())),
        }
    }
}

impl TryFrom<String> for Configuration {
    type Error = UnknownConfiguration;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Configuration> for String {
    fn from(value: Configuration) -> Self {
        value.name().to_string()
    }
}
