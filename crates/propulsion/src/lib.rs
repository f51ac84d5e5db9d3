//! Power settings and the engine performance deck.

pub mod deck;

use std::fmt;
use std::str::FromStr;

use natops_interp::InterpError;
use serde::Serialize;
use thiserror::Error;

pub use deck::{EngineDeck, EnginePerformance, MIL_NOMINAL_RPM_PCT};

/// Highest RPM (%) a derate may request.
pub const MAX_DERATE_PCT: f64 = 100.0;

/// Throttle position requested from the engine.
///
/// `Derate` carries the requested RPM percentage and is computed as a scaled
/// MIL point. For escalation the settings order as
/// `Idle < Derate(_) < Mil < Afterburner`, with a derate positioned by its
/// percentage against the MIL nominal RPM (see [`PowerSetting::escalation_rank`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PowerSetting {
    #[serde(rename = "IDLE")]
    Idle,
    #[serde(rename = "DERATE")]
    Derate(f64),
    #[serde(rename = "MIL")]
    Mil,
    #[serde(rename = "AB")]
    Afterburner,
}

/// Tabulated thrust categories. A derate is served from the MIL rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ThrustCategory {
    #[serde(rename = "IDLE")]
    Idle,
    #[serde(rename = "MIL")]
    Mil,
    #[serde(rename = "AB")]
    Afterburner,
}

/// Malformed power setting requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingError {
    #[error("invalid power setting '{0}'")]
    InvalidSetting(String),
    #[error("power setting {0} requires an RPM percentage")]
    MissingParameter(&'static str),
    #[error("derate percentage must lie in (0, 100], got {0}")]
    InvalidDerate(f64),
}

/// Errors surfaced by the engine deck.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine grid lookup failed: {0}")]
    Interp(#[from] InterpError),
    #[error(transparent)]
    Setting(#[from] SettingError),
}

impl PowerSetting {
    /// Build a setting from a legacy mode tag plus optional RPM percentage.
    pub fn parse(tag: &str, percent: Option<f64>) -> Result<Self, SettingError> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Ok(Self::Idle),
            "MIL" | "MILITARY" => Ok(Self::Mil),
            "AB" | "AFTERBURNER" | "MAX" => Ok(Self::Afterburner),
            "DERATE" | "REDUCED" => match percent {
                Some(pct) => Self::derate(pct),
                None => Err(SettingError::MissingParameter("DERATE")),
            },
            _ => Err(SettingError::InvalidSetting(tag.to_string())),
        }
    }

    /// Validated derate setting.
    pub fn derate(rpm_pct: f64) -> Result<Self, SettingError> {
        validate_derate(rpm_pct)?;
        Ok(Self::Derate(rpm_pct))
    }

    /// Grid category the setting is read from.
    pub fn category(&self) -> ThrustCategory {
        match self {
            Self::Idle => ThrustCategory::Idle,
            Self::Derate(_) | Self::Mil => ThrustCategory::Mil,
            Self::Afterburner => ThrustCategory::Afterburner,
        }
    }

    /// Position on the escalation ladder. Idle ranks lowest, afterburner highest,
    /// a derate ranks at its RPM percentage and MIL at its nominal RPM.
    pub fn escalation_rank(&self, mil_nominal_rpm_pct: f64) -> f64 {
        match self {
            Self::Idle => 0.0,
            Self::Derate(pct) => *pct,
            Self::Mil => mil_nominal_rpm_pct,
            Self::Afterburner => f64::INFINITY,
        }
    }

    pub fn is_afterburner(&self) -> bool {
        matches!(self, Self::Afterburner)
    }
}

pub(crate) fn validate_derate(rpm_pct: f64) -> Result<(), SettingError> {
    if rpm_pct.is_finite() && rpm_pct > 0.0 && rpm_pct <= MAX_DERATE_PCT {
        Ok(())
    } else {
        Err(SettingError::InvalidDerate(rpm_pct))
    }
}

impl fmt::Display for PowerSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::Derate(pct) => write!(f, "DERATE {pct:.1}%"),
            Self::Mil => f.write_str("MIL"),
            Self::Afterburner => f.write_str("AB"),
        }
    }
}

/// Accepts `IDLE`, `MIL`, `AB`, `DERATE:90`, `DERATE 90` or a bare percentage.
impl FromStr for PowerSetting {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(pct) = trimmed.parse::<f64>() {
            return Self::derate(pct);
        }
        let mut parts = trimmed.splitn(2, |c: char| c == ':' || c.is_whitespace());
        let tag = parts.next().unwrap_or_default();
        let percent = match parts.next().map(|p| p.trim().trim_end_matches('%')) {
            Some(p) if !p.is_empty() => Some(
                p.parse::<f64>()
                    .map_err(|_| SettingError::InvalidSetting(s.to_string()))?,
            ),
            _ => None,
        };
        Self::parse(tag, percent)
    }
}

impl ThrustCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Mil => "MIL",
            Self::Afterburner => "AB",
        }
    }
}

impl fmt::Display for ThrustCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThrustCategory {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Ok(Self::Idle),
            "MIL" | "MILITARY" => Ok(Self::Mil),
            "AB" | "AFTERBURNER" | "MAX" => Ok(Self::Afterburner),
            _ => Err(SettingError::InvalidSetting(s.to_string())),
        }
    }
}
