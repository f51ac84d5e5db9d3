//! Takeoff envelope solver.
//!
//! Searches power settings from the policy floor upward and returns the lowest
//! one whose all-engines and one-engine-inoperative climb gradients clear the
//! policy thresholds, escalating to afterburner when allowed.

pub mod solver;
pub mod sweep;

use natops_aero::{AeroError, AeroModel};
use natops_config::{ConfigError, PolicyConfig};
use natops_core::Configuration;
use natops_propulsion::{EngineDeck, EngineError};
use thiserror::Error;

pub use natops_propulsion::PowerSetting;
pub use solver::{EnvelopeRequest, EnvelopeResult, EnvelopeSolver, EnvelopeStatus, EnvelopeTrial};
pub use sweep::{sweep_weights, weight_range};

/// Structural failures. An unsafe envelope is a result, not an error.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("engine deck failed: {0}")]
    Engine(#[from] EngineError),
    #[error("aero model failed: {0}")]
    Aero(#[from] AeroError),
    #[error("policy rejected: {0}")]
    Policy(#[from] ConfigError),
    #[error("invalid flight condition: {0}")]
    InvalidCondition(String),
}

/// One-shot convenience wrapper around [`EnvelopeSolver::solve`].
pub fn solve_envelope(
    deck: &EngineDeck,
    aero: &AeroModel,
    weight_lbf: f64,
    altitude_ft: f64,
    mach: f64,
    configuration: Configuration,
    policy: &PolicyConfig,
) -> Result<EnvelopeResult, EnvelopeError> {
    let request = EnvelopeRequest::new(weight_lbf, altitude_ft, mach, configuration);
    EnvelopeSolver::new(deck, aero).solve(&request, policy)
}
