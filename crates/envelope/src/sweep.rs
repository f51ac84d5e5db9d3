//! Envelope evaluation across a range of gross weights.

use natops_config::PolicyConfig;

use crate::{EnvelopeError, EnvelopeRequest, EnvelopeResult, EnvelopeSolver};

/// Evenly spaced weights from `start` to `end` inclusive. Empty when the
/// step is not positive or the range is inverted.
pub fn weight_range(start_lbf: f64, end_lbf: f64, step_lbf: f64) -> Vec<f64> {
    if !(step_lbf.is_finite() && step_lbf > 0.0) || !(start_lbf <= end_lbf) {
        return Vec::new();
    }
    let count = ((end_lbf - start_lbf) / step_lbf + 1e-9).floor() as usize;
    (0..=count)
        .map(|idx| start_lbf + step_lbf * idx as f64)
        .collect()
}

/// Solve the envelope at each weight, keeping the rest of `base` fixed.
pub fn sweep_weights(
    solver: &EnvelopeSolver<'_>,
    base: &EnvelopeRequest,
    weights: &[f64],
    policy: &PolicyConfig,
) -> Result<Vec<EnvelopeResult>, EnvelopeError> {
    weights
        .iter()
        .map(|&weight| solver.solve(&base.with_weight(weight), policy))
        .collect()
}
