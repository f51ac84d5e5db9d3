//! F-14 takeoff performance core.
//!
//! The member crates hold the physics and table logic; this facade wires
//! them together so the binaries (and any other front-end) load a dataset
//! directory once and query it.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use natops_aero as aero;
pub use natops_atmosphere as atmosphere;
pub use natops_config as config;
pub use natops_envelope as envelope;
pub use natops_export as export;
pub use natops_interp as interp;
pub use natops_propulsion as propulsion;

pub use natops_core::{Configuration, UnknownConfiguration, constants, units};

use natops_aero::{AeroError, AeroModel};
use natops_config::{ConfigError, PolicyConfig};
use natops_envelope::{EnvelopeError, EnvelopeRequest, EnvelopeResult, EnvelopeSolver};
use natops_propulsion::{EngineDeck, EngineError};

pub const ENGINE_DECK_FILE: &str = "engine_deck.csv";
pub const AERO_POLARS_FILE: &str = "aero_polars.csv";
pub const POLICY_TOML_FILE: &str = "policy.toml";
pub const POLICY_YAML_FILE: &str = "policy.yaml";

#[derive(Debug, Error)]
pub enum PerformanceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Aero(#[from] AeroError),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// Engine deck, aero model and policy loaded from one dataset directory.
#[derive(Debug, Clone)]
pub struct PerformanceEngine {
    deck: EngineDeck,
    aero: AeroModel,
    policy: PolicyConfig,
}

impl PerformanceEngine {
    pub fn new(deck: EngineDeck, aero: AeroModel, policy: PolicyConfig) -> Self {
        Self { deck, aero, policy }
    }

    /// Load `engine_deck.csv`, `aero_polars.csv` and the policy document from
    /// `dir`. `policy.toml` wins over `policy.yaml`; with neither present the
    /// default policy applies.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, PerformanceError> {
        let dir = dir.as_ref();
        let policy_path = [POLICY_TOML_FILE, POLICY_YAML_FILE]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file());
        Self::load_files(
            dir.join(ENGINE_DECK_FILE),
            dir.join(AERO_POLARS_FILE),
            policy_path,
        )
    }

    /// Load from explicit file paths. A missing policy path selects the default policy.
    pub fn load_files(
        deck_path: PathBuf,
        aero_path: PathBuf,
        policy_path: Option<PathBuf>,
    ) -> Result<Self, PerformanceError> {
        let deck = EngineDeck::from_records(&config::load_engine_records(&deck_path)?)?;
        let aero = AeroModel::from_records(&config::load_aero_records(&aero_path)?)?;
        let policy = match policy_path {
            Some(path) => config::load_policy(path)?,
            None => {
                tracing::debug!("no policy document found, using defaults");
                PolicyConfig::default()
            }
        };
        Ok(Self::new(deck, aero, policy))
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn deck(&self) -> &EngineDeck {
        &self.deck
    }

    pub fn aero(&self) -> &AeroModel {
        &self.aero
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn solver(&self) -> EnvelopeSolver<'_> {
        EnvelopeSolver::new(&self.deck, &self.aero)
    }

    /// Solve one flight condition under the loaded policy.
    pub fn solve(&self, request: &EnvelopeRequest) -> Result<EnvelopeResult, PerformanceError> {
        Ok(self.solver().solve(request, &self.policy)?)
    }

    /// Solve `base` at each weight. With `auto_configuration` the flap
    /// configuration follows the weight schedule instead of `base`.
    pub fn sweep(
        &self,
        base: &EnvelopeRequest,
        weights: &[f64],
        auto_configuration: bool,
    ) -> Result<Vec<EnvelopeResult>, PerformanceError> {
        if !auto_configuration {
            return Ok(envelope::sweep_weights(
                &self.solver(),
                base,
                weights,
                &self.policy,
            )?);
        }
        weights
            .iter()
            .map(|&weight| {
                let mut request = base.with_weight(weight);
                request.configuration = Configuration::auto_for_weight(weight);
                self.solve(&request)
            })
            .collect()
    }
}

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
