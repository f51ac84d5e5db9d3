//! Aerodynamic polar model keyed by configuration, wing sweep and Mach.
//!
//! The table holds one slice per configuration with rows over (sweep, Mach).
//! A query selects the nearest sampled sweep and interpolates along Mach at
//! that sweep. Coefficients are dimensionless; the helpers on [`AeroPolar`]
//! take weight in pounds-force, density in kg/m³ and airspeed in m/s.

use natops_config::AeroRecord;
use natops_core::Configuration;
use natops_core::units::{ft2_to_m2, lbf_to_n, n_to_lbf};
use natops_interp::{GridTable, InterpError};
use serde::Serialize;
use thiserror::Error;

/// Unswept reference wing area (ft²).
pub const REFERENCE_WING_AREA_FT2: f64 = 565.0;

pub const SWEEP_AXIS: &str = "Sweep_deg";
pub const MACH_AXIS: &str = "Mach";
pub const CL_MAX_COLUMN: &str = "CLmax";
pub const CD0_COLUMN: &str = "CD0";
pub const K_COLUMN: &str = "k";
pub const STALL_AOA_COLUMN: &str = "StallAoA_deg";
pub const L_D_MAX_COLUMN: &str = "L_D_max";

#[derive(Debug, Error)]
pub enum AeroError {
    #[error("no aerodynamic data for configuration '{0}'")]
    UnknownConfiguration(String),
    #[error("aero table lookup failed: {0}")]
    Interp(#[from] InterpError),
    #[error("invalid flight condition: {0}")]
    InvalidCondition(String),
}

/// Aerodynamic coefficients for one configuration, sweep and Mach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AeroPolar {
    pub configuration: Configuration,
    /// Sampled sweep the coefficients were taken from (degrees).
    pub sweep_deg: f64,
    pub mach: f64,
    pub cl_max: f64,
    pub cd0: f64,
    /// Induced drag factor in `CD = CD0 + k·CL²`.
    pub k: f64,
    pub stall_aoa_deg: Option<f64>,
    pub l_d_max: f64,
    pub effective_wing_area_ft2: f64,
}

impl AeroPolar {
    fn wing_area_m2(&self) -> f64 {
        ft2_to_m2(self.effective_wing_area_ft2)
    }

    /// Lift coefficient required for level flight.
    pub fn required_cl(&self, weight_lbf: f64, density_kg_m3: f64, tas_m_s: f64) -> f64 {
        lbf_to_n(weight_lbf) / (dynamic_pressure(density_kg_m3, tas_m_s) * self.wing_area_m2())
    }

    /// Parabolic drag polar.
    pub fn drag_coefficient(&self, cl: f64) -> f64 {
        self.cd0 + self.k * cl * cl
    }

    /// Level-flight drag (lbf) at the given weight and flight condition.
    pub fn drag_lbf(&self, weight_lbf: f64, density_kg_m3: f64, tas_m_s: f64) -> f64 {
        let cl = self.required_cl(weight_lbf, density_kg_m3, tas_m_s);
        let q = dynamic_pressure(density_kg_m3, tas_m_s);
        n_to_lbf(q * self.wing_area_m2() * self.drag_coefficient(cl))
    }

    /// 1-g stall speed (m/s).
    pub fn stall_speed_m_s(&self, weight_lbf: f64, density_kg_m3: f64) -> f64 {
        (2.0 * lbf_to_n(weight_lbf) / (density_kg_m3 * self.wing_area_m2() * self.cl_max)).sqrt()
    }

    /// Lift coefficient for maximum L/D, `sqrt(CD0 / k)`.
    pub fn best_glide_cl(&self) -> f64 {
        (self.cd0 / self.k).sqrt()
    }

    /// Best-glide speed (m/s).
    pub fn best_glide_speed_m_s(&self, weight_lbf: f64, density_kg_m3: f64) -> f64 {
        (2.0 * lbf_to_n(weight_lbf) / (density_kg_m3 * self.wing_area_m2() * self.best_glide_cl()))
            .sqrt()
    }
}

fn dynamic_pressure(density_kg_m3: f64, tas_m_s: f64) -> f64 {
    0.5 * density_kg_m3 * tas_m_s * tas_m_s
}

/// Approximate automatic wing-sweep schedule (degrees) by Mach.
pub fn auto_sweep(mach: f64) -> f64 {
    if mach < 0.6 {
        20.0
    } else if mach < 0.9 {
        35.0
    } else if mach < 1.2 {
        55.0
    } else {
        68.0
    }
}

/// Polar table plus the reference geometry used to scale it.
#[derive(Debug, Clone)]
pub struct AeroModel {
    table: GridTable<Configuration>,
    reference_area_ft2: f64,
}

impl AeroModel {
    /// Wrap a table keyed by sweep then Mach. CLmax, CD0 and k are required;
    /// stall AoA and L/D max columns are optional.
    pub fn new(table: GridTable<Configuration>) -> Result<Self, AeroError> {
        if table.axes().len() != 2 {
            return Err(InterpError::DimensionMismatch {
                expected: 2,
                actual: table.axes().len(),
            }
            .into());
        }
        for column in [CL_MAX_COLUMN, CD0_COLUMN, K_COLUMN] {
            if !table.has_column(column) {
                return Err(InterpError::MissingColumn(column.to_string()).into());
            }
        }
        Ok(Self {
            table,
            reference_area_ft2: REFERENCE_WING_AREA_FT2,
        })
    }

    /// Build the model from dataset records.
    pub fn from_records(records: &[AeroRecord]) -> Result<Self, AeroError> {
        let mut builder = GridTable::builder(
            [SWEEP_AXIS, MACH_AXIS],
            [
                CL_MAX_COLUMN,
                CD0_COLUMN,
                K_COLUMN,
                STALL_AOA_COLUMN,
                L_D_MAX_COLUMN,
            ],
        );
        for record in records {
            let configuration: Configuration = record
                .config
                .parse()
                .map_err(|_| AeroError::UnknownConfiguration(record.config.clone()))?;
            builder.push(
                configuration,
                vec![record.sweep_deg, record.mach],
                vec![
                    Some(record.cl_max),
                    Some(record.cd0),
                    Some(record.k),
                    record.stall_aoa_deg,
                    record.l_d_max,
                ],
            )?;
        }
        Self::new(builder.build()?)
    }

    pub fn with_reference_area(mut self, area_ft2: f64) -> Self {
        self.reference_area_ft2 = area_ft2;
        self
    }

    pub fn reference_area_ft2(&self) -> f64 {
        self.reference_area_ft2
    }

    pub fn table(&self) -> &GridTable<Configuration> {
        &self.table
    }

    /// Sampled sweep angles for a configuration, ascending.
    pub fn sweeps(&self, configuration: Configuration) -> Result<Vec<f64>, AeroError> {
        self.table
            .breakpoints(&configuration, 0)
            .map_err(|err| match err {
                InterpError::NotFound(_) | InterpError::EmptyTable => {
                    AeroError::UnknownConfiguration(configuration.to_string())
                }
                other => AeroError::Interp(other),
            })
    }

    /// Coefficients at the nearest sampled sweep, interpolated along Mach.
    pub fn polar(
        &self,
        configuration: Configuration,
        sweep_deg: f64,
        mach: f64,
    ) -> Result<AeroPolar, AeroError> {
        if !sweep_deg.is_finite() || !mach.is_finite() {
            return Err(AeroError::InvalidCondition(format!(
                "sweep {sweep_deg} deg, Mach {mach}"
            )));
        }
        let sweeps = self.sweeps(configuration)?;
        let selected = nearest_sweep(&sweeps, sweep_deg);
        let point = [selected, mach];

        let cl_max = self.table.lookup(&configuration, &point, CL_MAX_COLUMN)?;
        let cd0 = self.table.lookup(&configuration, &point, CD0_COLUMN)?;
        let k = self.table.lookup(&configuration, &point, K_COLUMN)?;
        let stall_aoa_deg = self.optional(configuration, &point, STALL_AOA_COLUMN)?;
        let l_d_max = match self.optional(configuration, &point, L_D_MAX_COLUMN)? {
            Some(value) => value,
            None => 1.0 / (2.0 * (cd0 * k).sqrt()),
        };

        Ok(AeroPolar {
            configuration,
            sweep_deg: selected,
            mach,
            cl_max,
            cd0,
            k,
            stall_aoa_deg,
            l_d_max,
            effective_wing_area_ft2: self.reference_area_ft2 * selected.to_radians().cos(),
        })
    }

    /// Polar at the automatic sweep schedule for the Mach number.
    pub fn polar_auto(
        &self,
        configuration: Configuration,
        mach: f64,
    ) -> Result<AeroPolar, AeroError> {
        self.polar(configuration, auto_sweep(mach), mach)
    }

    fn optional(
        &self,
        configuration: Configuration,
        point: &[f64],
        column: &str,
    ) -> Result<Option<f64>, AeroError> {
        if !self.table.has_column(column) {
            return Ok(None);
        }
        match self.table.lookup(&configuration, point, column) {
            Ok(value) => Ok(Some(value)),
            Err(InterpError::MissingValue { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

// Ties go to the smaller sweep because candidates are visited in ascending order.
fn nearest_sweep(sweeps: &[f64], requested: f64) -> f64 {
    let mut best = sweeps[0];
    for &candidate in &sweeps[1..] {
        if (candidate - requested).abs() < (best - requested).abs() {
            best = candidate;
        }
    }
    best
}
