//! Engine performance deck over an (altitude, Mach) grid per thrust category.

use natops_config::EngineRecord;
use natops_interp::{GridTable, InterpError};
use serde::Serialize;

use crate::{EngineError, PowerSetting, ThrustCategory, validate_derate};

/// Reference RPM (%) of the MIL rows that derates scale against.
pub const MIL_NOMINAL_RPM_PCT: f64 = 99.0;

pub const ALTITUDE_AXIS: &str = "Altitude_ft";
pub const MACH_AXIS: &str = "Mach";
pub const THRUST_COLUMN: &str = "Thrust_lbf";
pub const FUEL_FLOW_COLUMN: &str = "FuelFlow_pph";
pub const RPM_COLUMN: &str = "RPM_pct";

/// Thrust, RPM and fuel flow at one flight condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnginePerformance {
    pub thrust_lbf: f64,
    pub rpm_pct: f64,
    pub fuel_flow_pph: f64,
}

impl EnginePerformance {
    /// Reporting precision: whole pounds and pounds per hour, RPM to 0.1 %.
    pub fn rounded(&self) -> Self {
        Self {
            thrust_lbf: self.thrust_lbf.round(),
            rpm_pct: (self.rpm_pct * 10.0).round() / 10.0,
            fuel_flow_pph: self.fuel_flow_pph.round(),
        }
    }
}

/// Engine deck backed by a category-keyed grid table.
#[derive(Debug, Clone)]
pub struct EngineDeck {
    table: GridTable<ThrustCategory>,
    mil_nominal_rpm_pct: f64,
}

impl EngineDeck {
    /// Wrap a grid keyed by altitude then Mach with thrust, fuel-flow and RPM columns.
    pub fn new(table: GridTable<ThrustCategory>) -> Result<Self, EngineError> {
        if table.axes().len() != 2 {
            return Err(InterpError::DimensionMismatch {
                expected: 2,
                actual: table.axes().len(),
            }
            .into());
        }
        for column in [THRUST_COLUMN, FUEL_FLOW_COLUMN, RPM_COLUMN] {
            if !table.has_column(column) {
                return Err(InterpError::MissingColumn(column.to_string()).into());
            }
        }
        Ok(Self {
            table,
            mil_nominal_rpm_pct: MIL_NOMINAL_RPM_PCT,
        })
    }

    /// Build the deck from dataset records.
    pub fn from_records(records: &[EngineRecord]) -> Result<Self, EngineError> {
        let mut builder = GridTable::builder(
            [ALTITUDE_AXIS, MACH_AXIS],
            [THRUST_COLUMN, FUEL_FLOW_COLUMN, RPM_COLUMN],
        );
        for record in records {
            let category: ThrustCategory = record.thrust_type.parse()?;
            builder.push(
                category,
                vec![record.altitude_ft, record.mach],
                vec![
                    Some(record.thrust_lbf),
                    Some(record.fuel_flow_pph),
                    record.rpm_pct,
                ],
            )?;
        }
        Self::new(builder.build()?)
    }

    /// Override the MIL reference RPM used for derate scaling.
    pub fn with_mil_nominal(mut self, rpm_pct: f64) -> Self {
        self.mil_nominal_rpm_pct = rpm_pct;
        self
    }

    pub fn mil_nominal_rpm_pct(&self) -> f64 {
        self.mil_nominal_rpm_pct
    }

    pub fn table(&self) -> &GridTable<ThrustCategory> {
        &self.table
    }

    /// Performance rounded to reporting precision.
    pub fn performance(
        &self,
        altitude_ft: f64,
        mach: f64,
        setting: PowerSetting,
    ) -> Result<EnginePerformance, EngineError> {
        Ok(self.evaluate(altitude_ft, mach, setting)?.rounded())
    }

    /// Unrounded performance for callers that keep computing with the result.
    pub fn evaluate(
        &self,
        altitude_ft: f64,
        mach: f64,
        setting: PowerSetting,
    ) -> Result<EnginePerformance, EngineError> {
        match setting {
            PowerSetting::Idle | PowerSetting::Mil | PowerSetting::Afterburner => {
                self.grid_point(setting.category(), altitude_ft, mach)
            }
            PowerSetting::Derate(rpm_pct) => {
                validate_derate(rpm_pct)?;
                // RPM is the requested percent, so the MIL RPM cells are not read.
                let mil = self.table.lookup_many(
                    &ThrustCategory::Mil,
                    &[altitude_ft, mach],
                    &[THRUST_COLUMN, FUEL_FLOW_COLUMN],
                )?;
                let scale = rpm_pct / self.mil_nominal_rpm_pct;
                Ok(EnginePerformance {
                    thrust_lbf: (mil[0] * scale).max(0.0),
                    rpm_pct,
                    fuel_flow_pph: (mil[1] * scale).max(0.0),
                })
            }
        }
    }

    /// Setting that delivers `rpm_pct`: a derate below MIL nominal, MIL at or above it.
    pub fn setting_for_rpm(&self, rpm_pct: f64) -> Result<PowerSetting, EngineError> {
        if rpm_pct >= self.mil_nominal_rpm_pct {
            Ok(PowerSetting::Mil)
        } else {
            Ok(PowerSetting::derate(rpm_pct)?)
        }
    }

    fn grid_point(
        &self,
        category: ThrustCategory,
        altitude_ft: f64,
        mach: f64,
    ) -> Result<EnginePerformance, EngineError> {
        let point = [altitude_ft, mach];
        let values = self.table.lookup_many(
            &category,
            &point,
            &[THRUST_COLUMN, FUEL_FLOW_COLUMN, RPM_COLUMN],
        )?;
        Ok(EnginePerformance {
            thrust_lbf: values[0].max(0.0),
            fuel_flow_pph: values[1].max(0.0),
            rpm_pct: values[2],
        })
    }
}
