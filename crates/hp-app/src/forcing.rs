//! Per-interval inputs handed to an asset.

use hp_project::{AllocationDef, ForecastDef};
use hp_thermal::WeatherForcing;

use crate::error::{AppError, AppResult};

/// Weather forecast arrays; index 0 is the current instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    pub solar_irradiance: Vec<f64>,
    pub air_temperature: Vec<f64>,
    pub soil_temperature: Vec<f64>,
}

impl Forecast {
    /// Constant forecast of a single instant.
    pub fn constant(air_temperature: f64, soil_temperature: f64, solar_irradiance: f64) -> Self {
        Self {
            solar_irradiance: vec![solar_irradiance],
            air_temperature: vec![air_temperature],
            soil_temperature: vec![soil_temperature],
        }
    }

    /// Forcing held over the coming interval.
    pub fn current(&self) -> AppResult<WeatherForcing> {
        Ok(WeatherForcing {
            air_temp: first(&self.air_temperature, "air_temperature")?,
            soil_temp: first(&self.soil_temperature, "soil_temperature")?,
            solar_irradiance: first(&self.solar_irradiance, "solar_irradiance")?,
        })
    }
}

fn first(series: &[f64], name: &str) -> AppResult<f64> {
    series
        .first()
        .copied()
        .ok_or_else(|| AppError::InvalidInput(format!("forecast {name} is empty")))
}

impl From<&ForecastDef> for Forecast {
    fn from(def: &ForecastDef) -> Self {
        Self {
            solar_irradiance: def.solar_irradiance.clone(),
            air_temperature: def.air_temperature.clone(),
            soil_temperature: def.soil_temperature.clone(),
        }
    }
}

/// Heat-flow setpoints chosen by the dispatcher for one interval [W].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatAllocation {
    /// Heat pump -> buffer
    pub heat_to_buffer_w: f64,
    /// Buffer -> house
    pub heat_to_house_w: f64,
}

impl From<AllocationDef> for HeatAllocation {
    fn from(def: AllocationDef) -> Self {
        Self {
            heat_to_buffer_w: def.heat_to_buffer_w,
            heat_to_house_w: def.heat_to_house_w,
        }
    }
}
