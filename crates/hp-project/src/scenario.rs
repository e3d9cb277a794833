//! Scenario files: weather forecasts and heat allocations per control interval.
//!
//! A scenario stands in for the co-simulation broker. Interval `k` is stamped
//! `start + k * control_interval_s`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub intervals: Vec<IntervalDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalDef {
    pub forecast: ForecastDef,
    /// Keyed by asset id. Assets without an entry receive no heat.
    #[serde(default)]
    pub allocations: BTreeMap<String, AllocationDef>,
}

/// Forecast arrays, index 0 = current instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDef {
    /// [W/m²]
    pub solar_irradiance: Vec<f64>,
    /// [K]
    pub air_temperature: Vec<f64>,
    /// [K]
    pub soil_temperature: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AllocationDef {
    #[serde(default)]
    pub heat_to_buffer_w: f64,
    #[serde(default)]
    pub heat_to_house_w: f64,
}
