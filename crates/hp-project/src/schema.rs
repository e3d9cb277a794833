//! Project schema definitions.

use serde::{Deserialize, Serialize};

/// Default control interval of the co-simulation [s].
pub const DEFAULT_CONTROL_INTERVAL_S: f64 = 900.0;

fn default_control_interval() -> f64 {
    DEFAULT_CONTROL_INTERVAL_S
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_control_interval")]
    pub control_interval_s: f64,
    #[serde(default)]
    pub assets: Vec<AssetDef>,
}

impl Project {
    pub fn asset(&self, id: &str) -> Option<&AssetDef> {
        self.assets.iter().find(|a| a.id == id)
    }
}

/// One hybrid heat pump together with the building it heats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub building: BuildingDef,
    pub heat_pump: HeatPumpDef,
}

/// Two-node RC description of the building.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingDef {
    /// Indoor air heat capacity [J/K]
    pub c_in: f64,
    /// Envelope heat capacity [J/K]
    pub c_out: f64,
    /// Indoor air <-> envelope [K/W]
    pub r_exch: f64,
    /// Indoor air <-> soil [K/W]
    pub r_floor: f64,
    /// Ventilation, indoor air <-> outdoor air [K/W]
    pub r_vent: f64,
    /// Envelope <-> outdoor air [K/W]
    pub r_cond: f64,
    /// Glazing area [m²]
    #[serde(alias = "a_glass")]
    pub window_area_m2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatPumpDef {
    /// Nominal thermal output [W]
    pub thermal_power_w: f64,
    /// Buffer heat capacity [J/K]
    pub buffer_capacitance: f64,
    /// Initial buffer temperature [K]
    pub buffer_temp_0: f64,
    /// Indoor set point used for the initial equilibrium [K]
    pub house_temp_0: f64,
    pub buffer_temp_min: f64,
    pub buffer_temp_max: f64,
    pub house_temp_min: f64,
}
