//! Per-asset models, guards and lifecycle, keyed by asset id.

use std::collections::HashMap;

use hp_core::{AssetId, AssetSlot, Real};
use hp_project::{AssetDef, BuildingDef, HeatPumpDef, Project};
use hp_thermal::{
    AssetLifecycle, BoundaryGuard, Capacities, OperatingBounds, Resistances, ThermalBufferModel,
    ThermalNetworkModel,
};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Configured initial conditions of an asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialConditions {
    pub buffer_temp: Real,
    /// Indoor set point the house equilibrium is solved against.
    pub house_temp: Real,
    /// Nominal heat pump thermal power [W].
    pub nominal_heat: Real,
}

/// Everything the kernel needs for one asset.
#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub id: AssetId,
    pub slot: AssetSlot,
    pub name: String,
    pub house: ThermalNetworkModel,
    pub buffer: ThermalBufferModel,
    pub guard: BoundaryGuard,
    pub initial: InitialConditions,
    pub lifecycle: AssetLifecycle,
}

pub fn build_house_model(building: &BuildingDef) -> AppResult<ThermalNetworkModel> {
    Ok(ThermalNetworkModel::new(
        Capacities {
            c_in: building.c_in,
            c_out: building.c_out,
        },
        Resistances {
            r_exch: building.r_exch,
            r_floor: building.r_floor,
            r_vent: building.r_vent,
            r_cond: building.r_cond,
        },
        building.window_area_m2,
    )?)
}

pub fn operating_bounds(heat_pump: &HeatPumpDef) -> OperatingBounds {
    OperatingBounds {
        buffer_min: heat_pump.buffer_temp_min,
        buffer_max: heat_pump.buffer_temp_max,
        house_min: heat_pump.house_temp_min,
    }
}

impl AssetEntry {
    pub fn from_def(slot: AssetSlot, def: &AssetDef) -> AppResult<Self> {
        let id = AssetId::new(def.id.clone());
        let house = build_house_model(&def.building)?;
        let buffer = ThermalBufferModel::new(def.heat_pump.buffer_capacitance)?;
        let guard = BoundaryGuard::new(id.clone(), operating_bounds(&def.heat_pump))?;
        let hp = &def.heat_pump;
        Ok(Self {
            id,
            slot,
            name: def.name.clone(),
            house,
            buffer,
            guard,
            initial: InitialConditions {
                buffer_temp: hp.buffer_temp_0,
                house_temp: hp.house_temp_0,
                nominal_heat: hp.thermal_power_w,
            },
            lifecycle: AssetLifecycle::default(),
        })
    }
}

/// Slot for the entry stored at arena position `len`.
fn next_slot(len: usize) -> AppResult<AssetSlot> {
    u32::try_from(len)
        .ok()
        .and_then(AssetSlot::from_index)
        .ok_or_else(|| AppError::InvalidInput(format!("asset arena is full ({len} entries)")))
}

/// Arena of assets plus an id index.
///
/// Assets share nothing; each entry is stepped on its own.
#[derive(Debug, Clone)]
pub struct AssetStateRegistry {
    entries: Vec<AssetEntry>,
    by_id: HashMap<String, AssetSlot>,
    control_interval_s: Real,
}

impl AssetStateRegistry {
    pub fn new(control_interval_s: Real) -> AppResult<Self> {
        if !(control_interval_s.is_finite() && control_interval_s > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "control interval must be positive, got {control_interval_s}"
            )));
        }
        Ok(Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            control_interval_s,
        })
    }

    pub fn from_project(project: &Project) -> AppResult<Self> {
        hp_project::validate_project(project)?;
        let mut registry = Self::new(project.control_interval_s)?;
        for def in &project.assets {
            registry.insert(def)?;
        }
        info!(
            project = %project.name,
            assets = registry.len(),
            control_interval_s = registry.control_interval_s,
            "asset registry built"
        );
        Ok(registry)
    }

    pub fn insert(&mut self, def: &AssetDef) -> AppResult<AssetSlot> {
        if self.by_id.contains_key(&def.id) {
            return Err(AppError::Validation(format!("duplicate asset id {}", def.id)));
        }
        let slot = next_slot(self.entries.len())?;
        let entry = AssetEntry::from_def(slot, def)?;
        self.by_id.insert(def.id.clone(), slot);
        self.entries.push(entry);
        Ok(slot)
    }

    pub fn control_interval_s(&self) -> Real {
        self.control_interval_s
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn slot(&self, asset_id: &str) -> AppResult<AssetSlot> {
        self.by_id
            .get(asset_id)
            .copied()
            .ok_or_else(|| AppError::AssetNotFound(asset_id.to_string()))
    }

    pub fn get(&self, asset_id: &str) -> AppResult<&AssetEntry> {
        let slot = self.slot(asset_id)?;
        Ok(&self.entries[slot.index() as usize])
    }

    pub fn get_mut(&mut self, asset_id: &str) -> AppResult<&mut AssetEntry> {
        let slot = self.slot(asset_id)?;
        Ok(&mut self.entries[slot.index() as usize])
    }

    /// Entries in project order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.to_string()).collect()
    }
}
