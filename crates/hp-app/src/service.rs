//! Per-interval asset exchange: publish temperatures, then advance with the
//! dispatcher's heat allocation.

use chrono::{DateTime, Utc};
use hp_core::Vec2;
use hp_results::{MetricRecord, TimeseriesSink, metric};
use hp_thermal::{AssetLifecycle, ThermalState};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::forcing::{Forecast, HeatAllocation};
use crate::registry::{AssetEntry, AssetStateRegistry};

/// Temperatures published to the other simulation participants [K].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssetOutputs {
    pub buffer_temperature: f64,
    /// `[T_in, T_out]`
    pub house_temperatures: Vec2,
}

impl AssetOutputs {
    fn from_state(state: &ThermalState) -> Self {
        Self {
            buffer_temperature: state.buffer.temperature,
            house_temperatures: state.house.temperatures,
        }
    }

    pub fn indoor_temperature(&self) -> f64 {
        self.house_temperatures[0]
    }
}

fn invalid_state(entry: &AssetEntry, operation: &'static str) -> AppError {
    AppError::InvalidState {
        asset: entry.id.to_string(),
        phase: entry.lifecycle.phase(),
        operation,
    }
}

/// Report the asset's temperatures, initializing it on first contact.
///
/// An uninitialized asset gets its buffer set to the configured initial
/// temperature and its house solved to equilibrium against the configured
/// indoor set point, nominal heat pump power and the current forecast.
pub fn send_temperatures(
    registry: &mut AssetStateRegistry,
    asset_id: &str,
    forecast: &Forecast,
) -> AppResult<AssetOutputs> {
    let entry = registry.get_mut(asset_id)?;

    match &entry.lifecycle {
        AssetLifecycle::Initialized(state) => Ok(AssetOutputs::from_state(state)),
        AssetLifecycle::Failed(_) => Err(invalid_state(entry, "send temperatures")),
        AssetLifecycle::Uninitialized => {
            let forcing = forecast.current()?;
            let equilibrium = entry.house.initialize(
                entry.initial.house_temp,
                entry.initial.nominal_heat,
                &forcing,
            )?;
            if equilibrium.is_clamped() {
                warn!(
                    asset = %entry.id,
                    required_heat_w = equilibrium.required_heat_to_house,
                    nominal_heat_w = entry.initial.nominal_heat,
                    t_in_k = equilibrium.state.indoor(),
                    "heat pump cannot hold the initial set point"
                );
            }
            let buffer = entry.buffer.initialize(entry.initial.buffer_temp)?;
            let state = ThermalState {
                house: equilibrium.state,
                buffer,
            };
            entry.lifecycle.advance(state)?;
            info!(
                asset = %entry.id,
                buffer_k = state.buffer.temperature,
                t_in_k = state.house.indoor(),
                t_out_k = state.house.envelope(),
                "asset initialized"
            );
            Ok(AssetOutputs::from_state(&state))
        }
    }
}

/// Advance one control interval and persist the result.
///
/// The buffer feeds the house: it loses `heat_to_house_w` and gains
/// `heat_to_buffer_w`. A domain violation fails the asset for good.
pub fn update_temperatures(
    registry: &mut AssetStateRegistry,
    asset_id: &str,
    forecast: &Forecast,
    allocation: HeatAllocation,
    simulation_time: DateTime<Utc>,
    sink: &mut dyn TimeseriesSink,
) -> AppResult<AssetOutputs> {
    let dt = registry.control_interval_s();
    let entry = registry.get_mut(asset_id)?;

    let state = match &entry.lifecycle {
        AssetLifecycle::Initialized(state) => *state,
        _ => return Err(invalid_state(entry, "update temperatures")),
    };

    let forcing = forecast.current()?;
    let house = entry
        .house
        .step(&state.house, dt, &forcing, allocation.heat_to_house_w)?;
    let buffer = entry.buffer.step(
        &state.buffer,
        dt,
        allocation.heat_to_house_w,
        allocation.heat_to_buffer_w,
    )?;

    let guarded = match entry.guard.apply(buffer, house) {
        Ok(guarded) => guarded,
        Err(err) => {
            warn!(asset = %entry.id, error = %err, "asset failed");
            entry.lifecycle.fail(err.clone());
            return Err(err.into());
        }
    };

    let next = ThermalState {
        house: guarded.house,
        buffer: guarded.buffer,
    };
    entry.lifecycle.advance(next)?;
    debug!(
        asset = %entry.id,
        time = %simulation_time,
        heat_to_buffer_w = allocation.heat_to_buffer_w,
        heat_to_house_w = allocation.heat_to_house_w,
        buffer_k = next.buffer.temperature,
        t_in_k = next.house.indoor(),
        "asset updated"
    );

    sink.write(MetricRecord::new(
        asset_id,
        metric::BUFFER_TEMPERATURE,
        simulation_time,
        next.buffer.temperature,
    ))?;
    sink.write(MetricRecord::new(
        asset_id,
        metric::HOUSE_TEMPERATURE,
        simulation_time,
        next.house.indoor(),
    ))?;

    Ok(AssetOutputs::from_state(&next))
}
