//! Project and scenario validation.
//!
//! Physical positivity of capacities and resistances is not checked here; the
//! thermal kernel rejects those when the models are built.

use crate::scenario::Scenario;
use crate::schema::{AssetDef, Project};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: String, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if !project.control_interval_s.is_finite() || project.control_interval_s <= 0.0 {
        return Err(invalid(
            "control_interval_s".to_string(),
            project.control_interval_s,
            "must be positive and finite",
        ));
    }

    let mut asset_ids = HashSet::new();
    for asset in &project.assets {
        if asset.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "asset id".to_string(),
                value: asset.id.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if !asset_ids.insert(&asset.id) {
            return Err(ValidationError::DuplicateId {
                id: asset.id.clone(),
                context: "assets".to_string(),
            });
        }
        validate_asset(asset)?;
    }

    Ok(())
}

fn validate_asset(asset: &AssetDef) -> Result<(), ValidationError> {
    let b = &asset.building;
    let hp = &asset.heat_pump;

    for (name, v) in [
        ("building.c_in", b.c_in),
        ("building.c_out", b.c_out),
        ("building.r_exch", b.r_exch),
        ("building.r_floor", b.r_floor),
        ("building.r_vent", b.r_vent),
        ("building.r_cond", b.r_cond),
        ("building.window_area_m2", b.window_area_m2),
        ("heat_pump.thermal_power_w", hp.thermal_power_w),
        ("heat_pump.buffer_capacitance", hp.buffer_capacitance),
        ("heat_pump.buffer_temp_0", hp.buffer_temp_0),
        ("heat_pump.house_temp_0", hp.house_temp_0),
        ("heat_pump.buffer_temp_min", hp.buffer_temp_min),
        ("heat_pump.buffer_temp_max", hp.buffer_temp_max),
        ("heat_pump.house_temp_min", hp.house_temp_min),
    ] {
        if !v.is_finite() {
            return Err(invalid(
                format!("asset '{}' {}", asset.id, name),
                v,
                "must be finite",
            ));
        }
    }

    if hp.thermal_power_w < 0.0 {
        return Err(invalid(
            format!("asset '{}' heat_pump.thermal_power_w", asset.id),
            hp.thermal_power_w,
            "must be non-negative",
        ));
    }
    if hp.buffer_temp_min >= hp.buffer_temp_max {
        return Err(invalid(
            format!("asset '{}' heat_pump.buffer_temp_min", asset.id),
            hp.buffer_temp_min,
            "must be below buffer_temp_max",
        ));
    }

    Ok(())
}

/// Check a scenario against the project it drives.
pub fn validate_scenario(project: &Project, scenario: &Scenario) -> Result<(), ValidationError> {
    for (k, interval) in scenario.intervals.iter().enumerate() {
        let f = &interval.forecast;
        for (name, series) in [
            ("solar_irradiance", &f.solar_irradiance),
            ("air_temperature", &f.air_temperature),
            ("soil_temperature", &f.soil_temperature),
        ] {
            let Some(&current) = series.first() else {
                return Err(ValidationError::InvalidValue {
                    field: format!("interval {k} forecast.{name}"),
                    value: "[]".to_string(),
                    reason: "needs at least the current instant".to_string(),
                });
            };
            if !current.is_finite() {
                return Err(invalid(
                    format!("interval {k} forecast.{name}[0]"),
                    current,
                    "must be finite",
                ));
            }
        }

        for (asset_id, alloc) in &interval.allocations {
            if project.asset(asset_id).is_none() {
                return Err(ValidationError::MissingReference {
                    id: asset_id.clone(),
                    context: format!("interval {k} allocations"),
                });
            }
            for (name, v) in [
                ("heat_to_buffer_w", alloc.heat_to_buffer_w),
                ("heat_to_house_w", alloc.heat_to_house_w),
            ] {
                if !v.is_finite() {
                    return Err(invalid(
                        format!("interval {k} allocation '{asset_id}' {name}"),
                        v,
                        "must be finite",
                    ));
                }
            }
        }
    }
    Ok(())
}
