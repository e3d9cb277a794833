//! Project and scenario loading, validation and introspection.

use std::path::Path;

use hp_core::Vec2;
use hp_project::{AssetDef, Project, ProjectError, Scenario};
use hp_thermal::OperatingBounds;

use crate::error::{AppError, AppResult};
use crate::registry::{build_house_model, operating_bounds};

/// Summary of an asset for listing.
#[derive(Debug, Clone)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    pub nominal_heat_w: f64,
    pub buffer_capacitance: f64,
    pub bounds: OperatingBounds,
    /// `[indoor, envelope]` [s]
    pub time_constants_s: Vec2,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn map_load_error(path: &Path, err: ProjectError) -> AppError {
    match err {
        ProjectError::Io(source) => AppError::ProjectFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    }
}

/// Load a project from YAML, or JSON when the extension says so.
pub fn load_project(path: &Path) -> AppResult<Project> {
    let loaded = if is_json(path) {
        hp_project::load_json(path)
    } else {
        hp_project::load_yaml(path)
    };
    loaded.map_err(|e| map_load_error(path, e))
}

/// Load a scenario and check it against `project`.
pub fn load_scenario(path: &Path, project: &Project) -> AppResult<Scenario> {
    let loaded = if is_json(path) {
        hp_project::load_scenario_json(path, project)
    } else {
        hp_project::load_scenario_yaml(path, project)
    };
    loaded.map_err(|e| map_load_error(path, e))
}

/// Schema validation plus construction of every asset's kernel models.
pub fn validate_project(project: &Project) -> AppResult<()> {
    hp_project::validate_project(project)?;
    if project.assets.is_empty() {
        return Err(AppError::Validation(
            "Project must have at least one asset".to_string(),
        ));
    }
    list_assets(project).map(|_| ())
}

pub fn list_assets(project: &Project) -> AppResult<Vec<AssetSummary>> {
    project
        .assets
        .iter()
        .map(|asset| {
            let house = build_house_model(&asset.building)?;
            Ok(AssetSummary {
                id: asset.id.clone(),
                name: asset.name.clone(),
                nominal_heat_w: asset.heat_pump.thermal_power_w,
                buffer_capacitance: asset.heat_pump.buffer_capacitance,
                bounds: operating_bounds(&asset.heat_pump),
                time_constants_s: house.time_constants(),
            })
        })
        .collect()
}

pub fn get_asset<'a>(project: &'a Project, asset_id: &str) -> AppResult<&'a AssetDef> {
    project
        .asset(asset_id)
        .ok_or_else(|| AppError::AssetNotFound(asset_id.to_string()))
}
