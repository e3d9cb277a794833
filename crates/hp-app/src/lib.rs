//! Shared application service layer for heatflow.
//!
//! Owns the per-asset registry and the per-interval exchange with the
//! thermal kernel, plus project loading, scenario runs and result queries
//! for the CLI.

pub mod error;
pub mod forcing;
pub mod project_service;
pub mod query;
pub mod registry;
pub mod run_service;
pub mod service;

pub use error::{AppError, AppResult};
pub use forcing::{Forecast, HeatAllocation};
pub use project_service::{AssetSummary, get_asset, list_assets, load_project, load_scenario};
pub use query::{
    RunSummary, ScheduledHeat, extract_series, final_values, get_run_summary, list_asset_ids,
    scheduled_heat,
};
pub use registry::{AssetEntry, AssetStateRegistry, InitialConditions};
pub use run_service::{
    KERNEL_VERSION, RunOptions, RunProgressEvent, RunRequest, RunResponse, ScenarioOutcome,
    ensure_run, ensure_run_with_progress, list_runs, load_run, run_scenario,
};
pub use service::{AssetOutputs, send_temperatures, update_temperatures};
