//! Scenario execution and caching service.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use hp_project::{Project, Scenario};
use hp_results::{MemorySink, MetricRecord, RunManifest, RunStore, TimeseriesSink};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::forcing::{Forecast, HeatAllocation};
use crate::project_service;
use crate::registry::AssetStateRegistry;
use crate::service::{self, AssetOutputs};

/// Kernel version folded into run ids so a new kernel never reuses old runs.
pub const KERNEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running scenarios.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub kernel_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            kernel_version: KERNEL_VERSION.to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub scenario_path: &'a Path,
    pub options: RunOptions,
}

/// Progress after each completed control interval.
#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub step: usize,
    pub total_steps: usize,
    pub simulation_time: DateTime<Utc>,
    pub elapsed_wall_s: f64,
}

impl RunProgressEvent {
    pub fn fraction_complete(&self) -> f64 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.step as f64 / self.total_steps as f64
        }
    }
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub total_time_s: f64,
}

/// Outcome of driving every asset through a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub steps: usize,
    /// Outputs after the last interval, keyed by asset id.
    pub final_outputs: BTreeMap<String, AssetOutputs>,
}

/// Timestamp of interval `k`: `start + k * control_interval_s`.
///
/// Offsets that leave the representable calendar range are `InvalidInput`.
pub fn interval_time(
    start: DateTime<Utc>,
    k: usize,
    control_interval_s: f64,
) -> AppResult<DateTime<Utc>> {
    let offset_ms = (k as f64 * control_interval_s * 1000.0).round();
    let out_of_range = || {
        AppError::InvalidInput(format!(
            "interval {k} at {control_interval_s} s from {start} is out of range"
        ))
    };
    if !(offset_ms.is_finite() && offset_ms.abs() < i64::MAX as f64) {
        return Err(out_of_range());
    }
    Duration::try_milliseconds(offset_ms as i64)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or_else(out_of_range)
}

/// Drive every asset of `project` through `scenario`.
///
/// Each interval, every asset first publishes its temperatures (initializing
/// on the first interval) and is then advanced with its allocation. Assets
/// without an allocation receive no heat. The first error ends the run.
pub fn run_scenario(
    project: &Project,
    scenario: &Scenario,
    sink: &mut dyn TimeseriesSink,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<ScenarioOutcome> {
    hp_project::validate_scenario(project, scenario)?;
    let started = Instant::now();
    let mut registry = AssetStateRegistry::from_project(project)?;
    let asset_ids = registry.ids();
    let total_steps = scenario.intervals.len();
    let mut final_outputs = BTreeMap::new();

    for (k, interval) in scenario.intervals.iter().enumerate() {
        let simulation_time = interval_time(scenario.start, k, project.control_interval_s)?;
        let forecast = Forecast::from(&interval.forecast);

        for asset_id in &asset_ids {
            service::send_temperatures(&mut registry, asset_id, &forecast)?;
            let allocation = interval
                .allocations
                .get(asset_id)
                .copied()
                .map(HeatAllocation::from)
                .unwrap_or_default();
            let outputs = service::update_temperatures(
                &mut registry,
                asset_id,
                &forecast,
                allocation,
                simulation_time,
                sink,
            )?;
            final_outputs.insert(asset_id.clone(), outputs);
        }

        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(RunProgressEvent {
                step: k + 1,
                total_steps,
                simulation_time,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
            });
        }
    }

    Ok(ScenarioOutcome {
        steps: total_steps,
        final_outputs,
    })
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and report progress per interval.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let project = project_service::load_project(request.project_path)?;
    let scenario = project_service::load_scenario(request.scenario_path, &project)?;

    let run_id = hp_results::compute_run_id(&project, &scenario, &request.options.kernel_version);
    let store = RunStore::for_project(request.project_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        let manifest = store.load_manifest(&run_id)?;
        info!(run_id = %run_id, "loaded cached run");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            total_time_s: started.elapsed().as_secs_f64(),
        });
    }

    let mut sink = MemorySink::new();
    let outcome = run_scenario(&project, &scenario, &mut sink, progress_cb)?;

    let manifest = RunManifest {
        run_id: run_id.clone(),
        project_name: project.name.clone(),
        timestamp: Utc::now().to_rfc3339(),
        control_interval_s: project.control_interval_s,
        steps: outcome.steps,
        asset_ids: project.assets.iter().map(|a| a.id.clone()).collect(),
    };
    store.save_run(&manifest, sink.records())?;
    info!(
        run_id = %run_id,
        steps = outcome.steps,
        records = sink.len(),
        "run saved"
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        total_time_s: started.elapsed().as_secs_f64(),
    })
}

/// List cached runs for a project, most recent first.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let project = project_service::load_project(project_path)?;
    let store = RunStore::for_project(project_path)?;

    let mut runs = store.list_runs(&project.name)?;
    runs.reverse();
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(project_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<MetricRecord>)> {
    let store = RunStore::for_project(project_path)?;
    if !store.has_run(run_id) {
        return Err(AppError::RunNotFound(run_id.to_string()));
    }

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, records))
}
