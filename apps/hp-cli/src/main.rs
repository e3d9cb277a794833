use clap::{Parser, Subcommand};
use hp_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, project_service, query, run_service,
};
use hp_core::to_celsius;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use uom::si::energy::kilowatt_hour;

#[derive(Parser)]
#[command(name = "hp-cli")]
#[command(about = "HeatFlow CLI - hybrid heat pump thermal simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and build every asset's models
    Validate {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
    },
    /// List assets in a project
    Assets {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
    },
    /// Run a scenario against a project
    Run {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Initialize one asset against a constant forecast and print its temperatures as JSON
    Init {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
        /// Asset ID
        asset_id: String,
        /// Outdoor air temperature [K]
        #[arg(long)]
        air: f64,
        /// Soil temperature [K]
        #[arg(long)]
        soil: f64,
        /// Solar irradiance [W/m²]
        #[arg(long, default_value_t = 0.0)]
        solar: f64,
    },
    /// List cached runs for a project
    Runs {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export time series data from a run
    ExportSeries {
        /// Path to the project YAML/JSON file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Asset ID
        asset_id: String,
        /// Metric name (buffer_temperature, house_temperature)
        metric: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Assets { project_path } => cmd_assets(&project_path),
        Commands::Run {
            project_path,
            scenario_path,
            no_cache,
        } => cmd_run(&project_path, &scenario_path, !no_cache),
        Commands::Init {
            project_path,
            asset_id,
            air,
            soil,
            solar,
        } => cmd_init(&project_path, &asset_id, air, soil, solar),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportSeries {
            project_path,
            run_id,
            asset_id,
            metric,
            output,
        } => cmd_export_series(
            &project_path,
            &run_id,
            &asset_id,
            &metric,
            output.as_deref(),
        ),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid ({} assets)", project.assets.len());
    Ok(())
}

fn cmd_assets(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let assets = project_service::list_assets(&project)?;

    if assets.is_empty() {
        println!("No assets found in project");
        return Ok(());
    }

    println!("Assets in project '{}':", project.name);
    for asset in assets {
        println!("  {} - {}", asset.id, asset.name);
        println!(
            "    heat pump: {:.0} W, buffer {:.3e} J/K",
            asset.nominal_heat_w, asset.buffer_capacitance
        );
        println!(
            "    buffer range: {:.1} .. {:.1} °C, house floor: {:.1} °C",
            to_celsius(asset.bounds.buffer_min),
            to_celsius(asset.bounds.buffer_max),
            to_celsius(asset.bounds.house_min)
        );
        println!(
            "    time constants: indoor {:.2} h, envelope {:.2} h",
            asset.time_constants_s[0] / 3600.0,
            asset.time_constants_s[1] / 3600.0
        );
    }
    Ok(())
}

fn cmd_run(project_path: &Path, scenario_path: &Path, use_cache: bool) -> AppResult<()> {
    println!("Running scenario: {}", scenario_path.display());

    let request = RunRequest {
        project_path,
        scenario_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            if event.step == event.total_steps || last_emit.elapsed().as_millis() >= 100 {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();
    tracing::debug!(
        run_id = %response.run_id,
        cached = response.loaded_from_cache,
        "run finished"
    );

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Scenario completed: {}", response.run_id);
    }
    println!("  Steps: {}", response.manifest.steps);
    println!("  Total: {:.3}s", response.total_time_s);

    let project = project_service::load_project(project_path)?;
    let scenario = project_service::load_scenario(scenario_path, &project)?;
    let heat = query::scheduled_heat(&scenario, project.control_interval_s);
    if !heat.is_empty() {
        println!("\nScheduled heat:");
        for (asset_id, totals) in heat {
            println!(
                "  {}: {:.2} kWh to buffer, {:.2} kWh to house",
                asset_id,
                totals.to_buffer.get::<kilowatt_hour>(),
                totals.to_house.get::<kilowatt_hour>()
            );
        }
    }

    Ok(())
}

fn cmd_init(
    project_path: &Path,
    asset_id: &str,
    air: f64,
    soil: f64,
    solar: f64,
) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let mut registry = hp_app::AssetStateRegistry::from_project(&project)?;
    let outputs = hp_app::send_temperatures(
        &mut registry,
        asset_id,
        &hp_app::Forecast::constant(air, soil, solar),
    )?;

    let json = serde_json::to_string_pretty(&outputs)
        .map_err(|e| hp_app::AppError::InvalidInput(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  step={}/{}  t={}  elapsed={:.1}s",
        bar,
        fraction * 100.0,
        event.step,
        event.total_steps,
        event.simulation_time.format("%Y-%m-%d %H:%M"),
        event.elapsed_wall_s
    );
    let _ = io::stdout().flush();
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(project_path)?;

    if runs.is_empty() {
        println!("No cached runs found for project: {}", project_path.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} steps)",
                manifest.run_id, manifest.timestamp, manifest.steps
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(project_path, run_id)?;
    let summary = query::get_run_summary(&records)?;

    println!("\nRun Summary:");
    println!("  Project: {}", manifest.project_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Control interval: {} s", manifest.control_interval_s);
    println!("  Records: {}", summary.record_count);
    println!(
        "  Time range: {} - {}",
        summary.time_range.0.to_rfc3339(),
        summary.time_range.1.to_rfc3339()
    );
    println!("  Assets: {}", summary.asset_count);

    println!("\nFinal values:");
    for ((asset_id, metric), value) in query::final_values(&records) {
        println!("  {} {}: {:.2} °C", asset_id, metric, to_celsius(value));
    }

    Ok(())
}

fn cmd_export_series(
    project_path: &Path,
    run_id: &str,
    asset_id: &str,
    metric: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(project_path, run_id)?;
    let series = query::extract_series(&records, asset_id, metric)?;

    let mut csv = String::from("timestamp,value_k\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t.to_rfc3339(), val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
