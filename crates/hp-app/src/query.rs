//! Query helpers for loaded runs and scenarios.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hp_core::{Energy, energy_over, s, w};
use hp_project::Scenario;
use hp_results::{MetricRecord, metric, select_series};
use uom::si::energy::joule;

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and data.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (DateTime<Utc>, DateTime<Utc>),
    pub record_count: usize,
    pub asset_count: usize,
}

pub fn get_run_summary(records: &[MetricRecord]) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (
        records.iter().map(|r| r.timestamp).min(),
        records.iter().map(|r| r.timestamp).max(),
    ) else {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    };

    Ok(RunSummary {
        time_range: (first, last),
        record_count: records.len(),
        asset_count: list_asset_ids(records).len(),
    })
}

/// Asset ids present in a run, sorted.
pub fn list_asset_ids(records: &[MetricRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.asset_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn extract_series(
    records: &[MetricRecord],
    asset_id: &str,
    metric_name: &str,
) -> AppResult<Vec<(DateTime<Utc>, f64)>> {
    let metric_name = match metric_name {
        "buffer" | metric::BUFFER_TEMPERATURE => metric::BUFFER_TEMPERATURE,
        "house" | "indoor" | metric::HOUSE_TEMPERATURE => metric::HOUSE_TEMPERATURE,
        other => {
            return Err(AppError::InvalidInput(format!("Unknown metric: {}", other)));
        }
    };

    let series: Vec<_> = select_series(records, asset_id, metric_name).collect();
    if series.is_empty() {
        return Err(AppError::AssetNotFound(asset_id.to_string()));
    }
    Ok(series)
}

/// Last value of every (asset, metric) pair.
pub fn final_values(records: &[MetricRecord]) -> BTreeMap<(String, String), f64> {
    let mut last = BTreeMap::new();
    for record in records {
        last.insert((record.asset_id.clone(), record.metric.clone()), record.value);
    }
    last
}

/// Heat scheduled by a scenario, per asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledHeat {
    pub to_buffer: Energy,
    pub to_house: Energy,
}

pub fn scheduled_heat(
    scenario: &Scenario,
    control_interval_s: f64,
) -> BTreeMap<String, ScheduledHeat> {
    let interval = s(control_interval_s);
    let mut totals: BTreeMap<String, ScheduledHeat> = BTreeMap::new();
    for step in &scenario.intervals {
        for (asset_id, alloc) in &step.allocations {
            let entry = totals.entry(asset_id.clone()).or_insert(ScheduledHeat {
                to_buffer: Energy::new::<joule>(0.0),
                to_house: Energy::new::<joule>(0.0),
            });
            entry.to_buffer += energy_over(w(alloc.heat_to_buffer_w), interval);
            entry.to_house += energy_over(w(alloc.heat_to_house_w), interval);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hp_project::{AllocationDef, ForecastDef, IntervalDef};
    use uom::si::energy::kilowatt_hour;

    fn records() -> Vec<MetricRecord> {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
        let t1 = t0 + Duration::seconds(900);
        vec![
            MetricRecord::new("b", metric::BUFFER_TEMPERATURE, t0, 320.0),
            MetricRecord::new("b", metric::HOUSE_TEMPERATURE, t0, 293.0),
            MetricRecord::new("a", metric::BUFFER_TEMPERATURE, t0, 330.0),
            MetricRecord::new("a", metric::HOUSE_TEMPERATURE, t0, 294.0),
            MetricRecord::new("b", metric::BUFFER_TEMPERATURE, t1, 319.0),
            MetricRecord::new("b", metric::HOUSE_TEMPERATURE, t1, 292.5),
        ]
    }

    #[test]
    fn summary_and_ids() {
        let recs = records();
        let summary = get_run_summary(&recs).unwrap();
        assert_eq!(summary.record_count, 6);
        assert_eq!(summary.asset_count, 2);
        assert_eq!(
            (summary.time_range.1 - summary.time_range.0).num_seconds(),
            900
        );
        assert_eq!(list_asset_ids(&recs), vec!["a".to_string(), "b".to_string()]);
        assert!(get_run_summary(&[]).is_err());
    }

    #[test]
    fn series_by_alias() {
        let recs = records();
        let house = extract_series(&recs, "b", "indoor").unwrap();
        assert_eq!(house.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![293.0, 292.5]);
        assert!(extract_series(&recs, "b", "pressure").is_err());
        assert!(extract_series(&recs, "zz", "buffer").is_err());
    }

    #[test]
    fn final_values_take_latest() {
        let last = final_values(&records());
        assert_eq!(
            last[&("b".to_string(), metric::HOUSE_TEMPERATURE.to_string())],
            292.5
        );
    }

    #[test]
    fn scheduled_heat_sums_intervals() {
        let forecast = ForecastDef {
            solar_irradiance: vec![0.0],
            air_temperature: vec![280.0],
            soil_temperature: vec![285.0],
        };
        let alloc = AllocationDef {
            heat_to_buffer_w: 2000.0,
            heat_to_house_w: 4000.0,
        };
        let interval = IntervalDef {
            forecast,
            allocations: [("a".to_string(), alloc)].into_iter().collect(),
        };
        let scenario = Scenario {
            start: Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap(),
            intervals: vec![interval.clone(), interval],
        };

        let totals = scheduled_heat(&scenario, 900.0);
        let a = totals["a"];
        assert!((a.to_house.get::<kilowatt_hour>() - 2.0).abs() < 1e-12);
        assert!((a.to_buffer.get::<kilowatt_hour>() - 1.0).abs() < 1e-12);
    }
}
