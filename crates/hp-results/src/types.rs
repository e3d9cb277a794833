//! Result data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric names written for every asset each interval.
pub mod metric {
    pub const BUFFER_TEMPERATURE: &str = "buffer_temperature";
    pub const HOUSE_TEMPERATURE: &str = "house_temperature";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: String,
    pub project_name: String,
    pub timestamp: String,
    pub control_interval_s: f64,
    pub steps: usize,
    pub asset_ids: Vec<String>,
}

/// One scalar sample for one asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    pub asset_id: String,
    pub metric: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl MetricRecord {
    pub fn new(
        asset_id: impl Into<String>,
        metric: impl Into<String>,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            metric: metric.into(),
            timestamp,
            value,
        }
    }
}

/// Pick out one asset's metric, in record order.
pub fn select_series<'a>(
    records: &'a [MetricRecord],
    asset_id: &'a str,
    metric: &'a str,
) -> impl Iterator<Item = (DateTime<Utc>, f64)> + 'a {
    records
        .iter()
        .filter(move |r| r.asset_id == asset_id && r.metric == metric)
        .map(|r| (r.timestamp, r.value))
}
