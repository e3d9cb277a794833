//! Where per-interval asset outputs go.

use crate::ResultsResult;
use crate::types::MetricRecord;

pub trait TimeseriesSink {
    fn write(&mut self, record: MetricRecord) -> ResultsResult<()>;
}

/// Collects records in memory; used by runs before they are saved, and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<MetricRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TimeseriesSink for MemorySink {
    fn write(&mut self, record: MetricRecord) -> ResultsResult<()> {
        self.records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
        sink.write(MetricRecord::new("a", "buffer_temperature", t0, 320.0))
            .unwrap();
        sink.write(MetricRecord::new("a", "house_temperature", t0, 293.0))
            .unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[1].metric, "house_temperature");
    }
}
