use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{EvalError, Result},
    types::MetricRecord,
};

/// Label under which an (image, step) evaluation is stored
pub fn metric_label(image: &str, step: u32) -> String {
    format!("{image}_{step}")
}

/// Metric records of a run, keyed by `"{image}_{step}"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResults {
    records: BTreeMap<String, MetricRecord>,
}

impl EvaluationResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: &str, step: u32, record: MetricRecord) {
        self.records.insert(metric_label(image, step), record);
    }

    pub fn get(&self, image: &str, step: u32) -> Result<&MetricRecord> {
        let label = metric_label(image, step);
        self.records
            .get(&label)
            .ok_or(EvalError::MissingMetric { label })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricRecord)> {
        self.records.iter().map(|(label, record)| (label.as_str(), record))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Write every record as a JSON object keyed by label
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(recall: f64) -> MetricRecord {
        MetricRecord {
            boundary_recall: recall,
            mean_distance: 1.5,
            median_distance: 1.0,
            boundary_pixels: 4,
            hits: 2,
        }
    }

    #[test]
    fn test_lookup_by_image_and_step() {
        let mut results = EvaluationResults::new();
        results.insert("tiger", 10, record(0.5));

        assert_eq!(results.get("tiger", 10).expect("Should be present").boundary_recall, 0.5);
        assert!(matches!(
            results.get("tiger", 15),
            Err(EvalError::MissingMetric { label }) if label == "tiger_15"
        ));
    }

    #[test]
    fn test_json_summary_is_keyed_by_label() {
        let mut results = EvaluationResults::new();
        results.insert("fish", 5, record(0.25));

        let json: serde_json::Value =
            serde_json::from_str(&results.to_json().expect("Should serialize")).expect("Should parse");
        assert_eq!(json["fish_5"]["boundary_recall"], 0.25);
        assert_eq!(json["fish_5"]["hits"], 2);
    }
}
