//! Content-based hashing for run IDs.

use hp_project::{Project, Scenario};
use sha2::{Digest, Sha256};

pub fn compute_run_id(project: &Project, scenario: &Scenario, kernel_version: &str) -> String {
    let mut hasher = Sha256::new();

    let project_json = serde_json::to_string(project).unwrap_or_default();
    hasher.update(project_json.as_bytes());

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    hasher.update(kernel_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
