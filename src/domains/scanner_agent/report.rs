use crate::domains::warehouse::{ObservationBatch, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body posted to the data-ingestion endpoint once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(rename = "RobotId")]
    pub robot_id: String,
    pub timestamp: String,
    pub location: Position,
    pub scan_results: ObservationBatch,
    pub battery_level: f64,
    pub next_checkpoint: String,
}

/// ISO-8601 UTC with microseconds and a literal `Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
