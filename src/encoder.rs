//! Insight report encoding
//!
//! Wraps computed insights with producer metadata so offline runs can be
//! archived and compared.

use crate::analysis::Insights;
use crate::error::AnalysisError;
use crate::{FORMFIX_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report format version
pub const REPORT_VERSION: &str = "1.0.0";

/// Who produced a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Insights plus the metadata needed to interpret them later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub report_version: String,
    pub producer: ReportProducer,
    /// RFC 3339
    pub computed_at_utc: String,
    pub event_count: usize,
    /// Input entries dropped by validation
    pub skipped_events: usize,
    pub insights: Insights,
}

/// Encoder producing [`InsightReport`]s
pub struct InsightEncoder {
    instance_id: String,
}

impl Default for InsightEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(&self, insights: Insights, event_count: usize, skipped_events: usize) -> InsightReport {
        InsightReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: FORMFIX_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            event_count,
            skipped_events,
            insights,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        insights: Insights,
        event_count: usize,
        skipped_events: usize,
    ) -> Result<String, AnalysisError> {
        let report = self.encode(insights, event_count, skipped_events);
        serde_json::to_string_pretty(&report).map_err(|e| AnalysisError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::generate_insights;
    use crate::config::AnalysisConfig;

    #[test]
    fn test_encode_metadata() {
        let encoder = InsightEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(generate_insights(&[], &AnalysisConfig::default()), 0, 2);

        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, FORMFIX_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.skipped_events, 2);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.computed_at_utc).is_ok());
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = InsightEncoder::new();
        let json = encoder
            .encode_to_json(generate_insights(&[], &AnalysisConfig::default()), 0, 0)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["reportVersion"], REPORT_VERSION);
        assert_eq!(value["producer"]["instanceId"], encoder.instance_id());
        assert_eq!(value["insights"]["frictionScore"], "Low");
        assert_eq!(value["eventCount"], 0);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(InsightEncoder::new().instance_id(), InsightEncoder::new().instance_id());
    }
}
