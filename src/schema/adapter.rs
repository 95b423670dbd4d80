//! Batch parsing of metric payloads
//!
//! Handles the shapes metrics arrive in outside a live collector: JSON
//! arrays (the read endpoint's output), NDJSON logs, and analysis requests.

use crate::error::{FormFixError, ValidationError};
use crate::schema::payload::MetricPayload;
use crate::types::FrictionEvent;
use serde::{Deserialize, Serialize};

/// Body of an analysis request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, rename = "formId", skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricPayload>,
}

/// Result of validating one payload in a batch
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub field: Option<String>,
    pub error: ValidationError,
}

/// Adapter for converting raw payload batches into events
pub struct MetricAdapter;

impl MetricAdapter {
    /// Parse a JSON array of payloads
    pub fn parse_array(json: &str) -> Result<Vec<MetricPayload>, FormFixError> {
        let payloads: Vec<MetricPayload> = serde_json::from_str(json)?;
        Ok(payloads)
    }

    /// Parse newline-delimited payloads, skipping blank lines
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<MetricPayload>, FormFixError> {
        let mut payloads = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<MetricPayload>(trimmed) {
                Ok(payload) => payloads.push(payload),
                Err(e) => {
                    return Err(FormFixError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(payloads)
    }

    /// Parse an analysis request body
    pub fn parse_request(json: &str) -> Result<AnalysisRequest, FormFixError> {
        let request: AnalysisRequest = serde_json::from_str(json)?;
        Ok(request)
    }

    /// Validation failures in a batch (valid payloads are omitted)
    pub fn validate_payloads(payloads: &[MetricPayload]) -> Vec<ValidationResult> {
        payloads
            .iter()
            .enumerate()
            .filter_map(|(index, payload)| {
                payload.validate().err().map(|error| ValidationResult {
                    index,
                    field: payload.field.clone(),
                    error,
                })
            })
            .collect()
    }

    /// Convert payloads to events for analysis, dropping invalid entries.
    ///
    /// Returns the events in input order and the number of entries dropped.
    pub fn to_events(payloads: Vec<MetricPayload>) -> (Vec<FrictionEvent>, usize) {
        let total = payloads.len();
        let events: Vec<FrictionEvent> = payloads
            .into_iter()
            .enumerate()
            .filter_map(|(index, payload)| {
                let fallback_ts = payload.received_ts().unwrap_or(0);
                match payload.into_event(fallback_ts) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        log::debug!("Skipping metric {} in analysis input: {}", index, e);
                        None
                    }
                }
            })
            .collect();
        let skipped = total - events.len();
        (events, skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;

    #[test]
    fn test_parse_ndjson_skips_blank_lines() {
        let input = r#"{"type":"field_focus","field":"Email","data":{"focusCount":1}}

{"type":"field_blur","field":"Email"}
"#;
        let payloads = MetricAdapter::parse_ndjson(input).unwrap();
        assert_eq!(payloads.len(), 2);
    }

    #[test]
    fn test_parse_ndjson_reports_line_number() {
        let input = "{\"type\":\"paste\",\"field\":\"A\"}\nnot json\n";
        let err = MetricAdapter::parse_ndjson(input).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_request_and_convert() {
        let request = MetricAdapter::parse_request(
            r#"{
                "formId": "signup",
                "metrics": [
                    { "sessionId": "s1", "type": "field_focus", "field": "Email", "ts": 10 },
                    { "sessionId": "s1", "type": "bogus", "field": "Email", "ts": 11 },
                    { "sessionId": "s1", "field": "Email", "ts": 12 },
                    { "sessionId": "s1", "type": "form_submit", "field": "signup", "receivedAt": 99 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(request.form_id.as_deref(), Some("signup"));

        let (events, skipped) = MetricAdapter::to_events(request.metrics);
        assert_eq!(skipped, 2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, EventType::FormSubmit);
        assert_eq!(events[1].emitted_at, 99);
        assert_eq!(events[1].received_at, Some(99));
    }

    #[test]
    fn test_validate_payloads_lists_failures() {
        let payloads = MetricAdapter::parse_array(
            r#"[
                { "type": "paste", "field": "Email" },
                { "type": "paste" },
                { "field": "Name" }
            ]"#,
        )
        .unwrap();

        let failures = MetricAdapter::validate_payloads(&payloads);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[1].field.as_deref(), Some("Name"));
        assert_eq!(failures[1].error, ValidationError::MissingField("type"));
    }
}
