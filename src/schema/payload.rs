//! Ingestion payload schema
//!
//! Payloads arrive from untrusted producers, so every key is optional at the
//! parsing stage; [`MetricPayload::into_event`] decides what is acceptable.
//! Only `type` and `field` can cause a rejection. The remaining keys are kept
//! as raw JSON and coerced, with values of the wrong shape replaced by their
//! defaults.

use crate::error::ValidationError;
use crate::types::{DataValue, EventData, EventType, FrictionEvent, UNKNOWN};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current wire schema identifier
pub const SCHEMA_VERSION: &str = "formfix.metric.v1";

/// Body returned for rejected payloads
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid metric payload";

/// Body returned when an accepted payload could not be stored
pub const STORE_FAILURE_MESSAGE: &str = "Failed to store metric";

/// One metric as posted by a capture client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPayload {
    /// String or number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Value>,
    /// String or number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Object of scalars; any other shape is treated as empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Client capture time, epoch milliseconds as a number or numeric string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<Value>,
    /// Present on events read back from a store; ignored at ingestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<Value>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl MetricPayload {
    /// Check the payload without converting it
    pub fn validate(&self) -> Result<EventType, ValidationError> {
        let event_type = present(&self.event_type).ok_or(ValidationError::MissingField("type"))?;
        present(&self.field).ok_or(ValidationError::MissingField("field"))?;
        event_type
            .parse::<EventType>()
            .map_err(ValidationError::UnknownType)
    }

    /// Capture time, if `ts` holds a usable number
    pub fn emitted_ts(&self) -> Option<i64> {
        self.ts.as_ref().and_then(|v| coerce_timestamp("ts", v))
    }

    /// Receipt time, if `receivedAt` holds a usable number
    pub fn received_ts(&self) -> Option<i64> {
        self.received_at
            .as_ref()
            .and_then(|v| coerce_timestamp("receivedAt", v))
    }

    /// Convert into an event; a missing `ts` falls back to `default_ts`.
    ///
    /// The returned event carries whatever `receivedAt` the payload held; the
    /// ingestion boundary overwrites it.
    pub fn into_event(self, default_ts: i64) -> Result<FrictionEvent, ValidationError> {
        let event_type = self.validate()?;

        let emitted_at = self.emitted_ts().unwrap_or(default_ts);
        let received_at = self.received_ts();
        let data = self.data.map(convert_data).unwrap_or_default();

        Ok(FrictionEvent {
            session_id: coerce_label("sessionId", self.session_id),
            form_id: coerce_label("form", self.form),
            field: self.field.unwrap_or_default(),
            event_type,
            data,
            emitted_at,
            received_at,
        })
    }
}

impl From<&FrictionEvent> for MetricPayload {
    fn from(event: &FrictionEvent) -> Self {
        let data: Map<String, Value> = event
            .data
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    DataValue::Number(n) => serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                    DataValue::Text(s) => Value::String(s.clone()),
                };
                (k.clone(), value)
            })
            .collect();

        MetricPayload {
            session_id: Some(Value::String(event.session_id.clone())),
            form: Some(Value::String(event.form_id.clone())),
            field: Some(event.field.clone()),
            event_type: Some(event.event_type.as_str().to_string()),
            data: Some(Value::Object(data)),
            ts: Some(Value::from(event.emitted_at)),
            received_at: event.received_at.map(Value::from),
        }
    }
}

/// Identifier from a string or number; anything else becomes `"unknown"`
fn coerce_label(key: &str, value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        None | Some(Value::String(_)) => UNKNOWN.to_string(),
        Some(other) => {
            log::debug!("Ignoring non-scalar '{}': {}", key, other);
            UNKNOWN.to_string()
        }
    }
}

fn coerce_timestamp(key: &str, value: &Value) -> Option<i64> {
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    };
    if millis.is_none() {
        log::debug!("Ignoring unusable '{}': {}", key, value);
    }
    millis
}

/// Keep numeric and string values; other JSON shapes carry no metric meaning
fn convert_data(raw: Value) -> EventData {
    let raw = match raw {
        Value::Object(map) => map,
        other => {
            log::debug!("Ignoring non-object payload data: {}", other);
            return EventData::new();
        }
    };
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Number(n) => n.as_f64().map(|n| (key, DataValue::Number(n))),
            Value::String(s) => Some((key, DataValue::Text(s))),
            other => {
                log::debug!("Dropping non-scalar payload value '{}': {}", key, other);
                None
            }
        })
        .collect()
}

/// Response body for the ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngestResponse {
    Ok { status: String },
    Error { error: String },
}

impl IngestResponse {
    pub fn ok() -> Self {
        IngestResponse::Ok {
            status: "ok".to_string(),
        }
    }

    pub fn invalid() -> Self {
        IngestResponse::Error {
            error: INVALID_PAYLOAD_MESSAGE.to_string(),
        }
    }

    /// The payload was valid but the store refused it
    pub fn store_failed() -> Self {
        IngestResponse::Error {
            error: STORE_FAILURE_MESSAGE.to_string(),
        }
    }

    /// HTTP status code the transport layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            IngestResponse::Ok { .. } => 200,
            IngestResponse::Error { error } if error == STORE_FAILURE_MESSAGE => 500,
            IngestResponse::Error { .. } => 400,
        }
    }
}
