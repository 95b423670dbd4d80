//! Friction event types
//!
//! This module defines the metric records that flow from the capture layer
//! through ingestion into the analysis engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sentinel used when a form or field cannot be identified
pub const UNKNOWN: &str = "unknown";

/// Kinds of friction events emitted by the capture layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FieldFocus,
    Hesitation,
    TypingRate,
    Backspace,
    CorrectionRate,
    TypingSpeedDropoff,
    Paste,
    Hover,
    RageClick,
    FieldBlur,
    FormSubmit,
    FormAbandon,
}

impl EventType {
    pub const ALL: [EventType; 12] = [
        EventType::FieldFocus,
        EventType::Hesitation,
        EventType::TypingRate,
        EventType::Backspace,
        EventType::CorrectionRate,
        EventType::TypingSpeedDropoff,
        EventType::Paste,
        EventType::Hover,
        EventType::RageClick,
        EventType::FieldBlur,
        EventType::FormSubmit,
        EventType::FormAbandon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::FieldFocus => "field_focus",
            EventType::Hesitation => "hesitation",
            EventType::TypingRate => "typing_rate",
            EventType::Backspace => "backspace",
            EventType::CorrectionRate => "correction_rate",
            EventType::TypingSpeedDropoff => "typing_speed_dropoff",
            EventType::Paste => "paste",
            EventType::Hover => "hover",
            EventType::RageClick => "rage_click",
            EventType::FieldBlur => "field_blur",
            EventType::FormSubmit => "form_submit",
            EventType::FormAbandon => "form_abandon",
        }
    }

    /// Whether the event describes the form as a whole rather than a field
    pub fn is_form_level(&self) -> bool {
        matches!(self, EventType::FormSubmit | EventType::FormAbandon)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A single payload value: metrics are numbers, a few markers are strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Text(String),
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<u32> for DataValue {
    fn from(v: u32) -> Self {
        DataValue::Number(v as f64)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Number(v as f64)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

impl DataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            DataValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            DataValue::Number(_) => None,
        }
    }
}

/// Event-specific payload, keyed by camelCase metric name
pub type EventData = BTreeMap<String, DataValue>;

/// Payload keys shared by producers and the analysis engines
pub mod keys {
    pub const FOCUS_COUNT: &str = "focusCount";
    pub const HESITATION: &str = "hesitation";
    pub const RATE: &str = "rate";
    pub const BACKSPACE_COUNT: &str = "backspaceCount";
    pub const CHAR_COUNT: &str = "charCount";
    pub const CORRECTION_RATE: &str = "correctionRate";
    pub const PREV_AVG: &str = "prevAvg";
    pub const CURR_AVG: &str = "currAvg";
    pub const PASTE_COUNT: &str = "pasteCount";
    pub const TOTAL_HOVER_MS: &str = "totalHoverMs";
    /// Older producers report hover time under this key
    pub const TOTAL_HOVER_LEGACY: &str = "totalHover";
    pub const COUNT: &str = "count";
    pub const SUBMITTED_AT: &str = "submittedAt";
    pub const ABANDONED_AT: &str = "abandonedAt";
    pub const TRIGGER: &str = "trigger";
}

/// A captured friction metric.
///
/// Immutable once emitted. `received_at` is assigned by ingestion only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrictionEvent {
    /// Opaque tracking-session token
    pub session_id: String,
    /// Best-effort form identifier
    #[serde(rename = "form")]
    pub form_id: String,
    /// Human-readable field label
    pub field: String,
    /// Event kind
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Event-specific payload
    #[serde(default)]
    pub data: EventData,
    /// Client capture time (epoch milliseconds)
    #[serde(rename = "ts")]
    pub emitted_at: i64,
    /// Server receipt time (epoch milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<i64>,
}

impl FrictionEvent {
    pub fn new(
        session_id: impl Into<String>,
        form_id: impl Into<String>,
        field: impl Into<String>,
        event_type: EventType,
        data: EventData,
        emitted_at: i64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            form_id: form_id.into(),
            field: field.into(),
            event_type,
            data,
            emitted_at,
            received_at: None,
        }
    }

    /// Numeric payload value, if present
    pub fn number(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(DataValue::as_f64)
    }

    /// Hover total, accepting the legacy key
    pub fn total_hover_ms(&self) -> Option<f64> {
        self.number(keys::TOTAL_HOVER_MS)
            .or_else(|| self.number(keys::TOTAL_HOVER_LEGACY))
    }

    /// Copy of this event stamped with a receipt time
    pub fn received(mut self, received_at: i64) -> Self {
        self.received_at = Some(received_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&EventType::TypingSpeedDropoff).unwrap();
        assert_eq!(json, "\"typing_speed_dropoff\"");

        let parsed: EventType = serde_json::from_str("\"rage_click\"").unwrap();
        assert_eq!(parsed, EventType::RageClick);
    }

    #[test]
    fn test_event_type_from_str_matches_serde_names() {
        for t in EventType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json.trim_matches('"'), t.as_str());
            assert_eq!(t.as_str().parse::<EventType>(), Ok(t));
        }
        assert!("keypress".parse::<EventType>().is_err());
    }

    #[test]
    fn test_friction_event_wire_format() {
        let json = r#"{
            "sessionId": "ffx_abc",
            "form": "signup",
            "field": "Email",
            "type": "backspace",
            "data": { "backspaceCount": 2 },
            "ts": 1700000000000
        }"#;

        let event: FrictionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.session_id, "ffx_abc");
        assert_eq!(event.form_id, "signup");
        assert_eq!(event.event_type, EventType::Backspace);
        assert_eq!(event.number(keys::BACKSPACE_COUNT), Some(2.0));
        assert_eq!(event.received_at, None);

        let out = serde_json::to_value(event.received(1700000000050)).unwrap();
        assert_eq!(out["receivedAt"], 1700000000050i64);
        assert_eq!(out["ts"], 1700000000000i64);
        assert_eq!(out["form"], "signup");
    }

    #[test]
    fn test_data_value_accepts_text_markers() {
        let json = r#"{ "submittedAt": 5, "trigger": "button_click" }"#;
        let data: EventData = serde_json::from_str(json).unwrap();
        assert_eq!(data["submittedAt"].as_f64(), Some(5.0));
        assert_eq!(data["trigger"].as_str(), Some("button_click"));
    }

    #[test]
    fn test_total_hover_legacy_alias() {
        let mut data = EventData::new();
        data.insert(keys::TOTAL_HOVER_LEGACY.to_string(), 1200.0.into());
        let event = FrictionEvent::new("s", "f", "Name", EventType::FieldBlur, data, 0);
        assert_eq!(event.total_hover_ms(), Some(1200.0));
    }
}
