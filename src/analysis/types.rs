//! Analysis output types
//!
//! Everything here is derived from an event sequence on each pass and never
//! persisted. Serialized names follow the collector's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Overall friction verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrictionScore {
    Low,
    High,
}

/// Per-field friction aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFrictionAggregate {
    pub field: String,
    /// Hesitation samples in milliseconds, in receipt order
    pub hesitation_samples: Vec<f64>,
    /// Backspaces accumulated from per-cycle count deltas
    pub backspaces: f64,
    /// Sum of reported rage-click counts
    pub rage_clicks: f64,
    /// Latest reported focus count
    pub focus_count: u32,
}

impl FieldFrictionAggregate {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            hesitation_samples: Vec::new(),
            backspaces: 0.0,
            rage_clicks: 0.0,
            focus_count: 0,
        }
    }

    /// Mean hesitation (ms), 0 without samples
    pub fn avg_hesitation(&self) -> f64 {
        if self.hesitation_samples.is_empty() {
            return 0.0;
        }
        self.hesitation_samples.iter().sum::<f64>() / self.hesitation_samples.len() as f64
    }
}

/// Which signals pushed a field over the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFlags {
    pub high_hesitation: bool,
    pub many_backspaces: bool,
    pub rage_clicks: bool,
}

/// A field whose friction score exceeds the problematic threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFrictionIssue {
    pub field: String,
    pub friction_score: f64,
    pub issues: IssueFlags,
}

/// Result of the friction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrictionAnalysis {
    pub score: FrictionScore,
    pub problematic_fields: Vec<FieldFrictionIssue>,
}

/// Where a session was abandoned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOffPoint {
    pub session_id: String,
    /// Abandonment time, epoch milliseconds
    pub timestamp: i64,
    pub last_field: String,
}

/// Session-level completion counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOffSummary {
    pub total_sessions: usize,
    pub abandonments: usize,
    pub completions: usize,
    /// Percentage; `None` when there were no abandonments or completions
    pub drop_off_rate: Option<f64>,
}

/// Result of the drop-off pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOffAnalysis {
    #[serde(flatten)]
    pub summary: DropOffSummary,
    pub points: Vec<DropOffPoint>,
}

/// Field traversal of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJourney {
    pub session_id: String,
    pub field_order: Vec<String>,
    pub completed: bool,
    pub abandoned: bool,
}

/// Per-field statistics from blur snapshots, used by the recommendation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPattern {
    pub name: String,
    pub total_hover_ms: f64,
    pub backspaces: f64,
    pub characters: f64,
    pub sessions: usize,
    /// Hover dwell per session (ms), the hesitation proxy for recommendations
    pub avg_hesitation: f64,
    /// Backspaces per character, 0 without characters
    pub backspace_rate: f64,
}

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    FieldClarity,
    FieldValidation,
}

/// Expected effect of acting on a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Human-readable suggestion for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub field: String,
    pub suggestion: String,
    pub impact: Impact,
    pub reasoning: String,
}

/// Full insight set returned by the analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub friction_score: FrictionScore,
    pub problematic_fields: Vec<FieldFrictionIssue>,
    pub drop_off_points: Vec<DropOffPoint>,
    pub drop_off_summary: DropOffSummary,
    pub recommendations: Vec<Recommendation>,
    /// Rounded percentage; 0 without sessions, `None` when no session finished
    pub predicted_completion_rate: Option<i64>,
    pub user_journey_insights: Vec<UserJourney>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&FrictionScore::High).unwrap(), "\"High\"");
        assert_eq!(serde_json::to_string(&Impact::Medium).unwrap(), "\"Medium\"");
        assert_eq!(
            serde_json::to_string(&RecommendationType::FieldValidation).unwrap(),
            "\"field_validation\""
        );
    }

    #[test]
    fn test_undefined_drop_off_rate_serializes_as_null() {
        let summary = DropOffSummary {
            total_sessions: 1,
            abandonments: 0,
            completions: 0,
            drop_off_rate: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["dropOffRate"].is_null());
        assert_eq!(json["totalSessions"], 1);
    }

    #[test]
    fn test_avg_hesitation() {
        let mut agg = FieldFrictionAggregate::new("Email");
        assert_eq!(agg.avg_hesitation(), 0.0);
        agg.hesitation_samples = vec![1000.0, 3000.0];
        assert_eq!(agg.avg_hesitation(), 2000.0);
    }
}
