//! Drop-off and completion
//!
//! Counts sessions, abandonments and completions, attributes each
//! abandonment to the last field the session left, and predicts the
//! completion rate.

use crate::analysis::types::{DropOffAnalysis, DropOffPoint, DropOffSummary};
use crate::types::{keys, EventType, FrictionEvent};
use std::collections::HashSet;

/// Reported when a session never left any field before abandoning
pub const UNKNOWN_LAST_FIELD: &str = "Unknown";

/// Drop-off analysis engine
pub struct DropOffAnalyzer;

impl DropOffAnalyzer {
    pub fn analyze(events: &[FrictionEvent]) -> DropOffAnalysis {
        let summary = Self::summarize(events);

        let points = events
            .iter()
            .filter(|e| e.event_type == EventType::FormAbandon)
            .map(|abandon| DropOffPoint {
                session_id: abandon.session_id.clone(),
                timestamp: abandon
                    .number(keys::ABANDONED_AT)
                    .map(|ts| ts as i64)
                    .unwrap_or(abandon.emitted_at),
                last_field: last_field_before(events, abandon),
            })
            .collect();

        DropOffAnalysis { summary, points }
    }

    pub fn summarize(events: &[FrictionEvent]) -> DropOffSummary {
        let total_sessions = events
            .iter()
            .map(|e| e.session_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let abandonments = count_type(events, EventType::FormAbandon);
        let completions = count_type(events, EventType::FormSubmit);

        DropOffSummary {
            total_sessions,
            abandonments,
            completions,
            drop_off_rate: percentage(abandonments, abandonments + completions),
        }
    }
}

/// Field of the session's latest blur at or before the abandonment.
///
/// Blurs are compared by capture time; on equal times the one received
/// later wins.
pub fn last_field_before(events: &[FrictionEvent], abandon: &FrictionEvent) -> String {
    let mut latest: Option<&FrictionEvent> = None;

    for event in events.iter().filter(|e| {
        e.event_type == EventType::FieldBlur
            && e.session_id == abandon.session_id
            && e.emitted_at <= abandon.emitted_at
    }) {
        match latest {
            Some(best) if event.emitted_at < best.emitted_at => {}
            _ => latest = Some(event),
        }
    }

    latest
        .map(|e| e.field.clone())
        .unwrap_or_else(|| UNKNOWN_LAST_FIELD.to_string())
}

/// Predicted completion percentage
///
/// Formula: `round(completions / (completions + abandonments) * 100)`.
/// Returns 0 without sessions and `None` when no session has finished.
pub fn predicted_completion_rate(summary: &DropOffSummary) -> Option<i64> {
    if summary.total_sessions == 0 {
        return Some(0);
    }
    percentage(summary.completions, summary.completions + summary.abandonments)
        .map(|rate| rate.round() as i64)
}

fn count_type(events: &[FrictionEvent], event_type: EventType) -> usize {
    events.iter().filter(|e| e.event_type == event_type).count()
}

fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}
