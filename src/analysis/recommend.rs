//! Optimization recommendations
//!
//! Rules run over per-field statistics taken from `field_blur` snapshots.

use crate::analysis::group::OrderedGroups;
use crate::analysis::types::{FieldPattern, Impact, Recommendation, RecommendationType};
use crate::config::AnalysisConfig;
use crate::types::{keys, EventType, FrictionEvent};
use std::collections::HashSet;

/// Recommendation rule engine
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Suggestions in field order; clarity before validation within a field
    pub fn generate(events: &[FrictionEvent], config: &AnalysisConfig) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for pattern in field_patterns(events) {
            if pattern.avg_hesitation > config.clarity_hesitation_ms {
                recommendations.push(Recommendation {
                    recommendation_type: RecommendationType::FieldClarity,
                    suggestion: format!("Clarify the purpose of \"{}\" field", pattern.name),
                    field: pattern.name.clone(),
                    impact: Impact::High,
                    reasoning: "Users hesitate significantly before filling this field".to_string(),
                });
            }

            if pattern.backspace_rate > config.validation_correction_rate {
                recommendations.push(Recommendation {
                    recommendation_type: RecommendationType::FieldValidation,
                    suggestion: format!("Add real-time validation for \"{}\"", pattern.name),
                    field: pattern.name.clone(),
                    impact: Impact::Medium,
                    reasoning: "High correction rate indicates unclear requirements".to_string(),
                });
            }
        }

        recommendations
    }
}

#[derive(Default)]
struct PatternAccumulator {
    total_hover_ms: f64,
    backspaces: f64,
    characters: f64,
    sessions: HashSet<String>,
}

/// Per-field blur statistics in order of first appearance
pub fn field_patterns(events: &[FrictionEvent]) -> Vec<FieldPattern> {
    let mut fields: OrderedGroups<PatternAccumulator> = OrderedGroups::new();

    for event in events.iter().filter(|e| e.event_type == EventType::FieldBlur) {
        let acc = fields.entry_or_insert_with(&event.field, PatternAccumulator::default);

        acc.total_hover_ms += event.total_hover_ms().unwrap_or(0.0);
        acc.backspaces += event.number(keys::BACKSPACE_COUNT).unwrap_or(0.0);
        acc.characters += event.number(keys::CHAR_COUNT).unwrap_or(0.0);
        acc.sessions.insert(event.session_id.clone());
    }

    fields
        .into_entries()
        .map(|(name, acc)| {
            let sessions = acc.sessions.len();
            FieldPattern {
                name,
                total_hover_ms: acc.total_hover_ms,
                backspaces: acc.backspaces,
                characters: acc.characters,
                sessions,
                avg_hesitation: acc.total_hover_ms / sessions.max(1) as f64,
                backspace_rate: if acc.characters > 0.0 {
                    acc.backspaces / acc.characters
                } else {
                    0.0
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventData;
    use pretty_assertions::assert_eq;

    fn blur(session: &str, field: &str, hover: f64, backspaces: f64, chars: f64) -> FrictionEvent {
        let mut data = EventData::new();
        data.insert(keys::TOTAL_HOVER_MS.to_string(), hover.into());
        data.insert(keys::BACKSPACE_COUNT.to_string(), backspaces.into());
        data.insert(keys::CHAR_COUNT.to_string(), chars.into());
        FrictionEvent::new(session, "signup", field, EventType::FieldBlur, data, 0)
    }

    #[test]
    fn test_field_patterns() {
        let events = vec![
            blur("s1", "Email", 4000.0, 2.0, 10.0),
            blur("s2", "Email", 8000.0, 1.0, 10.0),
            blur("s1", "Email", 0.0, 0.0, 0.0),
            blur("s1", "Name", 100.0, 0.0, 0.0),
        ];

        let patterns = field_patterns(&events);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].name, "Email");
        assert_eq!(patterns[0].sessions, 2);
        assert_eq!(patterns[0].avg_hesitation, 6000.0);
        assert_eq!(patterns[0].backspace_rate, 0.15);
        assert_eq!(patterns[1].backspace_rate, 0.0);
    }

    #[test]
    fn test_legacy_hover_key() {
        let mut data = EventData::new();
        data.insert(keys::TOTAL_HOVER_LEGACY.to_string(), 7000.0.into());
        let event = FrictionEvent::new("s1", "signup", "Phone", EventType::FieldBlur, data, 0);
        assert_eq!(field_patterns(&[event])[0].total_hover_ms, 7000.0);
    }

    #[test]
    fn test_recommendations() {
        let events = vec![
            blur("s1", "Company", 6000.0, 4.0, 10.0),
            blur("s1", "Name", 1000.0, 0.0, 8.0),
        ];

        let recommendations = RecommendationEngine::generate(&events, &AnalysisConfig::default());
        assert_eq!(
            recommendations,
            vec![
                Recommendation {
                    recommendation_type: RecommendationType::FieldClarity,
                    field: "Company".to_string(),
                    suggestion: "Clarify the purpose of \"Company\" field".to_string(),
                    impact: Impact::High,
                    reasoning: "Users hesitate significantly before filling this field".to_string(),
                },
                Recommendation {
                    recommendation_type: RecommendationType::FieldValidation,
                    field: "Company".to_string(),
                    suggestion: "Add real-time validation for \"Company\"".to_string(),
                    impact: Impact::Medium,
                    reasoning: "High correction rate indicates unclear requirements".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_non_blur_events_ignored() {
        let mut data = EventData::new();
        data.insert(keys::TOTAL_HOVER_MS.to_string(), 90_000.0.into());
        let hover = FrictionEvent::new("s1", "signup", "Email", EventType::Hover, data, 0);
        assert!(RecommendationEngine::generate(&[hover], &AnalysisConfig::default()).is_empty());
    }
}
