//! Per-session field traversal

use crate::analysis::group::OrderedGroups;
use crate::analysis::types::UserJourney;
use crate::types::{EventType, FrictionEvent};

/// Sessions that focused fewer fields than this are left out
pub const MIN_JOURNEY_FIELDS: usize = 2;

pub struct JourneyAnalyzer;

impl JourneyAnalyzer {
    /// Focus order per session, sessions in order of first appearance
    pub fn analyze(events: &[FrictionEvent]) -> Vec<UserJourney> {
        let mut sessions: OrderedGroups<UserJourney> = OrderedGroups::new();

        for event in events {
            let journey = sessions.entry_or_insert_with(&event.session_id, || UserJourney {
                session_id: event.session_id.clone(),
                field_order: Vec::new(),
                completed: false,
                abandoned: false,
            });

            match event.event_type {
                EventType::FieldFocus => journey.field_order.push(event.field.clone()),
                EventType::FormSubmit => journey.completed = true,
                EventType::FormAbandon => journey.abandoned = true,
                _ => {}
            }
        }

        sessions
            .into_values()
            .filter(|j| j.field_order.len() >= MIN_JOURNEY_FIELDS)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventData;
    use pretty_assertions::assert_eq;

    fn event(session: &str, field: &str, event_type: EventType) -> FrictionEvent {
        FrictionEvent::new(session, "signup", field, event_type, EventData::new(), 0)
    }

    #[test]
    fn test_journeys() {
        let events = vec![
            event("s2", "Name", EventType::FieldFocus),
            event("s1", "Name", EventType::FieldFocus),
            event("s1", "Email", EventType::FieldFocus),
            event("s2", "Email", EventType::FieldFocus),
            event("s1", "Name", EventType::FieldFocus),
            event("s2", "signup", EventType::FormSubmit),
            event("s1", "signup", EventType::FormAbandon),
            event("s3", "Name", EventType::FieldFocus),
        ];

        let journeys = JourneyAnalyzer::analyze(&events);
        assert_eq!(
            journeys,
            vec![
                UserJourney {
                    session_id: "s2".to_string(),
                    field_order: vec!["Name".to_string(), "Email".to_string()],
                    completed: true,
                    abandoned: false,
                },
                UserJourney {
                    session_id: "s1".to_string(),
                    field_order: vec!["Name".to_string(), "Email".to_string(), "Name".to_string()],
                    completed: false,
                    abandoned: true,
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(JourneyAnalyzer::analyze(&[]).is_empty());
    }
}
