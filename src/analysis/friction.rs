//! Friction scoring
//!
//! Aggregates hesitation, correction and rage-click signals per field and
//! flags fields whose weighted score crosses the problematic threshold.
//! Recomputed from the full event sequence on every call.

use crate::analysis::group::OrderedGroups;
use crate::analysis::types::{
    FieldFrictionAggregate, FieldFrictionIssue, FrictionAnalysis, FrictionScore, IssueFlags,
};
use crate::config::AnalysisConfig;
use crate::types::{keys, EventType, FrictionEvent};
use std::collections::HashMap;

/// Friction analysis engine
pub struct FrictionAnalyzer;

impl FrictionAnalyzer {
    /// Score every field and classify the problematic ones
    pub fn analyze(events: &[FrictionEvent], config: &AnalysisConfig) -> FrictionAnalysis {
        let problematic_fields: Vec<FieldFrictionIssue> = Self::aggregate(events)
            .into_iter()
            .filter_map(|agg| classify_field(&agg, config))
            .collect();

        let score = if problematic_fields.is_empty() {
            FrictionScore::Low
        } else {
            FrictionScore::High
        };

        FrictionAnalysis {
            score,
            problematic_fields,
        }
    }

    /// Per-field aggregates in order of first appearance
    ///
    /// Backspace counts are replayed in `emittedAt` order, receipt order
    /// breaking ties, so late-arriving deliveries do not inflate the total.
    pub fn aggregate(events: &[FrictionEvent]) -> Vec<FieldFrictionAggregate> {
        let mut fields: OrderedGroups<FieldFrictionAggregate> = OrderedGroups::new();

        for event in events {
            let agg = fields.entry_or_insert_with(&event.field, || {
                FieldFrictionAggregate::new(event.field.as_str())
            });

            match event.event_type {
                EventType::Hesitation => {
                    if let Some(ms) = event.number(keys::HESITATION) {
                        agg.hesitation_samples.push(ms);
                    }
                }
                EventType::RageClick => {
                    agg.rage_clicks += event.number(keys::COUNT).unwrap_or(0.0);
                }
                EventType::FieldFocus => {
                    if let Some(count) = event.number(keys::FOCUS_COUNT) {
                        agg.focus_count = count.max(0.0) as u32;
                    }
                }
                _ => {}
            }
        }

        let mut cycle_events: Vec<&FrictionEvent> = events
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    EventType::Backspace | EventType::FieldFocus | EventType::FieldBlur
                )
            })
            .collect();
        // Stable sort keeps receipt order for equal timestamps
        cycle_events.sort_by_key(|e| e.emitted_at);

        let mut backspaces = BackspaceCounter::default();
        for event in cycle_events {
            match event.event_type {
                EventType::Backspace => {
                    if let Some(count) = event.number(keys::BACKSPACE_COUNT) {
                        let delta = backspaces.delta(event, count);
                        fields
                            .entry_or_insert_with(&event.field, || {
                                FieldFrictionAggregate::new(event.field.as_str())
                            })
                            .backspaces += delta;
                    }
                }
                _ => backspaces.reset(event),
            }
        }

        fields.into_values().collect()
    }
}

/// Turns cumulative per-cycle backspace counts into increments.
///
/// Counts restart on every focus cycle; a count that does not exceed the
/// previous one therefore begins a new cycle and contributes in full.
#[derive(Default)]
struct BackspaceCounter {
    last: HashMap<(String, String), f64>,
}

impl BackspaceCounter {
    fn delta(&mut self, event: &FrictionEvent, count: f64) -> f64 {
        let key = (event.session_id.clone(), event.field.clone());
        let previous = self.last.insert(key, count).unwrap_or(0.0);
        if count > previous {
            count - previous
        } else {
            count.max(0.0)
        }
    }

    fn reset(&mut self, event: &FrictionEvent) {
        self.last
            .remove(&(event.session_id.clone(), event.field.clone()));
    }
}

/// Weighted friction score for one field
///
/// Formula: `avg_hesitation / 1000 + backspaces * 0.5 + rage_clicks * 2`
pub fn compute_friction_score(agg: &FieldFrictionAggregate, config: &AnalysisConfig) -> f64 {
    agg.avg_hesitation() / config.hesitation_divisor_ms
        + agg.backspaces * config.backspace_weight
        + agg.rage_clicks * config.rage_click_weight
}

fn classify_field(agg: &FieldFrictionAggregate, config: &AnalysisConfig) -> Option<FieldFrictionIssue> {
    let friction_score = compute_friction_score(agg, config);
    if friction_score <= config.problematic_score {
        return None;
    }

    Some(FieldFrictionIssue {
        field: agg.field.clone(),
        friction_score,
        issues: IssueFlags {
            high_hesitation: agg.avg_hesitation() > config.high_hesitation_ms,
            many_backspaces: agg.backspaces > config.many_backspaces,
            rage_clicks: agg.rage_clicks > 0.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventData;
    use pretty_assertions::assert_eq;

    fn metric(session: &str, field: &str, event_type: EventType, data: &[(&str, f64)]) -> FrictionEvent {
        let data: EventData = data
            .iter()
            .map(|(k, v)| (k.to_string(), (*v).into()))
            .collect();
        FrictionEvent::new(session, "signup", field, event_type, data, 0)
    }

    fn backspaces(session: &str, field: &str, counts: std::ops::RangeInclusive<u32>) -> Vec<FrictionEvent> {
        counts
            .map(|c| metric(session, field, EventType::Backspace, &[(keys::BACKSPACE_COUNT, c as f64)]))
            .collect()
    }

    #[test]
    fn test_backspaces_and_rage_click_make_field_problematic() {
        let mut events = vec![metric("s1", "Email", EventType::FieldFocus, &[(keys::FOCUS_COUNT, 1.0)])];
        events.extend(backspaces("s1", "Email", 1..=6));
        events.push(metric("s1", "Email", EventType::RageClick, &[(keys::COUNT, 1.0)]));

        let analysis = FrictionAnalyzer::analyze(&events, &AnalysisConfig::default());
        assert_eq!(analysis.score, FrictionScore::High);
        assert_eq!(
            analysis.problematic_fields,
            vec![FieldFrictionIssue {
                field: "Email".to_string(),
                friction_score: 5.0,
                issues: IssueFlags {
                    high_hesitation: false,
                    many_backspaces: true,
                    rage_clicks: true,
                },
            }]
        );
    }

    #[test]
    fn test_low_friction_when_nothing_crosses_threshold() {
        let events = vec![
            metric("s1", "Name", EventType::Hesitation, &[(keys::HESITATION, 1200.0)]),
            metric("s1", "Name", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 1.0)]),
        ];
        let analysis = FrictionAnalyzer::analyze(&events, &AnalysisConfig::default());
        assert_eq!(analysis.score, FrictionScore::Low);
        assert!(analysis.problematic_fields.is_empty());
    }

    #[test]
    fn test_score_exactly_at_threshold_is_not_problematic() {
        let events = vec![metric("s1", "Zip", EventType::Hesitation, &[(keys::HESITATION, 3000.0)])];
        let analysis = FrictionAnalyzer::analyze(&events, &AnalysisConfig::default());
        assert!(analysis.problematic_fields.is_empty());
    }

    #[test]
    fn test_high_hesitation_flag() {
        let events = vec![
            metric("s1", "Company", EventType::Hesitation, &[(keys::HESITATION, 4000.0)]),
            metric("s2", "Company", EventType::Hesitation, &[(keys::HESITATION, 5000.0)]),
        ];
        let analysis = FrictionAnalyzer::analyze(&events, &AnalysisConfig::default());
        let issue = &analysis.problematic_fields[0];
        assert_eq!(issue.friction_score, 4.5);
        assert!(issue.issues.high_hesitation);
        assert!(!issue.issues.many_backspaces);
        assert!(!issue.issues.rage_clicks);
    }

    #[test]
    fn test_backspace_counts_restart_each_cycle() {
        let mut events = backspaces("s1", "Email", 1..=3);
        events.push(metric("s1", "Email", EventType::FieldBlur, &[(keys::BACKSPACE_COUNT, 3.0)]));
        events.extend(backspaces("s1", "Email", 1..=2));
        // Another session typing into the same field interleaves
        events.extend(backspaces("s2", "Email", 1..=1));

        let aggregates = FrictionAnalyzer::aggregate(&events);
        assert_eq!(aggregates[0].backspaces, 6.0);
    }

    #[test]
    fn test_lost_backspace_events_still_counted() {
        let events = vec![
            metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 1.0)]),
            metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 4.0)]),
        ];
        assert_eq!(FrictionAnalyzer::aggregate(&events)[0].backspaces, 4.0);
    }

    #[test]
    fn test_backspace_total_ignores_delivery_order() {
        let emitted = |count: u32| {
            let mut event = metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, count as f64)]);
            event.emitted_at = i64::from(count) * 100;
            event
        };
        let in_order: Vec<FrictionEvent> = [1, 2, 3, 4].into_iter().map(emitted).collect();
        let delayed: Vec<FrictionEvent> = [1, 3, 2, 4].into_iter().map(emitted).collect();

        assert_eq!(FrictionAnalyzer::aggregate(&in_order)[0].backspaces, 4.0);
        assert_eq!(FrictionAnalyzer::aggregate(&delayed)[0].backspaces, 4.0);
    }

    #[test]
    fn test_late_blur_still_separates_cycles() {
        let at = |mut event: FrictionEvent, ts: i64| {
            event.emitted_at = ts;
            event
        };
        // The second cycle's first count is received before the end of the first cycle
        let events = vec![
            at(metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 1.0)]), 10),
            at(metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 2.0)]), 20),
            at(metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 1.0)]), 40),
            at(metric("s1", "Email", EventType::Backspace, &[(keys::BACKSPACE_COUNT, 3.0)]), 25),
            at(metric("s1", "Email", EventType::FieldBlur, &[]), 30),
        ];
        assert_eq!(FrictionAnalyzer::aggregate(&events)[0].backspaces, 4.0);
    }

    #[test]
    fn test_aggregate_keeps_first_appearance_order_and_latest_focus() {
        let events = vec![
            metric("s1", "Name", EventType::FieldFocus, &[(keys::FOCUS_COUNT, 1.0)]),
            metric("s1", "Email", EventType::FieldFocus, &[(keys::FOCUS_COUNT, 1.0)]),
            metric("s1", "Name", EventType::FieldFocus, &[(keys::FOCUS_COUNT, 2.0)]),
            metric("s1", "Email", EventType::RageClick, &[(keys::COUNT, 3.0)]),
            metric("s1", "Email", EventType::RageClick, &[(keys::COUNT, 4.0)]),
        ];

        let aggregates = FrictionAnalyzer::aggregate(&events);
        let fields: Vec<&str> = aggregates.iter().map(|a| a.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Email"]);
        assert_eq!(aggregates[0].focus_count, 2);
        assert_eq!(aggregates[1].rage_clicks, 7.0);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let mut events = backspaces("s1", "Email", 1..=8);
        events.push(metric("s1", "Phone", EventType::Hesitation, &[(keys::HESITATION, 9000.0)]));
        events.push(metric("s2", "Phone", EventType::RageClick, &[(keys::COUNT, 3.0)]));

        let config = AnalysisConfig::default();
        let first = FrictionAnalyzer::analyze(&events, &config);
        let second = FrictionAnalyzer::analyze(&events, &config);
        assert_eq!(first, second);
        assert_eq!(first.problematic_fields.len(), 2);
    }

    #[test]
    fn test_overridden_weights() {
        let events = backspaces("s1", "Email", 1..=2);
        let config = AnalysisConfig {
            backspace_weight: 2.0,
            ..AnalysisConfig::default()
        };
        let analysis = FrictionAnalyzer::analyze(&events, &config);
        assert_eq!(analysis.problematic_fields[0].friction_score, 4.0);
    }
}
