//! Insight generation
//!
//! Public entry points that run every analysis engine over an event
//! sequence and assemble the combined [`Insights`].

use crate::analysis::dropoff::{predicted_completion_rate, DropOffAnalyzer};
use crate::analysis::friction::FrictionAnalyzer;
use crate::analysis::journey::JourneyAnalyzer;
use crate::analysis::recommend::RecommendationEngine;
use crate::analysis::types::Insights;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::schema::{AnalysisRequest, MetricAdapter};
use crate::store::MetricStore;
use crate::types::FrictionEvent;
use serde::{Deserialize, Serialize};

/// Error reported to analysis clients, whatever went wrong
pub const INSIGHTS_FAILED_MESSAGE: &str = "Insights generation failed";

/// Run every engine over `events` (receipt order).
///
/// Pure: the same events and config always give the same insights.
pub fn generate_insights(events: &[FrictionEvent], config: &AnalysisConfig) -> Insights {
    let friction = FrictionAnalyzer::analyze(events, config);
    let drop_off = DropOffAnalyzer::analyze(events);
    let predicted_completion_rate = predicted_completion_rate(&drop_off.summary);

    Insights {
        friction_score: friction.score,
        problematic_fields: friction.problematic_fields,
        drop_off_points: drop_off.points,
        drop_off_summary: drop_off.summary,
        recommendations: RecommendationEngine::generate(events, config),
        predicted_completion_rate,
        user_journey_insights: JourneyAnalyzer::analyze(events),
    }
}

/// Answer an analysis request body with default thresholds (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let response = analyze_request_json(r#"{ "metrics": [] }"#);
/// assert!(response.success);
/// ```
pub fn analyze_request_json(json: &str) -> AnalysisResponse {
    InsightsProcessor::new().respond(json)
}

/// Body returned by the analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    pub fn ok(insights: Insights) -> Self {
        Self {
            success: true,
            insights: Some(insights),
            error: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            insights: None,
            error: Some(INSIGHTS_FAILED_MESSAGE.to_string()),
        }
    }

    pub fn http_status(&self) -> u16 {
        if self.success {
            200
        } else {
            500
        }
    }
}

/// Insight generation with configurable thresholds.
pub struct InsightsProcessor {
    config: AnalysisConfig,
}

impl Default for InsightsProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightsProcessor {
    /// Processor with the default thresholds
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn insights(&self, events: &[FrictionEvent]) -> Insights {
        generate_insights(events, &self.config)
    }

    /// Insights over everything a store holds
    pub fn from_store<S: MetricStore + ?Sized>(&self, store: &S) -> Result<Insights, AnalysisError> {
        let events = store.read_all()?;
        log::info!("Generating insights over {} stored events", events.len());
        Ok(self.insights(&events))
    }

    /// Insights for an analysis request body.
    ///
    /// Entries that fail validation are skipped.
    pub fn process_request(&self, json: &str) -> Result<Insights, AnalysisError> {
        let request: AnalysisRequest = serde_json::from_str(json)?;
        let (events, skipped) = MetricAdapter::to_events(request.metrics);
        if skipped > 0 {
            log::warn!("Skipped {} invalid metrics in analysis request", skipped);
        }
        Ok(self.insights(&events))
    }

    /// Response for an analysis request body; failures are reported generically
    pub fn respond(&self, json: &str) -> AnalysisResponse {
        match self.process_request(json) {
            Ok(insights) => AnalysisResponse::ok(insights),
            Err(e) => {
                log::error!("Insights generation failed: {}", e);
                AnalysisResponse::failed()
            }
        }
    }
}
