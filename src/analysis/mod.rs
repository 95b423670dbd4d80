//! Friction analysis
//!
//! Server-side engines that turn a stored event sequence into insights.
//! Every pass recomputes from the full sequence; nothing is cached.
//!
//! Pipeline: FrictionEvent[] → (friction, drop-off, recommendations, journeys) → Insights

pub mod dropoff;
pub mod friction;
pub(crate) mod group;
pub mod journey;
pub mod pipeline;
pub mod recommend;
pub mod types;

pub use dropoff::{last_field_before, predicted_completion_rate, DropOffAnalyzer, UNKNOWN_LAST_FIELD};
pub use friction::{compute_friction_score, FrictionAnalyzer};
pub use journey::JourneyAnalyzer;
pub use pipeline::{
    analyze_request_json, generate_insights, AnalysisResponse, InsightsProcessor,
    INSIGHTS_FAILED_MESSAGE,
};
pub use recommend::{field_patterns, RecommendationEngine};
pub use types::*;
