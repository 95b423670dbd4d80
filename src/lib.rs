//! FormFix - form-field friction capture and analysis
//!
//! FormFix observes how people interact with individual form fields, turns
//! those interactions into friction metrics, and analyzes the collected
//! metrics into actionable insights:
//! capture → ingestion → storage → friction / drop-off / recommendation analysis.
//!
//! ## Modules
//!
//! - **Capture**: per-field interaction state machines and form-level abandonment detection
//! - **Ingestion**: payload validation and receipt stamping in front of a [`MetricStore`]
//! - **Analysis**: friction scoring, drop-off attribution, recommendations, journeys

pub mod analysis;
pub mod capture;
pub mod config;
pub mod encoder;
pub mod error;
pub mod ingest;
pub mod schema;
pub mod store;
pub mod types;

pub use analysis::{analyze_request_json, generate_insights, AnalysisResponse, Insights, InsightsProcessor};
pub use capture::{FieldDescriptor, FormTracker, Interaction, SessionId, Transport};
pub use config::{AnalysisConfig, CaptureConfig, FormFixConfig};
pub use encoder::{InsightEncoder, InsightReport};
pub use error::{AnalysisError, FormFixError, StoreError, TransportError, ValidationError};
pub use ingest::Ingestor;
pub use store::{InMemoryMetricStore, MetricStore, NdjsonFileStore};
pub use types::{EventType, FrictionEvent};

// Schema exports
pub use schema::{IngestResponse, MetricAdapter, MetricPayload, SCHEMA_VERSION};

/// FormFix version embedded in insight reports
pub const FORMFIX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for insight reports
pub const PRODUCER_NAME: &str = "formfix";
