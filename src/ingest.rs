//! Metric ingestion boundary
//!
//! Validates incoming payloads, stamps the receipt time, and appends to a
//! [`MetricStore`]. Rejected payloads are dropped and reported to the caller.

use crate::error::{FormFixError, StoreError, ValidationError};
use crate::schema::{IngestResponse, MetricPayload};
use crate::store::{Accepted, MetricStore};
use crate::types::FrictionEvent;
use chrono::Utc;

/// Why an ingestion attempt did not land in the store
#[derive(Debug, thiserror::Error)]
pub enum Rejected {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<Rejected> for FormFixError {
    fn from(e: Rejected) -> Self {
        match e {
            Rejected::Invalid(e) => FormFixError::Validation(e),
            Rejected::Store(e) => FormFixError::Store(e),
        }
    }
}

/// Ingestion front for a store
pub struct Ingestor<'a, S: MetricStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: MetricStore + ?Sized> Ingestor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate and append a raw payload, stamping `receivedAt` with the current time
    pub fn ingest(&self, payload: MetricPayload) -> Result<Accepted, Rejected> {
        self.ingest_at(payload, Utc::now().timestamp_millis())
    }

    /// As [`ingest`](Self::ingest) with an explicit receipt time
    pub fn ingest_at(&self, payload: MetricPayload, received_at: i64) -> Result<Accepted, Rejected> {
        let event = payload.into_event(received_at)?;
        self.append_stamped(event, received_at)
    }

    /// Accept an already typed event (in-process capture)
    pub fn accept(&self, event: FrictionEvent) -> Result<Accepted, Rejected> {
        self.accept_at(event, Utc::now().timestamp_millis())
    }

    pub fn accept_at(&self, event: FrictionEvent, received_at: i64) -> Result<Accepted, Rejected> {
        if event.field.is_empty() {
            return Err(ValidationError::MissingField("field").into());
        }
        self.append_stamped(event, received_at)
    }

    /// Handle a raw JSON body the way the HTTP collector does
    pub fn handle_json(&self, body: &str) -> IngestResponse {
        let payload = match serde_json::from_str::<MetricPayload>(body) {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!("Rejected unparseable metric body: {}", e);
                return IngestResponse::invalid();
            }
        };

        match self.ingest(payload) {
            Ok(_) => IngestResponse::ok(),
            Err(Rejected::Invalid(e)) => {
                log::debug!("Rejected metric: {}", e);
                IngestResponse::invalid()
            }
            Err(Rejected::Store(e)) => {
                log::error!("Failed to store metric: {}", e);
                IngestResponse::store_failed()
            }
        }
    }

    fn append_stamped(&self, event: FrictionEvent, received_at: i64) -> Result<Accepted, Rejected> {
        let event = event.received(received_at);
        log::debug!(
            "Received metric {} for field '{}' (session {})",
            event.event_type,
            event.field,
            event.session_id
        );
        Ok(self.store.append(event)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryMetricStore;
    use crate::types::{EventData, EventType};

    #[test]
    fn test_ingest_stamps_receipt_time() {
        let store = InMemoryMetricStore::new();
        let ingestor = Ingestor::new(&store);

        let payload: MetricPayload = serde_json::from_str(
            r#"{ "sessionId": "s1", "form": "f", "field": "Email", "type": "paste", "ts": 100, "receivedAt": 1 }"#,
        )
        .unwrap();
        let accepted = ingestor.ingest_at(payload, 5_000).unwrap();
        assert_eq!(accepted.index, 0);

        let events = store.read_all().unwrap();
        assert_eq!(events[0].emitted_at, 100);
        // Client-supplied receipt times are overwritten
        assert_eq!(events[0].received_at, Some(5_000));
    }

    #[test]
    fn test_invalid_payload_is_not_stored() {
        let store = InMemoryMetricStore::new();
        let ingestor = Ingestor::new(&store);

        let result = ingestor.ingest(MetricPayload::default());
        assert!(matches!(result, Err(Rejected::Invalid(_))));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_handle_json_responses() {
        let store = InMemoryMetricStore::new();
        let ingestor = Ingestor::new(&store);

        let ok = ingestor.handle_json(r#"{ "field": "Email", "type": "field_focus", "data": { "focusCount": 1 } }"#);
        assert_eq!(ok, IngestResponse::ok());

        let missing = ingestor.handle_json(r#"{ "field": "Email" }"#);
        assert_eq!(missing.http_status(), 400);

        let garbage = ingestor.handle_json("nope");
        assert_eq!(garbage, IngestResponse::invalid());

        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_loosely_typed_payloads_are_accepted() {
        let store = InMemoryMetricStore::new();
        let ingestor = Ingestor::new(&store);

        for body in [
            r#"{"field":"Email","type":"paste","ts":"1700000000000"}"#,
            r#"{"field":"Email","type":"paste","data":[1,2]}"#,
            r#"{"field":"Email","type":"paste","sessionId":42}"#,
        ] {
            assert_eq!(ingestor.handle_json(body), IngestResponse::ok(), "{}", body);
        }

        let events = store.read_all().unwrap();
        assert_eq!(events[0].emitted_at, 1_700_000_000_000);
        assert!(events[1].data.is_empty());
        assert_eq!(events[2].session_id, "42");
    }

    struct FullDisk;

    impl MetricStore for FullDisk {
        fn append(&self, _event: FrictionEvent) -> Result<Accepted, StoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left").into())
        }

        fn read_all(&self) -> Result<Vec<FrictionEvent>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_store_failure_is_a_server_error() {
        let ingestor = Ingestor::new(&FullDisk);

        let response = ingestor.handle_json(r#"{ "field": "Email", "type": "paste" }"#);
        assert_eq!(response, IngestResponse::store_failed());
        assert_eq!(response.http_status(), 500);

        // Bad payloads are still the client's fault
        assert_eq!(ingestor.handle_json(r#"{ "type": "paste" }"#).http_status(), 400);
    }

    #[test]
    fn test_accept_typed_event() {
        let store = InMemoryMetricStore::new();
        let ingestor = Ingestor::new(&store);
        let event = FrictionEvent::new("s", "f", "Name", EventType::Hover, EventData::new(), 7);

        ingestor.accept_at(event, 9).unwrap();
        assert_eq!(store.read_all().unwrap()[0].received_at, Some(9));
    }
}
