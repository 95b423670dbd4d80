//! Event delivery from the capture layer to the collector
//!
//! Delivery is fire-and-forget: a failed delivery is reported as a
//! [`TransportError`] and the caller decides whether to log it. Nothing is
//! retried and nothing blocks the interaction being described.

use crate::error::TransportError;
use crate::ingest::Ingestor;
use crate::store::MetricStore;
use crate::types::FrictionEvent;
use std::io::Write;
use std::sync::Mutex;

/// Acknowledgement of a delivered event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivered;

/// Destination for captured events
pub trait Transport {
    fn deliver(&self, event: &FrictionEvent) -> Result<Delivered, TransportError>;
}

/// Delivers straight into an in-process ingestion boundary
pub struct IngestTransport<'a, S: MetricStore + ?Sized> {
    ingestor: Ingestor<'a, S>,
}

impl<'a, S: MetricStore + ?Sized> IngestTransport<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            ingestor: Ingestor::new(store),
        }
    }
}

impl<S: MetricStore + ?Sized> Transport for IngestTransport<'_, S> {
    fn deliver(&self, event: &FrictionEvent) -> Result<Delivered, TransportError> {
        self.ingestor
            .accept(event.clone())
            .map(|_| Delivered)
            .map_err(|e| TransportError::Rejected(e.to_string()))
    }
}

/// Writes each event as one NDJSON line (e.g. to stdout or a spool file)
pub struct NdjsonTransport<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> NdjsonTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> Transport for NdjsonTransport<W> {
    fn deliver(&self, event: &FrictionEvent) -> Result<Delivered, TransportError> {
        let line = serde_json::to_string(event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| TransportError::Unavailable("writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| TransportError::Unavailable(e.to_string()))?;
        Ok(Delivered)
    }
}

/// Discards everything; for trackers whose caller only wants returned events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn deliver(&self, _event: &FrictionEvent) -> Result<Delivered, TransportError> {
        Ok(Delivered)
    }
}
