//! Form abandonment detection
//!
//! A form counts as abandoned when a field was focused but the form was never
//! submitted before the page or session ended.

use crate::types::{keys, EventData, EventType};

/// Watches one form instance for abandonment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbandonmentDetector {
    started: bool,
    submitted: bool,
    fired: bool,
}

impl AbandonmentDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any field focus marks the form as started
    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Submit events and submit-control clicks mark the form as submitted
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Called on page/session teardown.
    ///
    /// Returns the `form_abandon` payload at most once per form lifetime.
    pub fn on_teardown(&mut self, now: i64) -> Option<(EventType, EventData)> {
        if self.fired || !self.started || self.submitted {
            return None;
        }
        self.fired = true;

        let mut data = EventData::new();
        data.insert(keys::ABANDONED_AT.to_string(), now.into());
        Some((EventType::FormAbandon, data))
    }
}
