//! Form-level tracking
//!
//! A [`FormTracker`] owns the interaction state of every registered field of
//! one form, the form's abandonment detector, and the transport that carries
//! emitted events to the collector. Delivery failures are logged and
//! swallowed so instrumentation never interrupts the user.

use crate::capture::abandonment::AbandonmentDetector;
use crate::capture::descriptor::{FieldDescriptor, FormDescriptor};
use crate::capture::field::{FieldInteractionState, Interaction};
use crate::capture::session::SessionId;
use crate::capture::transport::Transport;
use crate::config::CaptureConfig;
use crate::types::{keys, EventData, EventType, FrictionEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What caused a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    /// The form's own submit event
    Form,
    /// Click on a submit-type button or input
    ButtonClick,
}

#[derive(Debug, Clone)]
struct TrackedField {
    label: String,
    state: FieldInteractionState,
}

/// Tracks friction on the fields of one form
pub struct FormTracker<T: Transport> {
    session_id: SessionId,
    form_id: String,
    form_label: String,
    config: CaptureConfig,
    fields: HashMap<String, TrackedField>,
    abandonment: AbandonmentDetector,
    transport: T,
}

impl<T: Transport> FormTracker<T> {
    /// Create a tracker with default capture thresholds
    pub fn new(session_id: SessionId, form: &FormDescriptor, transport: T) -> Self {
        Self::with_config(session_id, form, transport, CaptureConfig::default())
    }

    pub fn with_config(
        session_id: SessionId,
        form: &FormDescriptor,
        transport: T,
        config: CaptureConfig,
    ) -> Self {
        Self {
            session_id,
            form_id: form.form_id(),
            form_label: form.label(),
            config,
            fields: HashMap::new(),
            abandonment: AbandonmentDetector::new(),
            transport,
        }
    }

    /// Create a tracker and register every field the descriptor lists
    pub fn from_descriptor(session_id: SessionId, form: &FormDescriptor, transport: T) -> Self {
        let mut tracker = Self::new(session_id, form, transport);
        for field in &form.fields {
            tracker.register_field(field.key(), &field.to_field_descriptor());
        }
        tracker
    }

    /// Start tracking a field under `key`. Re-registering keeps existing state.
    pub fn register_field(&mut self, key: impl Into<String>, descriptor: &FieldDescriptor) {
        self.fields.entry(key.into()).or_insert_with(|| TrackedField {
            label: descriptor.label(),
            state: FieldInteractionState::new(),
        });
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_state(&self, key: &str) -> Option<&FieldInteractionState> {
        self.fields.get(key).map(|f| &f.state)
    }

    pub fn is_started(&self) -> bool {
        self.abandonment.is_started()
    }

    /// Feed an interaction on a registered field.
    ///
    /// Returns the events emitted (already handed to the transport).
    pub fn record(&mut self, key: &str, interaction: Interaction, now: i64) -> Vec<FrictionEvent> {
        let Some(field) = self.fields.get_mut(key) else {
            log::debug!("Ignoring {:?} on untracked field '{}'", interaction, key);
            return Vec::new();
        };

        if interaction == Interaction::Focus {
            self.abandonment.mark_started();
        }

        let signals = field.state.apply(interaction, now, &self.config);
        let label = field.label.clone();

        signals
            .into_iter()
            .map(|signal| self.dispatch(&label, signal.event_type, signal.data, now))
            .collect()
    }

    /// Record a submission and emit `form_submit`
    pub fn submit(&mut self, trigger: SubmitTrigger, now: i64) -> FrictionEvent {
        self.abandonment.mark_submitted();

        let mut data = EventData::new();
        data.insert(keys::SUBMITTED_AT.to_string(), now.into());
        if trigger == SubmitTrigger::ButtonClick {
            data.insert(keys::TRIGGER.to_string(), "button_click".into());
        }

        let label = self.form_label.clone();
        self.dispatch(&label, EventType::FormSubmit, data, now)
    }

    /// Page/session teardown; emits `form_abandon` at most once
    pub fn teardown(&mut self, now: i64) -> Option<FrictionEvent> {
        let (event_type, data) = self.abandonment.on_teardown(now)?;
        let label = self.form_label.clone();
        Some(self.dispatch(&label, event_type, data, now))
    }

    fn dispatch(&self, field: &str, event_type: EventType, data: EventData, now: i64) -> FrictionEvent {
        let event = FrictionEvent::new(
            self.session_id.as_str(),
            self.form_id.as_str(),
            field,
            event_type,
            data,
            now,
        );

        if let Err(e) = self.transport.deliver(&event) {
            log::warn!(
                "Dropped {} metric for field '{}' in session {}: {}",
                event.event_type,
                event.field,
                event.session_id,
                e
            );
        }

        event
    }
}
