//! Per-field interaction state machine
//!
//! Each instrumented field owns one [`FieldInteractionState`]. Raw interaction
//! primitives are fed through [`FieldInteractionState::apply`], which updates
//! the per-focus-cycle counters and returns the friction signals to emit.
//! No clock is read here: every transition receives `now` in epoch
//! milliseconds, so the machine can be driven deterministically in tests.

use crate::config::CaptureConfig;
use crate::types::{keys, EventData, EventType};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Classification of a content change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Backspace-style deletion
    DeleteBackward,
    /// Typed character
    InsertText,
    /// Content inserted by a paste
    InsertFromPaste,
    /// Any other change (autofill, cut, composition, ...)
    Other,
}

impl EditKind {
    /// Map a DOM `InputEvent.inputType` string
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type {
            "deleteContentBackward" => EditKind::DeleteBackward,
            "insertText" => EditKind::InsertText,
            "insertFromPaste" => EditKind::InsertFromPaste,
            _ => EditKind::Other,
        }
    }

    fn is_insertion(&self) -> bool {
        matches!(self, EditKind::InsertText | EditKind::InsertFromPaste)
    }
}

/// Raw interaction primitive observed on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    Focus,
    Input { edit: EditKind },
    Paste,
    PointerEnter,
    PointerLeave,
    Click,
    Blur,
}

/// A friction metric produced by a transition, before it is addressed
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub event_type: EventType,
    pub data: EventData,
}

impl Signal {
    fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            data: EventData::new(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<crate::types::DataValue>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// Interaction counters for one field.
///
/// Everything except `focus_count` describes the current focus cycle and is
/// cleared on blur.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInteractionState {
    pub focus_started_at: Option<i64>,
    pub hesitation_recorded: bool,
    pub backspace_count: u32,
    pub char_count: u32,
    pub paste_count: u32,
    pub total_hover_ms: i64,
    pub hover_started_at: Option<i64>,
    pub recent_click_timestamps: VecDeque<i64>,
    pub recent_typing_intervals: Vec<i64>,
    pub last_change_at: Option<i64>,
    pub last_typing_rate: Option<f64>,
    /// Cumulative over the field's lifetime
    pub focus_count: u32,
}

impl FieldInteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure form of [`apply`](Self::apply): returns the next state and the
    /// signals emitted on the way there.
    pub fn transition(
        &self,
        interaction: Interaction,
        now: i64,
        config: &CaptureConfig,
    ) -> (Self, Vec<Signal>) {
        let mut next = self.clone();
        let signals = next.apply(interaction, now, config);
        (next, signals)
    }

    /// Apply one interaction and return the signals it produces, in order
    pub fn apply(&mut self, interaction: Interaction, now: i64, config: &CaptureConfig) -> Vec<Signal> {
        match interaction {
            Interaction::Focus => vec![self.on_focus(now)],
            Interaction::Input { edit } => self.on_input(edit, now, config),
            Interaction::Paste => vec![self.on_paste()],
            Interaction::PointerEnter => {
                self.hover_started_at = Some(now);
                Vec::new()
            }
            Interaction::PointerLeave => self.on_pointer_leave(now).into_iter().collect(),
            Interaction::Click => self.on_click(now, config).into_iter().collect(),
            Interaction::Blur => vec![self.on_blur()],
        }
    }

    /// Backspaces relative to inserted characters, if anything was inserted
    pub fn correction_rate(&self) -> Option<f64> {
        if self.char_count > 0 {
            Some(self.backspace_count as f64 / self.char_count as f64)
        } else {
            None
        }
    }

    fn on_focus(&mut self, now: i64) -> Signal {
        self.focus_count += 1;
        self.focus_started_at = Some(now);
        self.hesitation_recorded = false;
        Signal::new(EventType::FieldFocus).with(keys::FOCUS_COUNT, self.focus_count)
    }

    fn on_input(&mut self, edit: EditKind, now: i64, config: &CaptureConfig) -> Vec<Signal> {
        let mut signals = Vec::new();

        // Time from focus to first change, once per focus cycle
        if !self.hesitation_recorded {
            if let Some(started) = self.focus_started_at {
                self.hesitation_recorded = true;
                signals.push(Signal::new(EventType::Hesitation).with(keys::HESITATION, now - started));
            }
        }

        if let Some(last) = self.last_change_at {
            let interval = now - last;
            self.recent_typing_intervals.push(interval);
            if interval > 0 {
                let rate = 1000.0 / interval as f64;
                self.last_typing_rate = Some(rate);
                signals.push(Signal::new(EventType::TypingRate).with(keys::RATE, rate));
            }
        }
        self.last_change_at = Some(now);

        if edit == EditKind::DeleteBackward {
            self.backspace_count += 1;
            signals.push(
                Signal::new(EventType::Backspace).with(keys::BACKSPACE_COUNT, self.backspace_count),
            );
        } else if edit.is_insertion() {
            self.char_count += 1;
        }

        if let Some(rate) = self.correction_rate() {
            signals.push(Signal::new(EventType::CorrectionRate).with(keys::CORRECTION_RATE, rate));
        }

        if let Some((prev_avg, curr_avg)) = self.typing_dropoff(config) {
            signals.push(
                Signal::new(EventType::TypingSpeedDropoff)
                    .with(keys::PREV_AVG, prev_avg)
                    .with(keys::CURR_AVG, curr_avg),
            );
        }

        signals
    }

    /// Compare the latest window of intervals with the one before it
    fn typing_dropoff(&self, config: &CaptureConfig) -> Option<(f64, f64)> {
        let window = config.typing_window;
        let intervals = &self.recent_typing_intervals;
        if window == 0 || intervals.len() < window * 2 {
            return None;
        }

        let len = intervals.len();
        let prev_avg = mean(&intervals[len - 2 * window..len - window]);
        let curr_avg = mean(&intervals[len - window..]);

        if prev_avg > 0.0 && curr_avg > 0.0 && curr_avg > prev_avg * config.typing_dropoff_factor {
            Some((prev_avg, curr_avg))
        } else {
            None
        }
    }

    fn on_paste(&mut self) -> Signal {
        self.paste_count += 1;
        Signal::new(EventType::Paste).with(keys::PASTE_COUNT, self.paste_count)
    }

    fn on_pointer_leave(&mut self, now: i64) -> Option<Signal> {
        let started = self.hover_started_at.take()?;
        self.total_hover_ms += now - started;
        Some(Signal::new(EventType::Hover).with(keys::TOTAL_HOVER_MS, self.total_hover_ms))
    }

    fn on_click(&mut self, now: i64, config: &CaptureConfig) -> Option<Signal> {
        self.recent_click_timestamps.push_back(now);
        self.recent_click_timestamps
            .retain(|&ts| now - ts < config.rage_click_window_ms);

        let count = self.recent_click_timestamps.len();
        if count >= config.rage_click_min_clicks {
            Some(Signal::new(EventType::RageClick).with(keys::COUNT, count as u32))
        } else {
            None
        }
    }

    fn on_blur(&mut self) -> Signal {
        let signal = Signal::new(EventType::FieldBlur)
            .with(keys::TOTAL_HOVER_MS, self.total_hover_ms)
            .with(keys::BACKSPACE_COUNT, self.backspace_count)
            .with(keys::CHAR_COUNT, self.char_count)
            .with(keys::CORRECTION_RATE, self.correction_rate().unwrap_or(0.0))
            .with(keys::FOCUS_COUNT, self.focus_count)
            .with(keys::PASTE_COUNT, self.paste_count);

        *self = Self {
            focus_count: self.focus_count,
            ..Self::default()
        };

        signal
    }
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}
