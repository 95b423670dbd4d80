//! Field and form descriptors
//!
//! Describes instrumented elements by the attributes the capture layer uses to
//! label them. Form descriptors produced by the external structure analyzer
//! deserialize straight into [`FormDescriptor`].

use crate::types::UNKNOWN;
use serde::{Deserialize, Serialize};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Labelling attributes of an instrumented field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FieldDescriptor {
    /// Descriptor with only a `name` attribute
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Human-readable label: aria-label, placeholder, name, id, then "unknown"
    pub fn label(&self) -> String {
        non_empty(&self.aria_label)
            .or_else(|| non_empty(&self.placeholder))
            .or_else(|| non_empty(&self.name))
            .or_else(|| non_empty(&self.id))
            .unwrap_or(UNKNOWN)
            .to_string()
    }
}

/// A field as reported by the form-structure analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribedField {
    pub selector: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
}

impl DescribedField {
    /// Tracking key: the `name` attribute when known, else the selector
    pub fn key(&self) -> &str {
        non_empty(&self.name).unwrap_or(&self.selector)
    }

    pub fn to_field_descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            aria_label: Some(self.label.clone()),
            name: self.name.clone(),
            ..FieldDescriptor::default()
        }
    }
}

/// A form and its fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    #[serde(default)]
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub fields: Vec<DescribedField>,
}

impl FormDescriptor {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Form identifier carried on every event: id, then name, then "unknown"
    pub fn form_id(&self) -> String {
        non_empty(&self.id)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    /// Label used as `field` on form-level events
    pub fn label(&self) -> String {
        non_empty(&self.aria_label)
            .or_else(|| non_empty(&self.name))
            .or_else(|| non_empty(&self.id))
            .unwrap_or(UNKNOWN)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_precedence() {
        let full = FieldDescriptor::named("email")
            .with_aria_label("Email address")
            .with_placeholder("you@example.com")
            .with_id("email-input");
        assert_eq!(full.label(), "Email address");

        let no_aria = FieldDescriptor {
            aria_label: None,
            ..full.clone()
        };
        assert_eq!(no_aria.label(), "you@example.com");

        assert_eq!(FieldDescriptor::named("email").with_id("x").label(), "email");
        assert_eq!(FieldDescriptor::default().with_id("x").label(), "x");
        assert_eq!(FieldDescriptor::default().label(), "unknown");
    }

    #[test]
    fn test_empty_attributes_are_skipped() {
        let field = FieldDescriptor::named("").with_aria_label("").with_id("phone");
        assert_eq!(field.label(), "phone");
    }

    #[test]
    fn test_form_identity_fallbacks() {
        assert_eq!(FormDescriptor::with_id("signup").form_id(), "signup");
        assert_eq!(FormDescriptor::default().form_id(), "unknown");

        let named = FormDescriptor {
            name: Some("contact".to_string()),
            ..FormDescriptor::default()
        };
        assert_eq!(named.form_id(), "contact");
        assert_eq!(named.label(), "contact");
    }

    #[test]
    fn test_analyzer_descriptor_deserialization() {
        let json = r#"{
            "selector": "form",
            "fields": [
                {
                    "selector": "input[name='email']",
                    "type": "input",
                    "label": "Email",
                    "name": "email",
                    "aiInsight": "Standard field - good completion rate"
                },
                {
                    "selector": "textarea",
                    "type": "textarea",
                    "label": "Message"
                }
            ]
        }"#;

        let form: FormDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[0].key(), "email");
        assert_eq!(form.fields[1].key(), "textarea");
        assert_eq!(form.fields[1].to_field_descriptor().label(), "Message");
    }
}
