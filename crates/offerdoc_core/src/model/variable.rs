//! Variable descriptor model consumed from the variable catalog.
//!
//! # Responsibility
//! - Mirror the flat `listVariables()` wire shape, including the open-ended
//!   `label_<lang>` localized label fields.
//! - Resolve the display label for one language.
//!
//! # Invariants
//! - `key` is the stable identity of a variable.
//! - Label resolution never fails: localized -> default label -> raw key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LOCALIZED_LABEL_PREFIX: &str = "label_";

/// Declared type of the value a variable resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Text,
    Number,
    Currency,
    Date,
    Percent,
    /// Any value type this build does not know about.
    #[serde(other)]
    Other,
}

/// Typed variable descriptor, grouped by `data_source` in menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDescriptor", into = "RawDescriptor")]
pub struct VariableDescriptor {
    pub key: String,
    /// Default label used when no localized label exists.
    pub label: String,
    /// Localized labels keyed by language code (`label_de` -> `de`).
    pub labels: BTreeMap<String, String>,
    pub data_source: String,
    pub value_type: ValueType,
}

impl VariableDescriptor {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            labels: BTreeMap::new(),
            data_source: data_source.into(),
            value_type: ValueType::Text,
        }
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_label(mut self, lang: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(lang.into(), label.into());
        self
    }

    /// Display label for `lang`.
    ///
    /// Falls back to the default label, then to the raw key, skipping blank
    /// values at each step.
    pub fn localized_label(&self, lang: &str) -> &str {
        self.labels
            .get(lang)
            .map(String::as_str)
            .filter(|label| !label.trim().is_empty())
            .or_else(|| Some(self.label.as_str()).filter(|label| !label.trim().is_empty()))
            .unwrap_or(self.key.as_str())
    }
}

#[derive(Serialize, Deserialize)]
struct RawDescriptor {
    key: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    data_source: String,
    #[serde(default)]
    value_type: ValueType,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl From<RawDescriptor> for VariableDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        let labels = raw
            .extra
            .into_iter()
            .filter_map(|(field, value)| {
                let lang = field.strip_prefix(LOCALIZED_LABEL_PREFIX)?;
                let label = value.as_str()?;
                (!lang.is_empty()).then(|| (lang.to_string(), label.to_string()))
            })
            .collect();

        Self {
            key: raw.key,
            label: raw.label,
            labels,
            data_source: raw.data_source,
            value_type: raw.value_type,
        }
    }
}

impl From<VariableDescriptor> for RawDescriptor {
    fn from(descriptor: VariableDescriptor) -> Self {
        let extra = descriptor
            .labels
            .into_iter()
            .map(|(lang, label)| {
                (
                    format!("{LOCALIZED_LABEL_PREFIX}{lang}"),
                    serde_json::Value::String(label),
                )
            })
            .collect();

        Self {
            key: descriptor.key,
            label: descriptor.label,
            data_source: descriptor.data_source,
            value_type: descriptor.value_type,
            extra,
        }
    }
}
