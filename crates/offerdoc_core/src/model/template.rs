//! Template records for the local content store.
//!
//! # Responsibility
//! - Identify offer/contract templates and their per-language variants.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another template.
//! - A template owns at most one variant per language code.
//! - Deletion is a soft-delete tombstone.

use crate::model::content::StoredContent;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a template.
pub type TemplateId = Uuid;

/// Template category shown in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Offer,
    Contract,
}

impl TemplateKind {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Contract => "contract",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "offer" => Some(Self::Offer),
            "contract" => Some(Self::Contract),
            _ => None,
        }
    }
}

/// Validation errors for template records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    NilUuid,
    EmptyName,
    InvalidLanguage(String),
}

impl Display for TemplateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "template uuid must not be nil"),
            Self::EmptyName => write!(f, "template name must not be empty"),
            Self::InvalidLanguage(value) => write!(
                f,
                "language code `{value}` must be 2-8 ascii letters, digits or `-`"
            ),
        }
    }
}

impl Error for TemplateValidationError {}

/// Offer or contract template header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub uuid: TemplateId,
    pub name: String,
    pub kind: TemplateKind,
    pub is_deleted: bool,
}

impl Template {
    /// Creates a template with a generated stable ID.
    pub fn new(kind: TemplateKind, name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            kind,
            is_deleted: false,
        }
    }

    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.uuid.is_nil() {
            return Err(TemplateValidationError::NilUuid);
        }
        if self.name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Content of one template in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariant {
    pub template_id: TemplateId,
    pub language: String,
    pub content: StoredContent,
    /// Epoch milliseconds of the last write.
    pub updated_at: i64,
}

/// Normalizes and validates a language code (`DE` -> `de`).
pub fn normalize_language(value: &str) -> Result<String, TemplateValidationError> {
    let trimmed = value.trim();
    let valid = (2..=8).contains(&trimmed.len())
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
    if !valid {
        return Err(TemplateValidationError::InvalidLanguage(value.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{normalize_language, Template, TemplateKind, TemplateValidationError};
    use uuid::Uuid;

    #[test]
    fn validate_rejects_blank_name_and_nil_uuid() {
        let mut template = Template::new(TemplateKind::Offer, "  ");
        assert_eq!(template.validate(), Err(TemplateValidationError::EmptyName));
        template.name = "Retainer".to_string();
        template.uuid = Uuid::nil();
        assert_eq!(template.validate(), Err(TemplateValidationError::NilUuid));
    }

    #[test]
    fn normalize_language_lowercases_and_rejects_garbage() {
        assert_eq!(normalize_language(" DE ").expect("de"), "de");
        assert_eq!(normalize_language("pt-BR").expect("pt-br"), "pt-br");
        assert!(normalize_language("x").is_err());
        assert!(normalize_language("en_US").is_err());
    }
}
